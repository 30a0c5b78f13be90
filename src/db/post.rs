use super::*;

/// Number of leading characters of `text` used as the display name.
pub const PREVIEW_LEN: usize = 15;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Post {
  pub id: i32,
  pub text: String,
  pub creator_id: i32,
  pub group_id: Option<i32>,
  pub image: Option<String>,
  pub published: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct PostForm {
  pub text: String,
  pub creator_id: i32,
  pub group_id: Option<i32>,
  pub image: Option<String>,
  pub published: Option<DateTime<Utc>>,
}

impl Crud<PostForm> for Post {
  fn create(conn: &Store, form: &PostForm) -> Result<Self, Error> {
    let mut tables = conn.write_tables();
    if !tables.users.contains_key(&form.creator_id) {
      return Err(Error::NotFound);
    }
    if let Some(group_id) = form.group_id {
      if !tables.groups.contains_key(&group_id) {
        return Err(Error::NotFound);
      }
    }
    let id = tables.next_id();
    let post = Post {
      id,
      text: form.text.to_owned(),
      creator_id: form.creator_id,
      group_id: form.group_id,
      image: form.image.to_owned(),
      published: form.published.unwrap_or_else(naive_now),
    };
    tables.posts.insert(id, post.clone());
    tables
      .posts_by_creator
      .entry(form.creator_id)
      .or_default()
      .push(id);
    if let Some(group_id) = form.group_id {
      tables.posts_by_group.entry(group_id).or_default().push(id);
    }
    Ok(post)
  }

  fn read(conn: &Store, post_id: i32) -> Result<Self, Error> {
    let tables = conn.read_tables();
    tables.posts.get(&post_id).cloned().ok_or(Error::NotFound)
  }
}

impl Post {
  /// Mutates text, group and image. `creator_id` and `published` are
  /// immutable after creation.
  pub fn update(conn: &Store, post_id: i32, form: &PostForm) -> Result<Self, Error> {
    let mut tables = conn.write_tables();
    let old_group_id = tables
      .posts
      .get(&post_id)
      .ok_or(Error::NotFound)?
      .group_id;
    if let Some(group_id) = form.group_id {
      if !tables.groups.contains_key(&group_id) {
        return Err(Error::NotFound);
      }
    }
    if old_group_id != form.group_id {
      if let Some(old) = old_group_id {
        if let Some(ids) = tables.posts_by_group.get_mut(&old) {
          ids.retain(|id| *id != post_id);
        }
      }
      if let Some(new) = form.group_id {
        tables.posts_by_group.entry(new).or_default().push(post_id);
      }
    }
    let post = tables.posts.get_mut(&post_id).ok_or(Error::NotFound)?;
    post.text = form.text.to_owned();
    post.group_id = form.group_id;
    post.image = form.image.to_owned();
    Ok(post.clone())
  }

  pub fn count_for_creator(conn: &Store, creator_id: i32) -> i64 {
    let tables = conn.read_tables();
    tables
      .posts_by_creator
      .get(&creator_id)
      .map_or(0, |ids| ids.len() as i64)
  }

  /// The display name of a post: its first characters, char-boundary safe.
  pub fn preview(&self) -> String {
    self.text.chars().take(PREVIEW_LEN).collect()
  }
}
