use super::*;
use crate::settings::Settings;

/// A feed row: the post joined with its creator, group and comment count.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PostView {
  pub id: i32,
  pub text: String,
  pub preview: String,
  pub creator_id: i32,
  pub creator_name: String,
  pub group_id: Option<i32>,
  pub group_title: Option<String>,
  pub group_slug: Option<String>,
  pub image: Option<String>,
  pub published: DateTime<Utc>,
  pub comment_count: i64,
}

impl PostView {
  pub fn read(conn: &Store, post_id: i32) -> Result<Self, Error> {
    let tables = conn.read_tables();
    let post = tables.posts.get(&post_id).ok_or(Error::NotFound)?;
    Ok(Self::from_post(&tables, post))
  }

  fn from_post(tables: &Tables, post: &post::Post) -> Self {
    let group = post.group_id.and_then(|id| tables.groups.get(&id));
    PostView {
      id: post.id,
      text: post.text.to_owned(),
      preview: post.preview(),
      creator_id: post.creator_id,
      creator_name: tables
        .users
        .get(&post.creator_id)
        .map(|u| u.username.to_owned())
        .unwrap_or_default(),
      group_id: post.group_id,
      group_title: group.map(|g| g.title.to_owned()),
      group_slug: group.map(|g| g.slug.to_owned()),
      image: post.image.to_owned(),
      published: post.published,
      comment_count: tables
        .comments_by_post
        .get(&post.id)
        .map_or(0, |ids| ids.len() as i64),
    }
  }
}

/// Builds the four feed shapes. Every shape orders by `published`
/// descending (ties broken by id descending) and runs through `paginate`.
pub struct PostQueryBuilder<'a> {
  conn: &'a Store,
  for_creator_id: Option<i32>,
  for_group_id: Option<i32>,
  for_subscriber_id: Option<i32>,
  page: Option<String>,
  page_size: usize,
}

impl<'a> PostQueryBuilder<'a> {
  pub fn create(conn: &'a Store) -> Self {
    PostQueryBuilder {
      conn,
      for_creator_id: None,
      for_group_id: None,
      for_subscriber_id: None,
      page: None,
      page_size: Settings::get().items_on_page,
    }
  }

  pub fn for_creator_id(mut self, creator_id: i32) -> Self {
    self.for_creator_id = Some(creator_id);
    self
  }

  pub fn for_group_id(mut self, group_id: i32) -> Self {
    self.for_group_id = Some(group_id);
    self
  }

  /// Restrict to posts written by authors the given user follows.
  pub fn for_subscriber_id(mut self, user_id: i32) -> Self {
    self.for_subscriber_id = Some(user_id);
    self
  }

  /// Raw `page` query value; parsing and clamping happen in `paginate`.
  pub fn page(mut self, page: Option<String>) -> Self {
    self.page = page;
    self
  }

  pub fn page_size(mut self, page_size: usize) -> Self {
    self.page_size = page_size;
    self
  }

  pub fn list(self) -> Result<Page<PostView>, Error> {
    let tables = self.conn.read_tables();
    let followed = self
      .for_subscriber_id
      .map(|id| tables.follows_by_user.get(&id).cloned().unwrap_or_default());

    let mut posts: Vec<&post::Post> = tables
      .posts
      .values()
      .filter(|p| self.for_creator_id.map_or(true, |id| p.creator_id == id))
      .filter(|p| self.for_group_id.map_or(true, |id| p.group_id == Some(id)))
      .filter(|p| {
        followed
          .as_ref()
          .map_or(true, |authors| authors.contains(&p.creator_id))
      })
      .collect();
    posts.sort_by(|a, b| b.published.cmp(&a.published).then(b.id.cmp(&a.id)));

    let page = paginate(posts, self.page.as_deref(), self.page_size);
    Ok(page.map(|p| PostView::from_post(&tables, p)))
  }
}
