use super::*;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CommentView {
  pub id: i32,
  pub post_id: i32,
  pub creator_id: i32,
  pub creator_name: String,
  pub text: String,
  pub published: DateTime<Utc>,
}

impl CommentView {
  /// All comments on a post, most recent first.
  pub fn for_post(conn: &Store, post_id: i32) -> Result<Vec<CommentView>, Error> {
    let tables = conn.read_tables();
    if !tables.posts.contains_key(&post_id) {
      return Err(Error::NotFound);
    }
    let mut comments: Vec<&comment::Comment> = tables
      .comments_by_post
      .get(&post_id)
      .map(|ids| ids.iter().filter_map(|id| tables.comments.get(id)).collect())
      .unwrap_or_default();
    comments.sort_by(|a, b| b.published.cmp(&a.published).then(b.id.cmp(&a.id)));
    Ok(
      comments
        .into_iter()
        .map(|c| CommentView {
          id: c.id,
          post_id: c.post_id,
          creator_id: c.creator_id,
          creator_name: tables
            .users
            .get(&c.creator_id)
            .map(|u| u.username.to_owned())
            .unwrap_or_default(),
          text: c.text.to_owned(),
          published: c.published,
        })
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use crate::db::{comment::*, comment_view::*, post::*, user::*, Crud, Store};
  use chrono::{Duration, Utc};
  use pretty_assertions::assert_eq;

  #[test]
  fn test_comments_are_newest_first() {
    let conn = Store::new();
    let user = User_::create(
      &conn,
      &UserForm {
        username: "terry".into(),
      },
    )
    .unwrap();
    let post = Post::create(
      &conn,
      &PostForm {
        text: "A commentable post".into(),
        creator_id: user.id,
        group_id: None,
        image: None,
        published: None,
      },
    )
    .unwrap();

    let base = Utc::now();
    for (i, text) in ["first", "second", "third"].iter().enumerate() {
      Comment::create(
        &conn,
        &CommentForm {
          post_id: post.id,
          creator_id: user.id,
          text: (*text).into(),
          published: Some(base + Duration::seconds(i as i64)),
        },
      )
      .unwrap();
    }

    let views = CommentView::for_post(&conn, post.id).unwrap();
    let texts: Vec<&str> = views.iter().map(|v| v.text.as_str()).collect();
    assert_eq!(vec!["third", "second", "first"], texts);
    assert_eq!("terry", views[0].creator_name);
  }
}
