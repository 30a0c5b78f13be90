use super::*;

/// Immutable once created; there is no edit or delete flow for comments.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Comment {
  pub id: i32,
  pub post_id: i32,
  pub creator_id: i32,
  pub text: String,
  pub published: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct CommentForm {
  pub post_id: i32,
  pub creator_id: i32,
  pub text: String,
  pub published: Option<DateTime<Utc>>,
}

impl Crud<CommentForm> for Comment {
  fn create(conn: &Store, form: &CommentForm) -> Result<Self, Error> {
    let mut tables = conn.write_tables();
    if !tables.posts.contains_key(&form.post_id) || !tables.users.contains_key(&form.creator_id) {
      return Err(Error::NotFound);
    }
    let id = tables.next_id();
    let comment = Comment {
      id,
      post_id: form.post_id,
      creator_id: form.creator_id,
      text: form.text.to_owned(),
      published: form.published.unwrap_or_else(naive_now),
    };
    tables.comments.insert(id, comment.clone());
    tables
      .comments_by_post
      .entry(form.post_id)
      .or_default()
      .push(id);
    Ok(comment)
  }

  fn read(conn: &Store, comment_id: i32) -> Result<Self, Error> {
    let tables = conn.read_tables();
    tables
      .comments
      .get(&comment_id)
      .cloned()
      .ok_or(Error::NotFound)
  }
}

#[cfg(test)]
mod tests {
  use crate::db::{comment::*, post::*, user::*, Crud, Error, Store};
  use pretty_assertions::assert_eq;

  #[test]
  fn test_crud() {
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

    let inserted_comment = Comment::create(
      &conn,
      &CommentForm {
        post_id: post.id,
        creator_id: user.id,
        text: "A comment".into(),
        published: None,
      },
    )
    .unwrap();

    let read_comment = Comment::read(&conn, inserted_comment.id).unwrap();
    assert_eq!(inserted_comment, read_comment);

    assert_eq!(
      Err(Error::NotFound),
      Comment::create(
        &conn,
        &CommentForm {
          post_id: 999,
          creator_id: user.id,
          text: "Orphan".into(),
          published: None,
        },
      )
      .map(|c| c.id)
    );
  }
}
