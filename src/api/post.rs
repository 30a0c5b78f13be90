use crate::api::Perform;
use crate::db::group::Group;
use crate::db::post::{Post, PostForm};
use crate::db::post_view::PostView;
use crate::db::{Crud, Store};
use crate::{Principal, QuillError, QuillErrorType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
  pub text: String,
  pub group_id: Option<i32>,
  pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
  pub post: PostView,
}

impl Perform for CreatePost {
  type Response = PostResponse;

  fn perform(&self, conn: &Store, principal: &Principal) -> Result<PostResponse, QuillError> {
    let user = principal.user()?;

    let text = self.text.trim();
    if text.is_empty() {
      return Err(QuillErrorType::EmptyPostText.into());
    }
    if let Some(group_id) = self.group_id {
      Group::read(conn, group_id)?;
    }

    // author is fixed to the caller, never client-supplied
    let post_form = PostForm {
      text: text.to_owned(),
      creator_id: user.id,
      group_id: self.group_id,
      image: self.image.to_owned(),
      published: None,
    };
    let inserted_post = Post::create(conn, &post_form)?;
    let post = PostView::read(conn, inserted_post.id)?;
    Ok(PostResponse { post })
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditPost {
  pub post_id: i32,
  pub text: String,
  pub group_id: Option<i32>,
  pub image: Option<String>,
}

impl Perform for EditPost {
  type Response = PostResponse;

  fn perform(&self, conn: &Store, principal: &Principal) -> Result<PostResponse, QuillError> {
    let user = principal.user()?;
    let orig_post = Post::read(conn, self.post_id)?;

    // the route layer turns this into a redirect to the read-only view
    if orig_post.creator_id != user.id {
      return Err(QuillErrorType::NotPostAuthor.into());
    }

    let text = self.text.trim();
    if text.is_empty() {
      return Err(QuillErrorType::EmptyPostText.into());
    }
    if let Some(group_id) = self.group_id {
      Group::read(conn, group_id)?;
    }

    let post_form = PostForm {
      text: text.to_owned(),
      creator_id: orig_post.creator_id,
      group_id: self.group_id,
      image: self.image.to_owned(),
      published: Some(orig_post.published),
    };
    let updated_post = Post::update(conn, self.post_id, &post_form)?;
    let post = PostView::read(conn, updated_post.id)?;
    Ok(PostResponse { post })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::user::{UserForm, User_};
  use pretty_assertions::assert_eq;

  fn logged_in(conn: &Store, name: &str) -> Principal {
    let user = User_::create(
      conn,
      &UserForm {
        username: name.into(),
      },
    )
    .unwrap();
    Principal(Some(user))
  }

  #[test]
  fn test_create_post_requires_login_and_text() {
    let conn = Store::new();
    let op = CreatePost {
      text: "Some text".into(),
      group_id: None,
      image: None,
    };

    let anon = Principal(None);
    assert_eq!(
      QuillErrorType::NotLoggedIn,
      op.perform(&conn, &anon).unwrap_err().error_type
    );

    let principal = logged_in(&conn, "terry");
    let empty = CreatePost {
      text: "   ".into(),
      group_id: None,
      image: None,
    };
    assert_eq!(
      QuillErrorType::EmptyPostText,
      empty.perform(&conn, &principal).unwrap_err().error_type
    );

    let response = op.perform(&conn, &principal).unwrap();
    assert_eq!("Some text", response.post.text);
    assert_eq!("terry", response.post.creator_name);
  }

  #[test]
  fn test_create_post_unknown_group_is_not_found() {
    let conn = Store::new();
    let principal = logged_in(&conn, "terry");
    let op = CreatePost {
      text: "Some text".into(),
      group_id: Some(999),
      image: None,
    };
    assert_eq!(
      QuillErrorType::NotFound,
      op.perform(&conn, &principal).unwrap_err().error_type
    );
  }

  #[test]
  fn test_edit_post_is_author_only() {
    let conn = Store::new();
    let author = logged_in(&conn, "author");
    let other = logged_in(&conn, "other");

    let created = CreatePost {
      text: "Original text".into(),
      group_id: None,
      image: None,
    }
    .perform(&conn, &author)
    .unwrap();

    let edit = EditPost {
      post_id: created.post.id,
      text: "Hijacked".into(),
      group_id: None,
      image: None,
    };
    assert_eq!(
      QuillErrorType::NotPostAuthor,
      edit.perform(&conn, &other).unwrap_err().error_type
    );
    // untouched
    assert_eq!(
      "Original text",
      Post::read(&conn, created.post.id).unwrap().text
    );

    let updated = edit.perform(&conn, &author).unwrap();
    assert_eq!("Hijacked", updated.post.text);
    assert_eq!(created.post.published, updated.post.published);
  }
}
