use crate::api::Perform;
use crate::db::follow::{Follow, FollowForm};
use crate::db::user::User_;
use crate::db::{Followable, Store};
use crate::{Principal, QuillError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct FollowAuthor {
  pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowResponse {
  pub author: String,
  pub following: bool,
}

impl Perform for FollowAuthor {
  type Response = FollowResponse;

  fn perform(&self, conn: &Store, principal: &Principal) -> Result<FollowResponse, QuillError> {
    let user = principal.user()?;
    let author = User_::find_by_username(conn, &self.username)?;

    // self-follow is silently absorbed, duplicate follow is idempotent
    Follow::follow(
      conn,
      &FollowForm {
        user_id: user.id,
        author_id: author.id,
      },
    )?;

    Ok(FollowResponse {
      following: Follow::is_following(conn, user.id, author.id),
      author: author.username,
    })
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnfollowAuthor {
  pub username: String,
}

impl Perform for UnfollowAuthor {
  type Response = FollowResponse;

  fn perform(&self, conn: &Store, principal: &Principal) -> Result<FollowResponse, QuillError> {
    let user = principal.user()?;
    let author = User_::find_by_username(conn, &self.username)?;

    // deleting an absent edge is NotFound, not a silent no-op
    Follow::ignore(
      conn,
      &FollowForm {
        user_id: user.id,
        author_id: author.id,
      },
    )?;

    Ok(FollowResponse {
      author: author.username,
      following: false,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::user::UserForm;
  use crate::db::Crud;
  use crate::QuillErrorType;
  use pretty_assertions::assert_eq;

  fn users(conn: &Store) -> (Principal, User_) {
    let follower = User_::create(
      conn,
      &UserForm {
        username: "terry".into(),
      },
    )
    .unwrap();
    let author = User_::create(
      conn,
      &UserForm {
        username: "june".into(),
      },
    )
    .unwrap();
    (Principal(Some(follower)), author)
  }

  #[test]
  fn test_follow_then_unfollow() {
    let conn = Store::new();
    let (principal, author) = users(&conn);

    let followed = FollowAuthor {
      username: author.username.to_owned(),
    }
    .perform(&conn, &principal)
    .unwrap();
    assert!(followed.following);

    // idempotent
    FollowAuthor {
      username: author.username.to_owned(),
    }
    .perform(&conn, &principal)
    .unwrap();
    assert_eq!(1, Follow::count(&conn));

    let unfollowed = UnfollowAuthor {
      username: author.username.to_owned(),
    }
    .perform(&conn, &principal)
    .unwrap();
    assert!(!unfollowed.following);
    assert_eq!(0, Follow::count(&conn));

    assert_eq!(
      QuillErrorType::NotFound,
      UnfollowAuthor {
        username: author.username,
      }
      .perform(&conn, &principal)
      .unwrap_err()
      .error_type
    );
  }

  #[test]
  fn test_self_follow_is_absorbed() {
    let conn = Store::new();
    let (principal, _) = users(&conn);

    let response = FollowAuthor {
      username: "terry".into(),
    }
    .perform(&conn, &principal)
    .unwrap();
    assert!(!response.following);
    assert_eq!(0, Follow::count(&conn));
  }

  #[test]
  fn test_unknown_username_is_not_found() {
    let conn = Store::new();
    let (principal, _) = users(&conn);

    assert_eq!(
      QuillErrorType::NotFound,
      FollowAuthor {
        username: "nobody".into(),
      }
      .perform(&conn, &principal)
      .unwrap_err()
      .error_type
    );
  }
}
