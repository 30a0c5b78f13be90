use super::*;

/// A directed edge: `user_id` wants `author_id`'s posts in their feed.
/// The `(user_id, author_id)` pair is unique; absence of a row is the
/// "not following" state.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Follow {
  pub id: i32,
  pub user_id: i32,
  pub author_id: i32,
}

#[derive(Clone, Debug)]
pub struct FollowForm {
  pub user_id: i32,
  pub author_id: i32,
}

impl Followable<FollowForm> for Follow {
  fn follow(conn: &Store, form: &FollowForm) -> Result<Option<Self>, Error> {
    let mut tables = conn.write_tables();
    if !tables.users.contains_key(&form.user_id) || !tables.users.contains_key(&form.author_id) {
      return Err(Error::NotFound);
    }
    if form.user_id == form.author_id {
      return Ok(None);
    }
    let existing = tables
      .follows
      .values()
      .find(|f| f.user_id == form.user_id && f.author_id == form.author_id)
      .cloned();
    if let Some(follow) = existing {
      return Ok(Some(follow));
    }
    let id = tables.next_id();
    let follow = Follow {
      id,
      user_id: form.user_id,
      author_id: form.author_id,
    };
    tables.follows.insert(id, follow.clone());
    tables
      .follows_by_user
      .entry(form.user_id)
      .or_default()
      .insert(form.author_id);
    Ok(Some(follow))
  }

  fn ignore(conn: &Store, form: &FollowForm) -> Result<usize, Error> {
    let mut tables = conn.write_tables();
    let edge_id = tables
      .follows
      .values()
      .find(|f| f.user_id == form.user_id && f.author_id == form.author_id)
      .map(|f| f.id)
      .ok_or(Error::NotFound)?;
    tables.follows.remove(&edge_id);
    if let Some(followed) = tables.follows_by_user.get_mut(&form.user_id) {
      followed.remove(&form.author_id);
    }
    Ok(1)
  }
}

impl Follow {
  pub fn is_following(conn: &Store, user_id: i32, author_id: i32) -> bool {
    let tables = conn.read_tables();
    tables
      .follows_by_user
      .get(&user_id)
      .map_or(false, |followed| followed.contains(&author_id))
  }

  pub fn count(conn: &Store) -> usize {
    conn.read_tables().follows.len()
  }
}

#[cfg(test)]
mod tests {
  use crate::db::{follow::*, user::*, Crud, Error, Followable, Store};
  use pretty_assertions::assert_eq;

  fn two_users(conn: &Store) -> (User_, User_) {
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
    (follower, author)
  }

  #[test]
  fn test_follow_is_idempotent() {
    let conn = Store::new();
    let (follower, author) = two_users(&conn);
    let form = FollowForm {
      user_id: follower.id,
      author_id: author.id,
    };

    let first = Follow::follow(&conn, &form).unwrap().unwrap();
    let second = Follow::follow(&conn, &form).unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(1, Follow::count(&conn));
    assert!(Follow::is_following(&conn, follower.id, author.id));
    assert!(!Follow::is_following(&conn, author.id, follower.id));
  }

  #[test]
  fn test_self_follow_creates_nothing() {
    let conn = Store::new();
    let (follower, _) = two_users(&conn);
    let form = FollowForm {
      user_id: follower.id,
      author_id: follower.id,
    };

    assert_eq!(None, Follow::follow(&conn, &form).unwrap());
    assert_eq!(0, Follow::count(&conn));
    assert!(!Follow::is_following(&conn, follower.id, follower.id));
  }

  #[test]
  fn test_unfollow_requires_an_edge() {
    let conn = Store::new();
    let (follower, author) = two_users(&conn);
    let form = FollowForm {
      user_id: follower.id,
      author_id: author.id,
    };

    assert_eq!(Err(Error::NotFound), Follow::ignore(&conn, &form));
    assert_eq!(0, Follow::count(&conn));

    Follow::follow(&conn, &form).unwrap();
    assert_eq!(Ok(1), Follow::ignore(&conn, &form));
    assert_eq!(0, Follow::count(&conn));
    assert!(!Follow::is_following(&conn, follower.id, author.id));

    // removing again is a precondition failure, not a silent no-op
    assert_eq!(Err(Error::NotFound), Follow::ignore(&conn, &form));
  }
}
