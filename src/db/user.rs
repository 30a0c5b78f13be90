use super::*;

/// A reference row for a user owned by the external accounts module. The
/// core only needs to resolve ids and usernames.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct User_ {
  pub id: i32,
  pub username: String,
}

#[derive(Clone, Debug)]
pub struct UserForm {
  pub username: String,
}

impl Crud<UserForm> for User_ {
  fn create(conn: &Store, form: &UserForm) -> Result<Self, Error> {
    let mut tables = conn.write_tables();
    if tables.users_by_name.contains_key(&form.username) {
      return Err(Error::AlreadyExists);
    }
    let id = tables.next_id();
    let user = User_ {
      id,
      username: form.username.to_owned(),
    };
    tables.users.insert(id, user.clone());
    tables.users_by_name.insert(form.username.to_owned(), id);
    Ok(user)
  }

  fn read(conn: &Store, user_id: i32) -> Result<Self, Error> {
    let tables = conn.read_tables();
    tables.users.get(&user_id).cloned().ok_or(Error::NotFound)
  }
}

impl User_ {
  pub fn find_by_username(conn: &Store, username: &str) -> Result<Self, Error> {
    let tables = conn.read_tables();
    tables
      .users_by_name
      .get(username)
      .and_then(|id| tables.users.get(id))
      .cloned()
      .ok_or(Error::NotFound)
  }
}
