use super::*;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Group {
  pub id: i32,
  pub title: String,
  pub slug: String,
  pub description: String,
}

#[derive(Clone, Debug)]
pub struct GroupForm {
  pub title: String,
  pub slug: String,
  pub description: String,
}

impl Crud<GroupForm> for Group {
  fn create(conn: &Store, form: &GroupForm) -> Result<Self, Error> {
    let mut tables = conn.write_tables();
    if tables.groups_by_slug.contains_key(&form.slug) {
      return Err(Error::AlreadyExists);
    }
    let id = tables.next_id();
    let group = Group {
      id,
      title: form.title.to_owned(),
      slug: form.slug.to_owned(),
      description: form.description.to_owned(),
    };
    tables.groups.insert(id, group.clone());
    tables.groups_by_slug.insert(form.slug.to_owned(), id);
    Ok(group)
  }

  fn read(conn: &Store, group_id: i32) -> Result<Self, Error> {
    let tables = conn.read_tables();
    tables.groups.get(&group_id).cloned().ok_or(Error::NotFound)
  }
}

impl Group {
  pub fn read_from_slug(conn: &Store, slug: &str) -> Result<Self, Error> {
    let tables = conn.read_tables();
    tables
      .groups_by_slug
      .get(slug)
      .and_then(|id| tables.groups.get(id))
      .cloned()
      .ok_or(Error::NotFound)
  }

  /// Every group, oldest first. Used for the group choice field on the
  /// post form.
  pub fn list_all(conn: &Store) -> Vec<Group> {
    let tables = conn.read_tables();
    let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
    groups.sort_by_key(|g| g.id);
    groups
  }
}

#[cfg(test)]
mod tests {
  use crate::db::{group::*, Crud, Error, Store};
  use pretty_assertions::assert_eq;

  #[test]
  fn test_crud() {
    let conn = Store::new();

    let new_group = GroupForm {
      title: "Test group".into(),
      slug: "test-group".into(),
      description: "A group for tests".into(),
    };
    let inserted_group = Group::create(&conn, &new_group).unwrap();

    let read_group = Group::read(&conn, inserted_group.id).unwrap();
    assert_eq!(inserted_group, read_group);

    let by_slug = Group::read_from_slug(&conn, "test-group").unwrap();
    assert_eq!(inserted_group, by_slug);

    assert_eq!(
      Err(Error::NotFound),
      Group::read_from_slug(&conn, "missing")
    );
    assert_eq!(
      Err(Error::AlreadyExists),
      Group::create(&conn, &new_group).map(|g| g.id)
    );
  }
}
