use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

pub mod comment;
pub mod comment_view;
pub mod follow;
pub mod group;
pub mod post;
pub mod post_view;
pub mod user;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
  #[error("record not found")]
  NotFound,
  #[error("record already exists")]
  AlreadyExists,
}

pub trait Crud<T> {
  fn create(conn: &Store, form: &T) -> Result<Self, Error>
  where
    Self: Sized;
  fn read(conn: &Store, id: i32) -> Result<Self, Error>
  where
    Self: Sized;
}

pub trait Followable<T> {
  /// Get-or-create semantics. A self-follow creates nothing and yields
  /// `Ok(None)`.
  fn follow(conn: &Store, form: &T) -> Result<Option<Self>, Error>
  where
    Self: Sized;
  /// Delete-or-NotFound: removing an absent edge is a precondition failure.
  fn ignore(conn: &Store, form: &T) -> Result<usize, Error>
  where
    Self: Sized;
}

/// All tables and their secondary indices. Relations are kept as explicit
/// id indices maintained on every write, queried explicitly by the views.
#[derive(Default)]
pub(crate) struct Tables {
  pub users: HashMap<i32, user::User_>,
  pub users_by_name: HashMap<String, i32>,
  pub groups: HashMap<i32, group::Group>,
  pub groups_by_slug: HashMap<String, i32>,
  pub posts: HashMap<i32, post::Post>,
  pub posts_by_creator: HashMap<i32, Vec<i32>>,
  pub posts_by_group: HashMap<i32, Vec<i32>>,
  pub comments: HashMap<i32, comment::Comment>,
  pub comments_by_post: HashMap<i32, Vec<i32>>,
  pub follows: HashMap<i32, follow::Follow>,
  // follower user id -> followed author ids
  pub follows_by_user: HashMap<i32, HashSet<i32>>,
  next_id: i32,
}

impl Tables {
  pub fn next_id(&mut self) -> i32 {
    self.next_id += 1;
    self.next_id
  }
}

/// The process-wide data store. A single write lock serializes mutation, so
/// uniqueness invariants (username, group slug, follow pair) hold under
/// concurrent requests.
pub struct Store {
  tables: RwLock<Tables>,
}

impl Store {
  pub fn new() -> Self {
    Store {
      tables: RwLock::new(Tables::default()),
    }
  }

  pub(crate) fn read_tables(&self) -> RwLockReadGuard<Tables> {
    self.tables.read().unwrap()
  }

  pub(crate) fn write_tables(&self) -> RwLockWriteGuard<Tables> {
    self.tables.write().unwrap()
  }
}

impl Default for Store {
  fn default() -> Self {
    Self::new()
  }
}

/// One page of an ordered collection, with the counters templates need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub page: usize,
  pub total_items: usize,
  pub total_pages: usize,
  pub has_next: bool,
  pub has_previous: bool,
}

impl<T> Page<T> {
  pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
    Page {
      items: self.items.into_iter().map(f).collect(),
      page: self.page,
      total_items: self.total_items,
      total_pages: self.total_pages,
      has_next: self.has_next,
      has_previous: self.has_previous,
    }
  }
}

/// Slices an ordered collection into one fixed-size page.
///
/// The raw `page` query value clamps rather than errors: anything that does
/// not parse as a positive integer behaves as page 1, and a number beyond
/// the last page returns the last page. Zero items still yield a single
/// empty page 1.
pub fn paginate<T>(items: Vec<T>, page_param: Option<&str>, page_size: usize) -> Page<T> {
  let page_size = page_size.max(1);
  let total_items = items.len();
  let total_pages = if total_items == 0 {
    1
  } else {
    total_items.div_ceil(page_size)
  };
  let requested = page_param
    .and_then(|raw| raw.trim().parse::<usize>().ok())
    .filter(|p| *p >= 1)
    .unwrap_or(1);
  let page = requested.min(total_pages);
  let items = items
    .into_iter()
    .skip((page - 1) * page_size)
    .take(page_size)
    .collect();
  Page {
    items,
    page,
    total_items,
    total_pages,
    has_next: page < total_pages,
    has_previous: page > 1,
  }
}

pub(crate) fn naive_now() -> DateTime<Utc> {
  Utc::now()
}
