use crate::db::Store;
use crate::{Principal, QuillError};

pub mod comment;
pub mod follow;
pub mod post;

/// A command with a typed request DTO. The caller supplies the store and
/// the explicit Principal; nothing is read from ambient state.
pub trait Perform {
  type Response: serde::ser::Serialize + Send;

  fn perform(&self, conn: &Store, principal: &Principal) -> Result<Self::Response, QuillError>;
}
