#[macro_use]
pub extern crate lazy_static;

pub mod api;
pub mod auth;
pub mod cache;
pub mod db;
pub mod routes;
pub mod settings;
pub mod version;

use crate::db::user::User_;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;

pub type UserId = i32;
pub type GroupId = i32;
pub type PostId = i32;
pub type CommentId = i32;

#[derive(Display, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "error", content = "message", rename_all = "snake_case")]
pub enum QuillErrorType {
  NotFound,
  NotLoggedIn,
  NotPostAuthor,
  EmptyPostText,
  EmptyCommentText,
  CouldntCreateUser,
  CouldntCreateGroup,
  Unknown(String),
}

pub struct QuillError {
  pub error_type: QuillErrorType,
  pub inner: anyhow::Error,
}

pub type QuillResult<T> = Result<T, QuillError>;

impl From<QuillErrorType> for QuillError {
  fn from(error_type: QuillErrorType) -> Self {
    QuillError {
      inner: anyhow::anyhow!(error_type.clone()),
      error_type,
    }
  }
}

impl From<db::Error> for QuillError {
  fn from(e: db::Error) -> Self {
    let error_type = match e {
      db::Error::NotFound => QuillErrorType::NotFound,
      db::Error::AlreadyExists => QuillErrorType::Unknown(e.to_string()),
    };
    QuillError {
      error_type,
      inner: e.into(),
    }
  }
}

impl From<serde_json::Error> for QuillError {
  fn from(e: serde_json::Error) -> Self {
    QuillError {
      error_type: QuillErrorType::Unknown(e.to_string()),
      inner: e.into(),
    }
  }
}

impl fmt::Debug for QuillError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("QuillError")
      .field("message", &self.error_type)
      .field("inner", &self.inner)
      .finish()
  }
}

impl fmt::Display for QuillError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}: ", &self.error_type)?;
    writeln!(f, "{}", self.inner)
  }
}

impl actix_web::error::ResponseError for QuillError {
  fn status_code(&self) -> actix_web::http::StatusCode {
    match self.error_type {
      QuillErrorType::NotFound => actix_web::http::StatusCode::NOT_FOUND,
      QuillErrorType::NotLoggedIn => actix_web::http::StatusCode::UNAUTHORIZED,
      _ => actix_web::http::StatusCode::BAD_REQUEST,
    }
  }

  fn error_response(&self) -> actix_web::HttpResponse {
    actix_web::HttpResponse::build(self.status_code()).json(&self.error_type)
  }
}

/// The authenticated-user-or-none context threaded explicitly through every
/// command and query instead of ambient request state.
pub struct Principal(pub Option<User_>);

impl Principal {
  pub fn user(&self) -> Result<&User_, QuillError> {
    self
      .0
      .as_ref()
      .ok_or_else(|| QuillErrorType::NotLoggedIn.into())
  }

  pub fn is_authenticated(&self) -> bool {
    self.0.is_some()
  }
}
