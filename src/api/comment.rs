use crate::api::Perform;
use crate::db::comment::{Comment, CommentForm};
use crate::db::comment_view::CommentView;
use crate::db::post::Post;
use crate::db::{Crud, Store};
use crate::{Principal, QuillError, QuillErrorType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
  pub post_id: i32,
  pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
  pub comment: CommentView,
}

impl Perform for CreateComment {
  type Response = CommentResponse;

  fn perform(&self, conn: &Store, principal: &Principal) -> Result<CommentResponse, QuillError> {
    let user = principal.user()?;
    let post = Post::read(conn, self.post_id)?;

    let text = self.text.trim();
    if text.is_empty() {
      return Err(QuillErrorType::EmptyCommentText.into());
    }

    // author and post are fixed server-side, never client-supplied
    let comment_form = CommentForm {
      post_id: post.id,
      creator_id: user.id,
      text: text.to_owned(),
      published: None,
    };
    let inserted_comment = Comment::create(conn, &comment_form)?;

    let comment = CommentView::for_post(conn, post.id)?
      .into_iter()
      .find(|c| c.id == inserted_comment.id)
      .ok_or(crate::db::Error::NotFound)?;
    Ok(CommentResponse { comment })
  }
}
