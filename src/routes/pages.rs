//! The server-rendered page surface. Handlers produce structured JSON
//! context objects; turning them into markup is an external concern.

use crate::api::comment::CreateComment;
use crate::api::follow::{FollowAuthor, UnfollowAuthor};
use crate::api::post::{CreatePost, EditPost};
use crate::api::Perform;
use crate::auth;
use crate::cache;
use crate::db::comment_view::CommentView;
use crate::db::follow::Follow;
use crate::db::group::Group;
use crate::db::post::Post;
use crate::db::post_view::{PostQueryBuilder, PostView};
use crate::db::user::User_;
use crate::db::{Crud, Page, Store};
use crate::{QuillError, QuillErrorType};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;
use serde::{Deserialize, Serialize};

pub fn config(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(index))
    .route("/group/{slug}/", web::get().to(group_posts))
    .route("/profile/{username}/", web::get().to(profile))
    .route("/profile/{username}/follow/", web::get().to(profile_follow))
    .route(
      "/profile/{username}/unfollow/",
      web::get().to(profile_unfollow),
    )
    .route("/posts/{id}/", web::get().to(post_detail))
    .route("/posts/{id}/", web::post().to(post_detail_submit))
    .route("/posts/{id}/edit/", web::get().to(post_edit_form))
    .route("/posts/{id}/edit/", web::post().to(post_edit_submit))
    .route("/posts/{id}/comment/", web::post().to(add_comment))
    .route("/create/", web::get().to(post_create_form))
    .route("/create/", web::post().to(post_create_submit))
    .route("/follow/", web::get().to(follow_index));
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
  page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostFormData {
  pub text: String,
  pub group_id: Option<i32>,
  pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentFormData {
  pub text: String,
}

#[derive(Serialize)]
struct FieldError {
  field: &'static str,
  message: &'static str,
}

#[derive(Serialize)]
struct IndexContext {
  page_obj: Page<PostView>,
}

#[derive(Serialize)]
struct GroupContext {
  group: Group,
  page_obj: Page<PostView>,
}

#[derive(Serialize)]
struct ProfileContext {
  author: User_,
  page_obj: Page<PostView>,
  page_count: i64,
  following: bool,
}

#[derive(Serialize)]
struct PostDetailContext {
  post: PostView,
  post_count: i64,
  comments: Vec<CommentView>,
  form: CommentFormContext,
}

#[derive(Serialize)]
struct CommentFormContext {
  text: String,
  errors: Vec<FieldError>,
}

#[derive(Serialize)]
struct PostFormContext {
  text: String,
  group_id: Option<i32>,
  image: Option<String>,
  groups: Vec<Group>,
  is_edit: bool,
  errors: Vec<FieldError>,
}

fn found(location: String) -> HttpResponse {
  HttpResponse::Found()
    .insert_header((header::LOCATION, location))
    .finish()
}

fn json_body(body: String) -> HttpResponse {
  HttpResponse::Ok()
    .content_type("application/json")
    .body(body)
}

fn require_user(req: &HttpRequest, conn: &Store) -> Result<User_, HttpResponse> {
  match auth::principal_from_request(req, conn).0 {
    Some(user) => Ok(user),
    None => Err(auth::login_redirect(req)),
  }
}

fn empty_text_error(field: &'static str) -> Vec<FieldError> {
  vec![FieldError {
    field,
    message: "This field is required.",
  }]
}

/// The global feed. The only cached view: while the slot is warm every
/// request gets the same body, whatever its page number or viewer.
async fn index(
  data: web::Data<Store>,
  query: web::Query<PageParams>,
) -> Result<HttpResponse, QuillError> {
  if let Some(body) = cache::get() {
    debug!("serving home feed from cache");
    return Ok(json_body(body));
  }
  let page_obj = PostQueryBuilder::create(&data)
    .page(query.page.to_owned())
    .list()?;
  let body = serde_json::to_string(&IndexContext { page_obj })?;
  cache::put(body.to_owned());
  Ok(json_body(body))
}

async fn group_posts(
  data: web::Data<Store>,
  path: web::Path<String>,
  query: web::Query<PageParams>,
) -> Result<HttpResponse, QuillError> {
  let slug = path.into_inner();
  let group = Group::read_from_slug(&data, &slug)?;
  let page_obj = PostQueryBuilder::create(&data)
    .for_group_id(group.id)
    .page(query.page.to_owned())
    .list()?;
  Ok(HttpResponse::Ok().json(GroupContext { group, page_obj }))
}

async fn profile(
  req: HttpRequest,
  data: web::Data<Store>,
  path: web::Path<String>,
  query: web::Query<PageParams>,
) -> Result<HttpResponse, QuillError> {
  let username = path.into_inner();
  let author = User_::find_by_username(&data, &username)?;
  let principal = auth::principal_from_request(&req, &data);
  let following = principal
    .0
    .as_ref()
    .map_or(false, |viewer| Follow::is_following(&data, viewer.id, author.id));
  let page_obj = PostQueryBuilder::create(&data)
    .for_creator_id(author.id)
    .page(query.page.to_owned())
    .list()?;
  Ok(HttpResponse::Ok().json(ProfileContext {
    page_count: Post::count_for_creator(&data, author.id),
    author,
    page_obj,
    following,
  }))
}

async fn post_detail(
  data: web::Data<Store>,
  path: web::Path<i32>,
) -> Result<HttpResponse, QuillError> {
  let post_id = path.into_inner();
  let context = detail_context(&data, post_id, CommentFormContext {
    text: String::new(),
    errors: vec![],
  })?;
  Ok(HttpResponse::Ok().json(context))
}

fn detail_context(
  conn: &Store,
  post_id: i32,
  form: CommentFormContext,
) -> Result<PostDetailContext, QuillError> {
  let post = PostView::read(conn, post_id)?;
  Ok(PostDetailContext {
    post_count: Post::count_for_creator(conn, post.creator_id),
    comments: CommentView::for_post(conn, post_id)?,
    post,
    form,
  })
}

/// Comment submission on the detail page itself: valid data creates the
/// comment and redirects back to the detail view; invalid data re-renders
/// the context with field errors.
async fn post_detail_submit(
  req: HttpRequest,
  data: web::Data<Store>,
  path: web::Path<i32>,
  form: web::Form<CommentFormData>,
) -> Result<HttpResponse, QuillError> {
  let post_id = path.into_inner();
  let user = match require_user(&req, &data) {
    Ok(user) => user,
    Err(redirect) => return Ok(redirect),
  };

  let op = CreateComment {
    post_id,
    text: form.text.to_owned(),
  };
  match op.perform(&data, &crate::Principal(Some(user))) {
    Ok(_) => Ok(found(format!("/posts/{}/", post_id))),
    Err(e) if e.error_type == QuillErrorType::EmptyCommentText => {
      let context = detail_context(&data, post_id, CommentFormContext {
        text: form.text.to_owned(),
        errors: empty_text_error("text"),
      })?;
      Ok(HttpResponse::Ok().json(context))
    }
    Err(e) => Err(e),
  }
}

/// The dedicated comment route mirrors the detail submission but always
/// bounces back to the detail view; an invalid form is dropped silently.
async fn add_comment(
  req: HttpRequest,
  data: web::Data<Store>,
  path: web::Path<i32>,
  form: web::Form<CommentFormData>,
) -> Result<HttpResponse, QuillError> {
  let post_id = path.into_inner();
  let user = match require_user(&req, &data) {
    Ok(user) => user,
    Err(redirect) => return Ok(redirect),
  };
  Post::read(&data, post_id)?;

  let op = CreateComment {
    post_id,
    text: form.text.to_owned(),
  };
  match op.perform(&data, &crate::Principal(Some(user))) {
    Ok(_) | Err(QuillError {
      error_type: QuillErrorType::EmptyCommentText,
      ..
    }) => Ok(found(format!("/posts/{}/", post_id))),
    Err(e) => Err(e),
  }
}

async fn post_create_form(
  req: HttpRequest,
  data: web::Data<Store>,
) -> Result<HttpResponse, QuillError> {
  if let Err(redirect) = require_user(&req, &data) {
    return Ok(redirect);
  }
  Ok(HttpResponse::Ok().json(PostFormContext {
    text: String::new(),
    group_id: None,
    image: None,
    groups: Group::list_all(&data),
    is_edit: false,
    errors: vec![],
  }))
}

async fn post_create_submit(
  req: HttpRequest,
  data: web::Data<Store>,
  form: web::Form<PostFormData>,
) -> Result<HttpResponse, QuillError> {
  let user = match require_user(&req, &data) {
    Ok(user) => user,
    Err(redirect) => return Ok(redirect),
  };
  let username = user.username.to_owned();

  let op = CreatePost {
    text: form.text.to_owned(),
    group_id: form.group_id,
    image: form.image.to_owned(),
  };
  match op.perform(&data, &crate::Principal(Some(user))) {
    Ok(_) => Ok(found(format!("/profile/{}/", username))),
    Err(e) if e.error_type == QuillErrorType::EmptyPostText => {
      Ok(HttpResponse::Ok().json(PostFormContext {
        text: form.text.to_owned(),
        group_id: form.group_id,
        image: form.image.to_owned(),
        groups: Group::list_all(&data),
        is_edit: false,
        errors: empty_text_error("text"),
      }))
    }
    Err(e) => Err(e),
  }
}

async fn post_edit_form(
  req: HttpRequest,
  data: web::Data<Store>,
  path: web::Path<i32>,
) -> Result<HttpResponse, QuillError> {
  let post_id = path.into_inner();
  let user = match require_user(&req, &data) {
    Ok(user) => user,
    Err(redirect) => return Ok(redirect),
  };
  let post = Post::read(&data, post_id)?;
  if post.creator_id != user.id {
    return Ok(found(format!("/posts/{}/", post_id)));
  }
  Ok(HttpResponse::Ok().json(PostFormContext {
    text: post.text,
    group_id: post.group_id,
    image: post.image,
    groups: Group::list_all(&data),
    is_edit: true,
    errors: vec![],
  }))
}

async fn post_edit_submit(
  req: HttpRequest,
  data: web::Data<Store>,
  path: web::Path<i32>,
  form: web::Form<PostFormData>,
) -> Result<HttpResponse, QuillError> {
  let post_id = path.into_inner();
  let user = match require_user(&req, &data) {
    Ok(user) => user,
    Err(redirect) => return Ok(redirect),
  };

  let op = EditPost {
    post_id,
    text: form.text.to_owned(),
    group_id: form.group_id,
    image: form.image.to_owned(),
  };
  match op.perform(&data, &crate::Principal(Some(user))) {
    Ok(_) => Ok(found(format!("/posts/{}/", post_id))),
    // a non-author edit is indistinguishable from success at the
    // transport level
    Err(e) if e.error_type == QuillErrorType::NotPostAuthor => {
      Ok(found(format!("/posts/{}/", post_id)))
    }
    Err(e) if e.error_type == QuillErrorType::EmptyPostText => {
      Ok(HttpResponse::Ok().json(PostFormContext {
        text: form.text.to_owned(),
        group_id: form.group_id,
        image: form.image.to_owned(),
        groups: Group::list_all(&data),
        is_edit: true,
        errors: empty_text_error("text"),
      }))
    }
    Err(e) => Err(e),
  }
}

/// The follower aggregate feed: posts by every author the viewer follows.
async fn follow_index(
  req: HttpRequest,
  data: web::Data<Store>,
  query: web::Query<PageParams>,
) -> Result<HttpResponse, QuillError> {
  let user = match require_user(&req, &data) {
    Ok(user) => user,
    Err(redirect) => return Ok(redirect),
  };
  let page_obj = PostQueryBuilder::create(&data)
    .for_subscriber_id(user.id)
    .page(query.page.to_owned())
    .list()?;
  Ok(HttpResponse::Ok().json(IndexContext { page_obj }))
}

async fn profile_follow(
  req: HttpRequest,
  data: web::Data<Store>,
  path: web::Path<String>,
) -> Result<HttpResponse, QuillError> {
  let username = path.into_inner();
  let user = match require_user(&req, &data) {
    Ok(user) => user,
    Err(redirect) => return Ok(redirect),
  };
  let response = FollowAuthor {
    username: username.to_owned(),
  }
  .perform(&data, &crate::Principal(Some(user)))?;
  Ok(found(format!("/profile/{}/", response.author)))
}

async fn profile_unfollow(
  req: HttpRequest,
  data: web::Data<Store>,
  path: web::Path<String>,
) -> Result<HttpResponse, QuillError> {
  let username = path.into_inner();
  let user = match require_user(&req, &data) {
    Ok(user) => user,
    Err(redirect) => return Ok(redirect),
  };
  let response = UnfollowAuthor {
    username: username.to_owned(),
  }
  .perform(&data, &crate::Principal(Some(user)))?;
  Ok(found(format!("/profile/{}/", response.author)))
}
