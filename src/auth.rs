use crate::db::user::User_;
use crate::db::{Crud, Store};
use crate::settings::Settings;
use crate::Principal;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use jsonwebtoken::{
  decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Claims minted by the external accounts module; this server only
/// verifies them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  pub id: i32,
  pub username: String,
  pub iss: String,
}

impl Claims {
  pub fn decode(jwt: &str) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    decode::<Claims>(
      jwt,
      &DecodingKey::from_secret(Settings::get().jwt_secret.as_ref()),
      &validation,
    )
  }

  /// Token minting, as the accounts module would do it. Used by the test
  /// clients.
  pub fn jwt(user: &User_) -> String {
    let claims = Claims {
      id: user.id,
      username: user.username.to_owned(),
      iss: Settings::get().hostname,
    };
    encode(
      &Header::default(),
      &claims,
      &EncodingKey::from_secret(Settings::get().jwt_secret.as_ref()),
    )
    .expect("jwt encoding with hs256 cannot fail")
  }
}

/// Resolves the request's token (bearer header or `auth` cookie) into the
/// explicit Principal every command and query takes.
pub fn principal_from_request(req: &HttpRequest, conn: &Store) -> Principal {
  let token = bearer_token(req).or_else(|| req.cookie("auth").map(|c| c.value().to_string()));
  let user = token
    .and_then(|jwt| Claims::decode(&jwt).ok())
    .and_then(|data| User_::read(conn, data.claims.id).ok());
  Principal(user)
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "))
    .map(str::to_string)
}

/// Unauthenticated access to a protected route: 302 to the external login
/// route with a `next` parameter pointing back here.
pub fn login_redirect(req: &HttpRequest) -> HttpResponse {
  let next = utf8_percent_encode(req.path(), NON_ALPHANUMERIC).to_string();
  HttpResponse::Found()
    .insert_header((
      header::LOCATION,
      format!("{}?next={}", Settings::get().login_url, next),
    ))
    .finish()
}

#[cfg(test)]
mod tests {
  use super::Claims;
  use crate::db::user::{UserForm, User_};
  use crate::db::{Crud, Store};
  use pretty_assertions::assert_eq;

  #[test]
  fn test_claims_round_trip() {
    let conn = Store::new();
    let user = User_::create(
      &conn,
      &UserForm {
        username: "terry".into(),
      },
    )
    .unwrap();

    let jwt = Claims::jwt(&user);
    let decoded = Claims::decode(&jwt).unwrap();
    assert_eq!(user.id, decoded.claims.id);
    assert_eq!("terry", decoded.claims.username);

    assert!(Claims::decode("not-a-token").is_err());
  }
}
