//! HTTP Basic-auth gate for catalog writes.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header::AUTHORIZATION, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use wordpick_core::store::WordStore;

use crate::{ApiState, error::ApiError};

/// Credentials accepted for admin-only endpoints.
#[derive(Clone, Debug)]
pub struct AdminAuth {
  pub username:      String,
  /// PHC string produced by [`hash_password`], e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

impl AdminAuth {
  /// Whether `username` and `password` match this account.
  pub fn accepts(&self, username: &str, password: &str) -> bool {
    username == self.username
      && PasswordHash::new(&self.password_hash).is_ok_and(|hash| {
        Argon2::default()
          .verify_password(password.as_bytes(), &hash)
          .is_ok()
      })
  }
}

/// Zero-size marker: present in the handler means the caller may write the
/// catalog. Always granted when no [`AdminAuth`] is configured.
pub struct AdminGate;

/// Hash `password` with a fresh salt into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// `user:password` from an `Authorization: Basic` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
  let decoded = B64.decode(value.strip_prefix("Basic ")?.trim()).ok()?;
  let (user, password) = std::str::from_utf8(&decoded).ok()?.split_once(':')?;
  Some((user.to_owned(), password.to_owned()))
}

/// Verify Basic credentials from `headers` against `config`.
pub fn verify_auth(headers: &HeaderMap, config: &AdminAuth) -> Result<(), ApiError> {
  match basic_credentials(headers) {
    Some((user, password)) if config.accepts(&user, &password) => Ok(()),
    _ => Err(ApiError::Unauthorized),
  }
}

impl<S> FromRequestParts<ApiState<S>> for AdminGate
where
  S: WordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    if let Some(admin) = &state.settings.admin {
      verify_auth(&parts.headers, admin).inspect_err(|_| {
        tracing::debug!(path = %parts.uri.path(), "rejected admin credentials");
      })?;
    }
    Ok(AdminGate)
  }
}
