//! Bearer-token verification and the `CurrentUser` extractor.
//!
//! The production deployment delegates token validation to an external
//! identity service; this module models that boundary as a static table of
//! accepted tokens resolved at startup. Handlers only ever see the
//! already-authenticated user id.

use std::collections::HashMap;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use memoria_core::store::MemorialStore;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Accepted bearer tokens and the user each resolves to.
#[derive(Clone, Default)]
pub struct AuthConfig {
  tokens: HashMap<String, Uuid>,
}

impl AuthConfig {
  pub fn new(tokens: impl IntoIterator<Item = (String, Uuid)>) -> Self {
    Self {
      tokens: tokens.into_iter().collect(),
    }
  }
}

/// Verify the `Authorization: Bearer …` header and resolve the user id.
pub fn verify_bearer(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<Uuid, ApiError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let token = header_val
    .strip_prefix("Bearer ")
    .ok_or(ApiError::Unauthorized)?;

  config
    .tokens
    .get(token.trim())
    .copied()
    .ok_or(ApiError::Unauthorized)
}

/// The authenticated user; present in a handler signature means the
/// request carried a valid token.
pub struct CurrentUser(pub Uuid);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: MemorialStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = verify_bearer(&parts.headers, &state.auth)?;
    Ok(CurrentUser(user))
  }
}
