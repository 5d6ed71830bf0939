use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use tracing::debug;

use crate::{error::ApiError, state::AppState};

pub mod jwt;

pub use jwt::Claims;

/// Caller identity taken from a verified `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn id(&self) -> &str {
        &self.0.sub
    }

    pub fn email(&self) -> Option<&str> {
        self.0.email.as_deref()
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized("login_required"))?;

        let claims = jwt::decode_token(&state.jwt_secret, bearer.token()).map_err(|err| {
            debug!(?err, "token rejected");
            ApiError::Unauthorized("invalid_or_expired_token")
        })?;

        Ok(AuthenticatedUser(claims))
    }
}
