//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use aula_core::error::CoreError;
use aula_core::roles::{Actor, UserRole};
use aula_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication, then convert to an [`Actor`] before calling into the
/// history ledgers:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     let actor = user.actor()?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's display name (from `claims.name`).
    pub display_name: String,
    /// The user's role name (e.g. `"admin"`, `"teacher_editor"`).
    pub role: String,
}

impl AuthUser {
    /// Resolve the authenticated user into the domain [`Actor`].
    ///
    /// Tokens minted by the auth service always carry a known role; a token
    /// with any other role string is rejected outright.
    pub fn actor(&self) -> Result<Actor, AppError> {
        let role = UserRole::parse(&self.role).ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(format!(
                "Unknown role '{}'",
                self.role
            )))
        })?;
        Ok(Actor {
            id: self.user_id,
            display_name: self.display_name.clone(),
            role,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            display_name: claims.name,
            role: claims.role,
        })
    }
}
