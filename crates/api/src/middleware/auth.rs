//! Bearer-token authentication.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use rallypoint_core::error::CoreError;
use rallypoint_core::roles::ROLE_ADMIN;
use rallypoint_core::status::UserStatus;
use rallypoint_core::types::DbId;
use rallypoint_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// The caller, as identified by a valid access token.
///
/// The account is re-read on every request: a banned account gets 403 and a
/// deleted one 401, and `role` is the current role rather than the one the
/// token was issued with.
///
/// Taking `AuthUser` as a handler argument makes the route require login:
///
/// ```ignore
/// async fn whoami(user: AuthUser) -> String {
///     format!("{} ({})", user.user_id, user.role)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Account role (`"user"`, `"enterprise"` or `"admin"`).
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state
            .config
            .jwt
            .verify(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        // The token may predate a ban, a role change or a deletion.
        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| unauthorized("Account no longer exists"))?;
        if user.status == UserStatus::Banned.as_str() {
            return Err(AppError::forbidden("Account is banned"));
        }

        Ok(Self {
            user_id: user.id,
            role: user.role,
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Malformed Authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| unauthorized("Expected 'Authorization: Bearer <token>'"))
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}
