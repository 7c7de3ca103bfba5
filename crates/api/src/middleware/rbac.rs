//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose account role
//! does not meet the requirement. Group-level roles (leader/member) are
//! resolved per request in [`crate::access`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rallypoint_core::error::CoreError;
use rallypoint_core::roles::{ROLE_ADMIN, ROLE_ENTERPRISE};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires the `enterprise` role. Rejects with 403 Forbidden otherwise.
pub struct RequireEnterprise(pub AuthUser);

impl FromRequestParts<AppState> for RequireEnterprise {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ENTERPRISE {
            return Err(AppError::Core(CoreError::Forbidden(
                "Enterprise role required".into(),
            )));
        }
        Ok(RequireEnterprise(user))
    }
}
