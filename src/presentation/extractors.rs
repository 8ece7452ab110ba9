use crate::domain::auth::Claims;
use crate::domain::drivers::{Driver, Role};
use crate::infrastructure::state::AppState;
use crate::shared::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Authenticated account extractor.
/// Validates the bearer token and reloads the account, so disabled accounts lose access at once.
pub struct AuthUser {
    pub claims: Claims,
    pub account: Driver,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state
            .auth_service
            .validate_token(token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;
        let account_id = claims
            .account_id()
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        let account = state
            .drivers
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

        if !account.is_active {
            return Err(AppError::Forbidden("Account is disabled".to_string()));
        }
        // a role change invalidates sessions issued under the old role
        if account.role != claims.role {
            return Err(AppError::Unauthorized("Invalid or expired token".to_string()));
        }

        Ok(AuthUser { claims, account })
    }
}

/// An authenticated administrator.
pub struct AdminUser(pub Driver);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.account.role {
            Role::Admin => Ok(AdminUser(user.account)),
            Role::Driver => Err(AppError::Forbidden("Administrator access required".to_string())),
        }
    }
}

/// An authenticated driver.
pub struct DriverUser(pub Driver);

impl FromRequestParts<AppState> for DriverUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.account.role {
            Role::Driver => Ok(DriverUser(user.account)),
            Role::Admin => Err(AppError::Forbidden("Driver access required".to_string())),
        }
    }
}
