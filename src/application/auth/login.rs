use crate::domain::auth::AuthService;
use crate::domain::drivers::{DriverRepository, Role, normalize_access_code};
use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Access code is required"))]
    #[schema(example = "K7M2QX")]
    pub access_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the session expires
    pub expires_in: i64,
    pub role: Role,
    pub account_id: i64,
    pub name: String,
}

pub struct LoginUseCase {
    drivers: Arc<dyn DriverRepository>,
    auth_service: Arc<dyn AuthService>,
}

impl LoginUseCase {
    pub fn new(drivers: Arc<dyn DriverRepository>, auth_service: Arc<dyn AuthService>) -> Self {
        Self {
            drivers,
            auth_service,
        }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let code = normalize_access_code(&req.access_code);
        if code.is_empty() {
            return Err(AppError::Unauthorized("Invalid access code".to_string()));
        }

        let account = self
            .drivers
            .find_by_access_code(&code)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid access code".to_string()))?;

        if !account.is_active {
            tracing::info!(account_id = account.id, "login refused for inactive account");
            return Err(AppError::Forbidden("Account is disabled".to_string()));
        }

        let token = self
            .auth_service
            .generate_token(account.id, account.role)
            .map_err(AppError::InternalServerError)?;

        tracing::info!(account_id = account.id, role = %account.role, "login succeeded");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.auth_service.token_ttl(),
            role: account.role,
            account_id: account.id,
            name: account.profile.full_name,
        })
    }
}
