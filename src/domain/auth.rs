use crate::domain::drivers::Role;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,
    pub role: Role,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    pub fn new(account_id: i64, role: Role, ttl_seconds: i64) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self {
            sub: account_id.to_string(),
            role,
            iat: now,
            exp: now + ttl_seconds,
        }
    }

    pub fn account_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid account id in claims: {}", e))
    }
}

/// Issues and validates session tokens
pub trait AuthService: Send + Sync {
    fn generate_token(&self, account_id: i64, role: Role) -> Result<String>;

    fn validate_token(&self, token: &str) -> Result<Claims>;

    /// Session lifetime in seconds
    fn token_ttl(&self) -> i64;
}
