use crate::domain::auth::{AuthService, Claims};
use crate::domain::drivers::Role;
use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Session tokens signed with HS256 and a shared secret
pub struct JwtAuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: i64,
}

impl JwtAuthService {
    pub fn new(secret: &[u8], session_ttl: i64) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("Session secret must not be empty");
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            session_ttl,
        })
    }
}

impl AuthService for JwtAuthService {
    fn generate_token(&self, account_id: i64, role: Role) -> Result<String> {
        let claims = Claims::new(account_id, role, self.session_ttl);
        let header = Header::new(Algorithm::HS256);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to generate session token: {}", e))
    }

    fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    fn token_ttl(&self) -> i64 {
        self.session_ttl
    }
}
