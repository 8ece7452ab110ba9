use crate::shared::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use serde_qs::Config;

/// Query-string extractor backed by `serde_qs`, so bracketed keys such as
/// `page[number]=2&filter[q]=abc` land in nested structs.
pub struct Qs<T>(pub T);

impl<T, S> FromRequestParts<S> for Qs<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        Config::default()
            .deserialize_str::<T>(query)
            .map(Qs)
            .map_err(|e| {
                tracing::warn!("Failed to parse query string: {}", e);
                AppError::ValidationError(format!("Invalid query parameters: {}", e))
            })
    }
}
