use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Builds the shared HTTP client for the hosted store.
///
/// Every request carries the store key both as `apikey` and as bearer token.
pub fn build_store_client(anon_key: &str, timeout: Option<Duration>) -> AppResult<Client> {
    let mut headers = HeaderMap::new();
    let key = HeaderValue::from_str(anon_key)
        .map_err(|_| AppError::Config("STORE_ANON_KEY contains invalid characters".to_string()))?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", anon_key))
        .map_err(|_| AppError::Config("STORE_ANON_KEY contains invalid characters".to_string()))?;
    headers.insert("apikey", key);
    headers.insert(AUTHORIZATION, bearer);

    let mut builder = Client::builder().default_headers(headers);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
