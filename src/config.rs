use parking_api::{ApiError, ClientConfig};
use url::Url;

/// Read the client configuration from `API_URL` and `API_KEY`.
///
/// Read once at startup and injected into the client; nothing downstream
/// re-reads the environment. A missing or malformed variable is fatal.
pub fn from_env() -> Result<ClientConfig, ApiError> {
    let base_url = require("API_URL")?;
    Url::parse(&base_url).map_err(|e| ApiError::Config(format!("API_URL is not a valid URL: {e}")))?;
    let api_key = require("API_KEY")?;

    Ok(ClientConfig { base_url, api_key })
}

fn require(name: &str) -> Result<String, ApiError> {
    std::env::var(name)
        .map_err(|_| ApiError::Config(format!("\"{name}\" environment variable not set")))
}
