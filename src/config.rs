use std::time::Duration;

use anyhow::Context;
use uuid::Uuid;

const DEFAULT_BASE_URL: &str = "http://10.10.0.106:8001";
const DEFAULT_USER_ID: &str = "f772dc7d-7b53-4bec-9929-7f9774be00ff";
const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration, resolved once at process start. There is no
/// runtime reconfiguration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub groq_api_key: String,
    pub base_url: String,
    pub user_id: Uuid,
    pub port: u16,
    /// Timeout on the two data-fetch calls. The LLM call has none.
    pub fetch_timeout: Duration,
    pub cache_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let groq_api_key = std::env::var("GROQ_API_KEY").context("GROQ_API_KEY must be set")?;

        let base_url = std::env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let user_id = std::env::var("USER_ID").unwrap_or_else(|_| DEFAULT_USER_ID.to_string());
        let user_id = Uuid::parse_str(&user_id).context("USER_ID is not a valid UUID")?;

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            groq_api_key,
            base_url,
            user_id,
            port,
            fetch_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_id_is_a_valid_uuid() {
        assert!(Uuid::parse_str(DEFAULT_USER_ID).is_ok());
    }

    #[test]
    fn test_default_base_url_has_no_trailing_slash() {
        assert!(!DEFAULT_BASE_URL.ends_with('/'));
    }
}
