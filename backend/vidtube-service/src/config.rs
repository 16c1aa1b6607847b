/// Configuration management
///
/// Loaded from environment variables via envy. Both token secrets are
/// required; a missing secret is a startup-fatal error for the embedding
/// binary, not a runtime error of the service.
use chrono::Duration;
use jwt_security::TokenKeys;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl_secs")]
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_token_ttl_secs: i64,
}

fn default_access_ttl_secs() -> i64 {
    3600 // 1 hour
}

fn default_refresh_ttl_secs() -> i64 {
    30 * 24 * 3600 // 30 days
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Build the signing key material this configuration describes.
    pub fn token_keys(&self) -> TokenKeys {
        TokenKeys::new(
            &self.access_token_secret,
            &self.refresh_token_secret,
            Duration::seconds(self.access_token_ttl_secs),
            Duration::seconds(self.refresh_token_ttl_secs),
        )
    }
}
