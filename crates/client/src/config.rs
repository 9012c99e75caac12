use anyhow::{Context, Result};

/// Connection settings for the score backend and the insight model.
///
/// Loaded from the environment; call `dotenvy::dotenv()` first when a
/// `.env` file should be honored.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub backend_key: String,
    pub insight_url: String,
    pub insight_key: String,
    pub insight_model: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            backend_url: std::env::var("TRACKLE_BACKEND_URL")
                .context("Cannot load TRACKLE_BACKEND_URL env variable")?,
            backend_key: std::env::var("TRACKLE_BACKEND_KEY")
                .context("Cannot load TRACKLE_BACKEND_KEY env variable")?,
            insight_url: std::env::var("TRACKLE_INSIGHT_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            insight_key: std::env::var("TRACKLE_INSIGHT_KEY").unwrap_or_default(),
            insight_model: std::env::var("TRACKLE_INSIGHT_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        })
    }
}
