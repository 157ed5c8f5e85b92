use secrecy::{ExposeSecret, SecretBox};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Environment variables checked for the Gemini credential, in order.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid API key format for {service}: {reason}")]
    InvalidKeyFormat { service: String, reason: String },
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Configuration for the generative model service.
///
/// A missing credential is not an error here. It surfaces as
/// [`ConfigError::MissingEnvVar`] the first time a request needs it.
#[derive(Debug)]
pub struct ApiConfig {
    pub api_key: Option<SecretBox<String>>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Load API configuration from environment variables
    pub fn load() -> Self {
        // Load .env file if it exists (for development)
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Read the process environment only; `.env` is not consulted
    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|var| env::var(var).ok().filter(|key| !key.trim().is_empty()))
            .map(|key| SecretBox::new(Box::new(key)));

        if api_key.is_none() {
            log::warn!(
                "No Gemini API key found in {}; requests will fail until one is set",
                API_KEY_VARS.join(" or ")
            );
        }

        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build a configuration with an explicit key (tests, embedding)
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretBox::new(Box::new(key.into()))),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the Gemini API key (use only when making API calls)
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar(API_KEY_VARS[0].to_string()))?;
        let key = key.expose_secret();
        Self::validate_key_format(key)?;
        Ok(key)
    }

    /// Basic sanity check on the key; the service is the real judge.
    fn validate_key_format(key: &str) -> Result<(), ConfigError> {
        if key.trim().is_empty() {
            return Err(ConfigError::InvalidKeyFormat {
                service: "Gemini".to_string(),
                reason: "API key cannot be empty".to_string(),
            });
        }
        if key.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidKeyFormat {
                service: "Gemini".to_string(),
                reason: "API key must not contain whitespace".to_string(),
            });
        }
        if !key.starts_with("AIza") {
            log::debug!("Gemini API key does not start with 'AIza'; using it anyway");
        }
        Ok(())
    }

    /// Parsed endpoint for a `generateContent` call on the configured model
    pub fn generate_url(&self) -> Result<url::Url, ConfigError> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        url::Url::parse(&raw).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }
}

/// Load configuration with helpful log output for development
pub fn load_config() -> ApiConfig {
    let config = ApiConfig::load();
    if config.api_key.is_some() {
        log::info!("Successfully loaded API configuration");
    } else {
        log::error!("Create a .env file in the project root with:");
        log::error!("{}=your_api_key_here", API_KEY_VARS[0]);
    }
    config
}
