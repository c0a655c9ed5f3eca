//! Environment configuration for both modes

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CHAT_URL: &str = "http://127.0.0.1:5000/api/chat";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Settings for the terminal client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub use_color: bool,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup("STOREFRONT_CHAT_URL").unwrap_or_else(|| DEFAULT_CHAT_URL.to_string());

        let timeout_secs = match lookup("STOREFRONT_CHAT_TIMEOUT_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "STOREFRONT_CHAT_TIMEOUT_SECS",
                        expected: "a positive number of seconds",
                        value,
                    })
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let use_color = lookup("STOREFRONT_CHAT_COLOR")
            .map_or(true, |v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"));

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
            use_color,
        })
    }
}

/// Shopify Admin API credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopifyConfig {
    pub shop_url: String,
    pub access_token: String,
}

/// Settings for the reference backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// `None` falls back to the built-in catalog
    pub shopify: Option<ShopifyConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("STOREFRONT_CHAT_PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "STOREFRONT_CHAT_PORT",
                expected: "a TCP port",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let shopify = match (lookup("SHOPIFY_SHOP_URL"), lookup("SHOPIFY_ACCESS_TOKEN")) {
            (Some(shop_url), Some(access_token)) => Some(ShopifyConfig {
                shop_url,
                access_token,
            }),
            _ => None,
        };

        Ok(Self {
            port,
            gemini_api_key: lookup("GEMINI_API_KEY"),
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            shopify,
        })
    }
}

/// Unset and blank variables are treated the same
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
