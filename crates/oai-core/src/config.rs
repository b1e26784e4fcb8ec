//! Client configuration.
//!
//! A [`ClientConfig`] is built once and handed to a client, which keeps it
//! immutable for its lifetime. Configuration can be loaded from:
//! - TOML files (default: `~/.config/oai/config.toml`)
//! - Environment variables (`OPENAI_*`)
//! - Code, via [`ClientConfig::new`] and the `with_*` methods
//!
//! # Example
//!
//! ```rust,no_run
//! use oai_core::ClientConfig;
//! use std::time::Duration;
//!
//! // Load from the default path or fall back to env vars
//! let config = ClientConfig::load().expect("Failed to load config");
//!
//! // Or build it explicitly
//! let config = ClientConfig::new("sk-test")
//!     .with_organization_id("org-123")
//!     .with_request_timeout(Duration::from_secs(30));
//! ```

use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::defaults;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Connection settings for the remote API.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bearer token sent in the `Authorization` header.
    pub access_token: String,
    /// Sent as `OpenAI-Organization` when set.
    pub organization_id: Option<String>,
    /// Base URI, e.g. `https://api.openai.com/`.
    pub uri_base: String,
    /// Version segment appended to `uri_base`, e.g. `v1`.
    pub api_version: String,
    /// Hard upper bound for every request, enforced by the transport.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            organization_id: None,
            uri_base: defaults::URI_BASE.to_string(),
            api_version: defaults::API_VERSION.to_string(),
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        }
    }
}

// The token stays out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field(
                "access_token",
                &if self.access_token.is_empty() {
                    "<empty>"
                } else {
                    "<redacted>"
                },
            )
            .field("organization_id", &self.organization_id)
            .field("uri_base", &self.uri_base)
            .field("api_version", &self.api_version)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// `[openai]` table of the config file. Missing keys keep their defaults.
#[derive(Debug, Default, Deserialize)]
struct TomlOpenAIConfig {
    access_token: Option<String>,
    organization_id: Option<String>,
    uri_base: Option<String>,
    api_version: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Create a configuration with the given token and default endpoint.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_uri_base(mut self, uri_base: impl Into<String>) -> Self {
        self.uri_base = uri_base.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the absolute URI for an API path: `uri_base + api_version + path`.
    pub fn uri(&self, path: &str) -> String {
        format!("{}{}{}", self.uri_base, self.api_version, path)
    }

    /// Get the default config file path.
    ///
    /// Returns: ~/.config/oai/config.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push(defaults::CONFIG_DIR_NAME);
        path.push(defaults::CONFIG_FILE_NAME);
        path
    }

    /// Load configuration from the default path, falling back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        if path.exists() {
            info!("Loading client config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            let config = Self::from_env();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a TOML file with an `[openai]` table.
    ///
    /// `${VAR}` placeholders are replaced from the environment first, so the
    /// token does not have to live in the file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let content = substitute_env_vars(content);

        #[derive(Deserialize)]
        struct TomlRoot {
            #[serde(default)]
            openai: TomlOpenAIConfig,
        }

        let root: TomlRoot = toml::from_str(&content)?;
        let table = root.openai;
        let base = Self::default();

        let config = Self {
            access_token: table.access_token.unwrap_or(base.access_token),
            organization_id: table.organization_id.filter(|s| !s.is_empty()),
            uri_base: table.uri_base.unwrap_or(base.uri_base),
            api_version: table.api_version.unwrap_or(base.api_version),
            request_timeout: table
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(base.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `OPENAI_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = Self::default();
        Self {
            access_token: lookup(defaults::ENV_ACCESS_TOKEN).unwrap_or(base.access_token),
            organization_id: lookup(defaults::ENV_ORGANIZATION_ID).filter(|s| !s.is_empty()),
            uri_base: lookup(defaults::ENV_URI_BASE).unwrap_or(base.uri_base),
            api_version: lookup(defaults::ENV_API_VERSION).unwrap_or(base.api_version),
            request_timeout: lookup(defaults::ENV_REQUEST_TIMEOUT)
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(base.request_timeout),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.uri_base.starts_with("http://") || self.uri_base.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "uri_base must start with http:// or https://, got {:?}",
                self.uri_base
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Substitute environment variables in the format ${VAR_NAME}.
///
/// Unknown variables are left in place.
fn substitute_env_vars(content: &str) -> String {
    let Ok(re) = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
        return content.to_string();
    };
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}
