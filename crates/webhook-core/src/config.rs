//! Configuration types for the webhook
//!
//! This module defines all configuration structures used throughout the
//! workspace. The daemon fills them from the environment; library users can
//! build them directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default DreamHost API endpoint
pub const DEFAULT_DREAMHOST_URL: &str = "https://api.dreamhost.com/";

/// Main webhook configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Registrar access configuration
    pub registrar: RegistrarConfig,

    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Which record names are exposed
    #[serde(default)]
    pub domain_filter: DomainFilterConfig,
}

impl WebhookConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.registrar.validate()?;
        self.server.validate()?;
        self.domain_filter.validate()?;
        Ok(())
    }
}

/// Registrar access configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct RegistrarConfig {
    /// DreamHost API key
    pub api_key: String,

    /// API endpoint (overridable for tests)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Log mutations instead of sending them
    #[serde(default)]
    pub dry_run: bool,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RegistrarConfig {
    /// Create a registrar configuration with defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            dry_run: false,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Override the API endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the registrar configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.trim().is_empty() {
            return Err(crate::Error::config("DreamHost API key cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "DreamHost API URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("DreamHost API timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

// The API key never appears in logs.
impl std::fmt::Debug for RegistrarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrarConfig")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Listener configuration for the webhook and health servers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host the webhook binds to
    #[serde(default = "default_webhook_host")]
    pub webhook_host: String,

    /// Port the webhook binds to
    #[serde(default = "default_webhook_port")]
    pub webhook_port: u16,

    /// Host the health server binds to
    #[serde(default = "default_health_host")]
    pub health_host: String,

    /// Port the health server binds to
    #[serde(default = "default_health_port")]
    pub health_port: u16,

    /// Time allowed to receive a webhook request body, in seconds
    #[serde(default = "default_server_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Time allowed to produce a webhook response, in seconds
    #[serde(default = "default_server_timeout_secs")]
    pub write_timeout_secs: u64,
}

impl ServerConfig {
    /// Address the webhook listens on
    pub fn webhook_address(&self) -> String {
        format!("{}:{}", self.webhook_host, self.webhook_port)
    }

    /// Address the health server listens on
    pub fn health_address(&self) -> String {
        format!("{}:{}", self.health_host, self.health_port)
    }

    /// Read timeout of the webhook listener
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Write timeout of the webhook listener
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    /// Validate the listener configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.read_timeout_secs == 0 {
            return Err(crate::Error::config("Webhook read timeout must be > 0"));
        }
        if self.write_timeout_secs == 0 {
            return Err(crate::Error::config("Webhook write timeout must be > 0"));
        }
        if self.webhook_host.trim().is_empty() {
            return Err(crate::Error::config("Webhook host cannot be empty"));
        }
        if self.health_host.trim().is_empty() {
            return Err(crate::Error::config("Health host cannot be empty"));
        }
        if self.webhook_port != 0
            && self.webhook_port == self.health_port
            && self.webhook_host == self.health_host
        {
            return Err(crate::Error::config(format!(
                "Webhook and health servers cannot share {}",
                self.webhook_address()
            )));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            webhook_host: default_webhook_host(),
            webhook_port: default_webhook_port(),
            health_host: default_health_host(),
            health_port: default_health_port(),
            read_timeout_secs: default_server_timeout_secs(),
            write_timeout_secs: default_server_timeout_secs(),
        }
    }
}

/// Domain filter options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainFilterConfig {
    /// Domains to expose (empty = all)
    #[serde(default)]
    pub include: Vec<String>,

    /// Domains to hide
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Regex of names to expose; overrides `include`/`exclude` when set
    #[serde(default)]
    pub regex: Option<String>,

    /// Regex of names to hide when `regex` is set
    #[serde(default)]
    pub regex_exclusion: Option<String>,
}

impl DomainFilterConfig {
    /// Validate the domain filter configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        crate::domain_filter::DomainFilter::from_config(self).map(|_| ())
    }
}

fn default_base_url() -> String {
    DEFAULT_DREAMHOST_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_webhook_host() -> String {
    "localhost".to_string()
}

fn default_webhook_port() -> u16 {
    8888
}

fn default_health_host() -> String {
    "0.0.0.0".to_string()
}

fn default_health_port() -> u16 {
    8080
}

fn default_server_timeout_secs() -> u64 {
    60
}
