//! Client configuration structs
//!
//! Loads configuration from environment variables, falling back to documented defaults.

use chat_core::Intents;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Enables verbose logging of frames and opcodes
    pub debug: bool,
    /// Event categories requested in Identify
    pub intents: Intents,
    pub http: HttpConfig,
    pub gateway: GatewayConfig,
}

/// REST API configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub api_version: u8,
    pub base_url: String,
    pub user_agent: String,
}

/// Gateway connection configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub version: u8,
    pub url: String,
    /// Delay before retrying a transport that failed to open
    pub reconnect_delay_ms: u64,
    /// Upper bound on establishing a connection
    pub connect_timeout_ms: u64,
    pub properties: ClientProperties,
}

/// Client metadata sent in the Identify payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProperties {
    pub os: String,
    pub browser: String,
    pub device: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debug: false,
            intents: Intents::DEFAULT,
            http: HttpConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            base_url: default_api_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: default_gateway_version(),
            url: default_gateway_url(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            properties: ClientProperties::default(),
        }
    }
}

impl Default for ClientProperties {
    fn default() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            browser: default_client_name(),
            device: default_client_name(),
        }
    }
}

impl ClientConfig {
    /// Enable or disable verbose frame logging
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Override the requested intents
    #[must_use]
    pub fn with_intents(mut self, intents: Intents) -> Self {
        self.intents = intents;
        self
    }
}

impl HttpConfig {
    /// Versioned API root, e.g. `https://discord.com/api/v8`
    #[must_use]
    pub fn api_root(&self) -> String {
        format!("{}/v{}", self.base_url.trim_end_matches('/'), self.api_version)
    }
}

impl GatewayConfig {
    /// Full connection URL including version and encoding
    #[must_use]
    pub fn connect_url(&self) -> String {
        format!(
            "{}/?v={}&encoding=json",
            self.url.trim_end_matches('/'),
            self.version
        )
    }

    /// Delay before retrying a failed open
    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

// Default value functions
fn default_api_version() -> u8 {
    8
}

fn default_gateway_version() -> u8 {
    8
}

fn default_api_base_url() -> String {
    "https://discord.com/api".to_string()
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    1000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_client_name() -> String {
    "chat-gateway".to_string()
}

fn default_user_agent() -> String {
    format!(
        "DiscordBot (https://github.com/seung/chat-gateway, {})",
        env!("CARGO_PKG_VERSION")
    )
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("CLIENT_DEBUG") {
            config.debug = parse_bool("CLIENT_DEBUG", &value)?;
        }
        if let Some(value) = lookup("CLIENT_INTENTS") {
            config.intents = Intents::parse(&value)
                .map_err(|_| ConfigError::InvalidValue("CLIENT_INTENTS", value))?;
        }
        if let Some(version) = parse_var(&lookup, "API_VERSION")? {
            config.http.api_version = version;
        }
        if let Some(url) = lookup("API_BASE_URL") {
            config.http.base_url = url;
        }
        if let Some(version) = parse_var(&lookup, "GATEWAY_VERSION")? {
            config.gateway.version = version;
        }
        if let Some(url) = lookup("GATEWAY_URL") {
            config.gateway.url = url;
        }
        if let Some(delay) = parse_var(&lookup, "GATEWAY_RECONNECT_DELAY_MS")? {
            config.gateway.reconnect_delay_ms = delay;
        }
        if let Some(timeout) = parse_var(&lookup, "GATEWAY_CONNECT_TIMEOUT_MS")? {
            config.gateway.connect_timeout_ms = timeout;
        }

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, value)),
        None => Ok(None),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name, value.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
