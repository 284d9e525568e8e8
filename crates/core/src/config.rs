//! Configuration management for askrelay.
//!
//! This module handles loading and merging configuration from multiple sources,
//! later sources winning:
//! - Built-in defaults
//! - Config file (`askrelay.yaml` or the path given explicitly)
//! - Environment variables
//! - Command-line flags
//!
//! The API key and model are plain values on [`AppConfig`]; they are handed to
//! the relay at construction time rather than read from globals.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::clock::{CivilClock, DEFAULT_TIMEZONE};
use crate::error::{AppError, AppResult};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "askrelay.yaml";

/// Providers the factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["gemini", "mock"];

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Main application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Interface the HTTP server binds to
    pub host: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Name reported by the health endpoint
    pub service_name: String,

    /// LLM provider ("gemini" or "mock")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom provider endpoint
    pub endpoint: Option<String>,

    /// API key for the provider
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable consulted when no API key is set explicitly
    pub api_key_env: String,

    /// IANA timezone used for every civil timestamp
    pub timezone: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Log output format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("config_file", &self.config_file)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("service_name", &self.service_name)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_key_env", &self.api_key_env)
            .field("timezone", &self.timezone)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("verbose", &self.verbose)
            .field("no_color", &self.no_color)
            .finish()
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
    llm: Option<LlmSection>,
    clock: Option<ClockSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    #[serde(rename = "serviceName")]
    service_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClockSection {
    timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    format: Option<LogFormat>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            host: "0.0.0.0".to_string(),
            port: 4040,
            service_name: "AI Assistant with Islamic Knowledge".to_string(),
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash-exp".to_string(),
            endpoint: None,
            api_key: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            log_level: None,
            log_format: LogFormat::Text,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file and environment.
    ///
    /// Environment variables:
    /// - `ASKRELAY_CONFIG`: Path to config file
    /// - `ASKRELAY_HOST` / `ASKRELAY_PORT`: Listen address
    /// - `ASKRELAY_PROVIDER`: LLM provider
    /// - `ASKRELAY_MODEL`: Model identifier
    /// - `ASKRELAY_API_KEY`: API key
    /// - `ASKRELAY_TIMEZONE`: Civil timezone
    /// - `ASKRELAY_LOG_FORMAT`: `text` or `json`
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use askrelay_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Listening on {}", config.bind_address());
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration, preferring an explicit config file path.
    ///
    /// An explicit path (argument or `ASKRELAY_CONFIG`) must exist; the
    /// default `askrelay.yaml` is merged only when present.
    pub fn load_from(config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        let explicit = config_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("ASKRELAY_CONFIG").ok().map(PathBuf::from));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    config = config.merge_yaml(&path)?;
                }
            }
        }

        // Environment variables override YAML config
        config.apply_env()?;

        Ok(config)
    }

    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(host) = std::env::var("ASKRELAY_HOST") {
            self.host = host;
        }

        if let Ok(port) = std::env::var("ASKRELAY_PORT") {
            self.port = port
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid ASKRELAY_PORT '{}': {}", port, e)))?;
        }

        if let Ok(provider) = std::env::var("ASKRELAY_PROVIDER") {
            self.provider = provider;
        }

        if let Ok(model) = std::env::var("ASKRELAY_MODEL") {
            self.model = model;
        }

        if let Ok(key) = std::env::var("ASKRELAY_API_KEY") {
            self.api_key = Some(key);
        }

        if let Ok(timezone) = std::env::var("ASKRELAY_TIMEZONE") {
            self.timezone = timezone;
        }

        if let Ok(format) = std::env::var("ASKRELAY_LOG_FORMAT") {
            self.log_format = LogFormat::parse(&format).ok_or_else(|| {
                AppError::Config(format!("Invalid ASKRELAY_LOG_FORMAT: {}", format))
            })?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();
        result.config_file = Some(path.to_path_buf());

        if let Some(server) = config_file.server {
            if let Some(host) = server.host {
                result.host = host;
            }
            if let Some(port) = server.port {
                result.port = port;
            }
            if let Some(name) = server.service_name {
                result.service_name = name;
            }
        }

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if let Some(env) = llm.api_key_env {
                result.api_key_env = env;
            }
        }

        if let Some(clock) = config_file.clock {
            if let Some(tz) = clock.timezone {
                result.timezone = tz;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }

        if let Some(port) = port {
            self.port = port;
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the API key: explicit value first, then `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }

    /// Clock for the configured timezone.
    pub fn clock(&self) -> AppResult<CivilClock> {
        CivilClock::from_name(&self.timezone)
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "gemini" && self.resolve_api_key().is_none() {
            return Err(AppError::Config(format!(
                "Gemini provider requires an API key (set ASKRELAY_API_KEY or {})",
                self.api_key_env
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(AppError::Config("Port cannot be 0".to_string()));
        }

        self.clock()?;

        Ok(())
    }
}
