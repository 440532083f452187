use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    pub max_connections: Option<u32>,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the upstream VIN decoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Base URL of the vPIC vehicles API, without a trailing slash
    #[serde(default = "default_decoder_base_url")]
    pub base_url: String,
    /// Total request timeout, e.g. "10s"
    #[serde(default = "default_decoder_timeout")]
    pub timeout: String,
    #[serde(default = "default_decoder_connect_timeout")]
    pub connect_timeout: String,
    /// Optional model year hint passed through as `modelyear`
    #[serde(default)]
    pub model_year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Filename advertised in the export's Content-Disposition header
    #[serde(default = "default_export_filename")]
    pub filename: String,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_connect_timeout() -> String {
    DEFAULT_CONNECT_TIMEOUT.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_decoder_base_url() -> String {
    DEFAULT_DECODER_BASE_URL.to_string()
}

fn default_decoder_timeout() -> String {
    DEFAULT_DECODER_TIMEOUT.to_string()
}

fn default_decoder_connect_timeout() -> String {
    DEFAULT_DECODER_CONNECT_TIMEOUT.to_string()
}

fn default_export_filename() -> String {
    DEFAULT_EXPORT_FILENAME.to_string()
}

/// Parse a human readable duration such as "10s" or "250ms"
pub fn parse_duration(field: &str, value: &str) -> Result<Duration> {
    humantime::parse_duration(value)
        .with_context(|| format!("Invalid duration for {}: '{}'", field, value))
}

impl DatabaseConfig {
    pub fn connect_timeout_duration(&self) -> Result<Duration> {
        parse_duration("database.connect_timeout", &self.connect_timeout)
    }
}

impl DecoderConfig {
    pub fn timeout_duration(&self) -> Result<Duration> {
        parse_duration("decoder.timeout", &self.timeout)
    }

    pub fn connect_timeout_duration(&self) -> Result<Duration> {
        parse_duration("decoder.connect_timeout", &self.connect_timeout)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: Some(DEFAULT_MAX_CONNECTIONS),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_decoder_base_url(),
            timeout: default_decoder_timeout(),
            connect_timeout: default_decoder_connect_timeout(),
            model_year: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: default_export_filename(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            web: WebConfig::default(),
            decoder: DecoderConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    /// Load configuration from defaults, the TOML file and `VIN_CACHE_*` variables,
    /// in increasing order of precedence. A default file is written if none exists.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if !Path::new(config_file).exists() {
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(config_file, contents)
                .with_context(|| format!("Failed to write default config: {}", config_file))?;
            info!("Created default config file: {}", config_file);
        }

        let config: Config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", config_file))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later at startup
    pub fn validate(&self) -> Result<()> {
        self.database.connect_timeout_duration()?;
        self.decoder.timeout_duration()?;
        self.decoder.connect_timeout_duration()?;
        url::Url::parse(&self.decoder.base_url)
            .with_context(|| format!("Invalid decoder.base_url: '{}'", self.decoder.base_url))?;
        if self.export.filename.trim().is_empty() {
            anyhow::bail!("export.filename must not be empty");
        }
        Ok(())
    }
}
