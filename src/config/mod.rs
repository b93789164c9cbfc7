//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::args::GlobalArgs;

const DEFAULT_CONFIG_FILE: &str = "config.json";
const DEFAULT_IP: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PUBLIC_LINK_PATTERN: &str = "http://{host}:{port}";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::WARN;
const ENV_PREFIX: &str = "DASHBOARDS";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth_token: Option<String>,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub ip: String,
    pub port: u16,
    pub public_link_pattern: String,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

impl Settings {
    /// Look up one of the recognized keys (`IP`, `PORT`, `PUBLIC_LINK_PATTERN`, `AUTH_TOKEN`).
    pub fn get(&self, key: &str) -> Option<String> {
        match key.to_ascii_uppercase().as_str() {
            "IP" => Some(self.server.ip.clone()),
            "PORT" => Some(self.server.port.to_string()),
            "PUBLIC_LINK_PATTERN" => Some(self.server.public_link_pattern.clone()),
            "AUTH_TOKEN" => self.auth_token.clone(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
///
/// The file next to the executable is optional; a file named on the command
/// line must exist. Both are read as JSON5 so comments and trailing commas
/// are tolerated.
pub fn load(args: &GlobalArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder();

    if let Some(path) = default_config_path() {
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Json5)
                .required(false),
        );
    }

    if let Some(path) = args.config_file.as_ref() {
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Json5)
                .required(true),
        );
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(args);

    Settings::from_raw(raw)
}

fn default_config_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|dir| dir.join(DEFAULT_CONFIG_FILE))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    #[serde(alias = "IP")]
    ip: Option<String>,
    #[serde(alias = "PORT")]
    port: Option<u16>,
    #[serde(alias = "PUBLIC_LINK_PATTERN")]
    public_link_pattern: Option<String>,
    #[serde(alias = "AUTH_TOKEN")]
    auth_token: Option<String>,
    #[serde(alias = "LOGGING")]
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalArgs) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            ip,
            port,
            public_link_pattern,
            auth_token,
            logging,
        } = raw;

        let server = build_server_settings(ip, port, public_link_pattern)?;
        let logging = build_logging_settings(logging)?;
        let auth_token = auth_token.and_then(|value| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

        Ok(Self {
            server,
            auth_token,
            logging,
        })
    }
}

fn build_server_settings(
    ip: Option<String>,
    port: Option<u16>,
    public_link_pattern: Option<String>,
) -> Result<ServerSettings, LoadError> {
    let ip = ip
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_IP.to_string());

    let port = port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid("PORT", "port must be greater than zero"));
    }

    let public_link_pattern =
        public_link_pattern.unwrap_or_else(|| DEFAULT_PUBLIC_LINK_PATTERN.to_string());
    if public_link_pattern.trim().is_empty() {
        return Err(LoadError::invalid(
            "PUBLIC_LINK_PATTERN",
            "pattern must not be empty",
        ));
    }

    Ok(ServerSettings {
        ip,
        port,
        public_link_pattern,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => DEFAULT_LOG_LEVEL,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}
