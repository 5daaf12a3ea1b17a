//! Server configuration loaded from TOML.
//!
//! Every section and key has a default, so an empty file (or no file at all)
//! yields a working local setup.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use contactbook_core::{
    default_log_level, BirthdayWindowMode, ContactServiceOptions, LoggingOptions, SearchMode,
};
use serde::Deserialize;

/// Environment variable holding the config file path.
pub const CONFIG_PATH_ENV: &str = "CONTACTBOOK_CONFIG";

const MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config IO error: {err}"),
            Self::Parse(err) => write!(f, "config parse error: {err}"),
            Self::Invalid(message) => write!(f, "config invalid: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// File path, or `:memory:`.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "contacts.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// Absolute directory for rolling files; stderr only when unset.
    pub dir: Option<PathBuf>,
    pub echo_stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            dir: None,
            echo_stderr: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    pub search_mode: SearchMode,
    pub birthday_window: BirthdayWindowMode,
}

/// Resolved database target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl ServerConfig {
    /// Reads and validates a TOML config file.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.host.trim().is_empty() {
            return Err(ConfigError::Invalid("http.host cannot be empty".into()));
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Invalid("database.path cannot be empty".into()));
        }
        match &self.logging.dir {
            Some(dir) if !dir.is_absolute() => Err(ConfigError::Invalid(format!(
                "logging.dir must be absolute, got '{}'",
                dir.display()
            ))),
            _ => Ok(()),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.http.host, self.http.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("invalid http bind: {e}")))
    }

    /// Resolves `database.path`; relative paths are joined onto `base_dir`.
    pub fn database_location(&self, base_dir: Option<&Path>) -> DatabaseLocation {
        let raw = self.database.path.trim();
        if raw == MEMORY_DATABASE {
            return DatabaseLocation::Memory;
        }

        let path = Path::new(raw);
        match base_dir {
            Some(base) if path.is_relative() => DatabaseLocation::File(base.join(path)),
            _ => DatabaseLocation::File(path.to_path_buf()),
        }
    }

    pub fn logging_options(&self) -> LoggingOptions {
        LoggingOptions {
            level: self
                .logging
                .level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: self.logging.dir.clone(),
            echo_stderr: self.logging.echo_stderr,
        }
    }

    pub fn service_options(&self) -> ContactServiceOptions {
        ContactServiceOptions {
            search_mode: self.query.search_mode,
            birthday_window: self.query.birthday_window,
        }
    }
}
