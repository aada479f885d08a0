//! Bootstrap configuration and root folder resolution
//!
//! Resolution order for every bootstrap value:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable TOML file never stops start-up; it logs a warning
//! and the compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "SONGMARK_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "songmark.db";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5780;

/// Default oEmbed lookup endpoint
pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

/// Which song store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// SQLite file in the root folder
    #[default]
    Sqlite,
    /// Process-local store, lost on restart
    Memory,
}

impl std::str::FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StorageKind::Sqlite),
            "memory" => Ok(StorageKind::Memory),
            other => Err(Error::Config(format!(
                "Unknown storage kind '{}' (expected 'sqlite' or 'memory')",
                other
            ))),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database file
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Song store backend
    #[serde(default)]
    pub storage: StorageKind,

    /// oEmbed endpoint used by the import pipeline
    #[serde(default = "default_oembed_endpoint")]
    pub oembed_endpoint: String,

    /// Timeout for the single oEmbed request
    #[serde(default = "default_oembed_timeout_secs")]
    pub oembed_timeout_secs: u64,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: default_port(),
            bind_address: default_bind_address(),
            storage: StorageKind::default(),
            oembed_endpoint: default_oembed_endpoint(),
            oembed_timeout_secs: default_oembed_timeout_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_oembed_endpoint() -> String {
    DEFAULT_OEMBED_ENDPOINT.to_string()
}

fn default_oembed_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
    }

    /// Load the TOML config, degrading to defaults when it is missing or invalid
    ///
    /// `explicit_path` wins over the platform config location. The outcome is
    /// logged immediately; use [`TomlConfig::load_with_origin`] when logging is
    /// not initialized yet.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Self {
        let (config, origin) = Self::load_with_origin(explicit_path);
        origin.log();
        config
    }

    /// Load the TOML config without logging, reporting where it came from
    pub fn load_with_origin(explicit_path: Option<&Path>) -> (Self, ConfigOrigin) {
        let path = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => return (Self::default(), ConfigOrigin::NoConfigDir),
            },
        };

        if !path.exists() {
            return (Self::default(), ConfigOrigin::Missing(path));
        }

        match Self::from_file(&path) {
            Ok(config) => (config, ConfigOrigin::File(path)),
            Err(e) => (
                Self::default(),
                ConfigOrigin::Invalid {
                    path,
                    reason: e.to_string(),
                },
            ),
        }
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from this file
    File(PathBuf),
    /// No file at this path; defaults used
    Missing(PathBuf),
    /// File present but unreadable; defaults used
    Invalid { path: PathBuf, reason: String },
    /// No platform config directory; defaults used
    NoConfigDir,
}

impl ConfigOrigin {
    pub fn uses_defaults(&self) -> bool {
        !matches!(self, ConfigOrigin::File(_))
    }

    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!("Loaded config from {}", path.display()),
            ConfigOrigin::Missing(path) => {
                info!("No config file at {}, using defaults", path.display())
            }
            ConfigOrigin::Invalid { path, reason } => {
                warn!("Ignoring config file {}: {}", path.display(), reason)
            }
            ConfigOrigin::NoConfigDir => {
                warn!("Could not determine config directory, using defaults")
            }
        }
    }
}

/// Platform config file location (`<config_dir>/songmark/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songmark").join("config.toml"))
}

/// Compiled fallback values
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("songmark"))
            .unwrap_or_else(|| PathBuf::from("./songmark_data"));

        Self {
            root_folder,
            log_level: default_log_level(),
        }
    }
}

/// Resolves the root folder across CLI, environment, TOML and defaults
#[derive(Debug, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml_value(mut self, path: Option<PathBuf>) -> Self {
        self.toml_value = path;
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and derives file locations inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}
