use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::utils::app_paths::AppPaths;

/// Environment variable overriding `server.base_url`.
pub const URL_ENV_VAR: &str = "MOTIONER_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub hits: HitsConfig,
    pub behavior: BehaviorConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the motioner search service
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HitsConfig {
    /// Default start year for /motioner/hits
    pub start_date: i32,

    /// Default end year for /motioner/hits
    pub end_date: i32,

    /// Default paging offset for /motioner/hits
    pub from_index: usize,

    /// Optional queryMode parameter, interpreted by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Record issued phrases in the local query history
    pub enable_history: bool,

    /// Maximum history entries to keep
    pub max_history_entries: usize,

    /// Cache directory (leave unset to use the platform default)
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Pretty-print JSON responses (compact single-line when false)
    pub pretty: bool,

    /// Colorize status lines
    pub color: bool,

    /// Render JSON arrays of objects as tables
    pub table: bool,

    /// Maximum rows shown per table before truncation
    pub max_table_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            hits: HitsConfig::default(),
            behavior: BehaviorConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://0.0.0.0:9000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            // Riksdagen's digitized motion archive starts in 1971
            start_date: 1971,
            end_date: 2018,
            from_index: 0,
            query_mode: None,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            enable_history: true,
            max_history_entries: 1000,
            cache_dir: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            color: true,
            table: true,
            max_table_rows: 100,
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults
    /// when no file exists yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        AppPaths::config_file()
    }

    /// Base URL with the environment override applied.
    pub fn resolved_base_url(&self) -> String {
        std::env::var(URL_ENV_VAR).unwrap_or_else(|_| self.server.base_url.clone())
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# motioner-cli configuration file
# Location: ~/.config/motioner-cli/config.toml (Linux/macOS)
#           %APPDATA%\motioner-cli\config.toml (Windows)

[server]
# Base URL of the locally running motioner search service.
# Can be overridden with the MOTIONER_URL environment variable.
base_url = "http://0.0.0.0:9000"

# Per-request timeout in seconds
timeout_secs = 30

[hits]
# Default year range for /motioner/hits
start_date = 1971
end_date = 2018

# Default paging offset
from_index = 0

# Optional query mode, interpreted by the backend
# query_mode = "phrase"

[behavior]
# Record issued phrases in the local query history
enable_history = true

# Maximum number of history entries to keep
max_history_entries = 1000

# Cache directory (leave commented to use the platform default)
# cache_dir = "/path/to/cache"

[display]
# Pretty-print JSON responses; false prints compact single-line JSON
pretty = true

# Colorize status lines
color = true

# Render JSON arrays of objects as tables
table = true

# Maximum rows shown per table before truncation
max_table_rows = 100
"#
        .to_string()
    }
}
