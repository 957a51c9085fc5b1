use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

/// Platform directories used by motioner-cli. Directories are created on
/// first access so callers can assume the returned path exists.
pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Cannot determine data directory"))?
            .join("motioner-cli");

        fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow!("Cannot determine cache directory"))?
            .join("motioner-cli");

        fs::create_dir_all(&cache_dir)?;
        Ok(cache_dir)
    }

    pub fn config_file() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Cannot determine config directory"))?
            .join("motioner-cli");

        fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join("config.toml"))
    }

    /// Structured query history (phrase, endpoint, outcome).
    pub fn history_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("history.json"))
    }

    /// Plain line history for the interactive prompt.
    pub fn repl_history_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("repl_history.txt"))
    }
}
