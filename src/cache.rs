use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use crate::utils::app_paths::AppPaths;

/// One cached response body on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub id: u64,
    pub key_hash: String,
    pub endpoint: String,
    pub phrase: String,
    pub timestamp: DateTime<Local>,
    /// Array length of the body, or 1 for non-array bodies
    pub row_count: usize,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub entries: Vec<CachedResponse>,
    pub next_id: u64,
}

/// File-backed response cache: JSON bodies under data/, with a
/// metadata.json ledger keyed by a hash of endpoint + phrase.
pub struct ResponseCache {
    cache_dir: PathBuf,
    metadata_path: PathBuf,
    metadata: CacheMetadata,
}

fn cache_key(endpoint: &str, phrase: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(endpoint.as_bytes());
    hasher.update(b"\n");
    hasher.update(phrase.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl ResponseCache {
    pub fn new() -> Result<Self> {
        Self::with_dir(AppPaths::cache_dir()?)
    }

    pub fn with_dir(cache_dir: PathBuf) -> Result<Self> {
        let data_dir = cache_dir.join("data");
        fs::create_dir_all(&data_dir)?;

        let metadata_path = cache_dir.join("metadata.json");

        let metadata = if metadata_path.exists() {
            let content = fs::read_to_string(&metadata_path)?;
            serde_json::from_str(&content)?
        } else {
            CacheMetadata {
                entries: Vec::new(),
                next_id: 1,
            }
        };

        Ok(Self {
            cache_dir,
            metadata_path,
            metadata,
        })
    }

    /// Save a response body. Returns the existing entry's id when the same
    /// endpoint + phrase is already cached.
    pub fn save(&mut self, endpoint: &str, phrase: &str, body: &Value) -> Result<u64> {
        let key_hash = cache_key(endpoint, phrase);

        if let Some(existing) = self.metadata.entries.iter().find(|e| e.key_hash == key_hash) {
            return Ok(existing.id);
        }

        let id = self.metadata.next_id;
        let file_name = format!("response_{:06}.json", id);
        let file_path = self.cache_dir.join("data").join(&file_name);

        let json_data = serde_json::to_string_pretty(body)?;
        fs::write(&file_path, json_data)?;

        let row_count = body.as_array().map_or(1, |rows| rows.len());

        self.metadata.entries.push(CachedResponse {
            id,
            key_hash,
            endpoint: endpoint.to_string(),
            phrase: phrase.to_string(),
            timestamp: Local::now(),
            row_count,
            file_name,
        });
        self.metadata.next_id += 1;

        self.save_metadata()?;
        Ok(id)
    }

    pub fn load(&self, id: u64) -> Result<(CachedResponse, Value)> {
        let entry = self
            .metadata
            .entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| anyhow!("Cache entry {} not found", id))?;

        let file_path = self.cache_dir.join("data").join(&entry.file_name);
        let json_data = fs::read_to_string(file_path)?;
        let body: Value = serde_json::from_str(&json_data)?;

        Ok((entry.clone(), body))
    }

    pub fn list(&self) -> &[CachedResponse] {
        &self.metadata.entries
    }

    pub fn delete(&mut self, id: u64) -> Result<()> {
        if let Some(pos) = self.metadata.entries.iter().position(|e| e.id == id) {
            let entry = self.metadata.entries.remove(pos);
            let file_path = self.cache_dir.join("data").join(&entry.file_name);
            fs::remove_file(file_path)?;
            self.save_metadata()?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        let data_dir = self.cache_dir.join("data");
        for entry in fs::read_dir(data_dir)? {
            let entry = entry?;
            if entry.path().extension().map_or(false, |ext| ext == "json") {
                fs::remove_file(entry.path())?;
            }
        }

        self.metadata.entries.clear();
        self.metadata.next_id = 1;
        self.save_metadata()?;

        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        let total_size: u64 = self
            .metadata
            .entries
            .iter()
            .filter_map(|e| {
                let path = self.cache_dir.join("data").join(&e.file_name);
                fs::metadata(path).ok().map(|m| m.len())
            })
            .sum();

        let total_rows: usize = self.metadata.entries.iter().map(|e| e.row_count).sum();

        CacheStats {
            total_entries: self.metadata.entries.len(),
            total_rows,
            total_size_bytes: total_size,
            oldest_entry: self
                .metadata
                .entries
                .iter()
                .min_by_key(|e| e.timestamp)
                .map(|e| e.timestamp),
            newest_entry: self
                .metadata
                .entries
                .iter()
                .max_by_key(|e| e.timestamp)
                .map(|e| e.timestamp),
        }
    }

    fn save_metadata(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.metadata)?;
        fs::write(&self.metadata_path, json)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_rows: usize,
    pub total_size_bytes: u64,
    pub oldest_entry: Option<DateTime<Local>>,
    pub newest_entry: Option<DateTime<Local>>,
}

impl CacheStats {
    pub fn format_size(&self) -> String {
        let size = self.total_size_bytes as f64;
        if size < 1024.0 {
            format!("{} B", size)
        } else if size < 1024.0 * 1024.0 {
            format!("{:.1} KB", size / 1024.0)
        } else if size < 1024.0 * 1024.0 * 1024.0 {
            format!("{:.1} MB", size / (1024.0 * 1024.0))
        } else {
            format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
        }
    }
}
