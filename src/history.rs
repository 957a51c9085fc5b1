use anyhow::Result;
use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::utils::app_paths::AppPaths;

const DEFAULT_MAX_ENTRIES: usize = 1000;

/// One issued query: the phrase, where it was sent, and how it went.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub phrase: String,
    /// Endpoint path the phrase was sent to, e.g. "/motioner"
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
    pub execution_count: u32,
    pub success: bool,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct HistoryMatch {
    pub entry: HistoryEntry,
    pub score: i64,
    pub indices: Vec<usize>,
}

/// Local query history, the client-side mirror of the service's
/// /queries/latest and /queries/top endpoints.
pub struct QueryHistory {
    entries: Vec<HistoryEntry>,
    history_file: PathBuf,
    matcher: SkimMatcherV2,
    phrase_counts: HashMap<String, u32>,
    max_entries: usize,
}

impl QueryHistory {
    pub fn new() -> Result<Self> {
        Self::with_file(AppPaths::history_file()?)
    }

    /// Platform history file with a configured cap
    /// (`behavior.max_history_entries`).
    pub fn with_cap(max_entries: usize) -> Result<Self> {
        Self::with_file_and_cap(AppPaths::history_file()?, max_entries)
    }

    pub fn with_file(history_file: PathBuf) -> Result<Self> {
        Self::with_file_and_cap(history_file, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_file_and_cap(history_file: PathBuf, max_entries: usize) -> Result<Self> {
        let mut history = Self {
            entries: Vec::new(),
            history_file,
            matcher: SkimMatcherV2::default(),
            phrase_counts: HashMap::new(),
            max_entries,
        };

        history.load_from_file()?;
        Ok(history)
    }

    pub fn record(
        &mut self,
        phrase: &str,
        endpoint: &str,
        success: bool,
        duration_ms: Option<u64>,
    ) -> Result<()> {
        if phrase.trim().is_empty() {
            return Ok(());
        }

        // Re-running the same phrase against the same endpoint back to back
        // (the smoke sweep does this constantly) is one logical query.
        if let Some(last) = self.entries.last() {
            if last.phrase == phrase && last.endpoint == endpoint {
                return Ok(());
            }
        }

        let entry = HistoryEntry {
            phrase: phrase.to_string(),
            endpoint: endpoint.to_string(),
            timestamp: Utc::now(),
            execution_count: *self.phrase_counts.get(phrase).unwrap_or(&0) + 1,
            success,
            duration_ms,
        };

        *self.phrase_counts.entry(phrase.to_string()).or_insert(0) += 1;
        self.entries.push(entry);

        if self.entries.len() > self.max_entries {
            let overflow = self.entries.len() - self.max_entries;
            // Evicted entries take their tally with them so top() keeps
            // matching what is actually retained.
            for evicted in self.entries.drain(0..overflow) {
                if let Some(count) = self.phrase_counts.get_mut(&evicted.phrase) {
                    *count -= 1;
                    if *count == 0 {
                        self.phrase_counts.remove(&evicted.phrase);
                    }
                }
            }
        }

        self.save_to_file()?;
        Ok(())
    }

    /// Most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(limit).collect()
    }

    /// Most frequently issued phrases with their counts, descending.
    pub fn top(&self, limit: usize) -> Vec<(String, u32)> {
        let mut counts: Vec<(String, u32)> = self
            .phrase_counts
            .iter()
            .map(|(phrase, &count)| (phrase.clone(), count))
            .collect();

        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(limit);
        counts
    }

    /// Fuzzy search over past phrases.
    pub fn search(&self, query: &str) -> Vec<HistoryMatch> {
        if query.is_empty() {
            return self
                .recent(20)
                .into_iter()
                .map(|entry| HistoryMatch {
                    entry: entry.clone(),
                    score: 0,
                    indices: Vec::new(),
                })
                .collect();
        }

        let mut matches: Vec<HistoryMatch> = self
            .entries
            .iter()
            .filter_map(|entry| {
                self.matcher
                    .fuzzy_indices(&entry.phrase, query)
                    .map(|(score, indices)| HistoryMatch {
                        entry: entry.clone(),
                        score,
                        indices,
                    })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.entry.execution_count.cmp(&a.entry.execution_count))
                .then_with(|| b.entry.timestamp.cmp(&a.entry.timestamp))
        });

        matches.truncate(20);
        matches
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.phrase_counts.clear();
        self.save_to_file()?;
        Ok(())
    }

    fn load_from_file(&mut self) -> Result<()> {
        if !self.history_file.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(&self.history_file)?;
        if content.trim().is_empty() {
            return Ok(());
        }

        let entries: Vec<HistoryEntry> = serde_json::from_str(&content)?;

        self.phrase_counts.clear();
        for entry in &entries {
            *self.phrase_counts.entry(entry.phrase.clone()).or_insert(0) += 1;
        }

        self.entries = entries;
        Ok(())
    }

    fn save_to_file(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.history_file, content)?;
        Ok(())
    }
}
