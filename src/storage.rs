//! Manages request history, collections and environments on disk
//!
//! Everything lives under `~/.courier`: `history.yaml` (the ring of recent
//! runs), one `<name>.yaml` per collection, one `<name>.env.yaml` per
//! environment. History is restored at startup and rewritten at exit;
//! collection saves write through immediately.

use crate::models::{Collection, Environment, HistoryEntry, RequestSpec};
use anyhow::Result;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_HISTORY: usize = 50;

const HISTORY_FILE: &str = "history.yaml";

/// Collection requests land in when saved without an explicit target
const DEFAULT_COLLECTION: &str = "saved";

pub struct Storage {
    pub history: VecDeque<HistoryEntry>,
    pub collections: Vec<Collection>,
    pub environments: Vec<Environment>,
    pub current_env: Option<usize>,
    config_dir: PathBuf,
}

impl Storage {
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".courier");
        Self::with_dir(config_dir)
    }

    /// Storage rooted at an explicit directory (tests use a temp dir)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        let mut storage = Storage {
            history: VecDeque::with_capacity(MAX_HISTORY),
            collections: Vec::new(),
            environments: Vec::new(),
            current_env: None,
            config_dir,
        };

        // Missing or unreadable files just mean empty state
        let _ = storage.load_all();
        storage
    }

    pub fn dir(&self) -> &Path {
        &self.config_dir
    }

    /// Add entry to history, evicting the oldest past the cap
    pub fn add_to_history(&mut self, entry: HistoryEntry) {
        if self.history.len() >= MAX_HISTORY {
            self.history.pop_back();
        }
        self.history.push_front(entry);
    }

    /// Get history item by index (0 = most recent)
    pub fn get_history(&self, index: usize) -> Option<&HistoryEntry> {
        self.history.get(index)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Get current environment
    pub fn current_environment(&self) -> Option<&Environment> {
        self.current_env.and_then(|i| self.environments.get(i))
    }

    /// Step through loaded environments: none -> first -> ... -> none.
    /// Returns the newly active environment's name.
    pub fn cycle_environment(&mut self) -> Option<&str> {
        self.current_env = match self.current_env {
            None if self.environments.is_empty() => None,
            None => Some(0),
            Some(i) if i + 1 < self.environments.len() => Some(i + 1),
            Some(_) => None,
        };
        self.current_environment().map(|env| env.name.as_str())
    }

    /// Append a request to the default collection and persist it
    pub fn save_to_collection(&mut self, request: RequestSpec) -> Result<()> {
        let index = match self
            .collections
            .iter()
            .position(|c| c.name == DEFAULT_COLLECTION)
        {
            Some(index) => index,
            None => {
                self.collections.push(Collection::new(DEFAULT_COLLECTION));
                self.collections.len() - 1
            }
        };
        self.collections[index].requests.push(request);
        let collection = self.collections[index].clone();
        self.save_collection(&collection)
    }

    /// Saved requests across all collections, newest last
    pub fn collection_entries(&self) -> impl Iterator<Item = (&str, &RequestSpec)> {
        self.collections
            .iter()
            .flat_map(|c| c.requests.iter().map(move |r| (c.name.as_str(), r)))
    }

    /// Ensure config directory exists
    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Save a collection to file
    pub fn save_collection(&self, collection: &Collection) -> Result<()> {
        self.ensure_dir()?;
        let path = self.config_dir.join(format!("{}.yaml", collection.name));
        let content = serde_yaml::to_string(collection)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Save an environment to file
    #[allow(dead_code)]
    pub fn save_environment(&self, environment: &Environment) -> Result<()> {
        self.ensure_dir()?;
        let path = self
            .config_dir
            .join(format!("{}.env.yaml", environment.name));
        let content = serde_yaml::to_string(environment)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Persist the history ring
    pub fn save_history(&self) -> Result<()> {
        self.ensure_dir()?;
        let path = self.config_dir.join(HISTORY_FILE);
        let content = serde_yaml::to_string(&self.history)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load history, collections and environments from disk
    pub fn load_all(&mut self) -> Result<()> {
        if !self.config_dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(&self.config_dir)? {
            let entry = entry?;
            let path = entry.path();

            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if filename == HISTORY_FILE {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(history) = serde_yaml::from_str::<VecDeque<HistoryEntry>>(&content) {
                        self.history = history;
                        self.history.truncate(MAX_HISTORY);
                    }
                }
            } else if filename.ends_with(".env.yaml") {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(env) = serde_yaml::from_str::<Environment>(&content) {
                        self.environments.push(env);
                    }
                }
            } else if filename.ends_with(".yaml") {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(col) = serde_yaml::from_str::<Collection>(&content) {
                        self.collections.push(col);
                    }
                }
            }
        }

        self.environments.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}
