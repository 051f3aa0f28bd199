//! UI layout persistence
//!
//! A handful of pane sizes in a plain `key=value` text file, read once at
//! startup and written once at exit. Unknown keys are ignored so the file
//! stays forward-compatible.

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Layout config file name, stored next to history and collections
pub const LAYOUT_FILE: &str = "layout.conf";

/// Persisted pane sizes: [sidebar %, request %, response %].
/// Request and response split the main column and sum to 100.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiConfig {
    pub pane_sizes: [u16; 3],
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            pane_sizes: [20, 40, 60],
        }
    }
}

impl UiConfig {
    /// Read the layout file. A missing or unparseable file falls back to
    /// defaults; this never blocks startup.
    pub fn load(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return UiConfig::default();
        };
        Self::parse(&content).unwrap_or_default()
    }

    /// Write the layout file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.serialize())?;
        Ok(())
    }

    fn parse(content: &str) -> Option<Self> {
        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim() == "pane_sizes" {
                let sizes: Vec<u16> = value
                    .split(',')
                    .filter_map(|s| s.trim().parse().ok())
                    .collect();
                if let [sidebar, request, response] = sizes[..] {
                    return Some(UiConfig {
                        pane_sizes: [sidebar, request, response],
                    });
                }
            }
        }
        None
    }

    fn serialize(&self) -> String {
        let [sidebar, request, response] = self.pane_sizes;
        format!("pane_sizes={},{},{}\n", sidebar, request, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = UiConfig::load(&dir.path().join("nope.conf"));
        assert_eq!(config, UiConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LAYOUT_FILE);

        let config = UiConfig {
            pane_sizes: [25, 55, 45],
        };
        config.save(&path).unwrap();
        assert_eq!(UiConfig::load(&path), config);
    }

    #[test]
    fn test_garbage_and_unknown_keys_are_tolerated() {
        assert_eq!(UiConfig::parse("not a config"), None);
        assert_eq!(UiConfig::parse("pane_sizes=1,2"), None);
        assert_eq!(
            UiConfig::parse("other=1\npane_sizes=10,30,70\n"),
            Some(UiConfig {
                pane_sizes: [10, 30, 70]
            })
        );
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(LAYOUT_FILE);
        UiConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
