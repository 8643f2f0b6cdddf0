//! Repository configuration.
//!
//! The config file is an ordered list of repositories; list position is
//! the priority the merger uses to break version-code ties. The core
//! only ever reads this; nothing in the pipeline mutates configuration.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// One configured repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Short identifier, also the local index file stem.
    pub id: String,
    /// Repository base URL, without the index file name.
    pub url: String,
    /// Disabled repositories are skipped by the whole pipeline.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// The parsed `config.toml`: an ordered repository list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Repositories in priority order, highest first.
    #[serde(default, rename = "repo")]
    pub repos: Vec<RepoConfig>,
}

impl Config {
    /// The built-in configuration used when no config file exists yet:
    /// the main F-Droid repository enabled, its archive present but off.
    pub fn default_repos() -> Self {
        Self {
            repos: vec![
                RepoConfig {
                    id: "f-droid".to_string(),
                    url: "https://f-droid.org/repo".to_string(),
                    enabled: true,
                },
                RepoConfig {
                    id: "f-droid-archive".to_string(),
                    url: "https://f-droid.org/archive".to_string(),
                    enabled: false,
                },
            ],
        }
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config out, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Enabled repositories in priority order.
    pub fn enabled_repos(&self) -> impl Iterator<Item = &RepoConfig> {
        self.repos.iter().filter(|r| r.enabled)
    }

    fn validate(&self) -> Result<()> {
        for (i, repo) in self.repos.iter().enumerate() {
            if repo.id.is_empty() {
                bail!("repository at position {i} has an empty id");
            }
            if self.repos[..i].iter().any(|r| r.id == repo.id) {
                bail!("duplicate repository id '{}'", repo.id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ordered_repo_list() {
        let toml = r#"
            [[repo]]
            id = "main"
            url = "https://repo.example.org/repo"

            [[repo]]
            id = "mirror"
            url = "https://mirror.example.org/repo"
            enabled = false
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.repos.len(), 2);
        assert!(config.repos[0].enabled);
        assert!(!config.repos[1].enabled);
        assert_eq!(config.enabled_repos().count(), 1);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::default_repos();
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let toml = r#"
            [[repo]]
            id = "main"
            url = "https://a.example.org/repo"

            [[repo]]
            id = "main"
            url = "https://b.example.org/repo"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }
}
