//! On-disk layout of the apkdex home directory.
//!
//! ```text
//! ~/.apkdex/
//! ├── config.toml       # repository list
//! ├── indexes/          # fetched index containers + ETag sidecars
//! │   ├── f-droid.jar
//! │   └── f-droid.jar-etag
//! └── cache/
//!     └── catalog.bin   # merged catalog envelope
//! ```
//!
//! A [`Dirs`] value is threaded explicitly through the pipeline instead of
//! consulting process-wide globals, so tests can point it at a tempdir.

use std::path::{Path, PathBuf};

use dirs::home_dir;

/// Resolved apkdex home directory and the paths derived from it.
#[derive(Debug, Clone)]
pub struct Dirs {
    home: PathBuf,
}

impl Dirs {
    /// Root a `Dirs` at an explicit home directory.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Resolve the home directory from `APKDEX_HOME`, falling back to
    /// `~/.apkdex`. `None` if the user's home cannot be determined.
    pub fn discover() -> Option<Self> {
        if let Ok(val) = std::env::var("APKDEX_HOME") {
            return Some(Self::new(val));
        }
        home_dir().map(|h| Self::new(h.join(".apkdex")))
    }

    /// The home directory itself.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Repository configuration file: `config.toml`.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Directory holding fetched index containers.
    pub fn index_dir(&self) -> PathBuf {
        self.home.join("indexes")
    }

    /// Local path of one repository's index container.
    pub fn index_path(&self, repo_id: &str) -> PathBuf {
        self.index_dir().join(format!("{repo_id}.jar"))
    }

    /// Directory holding the merged catalog cache.
    pub fn cache_dir(&self) -> PathBuf {
        self.home.join("cache")
    }

    /// The merged catalog cache file.
    pub fn catalog_cache_path(&self) -> PathBuf {
        self.cache_dir().join("catalog.bin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_derive_from_home() {
        let dirs = Dirs::new("/tmp/apkdex-test");
        assert_eq!(
            dirs.index_path("f-droid"),
            PathBuf::from("/tmp/apkdex-test/indexes/f-droid.jar")
        );
        assert_eq!(
            dirs.catalog_cache_path(),
            PathBuf::from("/tmp/apkdex-test/cache/catalog.bin")
        );
        assert_eq!(
            dirs.config_path(),
            PathBuf::from("/tmp/apkdex-test/config.toml")
        );
    }
}
