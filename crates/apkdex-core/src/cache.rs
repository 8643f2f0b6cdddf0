//! On-disk cache of the merged catalog.
//!
//! The cache avoids re-parsing every repository container on every
//! invocation. It stores a single envelope, `{schema_version, catalog}`,
//! in the compact Postcard wire format. Any load failure (missing file,
//! truncated bytes, schema bump) is a silent miss; the caller rebuilds
//! from the stored containers. Writes go through a temp file and an
//! atomic rename so a crash mid-write can never corrupt the cache.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::Catalog;

/// Bump whenever the serialized shape of [`Catalog`] changes; readers of
/// older envelopes silently rebuild.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CacheEnvelope {
    pub(crate) schema_version: u32,
    pub(crate) catalog: Catalog,
}

/// Why a cache write failed. Reads never fail, they miss.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Serialization failure.
    #[error("encode error: {0}")]
    Codec(#[from] postcard::Error),
}

/// Load the cached catalog, or `None` when the cache is absent,
/// unreadable, or from a different schema version.
pub fn load(path: &Path) -> Option<Catalog> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            debug!(%err, path = %path.display(), "cache unreadable, rebuilding");
            return None;
        }
    };

    let envelope: CacheEnvelope = match postcard::from_bytes(&bytes) {
        Ok(envelope) => envelope,
        Err(err) => {
            debug!(%err, path = %path.display(), "cache undecodable, rebuilding");
            return None;
        }
    };

    if envelope.schema_version != CACHE_SCHEMA_VERSION {
        debug!(
            found = envelope.schema_version,
            expected = CACHE_SCHEMA_VERSION,
            "cache schema mismatch, rebuilding"
        );
        return None;
    }

    Some(envelope.catalog)
}

/// Persist the catalog under the current schema version.
pub fn store(path: &Path, catalog: &Catalog) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let envelope = CacheEnvelope {
        schema_version: CACHE_SCHEMA_VERSION,
        catalog: catalog.clone(),
    };
    let bytes = postcard::to_allocvec(&envelope)?;

    // Atomic write: temp file in the same directory, then rename.
    let tmp = path.with_extension("bin.tmp");
    std::fs::write(&tmp, &bytes)?;
    std::fs::rename(&tmp, path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "catalog cache stored");
    Ok(())
}

/// Delete the cache file. Missing file is fine; the cache was already
/// invalid.
pub fn invalidate(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "catalog cache invalidated");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            warn!(%err, path = %path.display(), "failed to invalidate catalog cache");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::catalog::{App, Variant};

    fn sample_catalog() -> Catalog {
        let mut apps = BTreeMap::new();
        apps.insert(
            "org.example.app".to_string(),
            App {
                package_name: "org.example.app".to_string(),
                name: "Example".to_string(),
                suggested_version_code: 7,
                variants: vec![Variant {
                    version_code: 7,
                    version_name: "0.7".to_string(),
                    abis: vec!["arm64-v8a".to_string()],
                    hash: vec![0xca, 0xfe],
                    origin_repo_url: "https://repo.example.org/repo".to_string(),
                    owner_package_name: "org.example.app".to_string(),
                    ..Variant::default()
                }],
                ..App::default()
            },
        );
        Catalog::from_apps(apps)
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("catalog.bin");

        let catalog = sample_catalog();
        store(&path, &catalog).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn absent_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("missing.bin")).is_none());
    }

    #[test]
    fn corrupt_bytes_are_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.bin");
        std::fs::write(&path, b"\xff\xff\xff\xff").unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn schema_mismatch_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.bin");

        let envelope = CacheEnvelope {
            schema_version: CACHE_SCHEMA_VERSION + 1,
            catalog: sample_catalog(),
        };
        std::fs::write(&path, postcard::to_allocvec(&envelope).unwrap()).unwrap();

        assert!(load(&path).is_none());
    }

    #[test]
    fn invalidate_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.bin");

        store(&path, &sample_catalog()).unwrap();
        assert!(path.exists());
        invalidate(&path).unwrap();
        assert!(!path.exists());
        invalidate(&path).unwrap();
    }
}
