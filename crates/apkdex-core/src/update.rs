//! The update pipeline: fetch every repository, then rebuild the catalog.
//!
//! Strictly sequential: repositories are fetched one at a time in config
//! order, and the first failure aborts the pass with the offending
//! repository named. The catalog cache is invalidated only when at least
//! one fetch actually committed new content; an all-not-modified pass
//! leaves it untouched so the next catalog read skips parsing and
//! merging entirely.

use std::io;

use reqwest::Client;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::fetch::{self, FetchError, FetchOutcome, FetchResource};
use crate::index::{self, FormatError};
use crate::merge::merge;
use crate::paths::Dirs;

/// Index container file name appended to every repository URL.
pub const INDEX_FILE: &str = "index-v1.jar";

/// Why an update pass or catalog rebuild failed.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Fetching one repository's index failed.
    #[error("repository '{id}': {source}")]
    Repo {
        /// Configured id of the offending repository.
        id: String,
        /// Underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// Parsing one repository's stored index failed.
    #[error("repository '{id}': {source}")]
    Parse {
        /// Configured id of the offending repository.
        id: String,
        /// Underlying parse failure.
        #[source]
        source: FormatError,
    },

    /// A repository's index container has never been fetched.
    #[error("repository '{id}': index not fetched yet; run update first")]
    MissingIndex {
        /// Configured id of the offending repository.
        id: String,
    },

    /// The pass was cancelled between per-repository fetches.
    #[error("update cancelled")]
    Cancelled,

    /// Local filesystem failure outside any single repository.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Per-repository result of an update pass.
#[derive(Debug)]
pub struct RepoUpdate {
    /// Configured repository id.
    pub id: String,
    /// What the fetch did.
    pub outcome: FetchOutcome,
}

/// Result of a whole update pass.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// One entry per enabled repository, in priority order.
    pub repos: Vec<RepoUpdate>,
}

impl UpdateReport {
    /// Whether any repository committed new index content.
    pub fn any_updated(&self) -> bool {
        self.repos
            .iter()
            .any(|r| r.outcome == FetchOutcome::Updated)
    }
}

/// Fetch every enabled repository's index container, in priority order.
///
/// Aborts on the first per-repository failure. The cancellation token is
/// checked between repositories and raced against the in-flight fetch;
/// an abandoned fetch never commits anything thanks to the fetcher's
/// temp-file-then-rename protocol. When at least one repository was
/// updated, the catalog cache is invalidated.
pub async fn update_indexes(
    client: &Client,
    config: &Config,
    dirs: &Dirs,
    cancel: &CancellationToken,
) -> Result<UpdateReport, UpdateError> {
    let mut report = UpdateReport::default();

    for repo in config.enabled_repos() {
        if cancel.is_cancelled() {
            return Err(UpdateError::Cancelled);
        }

        let url = format!("{}/{INDEX_FILE}", repo.url.trim_end_matches('/'));
        let local = dirs.index_path(&repo.id);
        let resource = FetchResource {
            url: &url,
            local_path: &local,
            expected_sha256: None,
        };

        let outcome = tokio::select! {
            () = cancel.cancelled() => return Err(UpdateError::Cancelled),
            result = fetch::fetch(client, &resource) => {
                result.map_err(|source| UpdateError::Repo {
                    id: repo.id.clone(),
                    source,
                })?
            }
        };

        info!(repo = %repo.id, ?outcome, "index fetched");
        report.repos.push(RepoUpdate {
            id: repo.id.clone(),
            outcome,
        });
    }

    if report.any_updated() {
        cache::invalidate(&dirs.catalog_cache_path())?;
    }

    Ok(report)
}

/// Load the merged catalog.
///
/// A valid cache short-circuits everything. On a miss, every enabled
/// repository's stored container is parsed, the results merged in
/// priority order, and the merge written back to the cache (best effort;
/// a failed store still returns the catalog).
pub fn load_catalog(config: &Config, dirs: &Dirs) -> Result<Catalog, UpdateError> {
    let cache_path = dirs.catalog_cache_path();
    if let Some(catalog) = cache::load(&cache_path) {
        debug!(apps = catalog.len(), "catalog served from cache");
        return Ok(catalog);
    }

    let mut parsed = Vec::new();
    for repo in config.enabled_repos() {
        let path = dirs.index_path(&repo.id);
        let file = match std::fs::File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(UpdateError::MissingIndex {
                    id: repo.id.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        let index = index::parse(file).map_err(|source| UpdateError::Parse {
            id: repo.id.clone(),
            source,
        })?;
        parsed.push(index);
    }

    let catalog = merge(parsed);
    info!(apps = catalog.len(), "catalog rebuilt from indexes");
    if let Err(err) = cache::store(&cache_path, &catalog) {
        warn!(%err, "failed to store catalog cache");
    }
    Ok(catalog)
}
