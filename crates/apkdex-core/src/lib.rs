//! apkdex-core - index synchronization and APK resolution.
//!
//! A local catalog manager for F-Droid style application repositories:
//! metadata plus downloadable packages, used to decide which package
//! variant is installable on a given device.
//!
//! # Pipeline
//!
//! ```text
//! fetch (per repo, conditional GET) ──> parse (container -> ParsedIndex)
//!      ──> merge (priority order -> Catalog) ──> cache (postcard envelope)
//! ```
//!
//! The resolver runs independently of the pipeline, consuming a
//! [`catalog::Catalog`] plus externally supplied
//! [`device::DeviceCapabilities`].
//!
//! Config, directories, and the HTTP client are threaded explicitly, so
//! the pipeline is reentrant and testable without process-wide state.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod device;
pub mod fetch;
pub mod index;
pub mod merge;
pub mod paths;
pub mod resolver;
pub mod update;

use std::time::Duration;

/// User agent string for repository requests.
pub const USER_AGENT: &str = concat!("apkdex/", env!("CARGO_PKG_VERSION"));

/// How long a single repository request may take before it is abandoned.
/// Unbounded fetches would hang the whole sequential pipeline.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the shared HTTP client used by the pipeline: bounded timeout,
/// crate user agent.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()
}
