//! Conditional, integrity-checked download of one repository resource.
//!
//! Every fetch is a conditional GET keyed by the ETag from the previous
//! fetch of the same resource. Bodies are streamed to a temporary file and
//! committed with an atomic rename, so the committed file is either the
//! previous contents or the fully verified new contents, never a partial
//! write and never unverified bytes.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::{Client, StatusCode, header};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// One resource to fetch: where it lives, where it lands, and optionally
/// the digest its bytes must match.
#[derive(Debug)]
pub struct FetchResource<'a> {
    /// Remote URL.
    pub url: &'a str,
    /// Committed local path. The ETag sidecar lives next to it.
    pub local_path: &'a Path,
    /// Hex-encoded SHA-256 the body must hash to, if known in advance.
    pub expected_sha256: Option<&'a str>,
}

/// What a successful fetch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// New content was committed to the local path.
    Updated,
    /// The server reported the stored copy is still current; nothing
    /// was written.
    NotModified,
}

/// Why a fetch failed. The local file and ETag are untouched in every case.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure reaching the server.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server-side rejection.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The downloaded body did not hash to the expected digest.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Integrity {
        /// Digest the caller supplied.
        expected: String,
        /// Digest of the bytes actually received.
        actual: String,
    },

    /// Local filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sidecar path holding the last-seen ETag for `local_path`.
pub fn etag_path(local_path: &Path) -> PathBuf {
    sibling_with_suffix(local_path, "-etag")
}

fn part_path(local_path: &Path) -> PathBuf {
    sibling_with_suffix(local_path, ".part")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Fetch one resource conditionally.
///
/// Sends `If-None-Match` when a committed copy already exists. A `304`
/// response is [`FetchOutcome::NotModified`]; a status of 400 or above is
/// [`FetchError::Status`]; anything else commits the body and stores the
/// response ETag for next time.
pub async fn fetch(
    client: &Client,
    resource: &FetchResource<'_>,
) -> Result<FetchOutcome, FetchError> {
    let mut request = client.get(resource.url);
    if resource.local_path.exists() {
        if let Ok(etag) = std::fs::read_to_string(etag_path(resource.local_path)) {
            let etag = etag.trim();
            if !etag.is_empty() {
                request = request.header(header::IF_NONE_MATCH, etag);
            }
        }
    }

    let response = request.send().await?;
    let status = response.status();
    if status == StatusCode::NOT_MODIFIED {
        debug!(url = resource.url, "not modified");
        return Ok(FetchOutcome::NotModified);
    }
    if status.as_u16() >= 400 {
        return Err(FetchError::Status(status.as_u16()));
    }

    let etag = response
        .headers()
        .get(header::ETAG)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if let Some(parent) = resource.local_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = part_path(resource.local_path);
    let mut file = File::create(&tmp).await?;
    let mut hasher = Sha256::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                drop(file);
                tokio::fs::remove_file(&tmp).await.ok();
                return Err(FetchError::Network(err));
            }
        };
        file.write_all(&chunk).await?;
        hasher.update(&chunk);
    }
    file.flush().await?;
    drop(file);

    if let Some(expected) = resource.expected_sha256 {
        let actual = hex::encode(hasher.finalize());
        if !actual.eq_ignore_ascii_case(expected) {
            tokio::fs::remove_file(&tmp).await.ok();
            return Err(FetchError::Integrity {
                expected: expected.to_string(),
                actual,
            });
        }
    }

    tokio::fs::rename(&tmp, resource.local_path).await?;
    tokio::fs::write(etag_path(resource.local_path), etag).await?;
    debug!(url = resource.url, path = %resource.local_path.display(), "updated");
    Ok(FetchOutcome::Updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client() -> Client {
        Client::new()
    }

    #[tokio::test]
    async fn first_fetch_commits_body_and_etag() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/index-v1.jar")
            .with_status(200)
            .with_header("etag", "\"abc123\"")
            .with_body(b"index bytes")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("main.jar");
        let url = format!("{}/index-v1.jar", server.url());

        let outcome = fetch(
            &client(),
            &FetchResource {
                url: &url,
                local_path: &local,
                expected_sha256: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome, FetchOutcome::Updated);
        assert_eq!(std::fs::read(&local).unwrap(), b"index bytes");
        assert_eq!(
            std::fs::read_to_string(etag_path(&local)).unwrap(),
            "\"abc123\""
        );
    }

    #[tokio::test]
    async fn second_fetch_with_matching_etag_is_not_modified() {
        let mut server = Server::new_async().await;
        let _first = server
            .mock("GET", "/index-v1.jar")
            .match_header("if-none-match", mockito::Matcher::Missing)
            .with_status(200)
            .with_header("etag", "\"v1\"")
            .with_body(b"original")
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/index-v1.jar")
            .match_header("if-none-match", "\"v1\"")
            .with_status(304)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("main.jar");
        let url = format!("{}/index-v1.jar", server.url());
        let resource = FetchResource {
            url: &url,
            local_path: &local,
            expected_sha256: None,
        };

        assert_eq!(
            fetch(&client(), &resource).await.unwrap(),
            FetchOutcome::Updated
        );
        assert_eq!(
            fetch(&client(), &resource).await.unwrap(),
            FetchOutcome::NotModified
        );
        // Target bytes unchanged by the second call.
        assert_eq!(std::fs::read(&local).unwrap(), b"original");
    }

    #[tokio::test]
    async fn http_error_leaves_local_state_untouched() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/index-v1.jar")
            .with_status(503)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("main.jar");
        std::fs::write(&local, b"committed").unwrap();
        std::fs::write(etag_path(&local), "\"old\"").unwrap();

        let url = format!("{}/index-v1.jar", server.url());
        let err = fetch(
            &client(),
            &FetchResource {
                url: &url,
                local_path: &local,
                expected_sha256: None,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FetchError::Status(503)));
        assert_eq!(std::fs::read(&local).unwrap(), b"committed");
        assert_eq!(std::fs::read_to_string(etag_path(&local)).unwrap(), "\"old\"");
    }

    #[tokio::test]
    async fn checksum_mismatch_discards_download() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/index-v1.jar")
            .with_status(200)
            .with_body(b"tampered")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("main.jar");
        std::fs::write(&local, b"committed").unwrap();

        let expected = hex::encode(Sha256::digest(b"authentic"));
        let url = format!("{}/index-v1.jar", server.url());
        let err = fetch(
            &client(),
            &FetchResource {
                url: &url,
                local_path: &local,
                expected_sha256: Some(&expected),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FetchError::Integrity { .. }));
        // The previously committed file was never overwritten and no
        // partial file is left behind.
        assert_eq!(std::fs::read(&local).unwrap(), b"committed");
        assert!(!part_path(&local).exists());
    }

    #[tokio::test]
    async fn matching_checksum_commits() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/index-v1.jar")
            .with_status(200)
            .with_body(b"authentic")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("main.jar");
        let expected = hex::encode(Sha256::digest(b"authentic"));
        let url = format!("{}/index-v1.jar", server.url());

        let outcome = fetch(
            &client(),
            &FetchResource {
                url: &url,
                local_path: &local,
                expected_sha256: Some(&expected),
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome, FetchOutcome::Updated);
        assert_eq!(std::fs::read(&local).unwrap(), b"authentic");
    }
}
