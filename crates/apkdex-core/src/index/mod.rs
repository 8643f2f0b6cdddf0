//! Index container parsing.
//!
//! A repository index arrives as a zip-like container holding one
//! canonical metadata entry. Two historical document formats exist and
//! are modeled as a closed set: the JSON v1 document and the legacy XML
//! document. The variant is chosen by inspecting the container's entry
//! names, never by caller-supplied flags. Whatever the format, the
//! output is the same normalized [`ParsedIndex`].

mod fields;
mod legacy;
mod v1;

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use thiserror::Error;
use tracing::debug;

use crate::catalog::{App, ParsedIndex, RepoMeta, Variant};

/// Canonical entry name of the JSON v1 document.
pub const ENTRY_V1: &str = "index-v1.json";
/// Canonical entry name of the legacy XML document.
pub const ENTRY_LEGACY: &str = "index.xml";

/// The closed set of known index document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// `index-v1.json`, the current JSON document.
    V1Json,
    /// `index.xml`, the original XML document.
    LegacyXml,
}

/// Why a container could not be parsed.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The container holds no known index entry.
    #[error("no index entry found inside container")]
    NoIndexEntry,

    /// The container or its index entry could not be decoded.
    #[error("malformed index document: {0}")]
    MalformedDocument(String),

    /// Reading the container failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a repository index container into a normalized [`ParsedIndex`].
///
/// Pure function of the container bytes: the source is only read, and
/// identical bytes always produce an identical result.
pub fn parse<R: Read + Seek>(source: R) -> Result<ParsedIndex, FormatError> {
    let mut archive = zip::ZipArchive::new(source)
        .map_err(|err| FormatError::MalformedDocument(err.to_string()))?;

    let format = detect_format(&archive)?;
    debug!(?format, "parsing index container");

    check_signature(&mut archive)?;

    let (repo, apps, variants) = match format {
        IndexFormat::V1Json => {
            let entry = archive
                .by_name(ENTRY_V1)
                .map_err(|err| FormatError::MalformedDocument(err.to_string()))?;
            v1::parse(entry)?
        }
        IndexFormat::LegacyXml => {
            let mut entry = archive
                .by_name(ENTRY_LEGACY)
                .map_err(|err| FormatError::MalformedDocument(err.to_string()))?;
            let mut text = String::new();
            entry.read_to_string(&mut text)?;
            legacy::parse(&text)?
        }
    };

    Ok(post_process(repo, apps, variants))
}

/// Choose the document format from the container's entry names.
fn detect_format<R: Read + Seek>(archive: &zip::ZipArchive<R>) -> Result<IndexFormat, FormatError> {
    let mut has_legacy = false;
    for name in archive.file_names() {
        if name == ENTRY_V1 {
            return Ok(IndexFormat::V1Json);
        }
        if name == ENTRY_LEGACY {
            has_legacy = true;
        }
    }
    if has_legacy {
        Ok(IndexFormat::LegacyXml)
    } else {
        Err(FormatError::NoIndexEntry)
    }
}

/// Locate the container's signature entry, if any.
///
/// The signature contents are not verified; only the entry is read so a
/// truncated container still fails early.
fn check_signature<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> Result<(), FormatError> {
    let sig_name = archive
        .file_names()
        .find(|name| {
            name.starts_with("META-INF/")
                && (name.ends_with(".RSA") || name.ends_with(".DSA") || name.ends_with(".EC"))
        })
        .map(str::to_string);

    if let Some(name) = sig_name {
        let mut entry = archive
            .by_name(&name)
            .map_err(|err| FormatError::MalformedDocument(err.to_string()))?;
        let mut sig = Vec::new();
        entry.read_to_end(&mut sig)?;
        debug!(entry = %name, bytes = sig.len(), "signature entry present");
    }
    Ok(())
}

/// Deterministic normalization shared by both document formats.
///
/// Sorts apps by package name, applies the `en`/`en-US` localized
/// fallback plus text cleanup, orders each variant list by version code
/// descending (stable, so declaration order breaks ties within one
/// repository), and stamps every variant with its origin repository URL
/// and owning package name.
fn post_process(
    repo: RepoMeta,
    mut apps: Vec<App>,
    mut variants: BTreeMap<String, Vec<Variant>>,
) -> ParsedIndex {
    apps.sort_by(|a, b| a.package_name.cmp(&b.package_name));

    for app in &mut apps {
        let english = app
            .localized
            .get("en")
            .or_else(|| app.localized.get("en-US"))
            .cloned();
        if let Some(english) = english {
            if app.name.is_empty() {
                app.name = english.name;
            }
            if app.summary.is_empty() {
                app.summary = english.summary;
            }
            if app.description.is_empty() {
                app.description = english.description;
            }
        }
        app.name = fields::clean_text(&app.name);
        app.summary = fields::clean_text(&app.summary);
        app.description = fields::clean_text(&app.description);

        if let Some(list) = variants.get_mut(&app.package_name) {
            list.sort_by(|a, b| b.version_code.cmp(&a.version_code));
            for variant in list.iter_mut() {
                variant.version_name = fields::clean_text(&variant.version_name);
                variant.origin_repo_url = repo.address.clone();
                variant.owner_package_name = app.package_name.clone();
            }
            app.variants = list.clone();
        }
    }

    ParsedIndex {
        repo,
        apps,
        variants_by_package: variants,
    }
}
