//! The legacy XML index document.
//!
//! Older repositories ship `index.xml` instead of the JSON document.
//! The schema differs in more than syntax: timestamps are epoch seconds,
//! list fields are comma-joined, and the suggested release lives in
//! `marketversion`/`marketvercode`. Everything converges on the same
//! catalog types so the rest of the pipeline never sees the difference.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{FormatError, fields};
use crate::catalog::{App, Permission, RepoMeta, Variant};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIndex {
    repo: RawRepo,
    #[serde(rename = "application")]
    applications: Vec<RawApp>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRepo {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@url")]
    url: String,
    #[serde(rename = "@version")]
    version: i32,
    #[serde(rename = "@maxage")]
    maxage: i32,
    #[serde(rename = "@timestamp")]
    timestamp: i64,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawApp {
    id: String,
    name: String,
    summary: String,
    desc: String,
    license: String,
    categories: String,
    web: String,
    source: String,
    tracker: String,
    donate: String,
    icon: String,
    marketversion: String,
    marketvercode: i64,
    #[serde(rename = "package")]
    packages: Vec<RawPackage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPackage {
    version: String,
    versioncode: i64,
    apkname: String,
    hash: RawHash,
    size: i64,
    sdkver: i32,
    maxsdkver: i32,
    sig: String,
    permissions: String,
    nativecode: String,
    features: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHash {
    #[serde(rename = "@type")]
    hash_type: String,
    #[serde(rename = "$text")]
    value: String,
}

type Decoded = (RepoMeta, Vec<App>, BTreeMap<String, Vec<Variant>>);

/// Decode a legacy XML document into un-normalized catalog values.
pub(super) fn parse(text: &str) -> Result<Decoded, FormatError> {
    let raw: RawIndex = quick_xml::de::from_str(text)
        .map_err(|err| FormatError::MalformedDocument(err.to_string()))?;

    let repo = RepoMeta {
        name: raw.repo.name,
        address: raw.repo.url,
        // Legacy timestamps are epoch seconds.
        timestamp_ms: raw.repo.timestamp * 1000,
        version: raw.repo.version,
        max_age: raw.repo.maxage,
        description: raw.repo.description,
    };

    let mut apps = Vec::with_capacity(raw.applications.len());
    let mut variants = BTreeMap::new();

    for raw_app in raw.applications {
        let package_variants: Vec<Variant> =
            raw_app.packages.into_iter().map(variant).collect();
        variants.insert(raw_app.id.clone(), package_variants);
        apps.push(App {
            package_name: raw_app.id,
            name: raw_app.name,
            summary: raw_app.summary,
            description: raw_app.desc,
            license: raw_app.license,
            categories: fields::split_commas(&raw_app.categories),
            website: raw_app.web,
            source_code: raw_app.source,
            issue_tracker: raw_app.tracker,
            donate: raw_app.donate,
            icon: raw_app.icon,
            added_ms: 0,
            last_updated_ms: 0,
            suggested_version_name: raw_app.marketversion,
            suggested_version_code: raw_app.marketvercode,
            localized: BTreeMap::new(),
            variants: Vec::new(),
        });
    }

    Ok((repo, apps, variants))
}

fn variant(raw: RawPackage) -> Variant {
    Variant {
        version_name: raw.version,
        version_code: raw.versioncode,
        size_bytes: raw.size,
        min_sdk: raw.sdkver,
        max_sdk: raw.maxsdkver,
        target_sdk: 0,
        abis: fields::split_commas(&raw.nativecode),
        apk_name: raw.apkname,
        hash: fields::decode_hex(&raw.hash.value),
        hash_type: raw.hash.hash_type,
        sig: fields::decode_hex(&raw.sig),
        signer: Vec::new(),
        added_ms: 0,
        permissions: fields::split_commas(&raw.permissions)
            .into_iter()
            .map(|name| Permission {
                name,
                max_sdk: None,
            })
            .collect(),
        features: fields::split_commas(&raw.features),
        origin_repo_url: String::new(),
        owner_package_name: String::new(),
    }
}
