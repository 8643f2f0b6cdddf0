//! The JSON "v1" index document.
//!
//! Raw structs mirror the wire shape exactly; normalization into the
//! catalog types happens in one pass afterwards (see [`fields`] for the
//! loose-encoding helpers).

use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use serde::Deserialize;
use serde_json::Value;

use super::{FormatError, fields};
use crate::catalog::{App, Localization, RepoMeta, Variant};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIndex {
    repo: RawRepo,
    apps: Vec<RawApp>,
    packages: HashMap<String, Vec<RawApk>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRepo {
    name: String,
    timestamp: i64,
    address: String,
    version: i32,
    maxage: i32,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawApp {
    package_name: String,
    name: String,
    summary: String,
    description: String,
    license: String,
    categories: Vec<String>,
    #[serde(rename = "webSite")]
    website: String,
    source_code: String,
    issue_tracker: String,
    donate: String,
    icon: String,
    added: i64,
    last_updated: i64,
    suggested_version_name: String,
    suggested_version_code: Value,
    localized: HashMap<String, RawLocalization>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLocalization {
    name: String,
    summary: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawApk {
    version_name: String,
    version_code: i64,
    size: i64,
    min_sdk_version: Value,
    max_sdk_version: Value,
    target_sdk_version: Value,
    #[serde(rename = "nativecode")]
    native_code: Vec<String>,
    apk_name: String,
    hash: String,
    hash_type: String,
    sig: String,
    signer: String,
    added: i64,
    #[serde(rename = "uses-permission")]
    uses_permission: Vec<Value>,
    features: Vec<String>,
}

type Decoded = (RepoMeta, Vec<App>, BTreeMap<String, Vec<Variant>>);

/// Decode a v1 JSON document into un-normalized catalog values.
pub(super) fn parse(reader: impl Read) -> Result<Decoded, FormatError> {
    let raw: RawIndex = serde_json::from_reader(reader)
        .map_err(|err| FormatError::MalformedDocument(err.to_string()))?;

    let repo = RepoMeta {
        name: raw.repo.name,
        address: raw.repo.address,
        timestamp_ms: raw.repo.timestamp,
        version: raw.repo.version,
        max_age: raw.repo.maxage,
        description: raw.repo.description,
    };

    let apps = raw.apps.into_iter().map(app).collect();

    let variants = raw
        .packages
        .into_iter()
        .map(|(package, apks)| (package, apks.into_iter().map(variant).collect()))
        .collect();

    Ok((repo, apps, variants))
}

fn app(raw: RawApp) -> App {
    App {
        package_name: raw.package_name,
        name: raw.name,
        summary: raw.summary,
        description: raw.description,
        license: raw.license,
        categories: raw.categories,
        website: raw.website,
        source_code: raw.source_code,
        issue_tracker: raw.issue_tracker,
        donate: raw.donate,
        icon: raw.icon,
        added_ms: raw.added,
        last_updated_ms: raw.last_updated,
        suggested_version_name: raw.suggested_version_name,
        suggested_version_code: fields::int_value(&raw.suggested_version_code),
        localized: raw
            .localized
            .into_iter()
            .map(|(locale, loc)| {
                (
                    locale,
                    Localization {
                        name: loc.name,
                        summary: loc.summary,
                        description: loc.description,
                    },
                )
            })
            .collect(),
        variants: Vec::new(),
    }
}

fn variant(raw: RawApk) -> Variant {
    Variant {
        version_name: raw.version_name,
        version_code: raw.version_code,
        size_bytes: raw.size,
        min_sdk: fields::int_value(&raw.min_sdk_version) as i32,
        max_sdk: fields::int_value(&raw.max_sdk_version) as i32,
        target_sdk: fields::int_value(&raw.target_sdk_version) as i32,
        abis: raw.native_code,
        apk_name: raw.apk_name,
        hash: fields::decode_hex(&raw.hash),
        hash_type: raw.hash_type,
        sig: fields::decode_hex(&raw.sig),
        signer: fields::decode_hex(&raw.signer),
        added_ms: raw.added,
        permissions: fields::permissions(&raw.uses_permission),
        features: raw.features,
        origin_repo_url: String::new(),
        owner_package_name: String::new(),
    }
}
