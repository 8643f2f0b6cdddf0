//! Catalog data model: repositories, apps, and installable variants.
//!
//! These types are the normalized in-memory form of a repository index.
//! They are produced by the parser, combined by the merger, persisted by
//! the cache, and queried by the resolver. Everything here is plain owned
//! data; a [`Variant`] carries value copies of its origin repository URL
//! and owning package name rather than back-pointers into lists that the
//! merger reallocates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata about one repository, taken from its index document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoMeta {
    /// Human-readable repository name.
    pub name: String,
    /// Base address packages are downloaded from.
    pub address: String,
    /// When the index was generated, in epoch milliseconds.
    pub timestamp_ms: i64,
    /// Index document version declared by the repository.
    pub version: i32,
    /// Maximum index age in days before clients should consider it stale.
    pub max_age: i32,
    /// Free-form repository description.
    pub description: String,
}

/// Localized name/summary/description strings for one locale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    /// Localized application name.
    pub name: String,
    /// Localized one-line summary.
    pub summary: String,
    /// Localized long description.
    pub description: String,
}

/// A runtime permission declared by a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    /// Permission identifier, e.g. `android.permission.CAMERA`.
    pub name: String,
    /// Highest SDK level the permission applies to, if bounded.
    pub max_sdk: Option<i64>,
}

/// One installable build of an app.
///
/// Identified by a monotonically increasing `version_code` within its
/// owning package. `origin_repo_url` and `owner_package_name` are stamped
/// by the parser so a variant stays self-describing after merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Human-readable version, e.g. `1.4.2`.
    pub version_name: String,
    /// Monotonic build number; the resolver's ordering key.
    pub version_code: i64,
    /// Package size in bytes.
    pub size_bytes: i64,
    /// Minimum supported device API level.
    pub min_sdk: i32,
    /// Maximum supported device API level; `0` means unbounded.
    pub max_sdk: i32,
    /// API level the build targets.
    pub target_sdk: i32,
    /// Native ABIs this build ships code for. Empty means
    /// architecture-independent, which is always ABI-compatible.
    pub abis: Vec<String>,
    /// File name of the package within the repository.
    pub apk_name: String,
    /// Package digest.
    pub hash: Vec<u8>,
    /// Digest algorithm name, e.g. `sha256`.
    pub hash_type: String,
    /// Signature blob digest.
    pub sig: Vec<u8>,
    /// Signing certificate digest.
    pub signer: Vec<u8>,
    /// When this build was published, in epoch milliseconds.
    pub added_ms: i64,
    /// Runtime permissions the build requests.
    pub permissions: Vec<Permission>,
    /// Hardware/software features the build requires.
    pub features: Vec<String>,
    /// Address of the repository this variant came from (value copy).
    pub origin_repo_url: String,
    /// Package name of the owning app (value copy).
    pub owner_package_name: String,
}

impl Variant {
    /// Full download URL for this build.
    pub fn download_url(&self) -> String {
        format!("{}/{}", self.origin_repo_url, self.apk_name)
    }
}

/// An application: metadata plus every known installable variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct App {
    /// Unique package identifier, e.g. `org.fdroid.fdroid`.
    pub package_name: String,
    /// Display name.
    pub name: String,
    /// One-line summary.
    pub summary: String,
    /// Long description; may contain simple HTML markup.
    pub description: String,
    /// License identifier.
    pub license: String,
    /// Category labels.
    pub categories: Vec<String>,
    /// Project website.
    pub website: String,
    /// Source code location.
    pub source_code: String,
    /// Issue tracker location.
    pub issue_tracker: String,
    /// Donation link.
    pub donate: String,
    /// Icon file name within the repository.
    pub icon: String,
    /// When the app first appeared, in epoch milliseconds.
    pub added_ms: i64,
    /// When the app was last updated, in epoch milliseconds.
    pub last_updated_ms: i64,
    /// Version name the repository recommends as stable.
    pub suggested_version_name: String,
    /// Version code the repository recommends as stable.
    pub suggested_version_code: i64,
    /// Per-locale metadata, consulted when the top-level strings are empty.
    pub localized: BTreeMap<String, Localization>,
    /// Known builds, sorted by `version_code` descending.
    pub variants: Vec<Variant>,
}

/// The normalized result of parsing one repository's index container.
///
/// Created once per fetch+parse cycle and treated as immutable afterwards;
/// the merger consumes these by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedIndex {
    /// Repository self-description.
    pub repo: RepoMeta,
    /// Apps declared by this repository, sorted by package name, each with
    /// its variants attached.
    pub apps: Vec<App>,
    /// Variants keyed by package name, exactly as attached to `apps`.
    pub variants_by_package: BTreeMap<String, Vec<Variant>>,
}

/// The merged, de-duplicated set of apps across all enabled repositories.
///
/// Iteration order is package name ascending; variant lists inside each
/// app keep the merge tie-break ordering (see the merger).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    apps: BTreeMap<String, App>,
}

impl Catalog {
    /// Build a catalog from an already keyed app map.
    pub fn from_apps(apps: BTreeMap<String, App>) -> Self {
        Self { apps }
    }

    /// Look up an app by package name.
    pub fn get(&self, package_name: &str) -> Option<&App> {
        self.apps.get(package_name)
    }

    /// Iterate over apps in package-name order.
    pub fn iter(&self) -> impl Iterator<Item = &App> {
        self.apps.values()
    }

    /// Number of apps in the catalog.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Whether the catalog holds no apps.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Case-folded substring search over package name, name, summary, and
    /// description. An app matches when at least one of those fields
    /// contains every term.
    pub fn search(&self, terms: &[String]) -> Vec<&App> {
        let terms: Vec<String> = terms.iter().map(|t| t.to_lowercase()).collect();
        self.apps
            .values()
            .filter(|app| {
                let fields = [
                    app.package_name.to_lowercase(),
                    app.name.to_lowercase(),
                    app.summary.to_lowercase(),
                    app.description.to_lowercase(),
                ];
                fields
                    .iter()
                    .any(|field| terms.iter().all(|term| field.contains(term)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(package_name: &str, name: &str, summary: &str) -> App {
        App {
            package_name: package_name.to_string(),
            name: name.to_string(),
            summary: summary.to_string(),
            ..App::default()
        }
    }

    #[test]
    fn search_matches_terms_within_one_field() {
        let mut apps = BTreeMap::new();
        apps.insert(
            "org.example.term".to_string(),
            app("org.example.term", "Terminal Emulator", "a terminal"),
        );
        apps.insert(
            "org.example.cam".to_string(),
            app("org.example.cam", "Camera", "take photos"),
        );
        let catalog = Catalog::from_apps(apps);

        let hits = catalog.search(&["terminal".to_string(), "emulator".to_string()]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].package_name, "org.example.term");

        // Terms split across different fields do not match.
        let misses = catalog.search(&["camera".to_string(), "photos".to_string()]);
        assert!(misses.is_empty());
    }

    #[test]
    fn iteration_is_package_name_ordered() {
        let mut apps = BTreeMap::new();
        for pkg in ["z.app", "a.app", "m.app"] {
            apps.insert(pkg.to_string(), app(pkg, "", ""));
        }
        let catalog = Catalog::from_apps(apps);
        let order: Vec<&str> = catalog.iter().map(|a| a.package_name.as_str()).collect();
        assert_eq!(order, ["a.app", "m.app", "z.app"]);
    }

    #[test]
    fn download_url_joins_origin_and_name() {
        let variant = Variant {
            apk_name: "app_7.apk".to_string(),
            origin_repo_url: "https://repo.example.org/repo".to_string(),
            ..Variant::default()
        };
        assert_eq!(
            variant.download_url(),
            "https://repo.example.org/repo/app_7.apk"
        );
    }
}
