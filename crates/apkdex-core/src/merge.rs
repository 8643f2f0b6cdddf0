//! Combining parsed indexes from every enabled repository into one catalog.
//!
//! Inputs must arrive in priority order, highest first. The tie-break
//! contract: when two repositories publish the same package at the same
//! version code, the earlier-priority repository's variant must stay
//! earlier in the merged list. This falls out of appending the later
//! repository's variants and re-sorting with a stable sort, which never
//! reorders equal keys.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::debug;

use crate::catalog::{App, Catalog, ParsedIndex};

/// Merge parsed indexes, given in priority order, into a [`Catalog`].
///
/// Deterministic: the same indexes in the same order always produce an
/// identical catalog.
pub fn merge(parsed: Vec<ParsedIndex>) -> Catalog {
    let mut apps: BTreeMap<String, App> = BTreeMap::new();

    for index in parsed {
        debug!(repo = %index.repo.name, apps = index.apps.len(), "merging index");
        for app in index.apps {
            match apps.entry(app.package_name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(app);
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    existing.variants.extend(app.variants);
                    // Stable sort: equal version codes keep the
                    // higher-priority repository's variant first.
                    existing
                        .variants
                        .sort_by(|a, b| b.version_code.cmp(&a.version_code));
                }
            }
        }
    }

    Catalog::from_apps(apps)
}
