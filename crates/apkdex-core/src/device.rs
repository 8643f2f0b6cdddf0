//! Device capability data consumed by the resolver.
//!
//! The engine never talks to a device itself; whatever layer does (adb,
//! a config file, CLI flags) supplies these values. Absence of a
//! [`DeviceCapabilities`] means "no device, don't filter".

use std::collections::BTreeMap;

/// What a target device can run: its ABIs in priority order and its
/// API level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Supported ABIs, most preferred first.
    pub abis: Vec<String>,
    /// Android API level.
    pub api_level: i32,
}

/// Installed state of one package on a device.
///
/// Callers combine this with the resolver's suggestion to decide between
/// fresh install, upgrade, and already-current; that decision is theirs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledPackage {
    /// Installed build number.
    pub version_code: i64,
    /// Installed version name.
    pub version_name: String,
}

/// Installed packages keyed by package name.
pub type InstalledPackages = BTreeMap<String, InstalledPackage>;
