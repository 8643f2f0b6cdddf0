//! Selecting the variant to install for a device.
//!
//! Two-pass rule: prefer the newest variant at or below the repository's
//! suggested version code (the endorsed stable release); if no such
//! variant can run on the device, silently degrade to the newest variant
//! that can. Both passes rely on variant lists being sorted by version
//! code descending, which the parser and merger guarantee.

use crate::catalog::{App, Variant};
use crate::device::DeviceCapabilities;

impl Variant {
    /// ABI-compatible when the variant ships no native code at all, or
    /// shares at least one ABI with the device.
    pub fn is_compatible_abi(&self, device_abis: &[String]) -> bool {
        if self.abis.is_empty() {
            return true;
        }
        self.abis.iter().any(|abi| device_abis.contains(abi))
    }

    /// API-compatible when the device's API level falls inside the
    /// variant's `[min_sdk, max_sdk]` window; `max_sdk == 0` means
    /// unbounded above.
    pub fn is_compatible_api_level(&self, api_level: i32) -> bool {
        api_level >= self.min_sdk && (self.max_sdk == 0 || api_level <= self.max_sdk)
    }

    /// Full compatibility check. No device means no filtering.
    pub fn is_compatible(&self, caps: Option<&DeviceCapabilities>) -> bool {
        match caps {
            None => true,
            Some(caps) => {
                self.is_compatible_abi(&caps.abis) && self.is_compatible_api_level(caps.api_level)
            }
        }
    }
}

impl App {
    /// The variant to install or upgrade to, or `None` when nothing the
    /// repository offers can run on this device.
    ///
    /// Pass 1 scans for the newest compatible variant the repository
    /// endorses (`suggested_version_code >= version_code`); pass 2 drops
    /// the endorsement ceiling and takes the newest compatible variant.
    pub fn suggested_variant(&self, caps: Option<&DeviceCapabilities>) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| self.suggested_version_code >= v.version_code && v.is_compatible(caps))
            .or_else(|| self.variants.iter().find(|v| v.is_compatible(caps)))
    }
}
