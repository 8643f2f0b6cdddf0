//! Suggest command.

use anyhow::{Result, bail};

use apkdex_core::device::DeviceCapabilities;

pub fn run(package: &str, abis: Vec<String>, api_level: Option<i32>) -> Result<()> {
    let catalog = super::load_catalog()?;
    let Some(app) = catalog.get(package) else {
        bail!("no app with package name '{package}' in the catalog");
    };

    // No device flags at all means "don't filter".
    let caps = match (abis.is_empty(), api_level) {
        (true, None) => None,
        (_, api_level) => Some(DeviceCapabilities {
            abis,
            api_level: api_level.unwrap_or(0),
        }),
    };

    match app.suggested_variant(caps.as_ref()) {
        Some(variant) => {
            println!(
                "{} {} ({})",
                app.package_name, variant.version_name, variant.version_code
            );
            println!("    {}", variant.download_url());
            Ok(())
        }
        None => bail!("no compatible variant of '{package}' for this device"),
    }
}
