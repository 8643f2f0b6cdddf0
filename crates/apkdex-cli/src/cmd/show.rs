//! Show command.

use anyhow::{Result, bail};
use chrono::DateTime;

use apkdex_core::catalog::{App, Variant};

pub fn run(packages: &[String]) -> Result<()> {
    let catalog = super::load_catalog()?;
    for (i, package) in packages.iter().enumerate() {
        let Some(app) = catalog.get(package) else {
            bail!("no app with package name '{package}' in the catalog");
        };
        if i > 0 {
            println!();
        }
        print_detailed(app);
    }
    Ok(())
}

fn date(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn print_detailed(app: &App) {
    println!("Package          : {}", app.package_name);
    println!("Name             : {}", app.name);
    println!("Summary          : {}", app.summary);
    if !app.license.is_empty() {
        println!("License          : {}", app.license);
    }
    if !app.categories.is_empty() {
        println!("Categories       : {}", app.categories.join(", "));
    }
    if !app.website.is_empty() {
        println!("Website          : {}", app.website);
    }
    if !app.source_code.is_empty() {
        println!("Source code      : {}", app.source_code);
    }
    if !app.issue_tracker.is_empty() {
        println!("Issue tracker    : {}", app.issue_tracker);
    }
    if app.added_ms > 0 {
        println!("Added            : {}", date(app.added_ms));
    }
    if app.last_updated_ms > 0 {
        println!("Last updated     : {}", date(app.last_updated_ms));
    }
    println!(
        "Suggested version: {} ({})",
        app.suggested_version_name, app.suggested_version_code
    );
    println!("Available versions:");
    for variant in &app.variants {
        print_variant(variant);
    }
}

fn print_variant(variant: &Variant) {
    println!(
        "    {} ({}) from {}",
        variant.version_name, variant.version_code, variant.origin_repo_url
    );
    let mut details = Vec::new();
    if variant.min_sdk > 0 {
        details.push(format!("minSdk {}", variant.min_sdk));
    }
    if variant.max_sdk > 0 {
        details.push(format!("maxSdk {}", variant.max_sdk));
    }
    if !variant.abis.is_empty() {
        details.push(variant.abis.join(", "));
    }
    if variant.size_bytes > 0 {
        details.push(format!("{} bytes", variant.size_bytes));
    }
    if !details.is_empty() {
        println!("        {}", details.join(" | "));
    }
}
