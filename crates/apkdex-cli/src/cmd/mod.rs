//! CLI subcommands.

pub mod list;
pub mod search;
pub mod show;
pub mod suggest;
pub mod update;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use apkdex_core::catalog::Catalog;
use apkdex_core::config::Config;
use apkdex_core::paths::Dirs;

/// Resolve the apkdex home and load the repository configuration,
/// writing the built-in default config on first run.
pub fn bootstrap() -> Result<(Dirs, Config)> {
    let dirs = Dirs::discover()
        .ok_or_else(|| anyhow!("could not determine home directory; set APKDEX_HOME"))?;
    let config_path = dirs.config_path();
    let config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        debug!(path = %config_path.display(), "writing default config");
        let config = Config::default_repos();
        config.save(&config_path)?;
        config
    };
    Ok((dirs, config))
}

/// Load the merged catalog for read-only commands.
pub fn load_catalog() -> Result<Catalog> {
    let (dirs, config) = bootstrap()?;
    apkdex_core::update::load_catalog(&config, &dirs).context("could not load catalog")
}

/// One-line-per-app listing shared by `list` and `search`.
pub fn print_short(app: &apkdex_core::catalog::App) {
    println!("{}", app.package_name);
    println!("    {} - {}", app.name, app.summary);
}
