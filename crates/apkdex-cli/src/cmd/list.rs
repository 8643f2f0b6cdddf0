//! List command.

use anyhow::Result;

pub fn run() -> Result<()> {
    let catalog = super::load_catalog()?;
    for app in catalog.iter() {
        super::print_short(app);
    }
    Ok(())
}
