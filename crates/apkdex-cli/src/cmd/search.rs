//! Search command.

use anyhow::Result;

pub fn run(terms: &[String]) -> Result<()> {
    let catalog = super::load_catalog()?;
    for app in catalog.search(terms) {
        super::print_short(app);
    }
    Ok(())
}
