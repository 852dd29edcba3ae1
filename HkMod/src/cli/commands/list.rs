//! CLI command for listing catalog mods

use crate::cli::progress::simple_spinner;
use crate::config::Config;
use crate::operations::{ListFilter, format_listing, installed_mods, list_mods};
use crate::transport::{HttpTransport, fetch_catalog};

pub fn execute(search: Option<&str>, installed_only: bool, detailed: bool) -> anyhow::Result<()> {
    let config = Config::load();
    let installed = if installed_only {
        Some(installed_mods(&config.mods_dir()?)?)
    } else {
        None
    };

    let transport = HttpTransport::new()?;
    let pb = simple_spinner("Fetching catalog...");
    let catalog = fetch_catalog(&transport, &config.modlinks_url);
    pb.finish_and_clear();
    let catalog = catalog?;

    let mods = list_mods(
        &catalog,
        &ListFilter {
            search,
            installed: installed.as_deref(),
        },
    );
    print!("{}", format_listing(&mods, detailed));
    Ok(())
}
