//! CLI command for installing a mod file outside the catalog

use std::time::Instant;

use crate::cli::progress::{PACKAGE, print_done, print_step};
use crate::config::Config;
use crate::operations::install_file;
use crate::transport::HttpTransport;

pub fn execute(name: &str, source: &str) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Config::load();
    let mods_dir = config.mods_dir()?;
    let transport = HttpTransport::new()?;

    print_step(1, 1, PACKAGE, &format!("Installing {name} from {source}"));
    let result = install_file(name, source, &mods_dir, &transport)?;
    println!("  {} files in {}", result.files.len(), result.mod_dir.display());
    print_done(start.elapsed());
    Ok(())
}
