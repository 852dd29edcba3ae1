//! CLI command for removing installed mods

use crate::config::Config;
use crate::operations::yeet::{removed_message, yeet};

pub fn execute(mods: &[String]) -> anyhow::Result<()> {
    let config = Config::load();
    let report = yeet(&config.mods_dir()?, mods)?;

    for err in &report.unresolved {
        println!("{err}");
    }
    for (name, result) in &report.removed {
        match result {
            Ok(()) => println!("{}", removed_message(name)),
            Err(e) => println!("{e}"),
        }
    }
    Ok(())
}
