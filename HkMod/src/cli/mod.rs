//! hkmod CLI - install, list, remove and publish Hollow Knight mods

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "hkmod")]
#[command(version, about = "hkmod: Hollow Knight mod manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the hkmod CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Logs go to stderr so listings stay pipeable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
