//! Mod management operations
//!
//! Each operation works on plain paths and a [`modlinks::Transport`], so it can
//! run against a scratch directory and canned responses. The CLI adds config,
//! the real HTTP client and terminal output on top.

pub mod extraction;
pub mod install;
pub mod installed;
pub mod installfile;
pub mod list;
pub mod publish;
pub mod yeet;

pub use extraction::ExtractResult;
pub use install::{InstallReport, InstallTarget, InstalledMod, install};
pub use installed::{installed_mods, remove_previous_version};
pub use installfile::install_file;
pub use list::{ListFilter, format_listing, list_mods};
pub use publish::{PublishOptions, PublishOutcome, publish};
pub use yeet::{YeetReport, yeet};
