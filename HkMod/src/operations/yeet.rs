//! Removing installed mods

use std::collections::BTreeSet;
use std::path::Path;

use modlinks::error::ResolveError;
use modlinks::resolver::resolve;

use super::installed::{CUSTOM_KNIGHT, installed_mods, remove_previous_version};
use crate::error::Result;

/// Outcome of a removal batch.
#[derive(Debug, Default)]
pub struct YeetReport {
    /// Requested names that matched no single installed mod.
    pub unresolved: Vec<ResolveError>,
    /// Each resolved mod, in name order, with the result of removing it.
    pub removed: Vec<(String, Result<()>)>,
}

impl YeetReport {
    pub fn is_success(&self) -> bool {
        self.unresolved.is_empty() && self.removed.iter().all(|(_, r)| r.is_ok())
    }
}

/// Message shown for a mod that was removed.
pub fn removed_message(name: &str) -> String {
    if name == CUSTOM_KNIGHT {
        format!("Yeeted {name} (installed skins kept)")
    } else {
        format!("Yeeted {name}")
    }
}

/// Remove the installed mods matching `requested`.
///
/// Names are resolved against the mod directories with the same rules used for
/// the catalog. Requests that resolve to the same mod remove it once.
///
/// # Errors
/// Only if the Mods directory cannot be listed; per-mod failures go in the report.
pub fn yeet(mods_dir: &Path, requested: &[String]) -> Result<YeetReport> {
    let installed = installed_mods(mods_dir)?;
    let mut report = YeetReport::default();

    let mut targets = BTreeSet::new();
    for request in requested {
        match resolve(&installed, request) {
            Ok(name) => {
                targets.insert(name);
            }
            Err(e) => report.unresolved.push(e),
        }
    }

    for name in targets {
        let result = remove_previous_version(mods_dir, &name);
        if result.is_ok() {
            tracing::info!("Removed {name}");
        }
        report.removed.push((name, result));
    }
    Ok(report)
}
