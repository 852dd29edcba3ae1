//! Installing mods from the catalog
//!
//! Every requested name is resolved on its own and every record is installed on
//! its own: a failure is recorded in the report and the batch moves on.

use std::path::Path;

use modlinks::cache::{ContentCache, FetchProgress, select_link};
use modlinks::catalog::{Manifest, Platform};
use modlinks::closure::closure;
use modlinks::error::{MissingDependencies, ResolveError};
use modlinks::resolver::resolve;
use modlinks::Transport;

use super::extraction::{ExtractResult, check_component, copy_file, extract_zip};
use super::installed::remove_previous_version;
use crate::error::Result;

/// Progress callback for installs: the mod being fetched, and how far along it is.
pub type InstallProgressCallback<'a> = &'a (dyn Fn(&str, &FetchProgress) + Sync + Send);

/// Where and how to install.
#[derive(Debug, Clone, Copy)]
pub struct InstallTarget<'a> {
    /// `<install dir>/Mods`
    pub mods_dir: &'a Path,
    pub cache: &'a ContentCache,
    /// Platform to pick per-platform links for; `None` if the host has none.
    pub platform: Option<Platform>,
}

/// A mod that made it into the Mods directory.
#[derive(Debug, Clone)]
pub struct InstalledMod {
    pub name: String,
    pub version: String,
    pub extracted: ExtractResult,
}

/// Outcome of an install batch.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Requested names that did not resolve to a single catalog entry.
    pub unresolved: Vec<ResolveError>,
    /// Names (requested or depended on) absent from the catalog.
    pub missing: Option<MissingDependencies>,
    /// One entry per record in the dependency closure, in install order.
    pub results: Vec<(String, Result<InstalledMod>)>,
}

impl InstallReport {
    /// Whether everything requested was installed.
    pub fn is_success(&self) -> bool {
        self.unresolved.is_empty()
            && self.missing.is_none()
            && self.results.iter().all(|(_, r)| r.is_ok())
    }

    pub fn installed(&self) -> impl Iterator<Item = &InstalledMod> {
        self.results.iter().filter_map(|(_, r)| r.as_ref().ok())
    }
}

/// Install the mods named by `requested` and everything they depend on.
pub fn install<T: Transport + ?Sized>(
    catalog: &[Manifest],
    requested: &[String],
    target: InstallTarget,
    transport: &T,
    progress: InstallProgressCallback,
) -> InstallReport {
    let mut report = InstallReport::default();

    let names: Vec<&str> = catalog.iter().map(|m| m.name.as_str()).collect();
    let mut resolved = Vec::with_capacity(requested.len());
    for request in requested {
        match resolve(&names, request) {
            Ok(name) => resolved.push(name),
            Err(e) => report.unresolved.push(e),
        }
    }

    let needed = closure(catalog, &resolved);
    report.missing = needed.missing_error();

    for record in &needed.records {
        let result = install_one(record, target, transport, progress);
        match &result {
            Ok(installed) => tracing::info!("Installed {} {}", installed.name, installed.version),
            Err(e) => tracing::debug!("Install of {} failed: {e}", record.name),
        }
        report.results.push((record.name.clone(), result));
    }

    report
}

fn install_one<T: Transport + ?Sized>(
    record: &Manifest,
    target: InstallTarget,
    transport: &T,
    progress: InstallProgressCallback,
) -> Result<InstalledMod> {
    let name = record.name.as_str();
    check_component(name, "contains path separator", name)?;
    let link = select_link(record, target.platform)?;
    let file_name = link.file_name();
    check_component(file_name, "filename contains path separator", name)?;

    let file = target.cache.fetch_with_progress(record, target.platform, transport, &|p| {
        progress(name, p);
    })?;

    remove_previous_version(target.mods_dir, name)?;
    let extracted = if file.is_zip() {
        extract_zip(file, name, target.mods_dir)?
    } else {
        copy_file(file, file_name, name, target.mods_dir)?
    };

    Ok(InstalledMod {
        name: name.to_string(),
        version: record.version.clone(),
        extracted,
    })
}
