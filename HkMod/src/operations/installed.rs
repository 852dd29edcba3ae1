//! Mods already present in the Mods directory

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Custom Knight keeps user skins inside its mod directory.
pub const CUSTOM_KNIGHT: &str = "Custom Knight";

/// Directory the mod loader uses for disabled mods; not a mod itself.
pub const DISABLED_DIR: &str = "Disabled";

/// Names of the installed mods: the subdirectories of `mods_dir`, sorted.
pub fn installed_mods(mods_dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(mods_dir).map_err(Error::InstalledMods)? {
        let entry = entry.map_err(Error::InstalledMods)?;
        if !entry.file_type().map_err(Error::InstalledMods)?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.trim().eq_ignore_ascii_case(DISABLED_DIR) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Remove the installed copy of `name`, if any.
///
/// For [`CUSTOM_KNIGHT`] only the top-level DLLs go, so installed skins survive
/// a reinstall.
pub fn remove_previous_version(mods_dir: &Path, name: &str) -> Result<()> {
    let mod_dir = mods_dir.join(name);
    if name == CUSTOM_KNIGHT {
        return remove_dlls(&mod_dir).map_err(|source| Error::Remove {
            name: name.to_string(),
            source,
        });
    }

    match fs::remove_dir_all(&mod_dir) {
        Ok(()) => {
            tracing::debug!("Removed {}", mod_dir.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::Remove {
            name: name.to_string(),
            source,
        }),
    }
}

fn remove_dlls(mod_dir: &Path) -> io::Result<()> {
    let entries = match fs::read_dir(mod_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let is_dll = path.extension().is_some_and(|ext| ext == "dll");
        if !is_dll || !entry.file_type()?.is_file() {
            continue;
        }
        if let Err(e) = fs::remove_file(&path) {
            tracing::warn!("Could not remove {}: {e}", path.display());
        }
    }
    Ok(())
}
