//! Placing mod files under the Mods directory
//!
//! A mod always lives in `<Mods>/<name>/`. Archives are unpacked there; any
//! other file is copied there under its own file name.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::{Error, Result};

/// Files written by an extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    /// `<Mods>/<name>`
    pub mod_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Reject names that cannot be used as a single directory or file name.
pub fn check_component(name: &str, what: &'static str, owner: &str) -> Result<()> {
    if name.is_empty() || name.contains(std::path::is_separator) || name == "." || name == ".." {
        return Err(Error::UnsafeName {
            name: owner.to_string(),
            reason: what,
        });
    }
    Ok(())
}

/// Unpack a ZIP archive into `<mods_dir>/<name>/`.
///
/// Entries whose path would leave the mod directory fail the whole extraction.
pub fn extract_zip<R: Read + Seek>(reader: R, name: &str, mods_dir: &Path) -> Result<ExtractResult> {
    check_component(name, "contains path separator", name)?;
    let wrap = |reason: String| Error::Extract {
        name: name.to_string(),
        reason,
    };

    let mod_dir = mods_dir.join(name);
    let mut archive = ZipArchive::new(reader).map_err(|e| wrap(e.to_string()))?;
    let mut files = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| wrap(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(wrap(format!(
                "entry {:?} points outside the mod directory",
                entry.name()
            )));
        };
        let dest = mod_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest).map_err(|e| wrap(e.to_string()))?;
            continue;
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| wrap(e.to_string()))?;
        }
        let mut out = File::create(&dest).map_err(|e| wrap(e.to_string()))?;
        io::copy(&mut entry, &mut out).map_err(|e| wrap(e.to_string()))?;
        files.push(dest);
    }

    tracing::debug!("Extracted {} files for {name}", files.len());
    Ok(ExtractResult { mod_dir, files })
}

/// Copy a single file (usually a DLL) to `<mods_dir>/<name>/<file_name>`.
pub fn copy_file<R: Read + Seek>(
    mut reader: R,
    file_name: &str,
    name: &str,
    mods_dir: &Path,
) -> Result<ExtractResult> {
    check_component(name, "contains path separator", name)?;
    check_component(file_name, "filename contains path separator", name)?;
    let wrap = |e: io::Error| Error::Extract {
        name: name.to_string(),
        reason: e.to_string(),
    };

    let mod_dir = mods_dir.join(name);
    let dest = mod_dir.join(file_name);
    fs::create_dir_all(&mod_dir).map_err(wrap)?;
    reader.seek(SeekFrom::Start(0)).map_err(wrap)?;
    let mut out = File::create(&dest).map_err(wrap)?;
    io::copy(&mut reader, &mut out).map_err(wrap)?;

    Ok(ExtractResult {
        mod_dir,
        files: vec![dest],
    })
}
