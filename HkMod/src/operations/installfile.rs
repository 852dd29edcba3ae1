//! Installing a mod file that is not in the catalog
//!
//! Used for test builds and private mods. There is no hash to check against,
//! so the file is installed as-is.

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use modlinks::Transport;
use modlinks::catalog::Link;
use modlinks::error::TransportError;

use super::extraction::{ExtractResult, copy_file, extract_zip};
use crate::error::Result;

/// Whether `source` names a URL rather than a local path.
pub fn is_url(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Install `source` (a local path or an `http(s)` URL) as mod `name`.
///
/// `.zip` sources are unpacked; anything else is copied under its file name.
pub fn install_file<T: Transport + ?Sized>(
    name: &str,
    source: &str,
    mods_dir: &Path,
    transport: &T,
) -> Result<ExtractResult> {
    let (mut file, file_name) = if is_url(source) {
        let link = Link::new(source, "");
        (download(source, transport)?, link.file_name().to_string())
    } else {
        let path = Path::new(source);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (File::open(path)?, file_name)
    };
    file.seek(SeekFrom::Start(0))?;

    let extracted = if Path::new(&file_name)
        .extension()
        .is_some_and(|ext| ext == "zip")
    {
        extract_zip(file, name, mods_dir)?
    } else {
        copy_file(file, &file_name, name, mods_dir)?
    };
    tracing::info!("Installed {name} from {source}");
    Ok(extracted)
}

/// Stream a URL into an anonymous temporary file.
fn download<T: Transport + ?Sized>(url: &str, transport: &T) -> Result<File> {
    let mut response = transport.get(url)?.error_for_status(url)?;
    let mut file = tempfile::tempfile()?;
    std::io::copy(&mut response.body, &mut file).map_err(|source| TransportError::Body {
        url: url.to_string(),
        source,
    })?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryTransport, zip_bytes};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/Mod.zip"));
        assert!(is_url("HTTP://example.com/Mod.dll"));
        assert!(!is_url("./builds/Mod.dll"));
        assert!(!is_url("ftp://example.com/Mod.dll"));
    }

    #[test]
    fn test_install_local_dll() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("MyMod.dll");
        fs::write(&source, "dll").unwrap();
        let mods_dir = dir.path().join("Mods");

        let result = install_file(
            "My Mod",
            source.to_str().unwrap(),
            &mods_dir,
            &MemoryTransport::default(),
        )
        .unwrap();
        assert_eq!(result.files, vec![mods_dir.join("My Mod").join("MyMod.dll")]);
        assert_eq!(fs::read(&result.files[0]).unwrap(), b"dll");
    }

    #[test]
    fn test_install_zip_from_url() {
        let dir = TempDir::new().unwrap();
        let archive = zip_bytes(&[("Inner/Mod.dll", b"inner".as_slice())]);
        let transport = MemoryTransport::default().serve("https://example.com/v2/Mod.zip", &archive);

        let result = install_file("Mod", "https://example.com/v2/Mod.zip", dir.path(), &transport).unwrap();
        assert_eq!(result.files, vec![dir.path().join("Mod").join("Inner").join("Mod.dll")]);
    }

    #[test]
    fn test_install_from_missing_url() {
        let dir = TempDir::new().unwrap();
        let transport = MemoryTransport::default().fail("https://example.com/Mod.dll", 500);
        let err = install_file("Mod", "https://example.com/Mod.dll", dir.path(), &transport).unwrap_err();
        assert!(err.to_string().contains("response status was 500"));
        assert!(!dir.path().join("Mod").exists());
    }
}
