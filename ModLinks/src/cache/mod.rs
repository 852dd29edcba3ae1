//! Hash-verified content cache
//!
//! Mod files are kept under a cache root as `<name><ext>`, where the extension
//! comes from the link URL. The catalog's SHA-256 is the only authority: an entry
//! is used only when its content hashes to the declared digest, and a download
//! only becomes an entry once it does.

mod progress;

pub use progress::{FetchPhase, FetchProgress, FetchProgressCallback};

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::catalog::{Link, Manifest, Platform};
use crate::error::{FetchError, TransportError};
use crate::transport::Transport;

const CHUNK_SIZE: usize = 8192;

/// Link extension of files that are unpacked rather than copied.
const ZIP_EXTENSION: &str = ".zip";

/// Choose the link to download for `record` on `platform`.
///
/// A default link with a hash always wins. Otherwise the platform's own link is
/// used, if it has a hash. `platform` is `None` when the host is none of the
/// platforms the catalog knows about.
///
/// # Errors
/// [`FetchError::UnsupportedPlatform`] when a platform link is needed but the host
/// has no platform, [`FetchError::NoLinkForPlatform`] when no usable link exists.
pub fn select_link(record: &Manifest, platform: Option<Platform>) -> Result<&Link, FetchError> {
    if let Some(link) = record.link.as_ref().filter(|l| l.is_usable()) {
        return Ok(link);
    }

    let Some(platform) = platform else {
        return Err(FetchError::UnsupportedPlatform {
            os: std::env::consts::OS.to_string(),
        });
    };

    record
        .platform_links
        .as_ref()
        .map(|links| links.get(platform))
        .filter(|link| link.is_usable())
        .ok_or_else(|| FetchError::NoLinkForPlatform {
            platform: platform.to_string(),
        })
}

/// A verified mod file, open and positioned at its start.
#[derive(Debug)]
pub struct CachedFile {
    file: File,
    path: PathBuf,
    size: u64,
    is_zip: bool,
}

impl CachedFile {
    fn open(mut file: File, path: PathBuf, link: &Link) -> io::Result<Self> {
        let size = file.metadata()?.len();
        file.seek(SeekFrom::Start(0))?;
        let is_zip = link.extension() == ZIP_EXTENSION;

        Ok(Self {
            file,
            path,
            size,
            is_zip,
        })
    }

    /// Location of the cache entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the link names a `.zip` archive (as opposed to a bare file such as a DLL).
    #[must_use]
    pub fn is_zip(&self) -> bool {
        self.is_zip
    }

    #[must_use]
    pub fn into_file(self) -> File {
        self.file
    }
}

impl Read for CachedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for CachedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

/// Directory of verified mod files.
#[derive(Debug, Clone)]
pub struct ContentCache {
    root: PathBuf,
}

impl ContentCache {
    /// A cache rooted at `root`. The directory is created on first download.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for `name` downloaded from `link`.
    #[must_use]
    pub fn entry_path(&self, name: &str, link: &Link) -> PathBuf {
        self.root.join(format!("{name}{}", link.extension()))
    }

    /// Produce a verified file for `record`, downloading it only if needed.
    ///
    /// # Errors
    /// See [`FetchError`].
    pub fn fetch<T: Transport + ?Sized>(
        &self,
        record: &Manifest,
        platform: Option<Platform>,
        transport: &T,
    ) -> Result<CachedFile, FetchError> {
        self.fetch_with_progress(record, platform, transport, &|_| {})
    }

    /// Like [`fetch`](Self::fetch), reporting progress through `progress`.
    ///
    /// # Errors
    /// See [`FetchError`].
    pub fn fetch_with_progress<T: Transport + ?Sized>(
        &self,
        record: &Manifest,
        platform: Option<Platform>,
        transport: &T,
        progress: FetchProgressCallback,
    ) -> Result<CachedFile, FetchError> {
        check_entry_name(&record.name)?;
        let link = select_link(record, platform)?;
        let expected = decode_digest(link)?;
        let path = self.entry_path(&record.name, link);

        progress(&FetchProgress::new(FetchPhase::CheckingCache, 0, None));
        if let Some(file) = lookup(&path, &expected)? {
            tracing::debug!("Cache hit for {} at {}", record.name, path.display());
            let cached =
                CachedFile::open(file, path.clone(), link).map_err(|e| io_error(&path, e))?;
            progress(&FetchProgress::new(
                FetchPhase::CacheHit,
                cached.size(),
                Some(cached.size()),
            ));
            return Ok(cached);
        }

        tracing::debug!("Cache miss for {}, downloading {}", record.name, link.url);
        let cached = self.download(link, &expected, &path, transport, progress)?;
        progress(&FetchProgress::new(
            FetchPhase::Complete,
            cached.size(),
            Some(cached.size()),
        ));
        Ok(cached)
    }

    /// Stream `link` into a temporary file, then move it into place if it verifies.
    fn download<T: Transport + ?Sized>(
        &self,
        link: &Link,
        expected: &[u8],
        path: &Path,
        transport: &T,
        progress: FetchProgressCallback,
    ) -> Result<CachedFile, FetchError> {
        let url = link.url.as_str();
        let response = transport.get(url)?.error_for_status(url)?;
        let total = response.content_length;
        let mut body = response.body;

        fs::create_dir_all(&self.root).map_err(|e| io_error(&self.root, e))?;
        let mut temp = NamedTempFile::new_in(&self.root).map_err(|e| io_error(&self.root, e))?;

        let mut hasher = Sha256::new();
        let mut buf = [0u8; CHUNK_SIZE];
        let mut received: u64 = 0;
        progress(&FetchProgress::new(FetchPhase::Downloading, 0, total));
        loop {
            let n = match body.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(TransportError::Body {
                        url: url.to_string(),
                        source,
                    }
                    .into());
                }
            };
            hasher.update(&buf[..n]);
            temp.write_all(&buf[..n])
                .map_err(|e| io_error(temp.path(), e))?;
            received += n as u64;
            progress(&FetchProgress::new(FetchPhase::Downloading, received, total));
        }

        let actual = hasher.finalize();
        if actual.as_slice() != expected {
            // `temp` is deleted on drop, so nothing lands at the entry path.
            return Err(FetchError::Integrity {
                url: url.to_string(),
                reason: format!(
                    "expected SHA-256 {}, got {}",
                    hex::encode(expected),
                    hex::encode(actual)
                ),
            });
        }

        let file = temp
            .persist(path)
            .map_err(|e| io_error(path, e.error))?;
        tracing::debug!("Stored {} ({} bytes) at {}", url, received, path.display());
        CachedFile::open(file, path.to_path_buf(), link).map_err(|e| io_error(path, e))
    }
}

/// Reject record names that would put the entry outside the cache root.
fn check_entry_name(name: &str) -> Result<(), FetchError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(std::path::is_separator) {
        return Err(FetchError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Open the entry at `path` if its content matches `expected`.
///
/// A mismatched entry is removed so it cannot be mistaken for a good one.
fn lookup(path: &Path, expected: &[u8]) -> Result<Option<File>, FetchError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, e)),
    };

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| io_error(path, e))?;
    if hasher.finalize().as_slice() == expected {
        return Ok(Some(file));
    }

    tracing::debug!("Stale cache entry {}, discarding", path.display());
    drop(file);
    fs::remove_file(path).map_err(|e| io_error(path, e))?;
    Ok(None)
}

fn decode_digest(link: &Link) -> Result<Vec<u8>, FetchError> {
    let invalid = |reason: String| FetchError::Integrity {
        url: link.url.clone(),
        reason,
    };
    let digest = hex::decode(link.sha256.trim())
        .map_err(|e| invalid(format!("invalid SHA-256 {:?}: {e}", link.sha256)))?;
    if digest.len() != Sha256::output_size() {
        return Err(invalid(format!(
            "invalid SHA-256 {:?}: expected {} bytes, got {}",
            link.sha256,
            Sha256::output_size(),
            digest.len()
        )));
    }
    Ok(digest)
}

fn io_error(path: &Path, source: io::Error) -> FetchError {
    FetchError::Io {
        path: path.to_path_buf(),
        source,
    }
}
