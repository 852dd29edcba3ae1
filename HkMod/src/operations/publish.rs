//! Publishing a mod release to a ModLinks file
//!
//! The release is described by the URL of its file plus optional overrides.
//! Anything not given is derived from the URL, and the file is downloaded once
//! to compute its hash. The ModLinks file is then patched in place: only the
//! block for this mod changes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use modlinks::Transport;
use modlinks::catalog::{Link, Manifest};
use modlinks::error::TransportError;
use modlinks::patcher::{apply, manifest_spans};
use regex::Regex;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

static VERSION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/v([0-9]+(?:\.[0-9]+)*)/").expect("version segment pattern is valid")
});

/// Number of components in a catalog version.
const VERSION_COMPONENTS: usize = 4;

/// Dependency list value meaning "this mod has no dependencies".
pub const NO_DEPENDENCIES: &str = "none";

/// What to publish. Empty strings count as not given.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// URL of the released mod file.
    pub url: String,
    /// The ModLinks file to patch.
    pub modlinks_path: PathBuf,
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    /// Comma-separated names, or [`NO_DEPENDENCIES`].
    pub dependencies: Option<String>,
    pub repository: Option<String>,
}

/// What a publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub name: String,
    pub version: String,
    /// `true` if the mod was new to the file, `false` if its entry was updated.
    pub added: bool,
}

/// The URL's last path segment without its extension.
pub fn derive_name(url: &str) -> Option<String> {
    let base = url.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    let stem = match base.rfind('.') {
        Some(dot) => &base[..dot],
        None => base,
    };
    (!stem.is_empty()).then(|| stem.to_string())
}

/// The version in a `/v1.2.3/` URL segment.
pub fn derive_version(url: &str) -> Option<String> {
    VERSION_SEGMENT
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extend a dotted version with zeros to four components.
pub fn pad_version(version: &str) -> String {
    let mut parts: Vec<&str> = version.split('.').collect();
    while parts.len() < VERSION_COMPONENTS {
        parts.push("0");
    }
    parts.join(".")
}

/// Interpret the dependency option.
///
/// Not given leaves existing dependencies alone, [`NO_DEPENDENCIES`] clears
/// them, and anything else is a comma-separated list.
pub fn parse_dependencies(deps: Option<&str>) -> Option<Vec<String>> {
    match deps {
        None | Some("") => None,
        Some(NO_DEPENDENCIES) => Some(Vec::new()),
        Some(list) => Some(list.split(',').map(ToString::to_string).collect()),
    }
}

/// SHA-256 of the file at `url`, as lowercase hex. The body is hashed as it streams in.
pub fn sha256_of_url<T: Transport + ?Sized>(transport: &T, url: &str) -> Result<String> {
    let mut response = transport.get(url)?.error_for_status(url)?;
    let mut hasher = Sha256::new();
    io::copy(&mut response.body, &mut hasher).map_err(|source| TransportError::Body {
        url: url.to_string(),
        source,
    })?;
    Ok(hex::encode(hasher.finalize()))
}

fn given(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Build the patch for `opts`: name, version and hash filled in.
pub fn build_patch<T: Transport + ?Sized>(opts: &PublishOptions, transport: &T) -> Result<Manifest> {
    if opts.url.is_empty() {
        return Err(Error::Publish {
            name: given(opts.name.as_ref()).unwrap_or_default().to_string(),
            reason: "no mod file URL specified".to_string(),
        });
    }

    let name = match given(opts.name.as_ref()) {
        Some(name) => name.to_string(),
        None => derive_name(&opts.url).ok_or_else(|| Error::Publish {
            name: opts.url.clone(),
            reason: "name could not be determined from URL".to_string(),
        })?,
    };
    let wrap = |e: Error| Error::Publish {
        name: name.clone(),
        reason: e.to_string(),
    };

    let version = match given(opts.version.as_ref()) {
        Some(version) => version.to_string(),
        None => derive_version(&opts.url).ok_or_else(|| Error::Publish {
            name: name.clone(),
            reason: "version could not be determined from URL".to_string(),
        })?,
    };

    let sha256 = sha256_of_url(transport, &opts.url).map_err(wrap)?;
    tracing::debug!("{} has SHA-256 {sha256}", opts.url);

    Ok(Manifest {
        name: name.clone(),
        description: given(opts.description.as_ref()).unwrap_or_default().to_string(),
        version: pad_version(&version),
        link: Some(Link::new(opts.url.as_str(), sha256)),
        platform_links: None,
        dependencies: parse_dependencies(opts.dependencies.as_deref()),
        repository: given(opts.repository.as_ref()).map(ToString::to_string),
    })
}

/// Publish a release: add it to the ModLinks file, or update the mod's entry.
///
/// # Errors
/// [`Error::Publish`] naming the mod, whatever went wrong.
pub fn publish<T: Transport + ?Sized>(opts: &PublishOptions, transport: &T) -> Result<PublishOutcome> {
    let patch = build_patch(opts, transport)?;
    let wrap = |e: Error| Error::Publish {
        name: patch.name.clone(),
        reason: e.to_string(),
    };

    let document = fs::read(&opts.modlinks_path).map_err(|e| wrap(e.into()))?;
    let updated = apply(&document, &patch.name, &patch).map_err(|e| wrap(e.into()))?;
    let added = manifest_spans(&updated).len() > manifest_spans(&document).len();
    replace_file(&opts.modlinks_path, &updated).map_err(|e| wrap(e.into()))?;

    Ok(PublishOutcome {
        name: patch.name,
        version: patch.version,
        added,
    })
}

/// Write `content` to `path` through a temporary file in the same directory.
fn replace_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = NamedTempFile::new_in(dir)?;
    io::Write::write_all(&mut temp, content)?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions)?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryTransport, sha256_hex};
    use modlinks::catalog::parse_catalog;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const MODLINKS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ModLinks xmlns="https://github.com/HollowKnight-Modding/HollowKnight.ModLinks/HollowKnight.ModManager">
    <!-- Keep sorted -->
    <Manifest>
        <Name>Benchwarp</Name>
        <Description>Teleport between benches</Description>
        <Version>3.0.0.0</Version>
        <Link SHA256="aa"><![CDATA[https://example.com/v3.0/Benchwarp.zip]]></Link>
        <Dependencies>
            <Dependency>Vasi</Dependency>
        </Dependencies>
        <Repository><![CDATA[https://github.com/homothetyhk/Benchwarp]]></Repository>
    </Manifest>
</ModLinks>
"#;

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ModLinks.xml");
        fs::write(&path, MODLINKS).unwrap();
        (dir, path)
    }

    #[test]
    fn test_derive_name() {
        assert_eq!(
            derive_name("https://github.com/a/b/releases/download/v1.2/MyMod.zip").as_deref(),
            Some("MyMod")
        );
        assert_eq!(derive_name("https://example.com/files/Tool.v2.dll").as_deref(), Some("Tool.v2"));
        assert_eq!(derive_name("https://example.com/.zip"), None);
    }

    #[test]
    fn test_derive_and_pad_version() {
        assert_eq!(
            derive_version("https://github.com/a/b/releases/download/v1.2/MyMod.zip").as_deref(),
            Some("1.2")
        );
        assert_eq!(derive_version("https://example.com/1.2/MyMod.zip"), None);
        assert_eq!(derive_version("https://example.com/v1.2-beta/MyMod.zip"), None);
        assert_eq!(pad_version("1.2"), "1.2.0.0");
        assert_eq!(pad_version("1.2.3.4.5"), "1.2.3.4.5");
    }

    #[test]
    fn test_parse_dependencies() {
        assert_eq!(parse_dependencies(None), None);
        assert_eq!(parse_dependencies(Some("")), None);
        assert_eq!(parse_dependencies(Some("none")), Some(vec![]));
        assert_eq!(
            parse_dependencies(Some("Vasi,Satchel")),
            Some(vec!["Vasi".to_string(), "Satchel".to_string()])
        );
    }

    #[test]
    fn test_publish_update() {
        let (_dir, path) = setup();
        let url = "https://example.com/v3.1/Benchwarp.zip";
        let transport = MemoryTransport::default().serve(url, b"new release");

        let outcome = publish(
            &PublishOptions {
                url: url.to_string(),
                modlinks_path: path.clone(),
                dependencies: Some("none".to_string()),
                ..Default::default()
            },
            &transport,
        )
        .unwrap();
        assert_eq!(
            outcome,
            PublishOutcome {
                name: "Benchwarp".to_string(),
                version: "3.1.0.0".to_string(),
                added: false,
            }
        );

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("<!-- Keep sorted -->"));
        let catalog = parse_catalog(content.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        let record = &catalog[0];
        assert_eq!(record.version, "3.1.0.0");
        assert_eq!(record.description, "Teleport between benches");
        assert_eq!(record.dependencies, Some(vec![]));
        assert_eq!(
            record.link,
            Some(Link::new(url, sha256_hex(b"new release")))
        );
    }

    #[test]
    fn test_publish_new_mod() {
        let (_dir, path) = setup();
        let url = "https://example.com/releases/v0.4/Satchel.dll";
        let transport = MemoryTransport::default().serve(url, b"satchel");

        let outcome = publish(
            &PublishOptions {
                url: url.to_string(),
                modlinks_path: path.clone(),
                description: Some("Library mod".to_string()),
                repository: Some("https://github.com/example/Satchel".to_string()),
                ..Default::default()
            },
            &transport,
        )
        .unwrap();
        assert!(outcome.added);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(&MODLINKS[..MODLINKS.find("</ModLinks>").unwrap() - 1]));
        let catalog = parse_catalog(content.as_bytes()).unwrap();
        let names: Vec<&str> = catalog.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Benchwarp", "Satchel"]);
        assert_eq!(catalog[1].version, "0.4.0.0");
        assert_eq!(catalog[1].dependencies, None);
    }

    #[test]
    fn test_publish_errors() {
        let (_dir, path) = setup();
        let transport = MemoryTransport::default();

        let err = publish(
            &PublishOptions {
                url: "https://example.com/latest/Mod.zip".to_string(),
                modlinks_path: path.clone(),
                ..Default::default()
            },
            &transport,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "publish \"Mod\": version could not be determined from URL"
        );

        let err = publish(
            &PublishOptions {
                url: "https://example.com/v1.0/Mod.zip".to_string(),
                modlinks_path: path.clone(),
                ..Default::default()
            },
            &MemoryTransport::default().fail("https://example.com/v1.0/Mod.zip", 404),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("publish \"Mod\": "), "{err}");
        assert!(err.to_string().contains("response status was 404"), "{err}");

        assert_eq!(fs::read_to_string(&path).unwrap(), MODLINKS);
        assert_eq!(transport.request_count(), 0);
    }
}
