//! `ModLinks` document reading

use super::document::{Link, Manifest, Platform};
use crate::error::FormatError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse a full catalog document into its manifests, in document order.
///
/// The root element's name is not checked; every `<Manifest>` block is a record.
///
/// # Errors
/// Returns [`FormatError`] if the document is not UTF-8, is not well-formed XML, or
/// ends inside a manifest block.
pub fn parse_catalog(document: &[u8]) -> Result<Vec<Manifest>, FormatError> {
    let content = std::str::from_utf8(document)?;
    read_manifests(content)
}

/// Parse a single `<Manifest>` block, as found by the patcher.
///
/// # Errors
/// Returns [`FormatError`] if the block is malformed or contains no manifest.
pub fn parse_manifest(block: &[u8]) -> Result<Manifest, FormatError> {
    let content = std::str::from_utf8(block)?;
    read_manifests(content)?
        .into_iter()
        .next()
        .ok_or_else(|| FormatError::Structure("no <Manifest> element found".to_string()))
}

fn read_manifests(content: &str) -> Result<Vec<Manifest>, FormatError> {
    let mut reader = Reader::from_str(content);

    let mut buf = Vec::new();
    let mut manifests = Vec::new();
    let mut current: Option<ManifestBuilder> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if let Some(builder) = current.as_mut() {
                    builder.start(&e)?;
                } else if e.name().as_ref() == b"Manifest" {
                    current = Some(ManifestBuilder::default());
                }
            }
            Event::Empty(e) => {
                if let Some(builder) = current.as_mut() {
                    builder.start(&e)?;
                    builder.end();
                } else if e.name().as_ref() == b"Manifest" {
                    manifests.push(Manifest::default());
                }
            }
            Event::Text(t) => {
                if let Some(builder) = current.as_mut() {
                    builder.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(builder) = current.as_mut() {
                    builder.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                if let Some(builder) = current.as_mut() {
                    if builder.path.is_empty() {
                        // Closing </Manifest>
                        if let Some(done) = current.take() {
                            manifests.push(done.manifest);
                        }
                    } else {
                        builder.end();
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if current.is_some() {
        return Err(FormatError::Structure(
            "document ended inside a <Manifest> block".to_string(),
        ));
    }

    Ok(manifests)
}

/// Accumulates one manifest while its child elements stream past.
#[derive(Default)]
struct ManifestBuilder {
    manifest: Manifest,
    /// Open elements below `<Manifest>`.
    path: Vec<String>,
    /// Character data since the last tag.
    text: String,
    /// `SHA256` attribute of the link element being read.
    sha256: String,
}

impl ManifestBuilder {
    fn start(&mut self, e: &BytesStart) -> Result<(), FormatError> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        self.sha256.clear();
        for attr in e.attributes() {
            let attr = attr?;
            if attr.key.as_ref() == b"SHA256" {
                self.sha256 = attr.unescape_value()?.into_owned();
            }
        }
        self.path.push(name);
        self.text.clear();
        Ok(())
    }

    fn end(&mut self) {
        let text = std::mem::take(&mut self.text);
        let path: Vec<&str> = self.path.iter().map(String::as_str).collect();

        let m = &mut self.manifest;
        match path.as_slice() {
            ["Name"] => m.name = text.trim().to_string(),
            ["Description"] => m.description = text,
            ["Version"] => m.version = text.trim().to_string(),
            ["Repository"] => {
                let repository = text.trim();
                m.repository = (!repository.is_empty()).then(|| repository.to_string());
            }
            ["Link"] => {
                m.link = Some(Link::new(text.trim(), std::mem::take(&mut self.sha256)));
            }
            ["Links"] => {
                m.platform_links.get_or_insert_with(Default::default);
            }
            ["Links", os] => {
                let platform = match *os {
                    "Windows" => Some(Platform::Windows),
                    "Mac" => Some(Platform::Mac),
                    "Linux" => Some(Platform::Linux),
                    _ => None,
                };
                if let Some(platform) = platform {
                    let links = m.platform_links.get_or_insert_with(Default::default);
                    *links.get_mut(platform) =
                        Link::new(text.trim(), std::mem::take(&mut self.sha256));
                }
            }
            ["Dependencies"] => {
                m.dependencies.get_or_insert_with(Vec::new);
            }
            ["Dependencies", "Dependency"] => {
                m.dependencies
                    .get_or_insert_with(Vec::new)
                    .push(text.trim().to_string());
            }
            _ => {}
        }

        self.path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CATALOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ModLinks xmlns="https://github.com/HollowKnight-Modding/HollowKnight.ModLinks/HollowKnight.ModManager">
    <Manifest>
        <Name>Vasi</Name>
        <Description>A library for mods.</Description>
        <Version>0.1.0.0</Version>
        <Link SHA256="2f6e0b1c">
            <![CDATA[https://github.com/fifty-six/HollowKnight.Vasi/releases/download/v0.1/Vasi.zip]]>
        </Link>
        <Dependencies />
        <Repository><![CDATA[https://github.com/fifty-six/HollowKnight.Vasi]]></Repository>
    </Manifest>
    <!-- platform-specific builds -->
    <Manifest>
        <Name>Satchel &amp; Friends</Name>
        <Description>Multi-line
description</Description>
        <Version>1.2.3.0</Version>
        <Links>
            <Windows SHA256="aa"><![CDATA[https://example.com/win/Satchel.zip]]></Windows>
            <Mac SHA256="bb"><![CDATA[https://example.com/mac/Satchel.zip]]></Mac>
            <Linux SHA256="cc"><![CDATA[https://example.com/linux/Satchel.zip]]></Linux>
        </Links>
        <Dependencies>
            <Dependency>Vasi</Dependency>
            <Dependency>
                Benchwarp
            </Dependency>
        </Dependencies>
    </Manifest>
</ModLinks>
"#;

    #[test]
    fn test_parse_catalog() {
        let manifests = parse_catalog(CATALOG.as_bytes()).unwrap();
        assert_eq!(manifests.len(), 2);

        let vasi = &manifests[0];
        assert_eq!(vasi.name, "Vasi");
        assert_eq!(vasi.version, "0.1.0.0");
        assert_eq!(
            vasi.link,
            Some(Link::new(
                "https://github.com/fifty-six/HollowKnight.Vasi/releases/download/v0.1/Vasi.zip",
                "2f6e0b1c"
            ))
        );
        assert_eq!(vasi.dependencies, Some(Vec::new()));
        assert_eq!(
            vasi.repository.as_deref(),
            Some("https://github.com/fifty-six/HollowKnight.Vasi")
        );
        assert_eq!(vasi.platform_links, None);

        let satchel = &manifests[1];
        assert_eq!(satchel.name, "Satchel & Friends");
        assert_eq!(satchel.description, "Multi-line\ndescription");
        assert_eq!(satchel.link, None);
        let links = satchel.platform_links.as_ref().unwrap();
        assert_eq!(links.mac, Link::new("https://example.com/mac/Satchel.zip", "bb"));
        assert_eq!(links.get(Platform::Linux).sha256, "cc");
        assert_eq!(
            satchel.dependencies,
            Some(vec!["Vasi".to_string(), "Benchwarp".to_string()])
        );
        assert_eq!(satchel.repository, None);
    }

    #[test]
    fn test_missing_dependencies_element_is_unspecified() {
        let block = b"<Manifest><Name>Solo</Name><Version>1.0</Version></Manifest>";
        let manifest = parse_manifest(block).unwrap();
        assert_eq!(manifest.name, "Solo");
        assert_eq!(manifest.dependencies, None);
        assert_eq!(manifest.link, None);
    }

    #[test]
    fn test_truncated_document_is_format_error() {
        let truncated = &CATALOG[..CATALOG.find("</Manifest>").unwrap()];
        assert!(parse_catalog(truncated.as_bytes()).is_err());
    }

    #[test]
    fn test_mismatched_tags_are_format_error() {
        let bad = b"<ModLinks><Manifest><Name>X</Version></Manifest></ModLinks>";
        assert!(matches!(parse_catalog(bad), Err(FormatError::Xml(_))));
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let bad = b"<ModLinks><Manifest><Name>\xff</Name></Manifest></ModLinks>";
        assert!(matches!(parse_catalog(bad), Err(FormatError::Utf8(_))));
    }

    #[test]
    fn test_parse_manifest_requires_a_manifest() {
        assert!(parse_manifest(b"<Other/>").is_err());
    }
}
