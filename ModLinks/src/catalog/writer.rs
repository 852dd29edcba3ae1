//! `ModLinks` document writing
//!
//! Output mirrors the layout of the community-maintained file: four spaces per
//! nesting level, one element per line, text kept on the element's line.

use super::document::{Link, Manifest, Platform};
use crate::error::FormatError;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

const INDENT: usize = 4;
const ROOT: &str = "ModLinks";
const NAMESPACE: &str =
    "https://github.com/HollowKnight-Modding/HollowKnight.ModLinks/HollowKnight.ModManager";

/// Serialize one manifest as a block indented one level, ready to sit inside the root element.
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_manifest(manifest: &Manifest) -> Result<Vec<u8>, FormatError> {
    let mut output = Vec::new();
    {
        let mut writer = Writer::new_with_indent(&mut output, b' ', INDENT);
        // Open (but never close) a root so the block gets its nesting level.
        writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
        write_manifest(&mut writer, manifest)?;
    }

    // Drop "<ModLinks>\n"; what's left starts with the block's indentation.
    let start = output.iter().position(|&b| b == b'\n').map_or(0, |i| i + 1);
    Ok(output.split_off(start))
}

/// Serialize a whole catalog document.
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_catalog(manifests: &[Manifest]) -> Result<Vec<u8>, FormatError> {
    let mut output = Vec::new();
    let mut writer = Writer::new_with_indent(&mut output, b' ', INDENT);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new(ROOT);
    root.push_attribute(("xmlns", NAMESPACE));
    writer.write_event(Event::Start(root))?;
    for manifest in manifests {
        write_manifest(&mut writer, manifest)?;
    }
    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

    output.push(b'\n');
    Ok(output)
}

fn write_manifest<W: Write>(writer: &mut Writer<W>, manifest: &Manifest) -> Result<(), FormatError> {
    writer.write_event(Event::Start(BytesStart::new("Manifest")))?;

    write_text_element(writer, "Name", &manifest.name)?;
    write_text_element(writer, "Description", &manifest.description)?;
    write_text_element(writer, "Version", &manifest.version)?;

    if let Some(ref link) = manifest.link {
        write_link(writer, "Link", link)?;
    }

    if let Some(ref links) = manifest.platform_links {
        writer.write_event(Event::Start(BytesStart::new("Links")))?;
        for platform in [Platform::Windows, Platform::Mac, Platform::Linux] {
            write_link(writer, platform.element_name(), links.get(platform))?;
        }
        writer.write_event(Event::End(BytesEnd::new("Links")))?;
    }

    match manifest.dependencies.as_deref() {
        None => {}
        Some([]) => {
            writer.write_event(Event::Empty(BytesStart::new("Dependencies")))?;
        }
        Some(dependencies) => {
            writer.write_event(Event::Start(BytesStart::new("Dependencies")))?;
            for dependency in dependencies {
                write_text_element(writer, "Dependency", dependency)?;
            }
            writer.write_event(Event::End(BytesEnd::new("Dependencies")))?;
        }
    }

    if let Some(ref repository) = manifest.repository {
        write_text_element(writer, "Repository", repository)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Manifest")))?;
    Ok(())
}

fn write_link<W: Write>(writer: &mut Writer<W>, element: &str, link: &Link) -> Result<(), FormatError> {
    let mut start = BytesStart::new(element);
    start.push_attribute(("SHA256", link.sha256.as_str()));
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(&link.url)))?;
    writer.write_event(Event::End(BytesEnd::new(element)))?;
    Ok(())
}

/// `<element>text</element>` on one line, even when `text` is empty.
fn write_text_element<W: Write>(writer: &mut Writer<W>, element: &str, text: &str) -> Result<(), FormatError> {
    writer.write_event(Event::Start(BytesStart::new(element)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(element)))?;
    Ok(())
}
