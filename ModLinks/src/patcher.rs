//! In-place catalog patching
//!
//! Publishing rewrites one `<Manifest>` block of a hand-maintained document.
//! The rest of the file (comments, ordering, formatting quirks) must survive
//! untouched, so the document is never round-tripped through the parser as a
//! whole. Blocks are located textually and only the one being changed is
//! re-serialized.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::catalog::{Manifest, parse_manifest, serialize_manifest};
use crate::error::PatchError;

static MANIFEST_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s-u)<Manifest>.*?</Manifest>").expect("manifest span pattern is valid")
});

/// Byte ranges of every `<Manifest>...</Manifest>` block in `document`.
pub fn manifest_spans(document: &[u8]) -> Vec<Range<usize>> {
    MANIFEST_SPAN
        .find_iter(document)
        .map(|m| m.range())
        .collect()
}

/// Update the record called `name` with `patch`, or add it if there is none.
///
/// An existing record is parsed, merged with [`Manifest::merge`] and written
/// back over its old block. A new record is written after the last block. No
/// byte outside the rewritten or inserted block changes.
///
/// # Errors
/// [`PatchError::Format`] if the matching block cannot be parsed, and
/// [`PatchError::InsertionPointNotFound`] if the document has no blocks at all.
pub fn apply(document: &[u8], name: &str, patch: &Manifest) -> Result<Vec<u8>, PatchError> {
    let needles = name_needles(name);
    let spans = manifest_spans(document);

    if let Some(span) = spans.iter().find(|span| {
        let block = &document[(*span).clone()];
        needles.iter().any(|needle| contains(block, needle.as_bytes()))
    }) {
        let mut manifest = parse_manifest(&document[span.clone()])?;
        manifest.merge(patch);
        let block = serialize_manifest(&manifest)?;
        tracing::info!("Updating manifest for {name} to version {}", manifest.version);
        // The span already starts after the line's indentation.
        return Ok(splice(document, span.clone(), block.trim_ascii_start()));
    }

    let Some(last) = spans.last() else {
        return Err(PatchError::InsertionPointNotFound {
            name: name.to_string(),
        });
    };

    let record = Manifest {
        name: name.to_string(),
        ..patch.clone()
    };
    let mut block = vec![b'\n'];
    block.extend(serialize_manifest(&record)?);
    tracing::info!("Adding manifest for {name} version {}", record.version);
    Ok(splice(document, last.end..last.end, &block))
}

/// `<Name>` elements that spell `name`: raw, with only markup characters
/// escaped, and with quotes escaped too.
fn name_needles(name: &str) -> Vec<String> {
    let mut needles: Vec<String> = Vec::with_capacity(3);
    for spelling in [
        Cow::Borrowed(name),
        quick_xml::escape::partial_escape(name),
        quick_xml::escape::escape(name),
    ] {
        let needle = format!("<Name>{spelling}</Name>");
        if !needles.contains(&needle) {
            needles.push(needle);
        }
    }
    needles
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

fn splice(document: &[u8], range: Range<usize>, replacement: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(document.len() - range.len() + replacement.len());
    output.extend_from_slice(&document[..range.start]);
    output.extend_from_slice(replacement);
    output.extend_from_slice(&document[range.end..]);
    output
}
