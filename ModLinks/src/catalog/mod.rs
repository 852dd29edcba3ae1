//! Catalog document model
//!
//! A catalog is the `ModLinks` XML document: one `<Manifest>` block per mod,
//! each naming a download link (or one per platform), a version, and the names
//! of the mods it depends on.

mod document;
mod reader;
mod writer;

pub use document::{Link, Manifest, Platform, PlatformLinks};
pub use reader::{parse_catalog, parse_manifest};
pub use writer::{serialize_catalog, serialize_manifest};
