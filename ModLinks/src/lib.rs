//! # ModLinks
//!
//! Engine for working with the Hollow Knight `ModLinks.xml` mod catalog.
//!
//! ## Components
//!
//! - **Catalog** - Parse and serialize `<Manifest>` records
//! - **Resolver** - Turn a partial, case-insensitive name into one catalog entry
//! - **Closure** - Expand requested mods into everything they depend on
//! - **Cache** - Produce mod files whose SHA-256 matches the catalog, downloading only when needed
//! - **Patcher** - Update or add a single record in a catalog document without disturbing the rest
//!
//! ## Quick Start
//!
//! ### Resolving and expanding a request
//!
//! ```no_run
//! use modlinks::prelude::*;
//!
//! let catalog = parse_catalog(&std::fs::read("ModLinks.xml")?)?;
//! let names: Vec<&str> = catalog.iter().map(|m| m.name.as_str()).collect();
//!
//! let name = resolve(&names, "randomizer")?;
//! let closure = closure(&catalog, &[name]);
//! if let Some(err) = closure.missing_error() {
//!     eprintln!("{err}");
//! }
//! for record in &closure.records {
//!     println!("{} {}", record.name, record.version);
//! }
//! # Ok::<(), modlinks::Error>(())
//! ```
//!
//! ### Publishing an update
//!
//! ```no_run
//! use modlinks::prelude::*;
//!
//! let document = std::fs::read("ModLinks.xml")?;
//! let patch = Manifest {
//!     version: "1.2.0.0".to_string(),
//!     link: Some(Link::new("https://example.com/v1.2/MyMod.zip", "0123abcd")),
//!     ..Default::default()
//! };
//! std::fs::write("ModLinks.xml", apply(&document, "MyMod", &patch)?)?;
//! # Ok::<(), modlinks::Error>(())
//! ```
//!
//! Network access goes through the [`Transport`] trait; this crate makes no HTTP
//! requests of its own.

pub mod cache;
pub mod catalog;
pub mod closure;
pub mod error;
pub mod patcher;
pub mod resolver;
pub mod transport;

// Re-exports for convenience
pub use error::{Error, Result};
pub use transport::{Response, Transport};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{
        Error, FetchError, FormatError, MissingDependencies, PatchError, ResolveError, Result,
        TransportError,
    };

    pub use crate::catalog::{
        Link, Manifest, Platform, PlatformLinks, parse_catalog, parse_manifest, serialize_catalog,
        serialize_manifest,
    };
    pub use crate::resolver::{resolve, resolve_manifest};
    pub use crate::closure::{Closure, closure};
    pub use crate::cache::{
        CachedFile, ContentCache, FetchPhase, FetchProgress, FetchProgressCallback, select_link,
    };
    pub use crate::patcher::apply;
    pub use crate::transport::{Response, Transport};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
