//! Error types for `ModLinks`
//!
//! Every component has its own closed error enum so callers can branch on the
//! kind of failure. [`Error`] aggregates them for callers that only propagate.

use std::path::PathBuf;

use thiserror::Error;

// ==================== Catalog Document Errors ====================

/// The catalog (or a single manifest block) is not a well-formed document.
#[derive(Error, Debug)]
pub enum FormatError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttr(String),

    /// The document is not valid UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The document closed an element it never opened, or ended inside one.
    #[error("malformed manifest document: {0}")]
    Structure(String),
}

impl From<quick_xml::events::attributes::AttrError> for FormatError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        FormatError::XmlAttr(err.to_string())
    }
}

// ==================== Name Resolution Errors ====================

/// A requested mod name could not be narrowed down to a single catalog entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No catalog name contains the requested text.
    #[error("{requested:?} matches no mods")]
    NotFound {
        /// The name as typed by the user.
        requested: String,
    },

    /// Several names match and none is a better match than the others.
    #[error("{requested:?} is ambiguous: matches {}", .candidates.join(", "))]
    Ambiguous {
        /// The name as typed by the user.
        requested: String,
        /// The names that matched, in catalog order.
        candidates: Vec<String>,
    },

    /// The catalog itself carries the requested name more than once.
    #[error("{requested:?} is ambiguous: {count} mods with that exact name exist")]
    DuplicateExact {
        /// The name as typed by the user.
        requested: String,
        /// How many catalog entries carry exactly that name.
        count: usize,
    },
}

// ==================== Dependency Closure Errors ====================

/// Some requested mods, or dependencies of them, are not in the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("required mods do not exist: {}", .names.join(","))]
pub struct MissingDependencies {
    /// Missing names, sorted.
    pub names: Vec<String>,
}

// ==================== Transport Errors ====================

/// Failure reported by (or about) a [`Transport`](crate::transport::Transport).
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("download {url}: {message}")]
    Request {
        /// The URL being fetched.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("download {url}: response status was {status}")]
    Status {
        /// The URL being fetched.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Reading the response body failed midway.
    #[error("download {url}: {source}")]
    Body {
        /// The URL being fetched.
        url: String,
        /// The underlying read error.
        #[source]
        source: std::io::Error,
    },
}

// ==================== Content Cache Errors ====================

/// A mod file could not be produced from the cache or the network.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The manifest has no usable link for the platform.
    #[error("no general or platform-specific link specified for {platform}")]
    NoLinkForPlatform {
        /// The platform the link was looked up for.
        platform: String,
    },

    /// The host operating system is not one the catalog has links for.
    #[error("unsupported OS: {os}")]
    UnsupportedPlatform {
        /// `std::env::consts::OS` of the host.
        os: String,
    },

    /// The record name cannot be used as a cache file name.
    #[error("cannot cache {name:?}: name is empty or contains a path separator")]
    InvalidName {
        /// The record name.
        name: String,
    },

    /// The manifest hash is malformed or the content does not match it.
    #[error("integrity check failed for {url}: {reason}")]
    Integrity {
        /// The link URL.
        url: String,
        /// What went wrong.
        reason: String,
    },

    /// The transport could not deliver the file.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Reading or writing the cache directory failed.
    #[error("cache IO error on {path}: {source}")]
    Io {
        /// The cache path involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

// ==================== Document Patcher Errors ====================

/// Patching the catalog document failed; nothing should be written.
#[derive(Error, Debug)]
pub enum PatchError {
    /// The record being updated could not be parsed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The document has no manifest blocks to anchor an insertion on.
    #[error("cannot find insertion point for new manifest {name:?}")]
    InsertionPointNotFound {
        /// The name of the record that was to be inserted.
        name: String,
    },
}

// ==================== Aggregate ====================

/// The error type for `ModLinks` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed catalog document.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Name resolution failure.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Missing dependencies in a closure.
    #[error(transparent)]
    MissingDependencies(#[from] MissingDependencies),

    /// Cache/download failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Transport failure outside of the cache.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Document patching failure.
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// A specialized Result type for `ModLinks` operations.
pub type Result<T> = std::result::Result<T, Error>;
