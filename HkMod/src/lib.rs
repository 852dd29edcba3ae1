//! hkmod - Hollow Knight mod manager built on the `ModLinks` catalog

// Re-export the catalog engine
pub use modlinks;

pub mod config;
pub mod error;
pub mod operations;
pub mod transport;

// Feature-gated modules
#[cfg(feature = "cli")]
pub mod cli;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{Error, Result};
pub use transport::HttpTransport;
