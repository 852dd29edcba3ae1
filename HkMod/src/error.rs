use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    ModLinks(#[from] modlinks::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A required setting has no value in the environment or the config file.
    #[error("{0} not defined")]
    MissingSetting(&'static str),

    #[error("cache directory not available")]
    NoCacheDir,

    #[error("config file {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// The name would place files outside its own directory.
    #[error("cannot install {name}: {reason}")]
    UnsafeName { name: String, reason: &'static str },

    #[error("extract mod {name}: {reason}")]
    Extract { name: String, reason: String },

    #[error("list installed mods: {0}")]
    InstalledMods(std::io::Error),

    #[error("yeet installed version of {name}: {source}")]
    Remove {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("publish {name:?}: {reason}")]
    Publish { name: String, reason: String },
}

macro_rules! from_modlinks {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<modlinks::error::$ty> for Error {
                fn from(err: modlinks::error::$ty) -> Self {
                    Error::ModLinks(err.into())
                }
            }
        )*
    };
}

from_modlinks!(
    FormatError,
    ResolveError,
    MissingDependencies,
    FetchError,
    TransportError,
    PatchError,
);

pub type Result<T> = std::result::Result<T, Error>;
