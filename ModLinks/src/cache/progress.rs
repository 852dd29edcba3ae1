//! Progress reporting for cache fetches

/// Progress callback type for cache fetches
pub type FetchProgressCallback<'a> = &'a (dyn Fn(&FetchProgress) + Sync + Send);

/// Progress information while a mod file is produced
#[derive(Debug, Clone)]
pub struct FetchProgress {
    /// Current phase
    pub phase: FetchPhase,
    /// Bytes processed so far
    pub bytes: u64,
    /// Expected byte count, when known
    pub total: Option<u64>,
}

impl FetchProgress {
    #[must_use]
    pub fn new(phase: FetchPhase, bytes: u64, total: Option<u64>) -> Self {
        Self { phase, bytes, total }
    }

    /// Get the progress fraction (0.0 - 1.0), if the total is known
    #[must_use]
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(0) => Some(1.0),
            Some(total) => Some(self.bytes as f64 / total as f64),
            None => None,
        }
    }
}

/// Phase of a cache fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Hashing the existing cache entry
    CheckingCache,
    /// The cache entry matched; no download needed
    CacheHit,
    /// Streaming the file from the network
    Downloading,
    /// The verified file is in place
    Complete,
}

impl FetchPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CheckingCache => "Checking cache",
            Self::CacheHit => "Cached",
            Self::Downloading => "Downloading",
            Self::Complete => "Complete",
        }
    }
}
