//! Manifest document structures

use std::fmt;

/// A download link: the file URL and the SHA-256 its content must hash to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    /// Hex-encoded SHA-256 of the file.
    pub sha256: String,
    /// Where the file is downloaded from.
    pub url: String,
}

impl Link {
    #[must_use]
    pub fn new(url: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            sha256: sha256.into(),
            url: url.into(),
        }
    }

    /// A link is only usable if it declares a hash.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.sha256.is_empty()
    }

    /// Extension of the file named by the URL, including the dot (`".zip"`), or empty.
    #[must_use]
    pub fn extension(&self) -> &str {
        let base = self.file_name();
        match base.rfind('.') {
            Some(dot) => &base[dot..],
            None => "",
        }
    }

    /// Last path segment of the URL.
    #[must_use]
    pub fn file_name(&self) -> &str {
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/').next().unwrap_or_default()
    }
}

/// Operating system families the catalog carries per-platform links for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    /// Map a `std::env::consts::OS` value onto a catalog platform.
    #[must_use]
    pub fn from_os(os: &str) -> Option<Self> {
        match os {
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::Mac),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// The platform of the running process, if it is one of the three.
    #[must_use]
    pub fn current() -> Option<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Element name used for this platform inside `<Links>`.
    #[must_use]
    pub fn element_name(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Mac => "Mac",
            Self::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// One link per supported platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformLinks {
    pub windows: Link,
    pub mac: Link,
    pub linux: Link,
}

impl PlatformLinks {
    #[must_use]
    pub fn get(&self, platform: Platform) -> &Link {
        match platform {
            Platform::Windows => &self.windows,
            Platform::Mac => &self.mac,
            Platform::Linux => &self.linux,
        }
    }

    pub fn get_mut(&mut self, platform: Platform) -> &mut Link {
        match platform {
            Platform::Windows => &mut self.windows,
            Platform::Mac => &mut self.mac,
            Platform::Linux => &mut self.linux,
        }
    }
}

/// A mod's catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Unique mod name; the key every other component joins on.
    pub name: String,
    pub description: String,
    /// Dot-separated numeric version, e.g. `1.2.0.0`.
    pub version: String,
    /// Platform-independent link.
    pub link: Option<Link>,
    /// Per-platform links, used when there is no usable default link.
    pub platform_links: Option<PlatformLinks>,
    /// `None` when the document does not say; `Some(vec![])` when it says "no dependencies".
    pub dependencies: Option<Vec<String>>,
    pub repository: Option<String>,
}

impl Manifest {
    /// Create a manifest with just a name and a default link.
    #[must_use]
    pub fn new(name: impl Into<String>, link: Link) -> Self {
        Self {
            name: name.into(),
            link: Some(link),
            ..Default::default()
        }
    }

    /// Dependency names; empty whether unspecified or explicitly empty.
    #[must_use]
    pub fn dependency_names(&self) -> &[String] {
        self.dependencies.as_deref().unwrap_or_default()
    }

    /// Fold a publish patch into this manifest.
    ///
    /// Version and link always come from `patch`, since a publish always carries a
    /// fresh file. Other fields are only replaced when the patch specifies them.
    pub fn merge(&mut self, patch: &Manifest) {
        self.link.clone_from(&patch.link);
        self.version.clone_from(&patch.version);
        if !patch.description.is_empty() {
            self.description.clone_from(&patch.description);
        }
        if let Some(repository) = patch.repository.as_ref().filter(|r| !r.is_empty()) {
            self.repository = Some(repository.clone());
        }
        if patch.dependencies.is_some() {
            self.dependencies.clone_from(&patch.dependencies);
        }
        if patch.platform_links.is_some() {
            self.platform_links.clone_from(&patch.platform_links);
        }
    }
}
