//! Settings for hkmod
//!
//! Values come from, lowest precedence first: built-in defaults, the config file
//! at `<config dir>/hkmod/config.json`, and the environment (`HK15PATH`,
//! `MODLINKSURL`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable holding the game install directory.
pub const PATH_ENV_VAR: &str = "HK15PATH";
/// Environment variable overriding the catalog URL.
pub const MODLINKS_URL_ENV_VAR: &str = "MODLINKSURL";

/// The community-maintained catalog.
pub const DEFAULT_MODLINKS_URL: &str =
    "https://raw.githubusercontent.com/hk-modding/modlinks/main/ModLinks.xml";

/// Subdirectory of the install directory that holds mods.
pub const MODS_DIR: &str = "Mods";

const APP_DIR: &str = "hkmod";

/// Contents of `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedConfig {
    pub install_dir: Option<PathBuf>,
    pub modlinks_url: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

impl PersistedConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join("config.json"))
    }

    /// Load the config file, or the defaults if there is none.
    ///
    /// An unreadable or malformed file is reported and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config: {e}");
                Self::default()
            }
        }
    }

    /// Load a specific config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Effective settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub install_dir: Option<PathBuf>,
    pub modlinks_url: String,
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            install_dir: None,
            modlinks_url: DEFAULT_MODLINKS_URL.to_string(),
            cache_dir: dirs::cache_dir().map(|p| p.join(APP_DIR)),
        }
    }
}

impl Config {
    /// Settings from the config file and the process environment.
    pub fn load() -> Self {
        Self::resolve(PersistedConfig::load(), |key| std::env::var(key).ok())
    }

    /// Layer `persisted` and then `env` over the defaults. Empty values count as unset.
    pub fn resolve(persisted: PersistedConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = persisted.install_dir {
            config.install_dir = Some(dir);
        }
        if let Some(url) = persisted.modlinks_url.filter(|u| !u.is_empty()) {
            config.modlinks_url = url;
        }
        if let Some(dir) = persisted.cache_dir {
            config.cache_dir = Some(dir);
        }

        if let Some(dir) = env(PATH_ENV_VAR).filter(|v| !v.is_empty()) {
            config.install_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = env(MODLINKS_URL_ENV_VAR).filter(|v| !v.is_empty()) {
            config.modlinks_url = url;
        }

        config
    }

    /// The game install directory.
    ///
    /// # Errors
    /// [`Error::MissingSetting`] if neither the environment nor the config file sets it.
    pub fn install_dir(&self) -> Result<&Path> {
        self.install_dir
            .as_deref()
            .ok_or(Error::MissingSetting(PATH_ENV_VAR))
    }

    /// `<install dir>/Mods`.
    pub fn mods_dir(&self) -> Result<PathBuf> {
        Ok(self.install_dir()?.join(MODS_DIR))
    }

    /// Where downloaded mod files are kept.
    pub fn cache_dir(&self) -> Result<&Path> {
        self.cache_dir.as_deref().ok_or(Error::NoCacheDir)
    }
}
