//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CHEADERGEN_*` prefix, `__` as separator)
//! 2. A file passed explicitly (`--config`)
//! 3. Project-level `.cheadergen.toml` in the working directory
//! 4. User-level `<config dir>/cheadergen/config.toml`
//! 5. Built-in defaults
//!
//! Figment maps `CHEADERGEN_GENERATION__INCLUDE_STATIC` -> `generation.include_static`.
//!
//! The loaded [`Options`] is a snapshot: it is read once per run and never
//! observed again, so edits made while a run is in progress take effect on
//! the next run.

mod error;
mod generation;
mod logging;

pub use error::ConfigError;
pub use generation::{GenerationConfig, DEFAULT_HEADER_COMMENT};
pub use logging::{LogLevel, LoggingConfig, DEFAULT_LOG_LAYOUT};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project-local settings file.
pub const PROJECT_CONFIG_FILE: &str = ".cheadergen.toml";

/// Prefix of the environment variables read by [`Options::figment`].
pub const ENV_PREFIX: &str = "CHEADERGEN_";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Options {
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Write generated headers to disk. When off the header is only printed
    /// and no file is touched. The key keeps its historical name, but there
    /// are no editor buffers here: the only file a run could save is the
    /// header itself.
    #[serde(default = "default_auto_save")]
    pub auto_save_files: bool,
}

const fn default_auto_save() -> bool {
    true
}

impl Default for Options {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            logging: LoggingConfig::default(),
            auto_save_files: default_auto_save(),
        }
    }
}

impl Options {
    /// Load configuration from all sources.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::MissingFile {
                    path: path.display().to_string(),
                });
            }
        }
        Ok(Self::figment(explicit).extract()?)
    }

    /// Build the figment provider chain.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cheadergen").join("config.toml"))
    }
}
