//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/prefreg/prefreg.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `PREFREG_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::PREFERENCE_EXTENSION_POINT_ID;

/// Prefix of environment overrides, e.g. `PREFREG_MANIFEST_DIR`.
pub const ENV_PREFIX: &str = "PREFREG";

/// Unified configuration for prefreg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory scanned for contribution manifests
    pub manifest_dir: PathBuf,
    /// Directory holding one `<namespace>.toml` store per contributor
    pub store_dir: PathBuf,
    /// Extension point whose contributions become pages
    pub extension_point: String,
}

impl Default for Settings {
    fn default() -> Self {
        let (manifest_dir, store_dir) = match ProjectDirs::from("", "", "prefreg") {
            Some(dirs) => (
                dirs.config_dir().join("contributions"),
                dirs.data_dir().join("stores"),
            ),
            None => (
                PathBuf::from("~/.prefreg/contributions"),
                PathBuf::from("~/.prefreg/stores"),
            ),
        };

        Self {
            manifest_dir,
            store_dir,
            extension_point: PREFERENCE_EXTENSION_POINT_ID.to_string(),
        }
    }
}

/// Get the XDG config directory for prefreg.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "prefreg").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("prefreg.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`, leaving the input untouched on failure.
fn expand(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.manifest_dir = PathBuf::from(expand(&self.manifest_dir.to_string_lossy()));
        self.store_dir = PathBuf::from(expand(&self.store_dir.to_string_lossy()));
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default(
                "manifest_dir",
                defaults.manifest_dir.to_string_lossy().to_string(),
            )
            .map_err(config_err)?
            .set_default("store_dir", defaults.store_dir.to_string_lossy().to_string())
            .map_err(config_err)?
            .set_default("extension_point", defaults.extension_point.clone())
            .map_err(config_err)?;

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# prefreg configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/prefreg/prefreg.toml
#   Explicit: prefreg --config <file>
#   Env:      PREFREG_* environment variables (e.g. PREFREG_MANIFEST_DIR)

# Directory scanned (recursively) for *.toml contribution manifests
# manifest_dir = "~/.config/prefreg/contributions"

# Directory holding one <namespace>.toml store per contributing namespace
# store_dir = "~/.local/share/prefreg/stores"

# Extension point whose "page" contributions are resolved
# extension_point = "prefreg.preferences"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
