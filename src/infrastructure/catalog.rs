//! Contribution catalogs: in-memory and TOML manifest directory
//!
//! A manifest declares the contributions of one namespace:
//!
//! ```toml
//! namespace = "org.example.editor"   # defaults to the file stem
//!
//! [[contribution]]
//! point = "prefreg.preferences"
//! kind = "page"
//! class = "prefreg.GenericPage"
//! id = "editor"
//! order = 10
//! title = "Editor"
//! ```
//!
//! Every key besides `point` and `kind` becomes an element attribute. A contribution
//! lacking either is skipped on its own; the rest of the manifest still loads.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::ConfigurationElement;
use crate::infrastructure::traits::{ContributionCatalog, FileSystem};

/// Catalog backed by a fixed list of elements.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<(String, ConfigurationElement)>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn with_element(mut self, extension_point: &str, element: ConfigurationElement) -> Self {
        self.push(extension_point, element);
        self
    }

    pub fn push(&mut self, extension_point: &str, element: ConfigurationElement) {
        self.entries.push((extension_point.to_string(), element));
    }
}

impl ContributionCatalog for StaticCatalog {
    fn configuration_elements_for(
        &self,
        extension_point: &str,
    ) -> ApplicationResult<Vec<ConfigurationElement>> {
        Ok(self
            .entries
            .iter()
            .filter(|(point, _)| point == extension_point)
            .map(|(_, element)| element.clone())
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    namespace: Option<String>,
    #[serde(default)]
    contribution: Vec<ManifestContribution>,
}

#[derive(Debug, Deserialize)]
struct ManifestContribution {
    point: Option<String>,
    kind: Option<String>,
    #[serde(flatten)]
    attributes: BTreeMap<String, toml::Value>,
}

fn attribute_text(value: toml::Value) -> String {
    match value {
        toml::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Catalog reading `*.toml` manifests below a directory.
///
/// Manifests are visited in file name order; an unreadable manifest is skipped
/// with a warning so one broken contributor cannot hide the others.
pub struct ManifestCatalog {
    dir: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl ManifestCatalog {
    pub fn new(dir: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            dir: dir.into(),
            fs,
        }
    }

    fn load_manifest(&self, path: &Path) -> ApplicationResult<Manifest> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read manifest", path)?;
        toml::from_str(&content).with_path_context("parse manifest", path)
    }

    fn manifest_paths(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("skipping manifest path: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension() == Some(OsStr::new("toml")))
            .map(|entry| entry.into_path())
            .collect()
    }
}

impl ContributionCatalog for ManifestCatalog {
    #[instrument(level = "debug", skip(self))]
    fn configuration_elements_for(
        &self,
        extension_point: &str,
    ) -> ApplicationResult<Vec<ConfigurationElement>> {
        if !self.fs.is_dir(&self.dir) {
            return Err(ApplicationError::CatalogUnavailable {
                message: format!("manifest directory not found: {}", self.dir.display()),
            });
        }

        let mut elements = Vec::new();
        for path in self.manifest_paths() {
            let manifest = match self.load_manifest(&path) {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!("skipping manifest: {}", e);
                    continue;
                }
            };
            let namespace = manifest.namespace.unwrap_or_else(|| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            debug!("manifest {} declares namespace {}", path.display(), namespace);

            for contribution in manifest.contribution {
                if contribution.point.as_deref() != Some(extension_point) {
                    continue;
                }
                let Some(kind) = contribution.kind else {
                    warn!(
                        "skipping contribution without kind in {}",
                        path.display()
                    );
                    continue;
                };
                let mut element = ConfigurationElement::new(kind, namespace.as_str());
                for (key, value) in contribution.attributes {
                    element.attributes.insert(key, attribute_text(value));
                }
                elements.push(element);
            }
        }
        Ok(elements)
    }
}
