//! Collaborator traits at the registry boundary
//!
//! The registry only talks to these traits, so catalogs, stores and injection
//! can be replaced in tests or by an embedding application.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::application::{ApplicationResult, PageContext, SettingsPage};
use crate::domain::ConfigurationElement;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Source of contribution metadata.
pub trait ContributionCatalog: Send + Sync {
    /// All elements registered under `extension_point`, in catalog order.
    fn configuration_elements_for(
        &self,
        extension_point: &str,
    ) -> ApplicationResult<Vec<ConfigurationElement>>;
}

/// Key-value backing store of one namespace.
pub trait ConfigStore: Send + Sync + fmt::Debug {
    fn namespace(&self) -> &str;

    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    /// Returns the previous value.
    fn remove(&self, key: &str) -> Option<String>;

    /// Keys in sorted order.
    fn keys(&self) -> Vec<String>;

    /// Persist pending changes.
    fn save(&self) -> ApplicationResult<()>;
}

/// Maps a declaring namespace to its config store.
///
/// Repeated calls with the same namespace return the same store.
pub trait StoreResolver: Send + Sync {
    fn find_store(&self, namespace: &str) -> ApplicationResult<Arc<dyn ConfigStore>>;
}

/// Fills the dependencies a new page declares.
pub trait ContextInjector: Send + Sync {
    fn inject(&self, page: &mut dyn SettingsPage, context: &PageContext) -> ApplicationResult<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Injector that lets each page pull its own dependencies.
#[derive(Debug, Default)]
pub struct PageInjector;

impl ContextInjector for PageInjector {
    fn inject(&self, page: &mut dyn SettingsPage, context: &PageContext) -> ApplicationResult<()> {
        page.inject(context)
    }
}
