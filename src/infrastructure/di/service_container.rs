//! Service container for dependency injection
//!
//! Wires the registry services to their collaborators.

use std::sync::Arc;

use crate::application::services::{ContributionCollector, PageTreeBuilder};
use crate::application::{ClassRegistry, PageContext};
use crate::config::Settings;
use crate::infrastructure::catalog::ManifestCatalog;
use crate::infrastructure::store::FileStoreResolver;
use crate::infrastructure::traits::{
    ContextInjector, ContributionCatalog, FileSystem, PageInjector, RealFileSystem, StoreResolver,
};

/// Container holding the registry collaborators.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Where contributions come from
    pub catalog: Arc<dyn ContributionCatalog>,

    /// Per-namespace config stores
    pub stores: Arc<dyn StoreResolver>,

    pub injector: Arc<dyn ContextInjector>,

    /// Constructible page classes
    pub classes: Arc<ClassRegistry>,
}

impl ServiceContainer {
    /// Create a container with real implementations and the built-in classes.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let catalog = Arc::new(ManifestCatalog::new(
            settings.manifest_dir.clone(),
            Arc::clone(&fs),
        ));
        let stores = Arc::new(FileStoreResolver::new(
            settings.store_dir.clone(),
            Arc::clone(&fs),
        ));

        Self::with_deps(
            settings,
            fs,
            catalog,
            stores,
            ClassRegistry::with_builtin(),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        catalog: Arc<dyn ContributionCatalog>,
        stores: Arc<dyn StoreResolver>,
        classes: ClassRegistry,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            catalog,
            stores,
            injector: Arc::new(PageInjector),
            classes: Arc::new(classes),
        }
    }

    pub fn collector(&self) -> ContributionCollector {
        ContributionCollector::with_extension_point(
            Arc::clone(&self.catalog),
            self.settings.extension_point.clone(),
        )
    }

    pub fn page_tree_builder(&self) -> PageTreeBuilder {
        PageTreeBuilder::new(
            self.collector(),
            Arc::clone(&self.classes),
            Arc::clone(&self.stores),
            Arc::clone(&self.injector),
        )
    }

    /// Injection context: currently the settings.
    pub fn context(&self) -> PageContext {
        let mut context = PageContext::new();
        context.insert_arc(Arc::clone(&self.settings));
        context
    }
}
