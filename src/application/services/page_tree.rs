//! Page tree builder
//!
//! Turns the collected contributions into live pages and composes them into a
//! [`PreferenceTree`]. A broken contribution is reported and skipped; only
//! collaborator failures (catalog, injection, store resolution) abort the build.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::factory::ClassRegistry;
use crate::application::page::SettingsPage;
use crate::application::services::ContributionCollector;
use crate::application::{ApplicationResult, Diagnostic, PageContext, PageError};
use crate::domain::{ContributionRecord, PreferenceTree, ATTRIBUTE_CLASS, ATTRIBUTE_ID};
use crate::infrastructure::traits::{ContextInjector, StoreResolver};

/// Tree of live settings pages.
pub type PageTree = PreferenceTree<Box<dyn SettingsPage>>;

/// Outcome of one build pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Paths of the pages added, in insertion order
    pub pages: Vec<String>,
    /// Contributions that were skipped
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Builds the page tree from collected contributions.
pub struct PageTreeBuilder {
    collector: ContributionCollector,
    classes: Arc<ClassRegistry>,
    stores: Arc<dyn StoreResolver>,
    injector: Arc<dyn ContextInjector>,
}

impl PageTreeBuilder {
    pub fn new(
        collector: ContributionCollector,
        classes: Arc<ClassRegistry>,
        stores: Arc<dyn StoreResolver>,
        injector: Arc<dyn ContextInjector>,
    ) -> Self {
        Self {
            collector,
            classes,
            stores,
            injector,
        }
    }

    /// Clears `tree` and fills it with one node per valid contribution, in collector order.
    #[instrument(level = "debug", skip_all)]
    pub fn create_pages(
        &self,
        tree: &mut PageTree,
        context: &PageContext,
    ) -> ApplicationResult<BuildReport> {
        tree.remove_all();
        let records = self.collector.collect()?;
        let mut report = BuildReport::default();

        for (order, record) in records {
            let (id, mut page) = match self.instantiate(&record) {
                Ok(created) => created,
                Err(error) => {
                    report
                        .diagnostics
                        .push(Diagnostic::new(order, &record, error));
                    continue;
                }
            };

            self.injector.inject(page.as_mut(), context)?;

            if page.title().map_or(true, str::is_empty) {
                if let Some(title) = record.title.as_deref() {
                    page.set_title(title);
                }
            }

            let store = self.stores.find_store(&record.namespace)?;
            page.set_store(store);

            let placed = match record.category.as_deref() {
                Some(category) => tree.add_to(category, id, page),
                None => Ok(tree.add_to_root(id, page)),
            };
            match placed {
                Ok(idx) => {
                    let path = tree.path_of(idx).unwrap_or_else(|| id.to_string());
                    debug!("create_pages: added {} (order {})", path, order);
                    report.pages.push(path);
                }
                Err(error) => report
                    .diagnostics
                    .push(Diagnostic::new(order, &record, error.into())),
            }
        }

        info!(
            "create_pages: {} pages, {} skipped",
            report.pages.len(),
            report.diagnostics.len()
        );
        Ok(report)
    }

    /// Checks required attributes, constructs the object and narrows it to a page.
    fn instantiate<'r>(
        &self,
        record: &'r ContributionRecord,
    ) -> Result<(&'r str, Box<dyn SettingsPage>), PageError> {
        let class = record
            .implementation_ref
            .as_deref()
            .ok_or(PageError::MissingAttribute {
                attribute: ATTRIBUTE_CLASS,
            })?;
        let id = record.id.as_deref().ok_or(PageError::MissingAttribute {
            attribute: ATTRIBUTE_ID,
        })?;

        let object = self.classes.create(class)?;
        let page = object
            .into_settings_page()
            .ok_or_else(|| PageError::NotASettingsPage {
                class: class.to_string(),
            })?;
        Ok((id, page))
    }
}
