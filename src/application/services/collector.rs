//! Contribution collector
//!
//! Reads page contributions from the catalog and resolves their order.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    resolve_order, ContributionRecord, OrderedCollection, PREFERENCE_EXTENSION_POINT_ID,
};
use crate::infrastructure::traits::ContributionCatalog;

/// Produces the ordered page contributions of one extension point.
pub struct ContributionCollector {
    catalog: Arc<dyn ContributionCatalog>,
    extension_point: String,
}

impl ContributionCollector {
    /// Collector for the default preference extension point.
    pub fn new(catalog: Arc<dyn ContributionCatalog>) -> Self {
        Self::with_extension_point(catalog, PREFERENCE_EXTENSION_POINT_ID)
    }

    pub fn with_extension_point(
        catalog: Arc<dyn ContributionCatalog>,
        extension_point: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            extension_point: extension_point.into(),
        }
    }

    pub fn extension_point(&self) -> &str {
        &self.extension_point
    }

    /// Queries the catalog and orders every `page` element.
    ///
    /// Elements of any other kind are dropped. The catalog is read on every call.
    #[instrument(level = "debug", skip(self))]
    pub fn collect(&self) -> ApplicationResult<OrderedCollection> {
        let elements = self
            .catalog
            .configuration_elements_for(&self.extension_point)?;

        let pages: Vec<ContributionRecord> = elements
            .iter()
            .filter(|element| element.is_page())
            .map(ContributionRecord::from_element)
            .collect();
        debug!(
            "collect: {} of {} elements at '{}' are pages",
            pages.len(),
            elements.len(),
            self.extension_point
        );

        Ok(resolve_order(pages))
    }
}
