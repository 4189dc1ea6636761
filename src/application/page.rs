//! Settings page capability and the built-in page type

use std::fmt;
use std::sync::Arc;

use crate::application::context::PageContext;
use crate::application::ApplicationResult;
use crate::infrastructure::traits::ConfigStore;

/// Class reference of [`GenericPage`].
pub const GENERIC_PAGE_CLASS: &str = "prefreg.GenericPage";

/// Capability every contributed settings page must provide.
pub trait SettingsPage: fmt::Debug {
    fn title(&self) -> Option<&str>;

    fn set_title(&mut self, title: &str);

    fn store(&self) -> Option<&Arc<dyn ConfigStore>>;

    fn set_store(&mut self, store: Arc<dyn ConfigStore>);

    /// Pulls declared dependencies out of the context.
    ///
    /// Pages without dependencies keep the default.
    fn inject(&mut self, _context: &PageContext) -> ApplicationResult<()> {
        Ok(())
    }
}

/// Any object a class factory can produce.
///
/// Only objects that hand themselves out as a [`SettingsPage`] end up in the tree.
pub trait Contribution: fmt::Debug {
    fn into_settings_page(self: Box<Self>) -> Option<Box<dyn SettingsPage>> {
        None
    }
}

/// Page without behavior of its own: a title and the namespace store.
#[derive(Debug, Default)]
pub struct GenericPage {
    title: Option<String>,
    store: Option<Arc<dyn ConfigStore>>,
}

impl GenericPage {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            store: None,
        }
    }
}

impl SettingsPage for GenericPage {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn store(&self) -> Option<&Arc<dyn ConfigStore>> {
        self.store.as_ref()
    }

    fn set_store(&mut self, store: Arc<dyn ConfigStore>) {
        self.store = Some(store);
    }
}

impl Contribution for GenericPage {
    fn into_settings_page(self: Box<Self>) -> Option<Box<dyn SettingsPage>> {
        Some(self)
    }
}
