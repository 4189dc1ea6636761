//! Tests for PageTreeBuilder

use std::sync::Arc;

use prefreg::application::services::{BuildReport, ContributionCollector, PageTree, PageTreeBuilder};
use prefreg::application::{
    ApplicationError, ApplicationResult, ClassRegistry, ConstructionError, Contribution,
    PageContext, PageError, SettingsPage, GENERIC_PAGE_CLASS,
};
use prefreg::domain::{
    ConfigurationElement, DomainError, ATTRIBUTE_CATEGORY, ATTRIBUTE_CLASS, ATTRIBUTE_ID,
    ATTRIBUTE_ORDER, ATTRIBUTE_TITLE, ELEMENT_PAGE, PREFERENCE_EXTENSION_POINT_ID,
};
use prefreg::infrastructure::traits::{
    ConfigStore, ContributionCatalog, PageInjector, StoreResolver,
};
use prefreg::infrastructure::{MemoryStoreResolver, StaticCatalog};
use prefreg::util::testing;

// ============================================================
// Test page types
// ============================================================

#[derive(Debug, Default)]
struct TestPage {
    title: Option<String>,
    store: Option<Arc<dyn ConfigStore>>,
}

impl SettingsPage for TestPage {
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

impl Contribution for TestPage {
    fn into_settings_page(self: Box<Self>) -> Option<Box<dyn SettingsPage>> {
        Some(self)
    }
}

/// Contributed object that is not a settings page.
#[derive(Debug, Default)]
struct Widget;

impl Contribution for Widget {}

#[derive(Debug)]
struct Theme(&'static str);

/// Page that needs a `Theme` from the context and titles itself with it.
#[derive(Debug, Default)]
struct ThemedPage {
    inner: TestPage,
}

impl SettingsPage for ThemedPage {
    fn title(&self) -> Option<&str> {
        self.inner.title()
    }

    fn set_title(&mut self, title: &str) {
        self.inner.set_title(title);
    }

    fn store(&self) -> Option<&Arc<dyn ConfigStore>> {
        self.inner.store()
    }

    fn set_store(&mut self, store: Arc<dyn ConfigStore>) {
        self.inner.set_store(store);
    }

    fn inject(&mut self, context: &PageContext) -> ApplicationResult<()> {
        let theme = context.require::<Theme>()?;
        self.inner.set_title(&format!("{} theme", theme.0));
        Ok(())
    }
}

impl Contribution for ThemedPage {
    fn into_settings_page(self: Box<Self>) -> Option<Box<dyn SettingsPage>> {
        Some(self)
    }
}

// ============================================================
// Helpers
// ============================================================

struct Page<'a> {
    namespace: &'a str,
    id: Option<&'a str>,
    class: Option<&'a str>,
    order: Option<&'a str>,
    category: Option<&'a str>,
    title: Option<&'a str>,
}

impl<'a> Page<'a> {
    fn new(id: &'a str) -> Self {
        Self {
            namespace: "org.example",
            id: Some(id),
            class: Some("test.Page"),
            order: None,
            category: None,
            title: None,
        }
    }

    fn element(&self) -> ConfigurationElement {
        let mut element = ConfigurationElement::new(ELEMENT_PAGE, self.namespace);
        let attributes = [
            (ATTRIBUTE_ID, self.id),
            (ATTRIBUTE_CLASS, self.class),
            (ATTRIBUTE_ORDER, self.order),
            (ATTRIBUTE_CATEGORY, self.category),
            (ATTRIBUTE_TITLE, self.title),
        ];
        for (key, value) in attributes {
            if let Some(value) = value {
                element = element.with_attribute(key, value);
            }
        }
        element
    }
}

fn catalog(pages: &[Page]) -> StaticCatalog {
    pages.iter().fold(StaticCatalog::new(), |catalog, page| {
        catalog.with_element(PREFERENCE_EXTENSION_POINT_ID, page.element())
    })
}

fn classes() -> ClassRegistry {
    let mut classes = ClassRegistry::with_builtin();
    classes.register_default::<TestPage>("test.Page");
    classes.register_default::<Widget>("test.Widget");
    classes.register_default::<ThemedPage>("test.ThemedPage");
    classes.register("test.Preset", || {
        Ok(Box::new(TestPage {
            title: Some("Preset".to_string()),
            store: None,
        }) as Box<dyn Contribution>)
    });
    classes.register("test.Broken", || Err("missing dependency".into()));
    classes
}

fn builder_with(
    catalog: impl ContributionCatalog + 'static,
    stores: Arc<MemoryStoreResolver>,
) -> PageTreeBuilder {
    testing::init_test_setup();
    PageTreeBuilder::new(
        ContributionCollector::new(Arc::new(catalog)),
        Arc::new(classes()),
        stores,
        Arc::new(PageInjector),
    )
}

fn build(pages: &[Page]) -> (PageTree, BuildReport) {
    let builder = builder_with(catalog(pages), Arc::new(MemoryStoreResolver::new()));
    let mut tree = PageTree::new();
    let report = builder
        .create_pages(&mut tree, &PageContext::new())
        .expect("build");
    (tree, report)
}

fn page_at<'t>(tree: &'t PageTree, path: &str) -> &'t dyn SettingsPage {
    let idx = tree.find(path).unwrap_or_else(|| panic!("no node at {path}"));
    tree.get_node(idx).unwrap().page.as_ref()
}

// ============================================================
// Per-record failures
// ============================================================

#[test]
fn given_record_without_class_when_building_then_skipped_with_diagnostic() {
    let (tree, report) = build(&[
        Page::new("a"),
        Page {
            class: None,
            ..Page::new("b")
        },
        Page::new("c"),
    ]);

    assert_eq!(tree.ids(), vec!["a", "c"]);
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.id.as_deref(), Some("b"));
    assert!(matches!(
        diagnostic.error,
        PageError::MissingAttribute { attribute: "class" }
    ));
    assert_eq!(diagnostic.to_string(), "b@org.example: class attribute required");
}

#[test]
fn given_record_without_id_when_building_then_skipped_with_diagnostic() {
    let (tree, report) = build(&[Page {
        id: None,
        ..Page::new("unused")
    }]);

    assert!(tree.is_empty());
    assert!(matches!(
        report.diagnostics[0].error,
        PageError::MissingAttribute { attribute: "id" }
    ));
}

#[test]
fn given_failing_construction_in_middle_when_building_then_neighbours_survive_in_order() {
    let (tree, report) = build(&[
        Page::new("first"),
        Page {
            class: Some("test.Broken"),
            ..Page::new("second")
        },
        Page::new("third"),
    ]);

    assert_eq!(tree.ids(), vec!["first", "third"]);
    assert_eq!(report.pages, vec!["first", "third"]);
    match &report.diagnostics[0].error {
        PageError::Construction(ConstructionError::Failed { class, source }) => {
            assert_eq!(class, "test.Broken");
            assert_eq!(source.to_string(), "missing dependency");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_unregistered_class_when_building_then_reports_unknown_class() {
    let (tree, report) = build(&[Page {
        class: Some("org.example.Missing"),
        ..Page::new("a")
    }]);

    assert!(tree.is_empty());
    assert!(matches!(
        &report.diagnostics[0].error,
        PageError::Construction(ConstructionError::UnknownClass { class }) if class == "org.example.Missing"
    ));
}

#[test]
fn given_object_without_page_capability_when_building_then_skipped() {
    let (tree, report) = build(&[
        Page {
            class: Some("test.Widget"),
            ..Page::new("widget")
        },
        Page::new("page"),
    ]);

    assert_eq!(tree.ids(), vec!["page"]);
    let message = report.diagnostics[0].error.to_string();
    assert!(message.contains("SettingsPage"), "{message}");
}

// ============================================================
// Title and store
// ============================================================

#[test]
fn given_untitled_page_when_record_has_title_then_title_is_applied() {
    let (tree, _) = build(&[Page {
        title: Some("General"),
        ..Page::new("general")
    }]);
    assert_eq!(page_at(&tree, "general").title(), Some("General"));
}

#[test]
fn given_page_with_own_title_when_record_has_title_then_own_title_kept() {
    let (tree, _) = build(&[Page {
        class: Some("test.Preset"),
        title: Some("From record"),
        ..Page::new("preset")
    }]);
    assert_eq!(page_at(&tree, "preset").title(), Some("Preset"));
}

#[test]
fn given_record_without_title_when_building_then_title_stays_empty() {
    let (tree, _) = build(&[Page::new("plain")]);
    assert_eq!(page_at(&tree, "plain").title(), None);
}

#[test]
fn given_pages_when_building_then_each_gets_store_of_its_namespace() {
    let stores = Arc::new(MemoryStoreResolver::new());
    let builder = builder_with(
        catalog(&[
            Page::new("a"),
            Page {
                namespace: "org.other",
                ..Page::new("b")
            },
            Page::new("c"),
        ]),
        Arc::clone(&stores),
    );
    let mut tree = PageTree::new();
    builder
        .create_pages(&mut tree, &PageContext::new())
        .unwrap();

    let example = stores.find_store("org.example").unwrap();
    let other = stores.find_store("org.other").unwrap();
    for (path, expected) in [("a", &example), ("b", &other), ("c", &example)] {
        let store = page_at(&tree, path).store().expect("store attached");
        assert!(Arc::ptr_eq(store, expected), "page {path}");
    }
    assert_eq!(other.namespace(), "org.other");
}

// ============================================================
// Tree composition
// ============================================================

#[test]
fn given_categories_when_building_then_pages_nest_under_their_parents() {
    let (tree, report) = build(&[
        Page {
            order: Some("1"),
            ..Page::new("general")
        },
        Page {
            order: Some("3"),
            category: Some("general.editors"),
            ..Page::new("text")
        },
        Page {
            order: Some("2"),
            category: Some("general"),
            ..Page::new("editors")
        },
        Page {
            order: Some("4"),
            ..Page::new("network")
        },
    ]);

    assert!(report.is_clean());
    assert_eq!(
        report.pages,
        vec!["general", "general.editors", "general.editors.text", "network"]
    );
    assert_eq!(tree.roots().len(), 2);
    assert_eq!(tree.depth(), 3);
    assert!(tree.find("general.editors.text").is_some());
}

#[test]
fn given_child_ordered_before_parent_when_building_then_child_is_dropped() {
    let (tree, report) = build(&[
        Page {
            order: Some("2"),
            ..Page::new("general")
        },
        Page {
            order: Some("1"),
            category: Some("general"),
            ..Page::new("early")
        },
    ]);

    assert_eq!(tree.ids(), vec!["general"]);
    assert!(matches!(
        &report.diagnostics[0].error,
        PageError::Placement(DomainError::UnknownCategory { category, id })
            if category == "general" && id == "early"
    ));
}

#[test]
fn given_same_catalog_when_building_twice_then_tree_is_replaced_not_appended() {
    let builder = builder_with(
        catalog(&[Page::new("a"), Page::new("b"), Page::new("c")]),
        Arc::new(MemoryStoreResolver::new()),
    );
    let mut tree = PageTree::new();

    builder
        .create_pages(&mut tree, &PageContext::new())
        .unwrap();
    let first = tree.ids();
    builder
        .create_pages(&mut tree, &PageContext::new())
        .unwrap();

    assert_eq!(tree.ids(), first);
    assert_eq!(tree.len(), 3);
}

#[test]
fn given_non_page_elements_when_building_then_they_never_reach_the_tree() {
    let catalog = catalog(&[Page::new("a")]).with_element(
        PREFERENCE_EXTENSION_POINT_ID,
        ConfigurationElement::new("scope", "org.example")
            .with_attribute(ATTRIBUTE_ID, "scope")
            .with_attribute(ATTRIBUTE_CLASS, GENERIC_PAGE_CLASS),
    );
    let builder = builder_with(catalog, Arc::new(MemoryStoreResolver::new()));
    let mut tree = PageTree::new();

    let report = builder
        .create_pages(&mut tree, &PageContext::new())
        .unwrap();

    assert_eq!(tree.ids(), vec!["a"]);
    assert!(report.is_clean());
}

// ============================================================
// Injection and fatal failures
// ============================================================

#[test]
fn given_context_with_dependency_when_building_then_page_is_injected() {
    let builder = builder_with(
        catalog(&[Page {
            class: Some("test.ThemedPage"),
            title: Some("ignored, page titled itself"),
            ..Page::new("themed")
        }]),
        Arc::new(MemoryStoreResolver::new()),
    );
    let mut tree = PageTree::new();

    builder
        .create_pages(&mut tree, &PageContext::new().with(Theme("dark")))
        .unwrap();

    assert_eq!(page_at(&tree, "themed").title(), Some("dark theme"));
}

#[test]
fn given_context_without_dependency_when_building_then_injection_error_propagates() {
    let builder = builder_with(
        catalog(&[Page {
            class: Some("test.ThemedPage"),
            ..Page::new("themed")
        }]),
        Arc::new(MemoryStoreResolver::new()),
    );
    let mut tree = PageTree::new();

    let err = builder
        .create_pages(&mut tree, &PageContext::new())
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Injection { .. }));
}

struct OfflineCatalog;

impl ContributionCatalog for OfflineCatalog {
    fn configuration_elements_for(
        &self,
        _extension_point: &str,
    ) -> ApplicationResult<Vec<ConfigurationElement>> {
        Err(ApplicationError::CatalogUnavailable {
            message: "offline".to_string(),
        })
    }
}

#[test]
fn given_unavailable_catalog_when_building_then_error_propagates_and_tree_is_cleared() {
    let builder = builder_with(OfflineCatalog, Arc::new(MemoryStoreResolver::new()));
    let mut tree = PageTree::new();
    tree.add_to_root("stale", Box::new(TestPage::default()));

    let err = builder
        .create_pages(&mut tree, &PageContext::new())
        .unwrap_err();

    assert!(matches!(err, ApplicationError::CatalogUnavailable { .. }));
    assert!(tree.is_empty());
}
