//! Class registry: maps class references to factories

use std::collections::HashMap;
use std::fmt;

use crate::application::page::{Contribution, GenericPage, GENERIC_PAGE_CLASS};
use crate::application::ConstructionError;

/// What a factory returns; errors are wrapped into [`ConstructionError::Failed`].
pub type FactoryResult = Result<Box<dyn Contribution>, Box<dyn std::error::Error + Send + Sync>>;

type Factory = Box<dyn Fn() -> FactoryResult + Send + Sync>;

/// Registry of constructible classes.
#[derive(Default)]
pub struct ClassRegistry {
    factories: HashMap<String, Factory>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in page classes.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_default::<GenericPage>(GENERIC_PAGE_CLASS);
        registry
    }

    /// Registers (or replaces) the factory for `class`.
    pub fn register<F>(&mut self, class: impl Into<String>, factory: F)
    where
        F: Fn() -> FactoryResult + Send + Sync + 'static,
    {
        self.factories.insert(class.into(), Box::new(factory));
    }

    pub fn register_default<T>(&mut self, class: impl Into<String>)
    where
        T: Contribution + Default + 'static,
    {
        self.register(class, || Ok(Box::new(T::default()) as Box<dyn Contribution>));
    }

    pub fn contains(&self, class: &str) -> bool {
        self.factories.contains_key(class)
    }

    /// Registered class references, sorted.
    pub fn classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        classes.sort_unstable();
        classes
    }

    pub fn create(&self, class: &str) -> Result<Box<dyn Contribution>, ConstructionError> {
        let factory = self
            .factories
            .get(class)
            .ok_or_else(|| ConstructionError::UnknownClass {
                class: class.to_string(),
            })?;
        factory().map_err(|source| ConstructionError::Failed {
            class: class.to_string(),
            source,
        })
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.classes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_builtin_registry_when_creating_generic_page_then_yields_settings_page() {
        let registry = ClassRegistry::with_builtin();
        let object = registry.create(GENERIC_PAGE_CLASS).unwrap();
        assert!(object.into_settings_page().is_some());
    }

    #[test]
    fn given_unknown_class_when_creating_then_fails_with_unknown_class() {
        let registry = ClassRegistry::new();
        let err = registry.create("nope").unwrap_err();
        assert!(matches!(err, ConstructionError::UnknownClass { class } if class == "nope"));
    }

    #[test]
    fn given_failing_factory_when_creating_then_wraps_cause() {
        let mut registry = ClassRegistry::new();
        registry.register("broken", || Err("missing dependency".into()));
        let err = registry.create("broken").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot instantiate 'broken': missing dependency"
        );
    }
}
