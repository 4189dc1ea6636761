//! Typed context bundle handed to pages during injection

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::application::{ApplicationError, ApplicationResult};

/// Values keyed by their type, one value per type.
#[derive(Clone, Default)]
pub struct PageContext {
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Stores `value`, replacing an earlier value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.insert_arc(Arc::new(value));
    }

    pub fn insert_arc<T: Any + Send + Sync>(&mut self, value: Arc<T>) {
        self.values.insert(TypeId::of::<T>(), value);
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.values
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }

    /// Like [`get`](Self::get), failing with an injection error when absent.
    pub fn require<T: Any + Send + Sync>(&self) -> ApplicationResult<Arc<T>> {
        self.get::<T>().ok_or_else(|| ApplicationError::Injection {
            dependency: type_name::<T>().to_string(),
        })
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("values", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Theme(&'static str);

    #[test]
    fn given_inserted_value_when_getting_then_returns_same_value() {
        let context = PageContext::new().with(Theme("dark"));
        assert_eq!(*context.get::<Theme>().unwrap(), Theme("dark"));
        assert!(context.contains::<Theme>());
    }

    #[test]
    fn given_missing_value_when_requiring_then_names_the_type() {
        let context = PageContext::new();
        let err = context.require::<Theme>().unwrap_err();
        match err {
            ApplicationError::Injection { dependency } => assert!(dependency.ends_with("Theme")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn given_second_insert_when_getting_then_latest_value_wins() {
        let mut context = PageContext::new();
        context.insert(Theme("dark"));
        context.insert(Theme("light"));
        assert_eq!(context.len(), 1);
        assert_eq!(*context.require::<Theme>().unwrap(), Theme("light"));
    }
}
