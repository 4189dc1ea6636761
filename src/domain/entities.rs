//! Domain entities: contribution records as read from a catalog

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Extension point under which settings pages are contributed.
pub const PREFERENCE_EXTENSION_POINT_ID: &str = "prefreg.preferences";

/// Kind tag of a settings page contribution.
pub const ELEMENT_PAGE: &str = "page";

pub const ATTRIBUTE_CLASS: &str = "class";
pub const ATTRIBUTE_ID: &str = "id";
pub const ATTRIBUTE_ORDER: &str = "order";
pub const ATTRIBUTE_CATEGORY: &str = "category";
pub const ATTRIBUTE_TITLE: &str = "title";

/// Raw catalog entry: a kind tag, the declaring namespace and string attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationElement {
    /// Kind tag, e.g. `page`
    pub name: String,
    /// Identifier of the unit that declared this element
    pub namespace: String,
    pub attributes: BTreeMap<String, String>,
}

impl ConfigurationElement {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn is_page(&self) -> bool {
        self.name == ELEMENT_PAGE
    }
}

/// One declared settings page contribution.
///
/// Created fresh on every collection pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionRecord {
    /// Class reference resolved through the class registry
    pub implementation_ref: Option<String>,
    /// Tree node key
    pub id: Option<String>,
    /// Order as written by the contributor, possibly absent or malformed
    pub declared_order: Option<String>,
    /// Path of the parent node, `None` means root level
    pub category: Option<String>,
    pub title: Option<String>,
    /// Declaring namespace identifier, keys the backing config store
    pub namespace: String,
}

impl ContributionRecord {
    pub fn from_element(element: &ConfigurationElement) -> Self {
        let owned = |key: &str| element.attribute(key).map(str::to_string);
        Self {
            implementation_ref: owned(ATTRIBUTE_CLASS),
            id: owned(ATTRIBUTE_ID),
            declared_order: owned(ATTRIBUTE_ORDER),
            category: owned(ATTRIBUTE_CATEGORY),
            title: owned(ATTRIBUTE_TITLE),
            namespace: element.namespace.clone(),
        }
    }

    /// Declared order as an integer, `None` when absent or not a valid 32-bit integer.
    pub fn parsed_order(&self) -> Option<i32> {
        self.declared_order.as_deref()?.parse::<i32>().ok()
    }
}

impl fmt::Display for ContributionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}",
            self.id.as_deref().unwrap_or("<no id>"),
            self.namespace
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_element_when_converting_then_copies_known_attributes() {
        let element = ConfigurationElement::new(ELEMENT_PAGE, "org.example")
            .with_attribute(ATTRIBUTE_CLASS, "example.Page")
            .with_attribute(ATTRIBUTE_ID, "general")
            .with_attribute(ATTRIBUTE_ORDER, "3")
            .with_attribute("icon", "ignored.png");

        let record = ContributionRecord::from_element(&element);

        assert_eq!(record.implementation_ref.as_deref(), Some("example.Page"));
        assert_eq!(record.id.as_deref(), Some("general"));
        assert_eq!(record.parsed_order(), Some(3));
        assert_eq!(record.category, None);
        assert_eq!(record.namespace, "org.example");
    }

    #[test]
    fn given_malformed_order_when_parsing_then_returns_none() {
        for raw in ["", "abc", " 1", "1.5", "99999999999"] {
            let element =
                ConfigurationElement::new(ELEMENT_PAGE, "ns").with_attribute(ATTRIBUTE_ORDER, raw);
            let record = ContributionRecord::from_element(&element);
            assert_eq!(record.parsed_order(), None, "raw order {:?}", raw);
        }
    }

    #[test]
    fn given_signed_order_when_parsing_then_accepts_sign() {
        let element =
            ConfigurationElement::new(ELEMENT_PAGE, "ns").with_attribute(ATTRIBUTE_ORDER, "-4");
        assert_eq!(ContributionRecord::from_element(&element).parsed_order(), Some(-4));
    }
}
