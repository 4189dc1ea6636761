//! Application-level errors
//!
//! Two tiers: `ApplicationError` aborts an operation and propagates to the caller,
//! `PageError` belongs to a single contribution and is reported as a `Diagnostic`
//! while the rest of the tree is still built.

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::domain::{ContributionRecord, DomainError};

/// Fatal errors, raised by collaborators or configuration.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("contribution catalog unavailable: {message}")]
    CatalogUnavailable { message: String },

    #[error("injection failed: missing {dependency}")]
    Injection { dependency: String },

    #[error("config store for '{namespace}' unavailable: {message}")]
    Store { namespace: String, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// A class reference could not be turned into an object.
#[derive(Error, Debug)]
pub enum ConstructionError {
    #[error("no factory registered for class '{class}'")]
    UnknownClass { class: String },

    #[error("cannot instantiate '{class}': {source}")]
    Failed {
        class: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Recoverable failure of one contribution; the record is skipped.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("{attribute} attribute required")]
    MissingAttribute { attribute: &'static str },

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("class '{class}' must implement SettingsPage")]
    NotASettingsPage { class: String },

    #[error(transparent)]
    Placement(#[from] DomainError),
}

/// A skipped contribution and the reason it was skipped.
#[derive(Debug)]
pub struct Diagnostic {
    /// Resolved order key of the record
    pub order: i64,
    pub id: Option<String>,
    pub namespace: String,
    pub error: PageError,
}

impl Diagnostic {
    /// Creates the diagnostic and logs it.
    pub fn new(order: i64, record: &ContributionRecord, error: PageError) -> Self {
        warn!("skipping contribution {} (order {}): {}", record, order, error);
        Self {
            order,
            id: record.id.clone(),
            namespace: record.namespace.clone(),
            error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}: {}",
            self.id.as_deref().unwrap_or("<no id>"),
            self.namespace,
            self.error
        )
    }
}
