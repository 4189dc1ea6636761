//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the page tree structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("category '{category}' not found for page '{id}'")]
    UnknownCategory { category: String, id: String },
}
