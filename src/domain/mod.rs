//! Domain layer: contribution records, ordering and the page tree
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod ordering;

pub use arena::{PageNode, PreferenceTree, TreeIterator, PATH_SEPARATOR};
pub use entities::*;
pub use error::DomainError;
pub use ordering::{resolve_order, OrderedCollection};
