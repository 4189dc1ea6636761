//! Application layer: page capability, class registry and services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod context;
pub mod error;
pub mod error_ext;
pub mod factory;
pub mod page;
pub mod services;

pub use context::PageContext;
pub use error::{ApplicationError, ApplicationResult, ConstructionError, Diagnostic, PageError};
pub use error_ext::IoResultExt;
pub use factory::{ClassRegistry, FactoryResult};
pub use page::{Contribution, GenericPage, SettingsPage, GENERIC_PAGE_CLASS};
