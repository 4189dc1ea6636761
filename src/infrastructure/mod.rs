//! Infrastructure layer: collaborator implementations and DI container
//!
//! Catalogs, config stores and injection live here, behind the traits in `traits`.

pub mod catalog;
pub mod di;
pub mod error;
pub mod store;
pub mod traits;

pub use catalog::{ManifestCatalog, StaticCatalog};
pub use di::ServiceContainer;
pub use error::{InfraError, InfraResult};
pub use store::{FileStore, FileStoreResolver, MemoryStore, MemoryStoreResolver};
