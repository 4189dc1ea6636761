//! Application services

pub mod collector;
pub mod page_tree;

pub use collector::ContributionCollector;
pub use page_tree::{BuildReport, PageTree, PageTreeBuilder};
