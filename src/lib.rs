//! prefreg: settings page registry
//!
//! Collects settings page contributions from a catalog, orders them
//! deterministically, instantiates them through a class registry and composes
//! them into a page tree, each page wired to the config store of its namespace.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
