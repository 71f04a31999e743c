//! famtree: family trees from `Parent: Child, Child` files
//!
//! Layers, innermost first:
//! - [`domain`]: the arena tree, line parser and ancestor queries
//! - [`application`]: services loading tree files through I/O traits
//! - [`infrastructure`]: real I/O implementations and wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
