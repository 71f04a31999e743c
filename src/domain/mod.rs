//! Domain layer: the family tree and its queries
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;

pub use arena::{NodeRef, TreeArena, TreeNode};
pub use builder::{parse_line, FamilyTree, LookupResult, ParseOptions, ParseResult, ParsedLine};
pub use error::{DomainError, LookupError, ParseError};

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string, leaving it unchanged on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
