//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Malformed tree input. Fatal to the build; ingestion stops at the offending line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing colon in line {line_number}: {line}")]
    MissingColon { line_number: usize, line: String },

    #[error("parent not found in line {line_number}: {name}")]
    ParentNotFound { line_number: usize, name: String },

    #[error("duplicate name in line {line_number}: {name}")]
    DuplicateName { line_number: usize, name: String },

    #[error("empty parent name in line {line_number}")]
    EmptyParentName { line_number: usize },
}

impl ParseError {
    /// 1-based number of the line that failed.
    pub fn line_number(&self) -> usize {
        match self {
            ParseError::MissingColon { line_number, .. }
            | ParseError::ParentNotFound { line_number, .. }
            | ParseError::DuplicateName { line_number, .. }
            | ParseError::EmptyParentName { line_number } => *line_number,
        }
    }
}

/// Failed query against a built tree. The tree itself stays valid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("node not found: {0}")]
    NotFound(String),

    #[error("no common ancestor for {first} and {second}")]
    NoCommonAncestor { first: String, second: String },
}

/// Domain errors represent tree construction and query violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}
