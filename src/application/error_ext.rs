//! Error conversion helpers for I/O and domain results
//!
//! Provides extension traits for attaching path context to lower-level errors.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::ParseError;

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&path)
    ///     .with_path_context("read tree file", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Extension trait tagging a parse failure with the file it came from.
pub trait ParseResultExt<T> {
    fn in_file(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> ParseResultExt<T> for Result<T, ParseError> {
    fn in_file(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
