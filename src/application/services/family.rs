//! Family tree service
//!
//! Loads tree files through the filesystem boundary and runs queries on them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, ParseResultExt};
use crate::domain::{DomainError, FamilyTree, ParseOptions};
use crate::infrastructure::traits::{FileSystem, SelectionItem};

/// Answer to a most-recent-common-ancestor query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorQuery {
    pub first: String,
    pub second: String,
    pub ancestor: String,
}

/// Service for loading family trees and querying them.
pub struct FamilyTreeService {
    fs: Arc<dyn FileSystem>,
    options: ParseOptions,
}

impl FamilyTreeService {
    /// Create a new family tree service.
    pub fn new(fs: Arc<dyn FileSystem>, options: ParseOptions) -> Self {
        Self { fs, options }
    }

    /// Read `path` and build its tree, stopping at the first malformed line.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<FamilyTree> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read tree file", path)?;
        let tree = FamilyTree::build_with_options(content.lines(), self.options)
            .inspect_err(|e| {
                warn!(
                    line_number = e.line_number(),
                    "rejected {} at line {}",
                    path.display(),
                    e.line_number()
                )
            })
            .in_file(path)?;
        debug!(
            "load: {} nodes from {}",
            tree.arena().len(),
            path.display()
        );
        Ok(tree)
    }

    /// Most recent common ancestor of `first` and `second` in the tree at `path`.
    pub fn most_recent_common_ancestor(
        &self,
        path: &Path,
        first: &str,
        second: &str,
    ) -> ApplicationResult<AncestorQuery> {
        let tree = self.load(path)?;
        let ancestor = tree
            .most_recent_common_ancestor(first, second)
            .map_err(DomainError::from)?;
        Ok(AncestorQuery {
            first: first.to_string(),
            second: second.to_string(),
            ancestor: ancestor.name().to_string(),
        })
    }

    /// Ancestor names of `name` in the tree at `path`, nearest first.
    pub fn ancestors(&self, path: &Path, name: &str) -> ApplicationResult<Vec<String>> {
        let tree = self.load(path)?;
        let chain = tree.ancestors(name).map_err(DomainError::from)?;
        Ok(chain.iter().map(|node| node.name().to_string()).collect())
    }

    /// Directory to browse for tree files: `configured` if it exists, else the
    /// current directory.
    pub fn resolve_data_dir(&self, configured: &Path) -> PathBuf {
        if self.fs.is_dir(configured) {
            configured.to_path_buf()
        } else {
            warn!(
                "data directory {} not found, using current directory",
                configured.display()
            );
            PathBuf::from(".")
        }
    }

    /// Tree files below `dir` whose extension is in `extensions`, sorted by path.
    #[instrument(level = "debug", skip(self))]
    pub fn list_tree_files(
        &self,
        dir: &Path,
        extensions: &[String],
    ) -> ApplicationResult<Vec<PathBuf>> {
        if !self.fs.is_dir(dir) {
            return Err(ApplicationError::NoTreeFiles(dir.to_path_buf()));
        }

        let files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| extensions.iter().any(|wanted| wanted == ext))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .sorted()
            .collect();

        debug!("list_tree_files: found {} files", files.len());
        Ok(files)
    }

    /// Selection items for the tree files below `dir`, displayed relative to it.
    pub fn selection_items(
        &self,
        dir: &Path,
        extensions: &[String],
    ) -> ApplicationResult<Vec<SelectionItem>> {
        let files = self.list_tree_files(dir, extensions)?;
        if files.is_empty() {
            return Err(ApplicationError::NoTreeFiles(dir.to_path_buf()));
        }
        Ok(files
            .into_iter()
            .map(|path| SelectionItem {
                display: path
                    .strip_prefix(dir)
                    .unwrap_or(&path)
                    .display()
                    .to_string(),
                value: path.display().to_string(),
            })
            .collect())
    }
}
