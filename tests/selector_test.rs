//! Tests for interactive tree file selection and command dispatch

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tempfile::TempDir;

use famtree::cli::commands::resolve_tree_file;
use famtree::cli::{execute_with, Cli, CliError};
use famtree::config::Settings;
use famtree::exitcode;
use famtree::infrastructure::di::ServiceContainer;
use famtree::infrastructure::traits::{RealFileSystem, SelectionItem, Selector};

/// Mock selector that returns a predetermined selection
struct MockSelector {
    selection_index: Option<usize>,
}

impl MockSelector {
    fn new(selection_index: Option<usize>) -> Self {
        Self { selection_index }
    }
}

impl Selector for MockSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        _prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        match self.selection_index {
            Some(idx) if idx < items.len() => Ok(Some(items[idx].clone())),
            Some(_) => Err("Index out of bounds".to_string()),
            None => Ok(None), // User cancelled
        }
    }
}

fn create_tree_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write tree file");
    path
}

fn container(data_dir: &Path, selection_index: Option<usize>) -> ServiceContainer {
    let settings = Settings {
        data_dir: data_dir.to_path_buf(),
        ..Settings::default()
    };
    ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(MockSelector::new(selection_index)),
    )
}

#[test]
fn given_explicit_file_when_resolving_then_selector_is_not_asked() {
    let temp = TempDir::new().unwrap();
    let container = container(temp.path(), Some(99));

    let path = resolve_tree_file(&container, Some(Path::new("given.txt"))).unwrap();

    assert_eq!(path, PathBuf::from("given.txt"));
}

#[test]
fn given_data_dir_when_selecting_second_then_returns_its_path() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let _alpha = create_tree_file(&temp, "alpha.txt", "A: B\n");
    let beta = create_tree_file(&temp, "beta.txt", "C: D\n");
    let _ignored = create_tree_file(&temp, "readme.md", "# docs\n");
    let container = container(temp.path(), Some(1));

    // Act
    let path = resolve_tree_file(&container, None).unwrap();

    // Assert
    assert_eq!(path, beta);
}

#[test]
fn given_user_cancels_when_selecting_then_cancelled_with_failure_exit() {
    let temp = TempDir::new().unwrap();
    create_tree_file(&temp, "alpha.txt", "A: B\n");
    let container = container(temp.path(), None);

    let err = resolve_tree_file(&container, None).unwrap_err();

    assert!(matches!(err, CliError::Cancelled));
    assert_eq!(err.exit_code(), exitcode::FAILURE);
}

#[test]
fn given_selector_failure_when_selecting_then_software_exit() {
    let temp = TempDir::new().unwrap();
    create_tree_file(&temp, "alpha.txt", "A: B\n");
    let container = container(temp.path(), Some(5));

    let err = resolve_tree_file(&container, None).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::SOFTWARE);
    assert!(err.to_string().contains("Index out of bounds"));
}

#[test]
fn given_empty_data_dir_when_selecting_then_noinput_exit() {
    let temp = TempDir::new().unwrap();
    let container = container(temp.path(), Some(0));

    let err = resolve_tree_file(&container, None).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_selected_file_when_running_mrca_then_succeeds() {
    let temp = TempDir::new().unwrap();
    create_tree_file(&temp, "hobbits.txt", "Bilbo: Frodo, Merry\nFrodo: Sam\n");
    let container = container(temp.path(), Some(0));
    let cli = Cli::try_parse_from(["famtree", "mrca", "Sam", "Merry"]).unwrap();

    let result = execute_with(&cli, &container);

    assert!(result.is_ok(), "mrca failed: {:?}", result.err());
}

#[test]
fn given_malformed_file_when_running_show_then_dataerr_exit() {
    let temp = TempDir::new().unwrap();
    let path = create_tree_file(&temp, "bad.txt", "A: B\nno colon here\n");
    let container = container(temp.path(), None);
    let cli = Cli::try_parse_from(["famtree", "show", path.to_str().unwrap()]).unwrap();

    let err = execute_with(&cli, &container).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn given_unknown_name_when_running_ancestors_then_failure_exit() {
    let temp = TempDir::new().unwrap();
    let path = create_tree_file(&temp, "hobbits.txt", "Bilbo: Frodo\n");
    let container = container(temp.path(), None);
    let cli = Cli::try_parse_from([
        "famtree",
        "ancestors",
        "Gollum",
        "--file",
        path.to_str().unwrap(),
    ])
    .unwrap();

    let err = execute_with(&cli, &container).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::FAILURE);
    assert_eq!(err.to_string(), "node not found: Gollum");
}
