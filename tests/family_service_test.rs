//! Tests for FamilyTreeService against real files

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use famtree::application::services::FamilyTreeService;
use famtree::application::ApplicationError;
use famtree::domain::{DomainError, LookupError, ParseError, ParseOptions};
use famtree::infrastructure::traits::{FileSystem, RealFileSystem};

const TREES: &str = "tests/resources/trees";

fn service() -> FamilyTreeService {
    FamilyTreeService::new(Arc::new(RealFileSystem), ParseOptions::default())
}

fn create_tree_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    std::fs::write(&path, content).expect("write tree file");
    path
}

fn txt() -> Vec<String> {
    vec!["txt".to_string()]
}

#[test]
fn given_tree_file_when_loading_then_builds_all_nodes() {
    // Arrange
    let path = Path::new(TREES).join("royals.txt");

    // Act
    let tree = service().load(&path).unwrap();

    // Assert
    assert_eq!(tree.root().map(|r| r.name()), Some("Elizabeth"));
    assert_eq!(tree.arena().len(), 14);
    assert_eq!(tree.arena().depth(), 4);
}

#[test]
fn given_crlf_line_endings_when_loading_then_names_have_no_carriage_return() {
    let temp = TempDir::new().unwrap();
    let path = create_tree_file(&temp, "windows.txt", "A: B, C\r\nB: D\r\n");

    let tree = service().load(&path).unwrap();

    assert!(tree.find("D").is_some());
    assert!(tree.find("C").is_some());
}

#[test]
fn given_malformed_file_when_loading_then_parse_error_names_path_and_line() {
    let path = Path::new(TREES).join("broken.txt");

    let err = service().load(&path).unwrap_err();

    match err {
        ApplicationError::Parse { path: err_path, source } => {
            assert_eq!(err_path, path);
            assert_eq!(
                source,
                ParseError::ParentNotFound {
                    line_number: 3,
                    name: "E".to_string()
                }
            );
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn given_missing_file_when_loading_then_operation_failed_with_path() {
    let err = service()
        .load(Path::new("/nonexistent/family.txt"))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("/nonexistent/family.txt"));
}

#[test]
fn given_hobbits_file_when_querying_then_answers_bilbo() {
    let path = Path::new(TREES).join("hobbits.txt");

    let answer = service()
        .most_recent_common_ancestor(&path, "Sam", "Merry")
        .unwrap();

    assert_eq!(answer.ancestor, "Bilbo");
    assert_eq!(answer.first, "Sam");
    assert_eq!(answer.second, "Merry");
}

#[test]
fn given_unknown_name_when_querying_then_domain_lookup_error() {
    let path = Path::new(TREES).join("hobbits.txt");

    let err = service()
        .most_recent_common_ancestor(&path, "Sam", "Gollum")
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::Lookup(LookupError::NotFound(ref name))) if name == "Gollum"
    ));
}

#[test]
fn given_leaf_when_listing_ancestors_then_nearest_first() {
    let path = Path::new(TREES).join("royals.txt");

    let chain = service().ancestors(&path, "Louis").unwrap();

    assert_eq!(chain, vec!["William", "Charles", "Elizabeth"]);
}

#[test]
fn given_directory_when_listing_then_returns_sorted_matching_files_recursively() {
    let files = service().list_tree_files(Path::new(TREES), &txt()).unwrap();

    let names: Vec<_> = files
        .iter()
        .map(|p| p.strip_prefix(TREES).unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["broken.txt", "hobbits.txt", "nested/deep.txt", "royals.txt"]
    );
}

#[test]
fn given_other_extension_when_listing_then_only_those_files() {
    let files = service()
        .list_tree_files(Path::new(TREES), &["md".to_string()])
        .unwrap();

    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("notes.md"));
}

#[test]
fn given_missing_directory_when_listing_then_no_tree_files_error() {
    let err = service()
        .list_tree_files(Path::new("/nonexistent/dir"), &txt())
        .unwrap_err();

    assert!(matches!(err, ApplicationError::NoTreeFiles(_)));
}

#[test]
fn given_empty_directory_when_building_selection_then_no_tree_files_error() {
    let temp = TempDir::new().unwrap();

    let err = service().selection_items(temp.path(), &txt()).unwrap_err();

    assert!(matches!(err, ApplicationError::NoTreeFiles(ref dir) if dir == temp.path()));
}

#[test]
fn given_directory_when_building_selection_then_display_is_relative() {
    let temp = TempDir::new().unwrap();
    let path = create_tree_file(&temp, "sub/family.txt", "A: B\n");

    let items = service().selection_items(temp.path(), &txt()).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(PathBuf::from(&items[0].display), PathBuf::from("sub/family.txt"));
    assert_eq!(PathBuf::from(&items[0].value), path);
}

#[test]
fn given_existing_data_dir_when_resolving_then_kept() {
    let temp = TempDir::new().unwrap();

    let dir = service().resolve_data_dir(temp.path());

    assert_eq!(dir, temp.path());
}

#[test]
fn given_missing_data_dir_when_resolving_then_current_directory() {
    let dir = service().resolve_data_dir(Path::new("/nonexistent/data"));

    assert_eq!(dir, PathBuf::from("."));
}

/// Filesystem whose reads always fail.
struct UnreadableFileSystem;

impl FileSystem for UnreadableFileSystem {
    fn read_to_string(&self, _path: &Path) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"))
    }

    fn is_dir(&self, _path: &Path) -> bool {
        false
    }
}

#[test]
fn given_undecodable_file_when_loading_then_io_error_surfaces_unmodified() {
    let service = FamilyTreeService::new(Arc::new(UnreadableFileSystem), ParseOptions::default());

    let err = service.load(Path::new("family.txt")).unwrap_err();

    let source = std::error::Error::source(&err).expect("io source");
    assert_eq!(source.to_string(), "stream did not contain valid UTF-8");
}
