use super::*;
use crate::vfs::{MemoryFs, VirtualFs};

#[test]
fn test_dirname_nested() {
    assert_eq!(dirname("a/b/c"), "a/b");
    assert_eq!(dirname("/pkg/data.txt"), "/pkg");
}

#[test]
fn test_dirname_single_segment() {
    assert_eq!(dirname("a"), "");
    assert_eq!(dirname(""), "");
}

#[test]
fn test_dirname_trailing_slash() {
    // The empty last segment is the one that gets dropped
    assert_eq!(dirname("a/b/"), "a/b");
}

#[test]
fn test_join_paths_strips_slashes() {
    assert_eq!(join_paths(&["/a/", "/b/", "c"]), "/a/b/c");
}

#[test]
fn test_join_paths_drops_dot_and_empty() {
    assert_eq!(join_paths(&["a", ".", "b"]), "a/b");
    assert_eq!(join_paths(&[".", "", "file.txt"]), "file.txt");
}

#[test]
fn test_join_paths_trims_whitespace() {
    assert_eq!(join_paths(&["  lib ", " /mod.py "]), "lib/mod.py");
}

#[test]
fn test_join_paths_relative_when_first_is_relative() {
    assert_eq!(join_paths(&["a/", "/b"]), "a/b");
}

#[test]
fn test_join_paths_leading_slash_only_from_first_part() {
    // A trimmed first part is still checked untrimmed
    assert_eq!(join_paths(&[" /a", "b"]), "a/b");
    assert_eq!(join_paths(&["/", "b"]), "/b");
}

#[test]
fn test_join_paths_empty_input() {
    let parts: [&str; 0] = [];
    assert_eq!(join_paths(&parts), "");
}

#[test]
fn test_resolve_from_root_cwd() {
    assert_eq!(resolve_from("/", "a/b.txt"), "/a/b.txt");
    assert_eq!(resolve_from("/", "./a/./b.txt"), "/a/b.txt");
}

#[test]
fn test_resolve_from_pops_parent() {
    assert_eq!(resolve_from("/x", "a/../y"), "/x/y");
}

#[test]
fn test_resolve_from_parent_on_empty_stack_is_noop() {
    // `..` only pops segments of the path itself, never the cwd
    assert_eq!(resolve_from("/x/z", "../y"), "/x/z/y");
    assert_eq!(resolve_from("/x", "../../y"), "/x/y");
}

#[test]
fn test_resolve_from_absolute_path_joins_under_cwd() {
    assert_eq!(resolve_from("/home", "/etc/conf"), "/home/etc/conf");
}

#[test]
fn test_resolve_from_collapses_leading_slashes() {
    assert_eq!(resolve_from("//", "a"), "/a");
    assert_eq!(resolve_from("", "a"), "/a");
}

#[test]
fn test_resolve_from_empty_path_is_cwd() {
    assert_eq!(resolve_from("/work", ""), "/work");
    assert_eq!(resolve_from("/work", "./."), "/work");
}

#[test]
fn test_resolve_uses_fs_cwd() {
    let fs = MemoryFs::builder().cwd("/home/user").build();
    assert_eq!(resolve(&fs, "data/file.txt"), "/home/user/data/file.txt");
}

#[test]
fn test_mkdir_tree_creates_each_level() {
    let fs = MemoryFs::builder().extended(false).build();
    mkdir_tree(&fs, "a/b/c").unwrap();

    assert!(fs.is_dir("/a"));
    assert!(fs.is_dir("/a/b"));
    assert!(fs.is_dir("/a/b/c"));
}

#[test]
fn test_mkdir_tree_skips_dot_segments() {
    let fs = MemoryFs::builder().extended(false).build();
    mkdir_tree(&fs, "./lib/./pkg").unwrap();

    assert!(fs.is_dir("/lib"));
    assert!(fs.is_dir("/lib/pkg"));
}

#[test]
fn test_mkdir_tree_absolute_path() {
    let fs = MemoryFs::builder().cwd("/home").extended(false).build();
    mkdir_tree(&fs, "/opt/data").unwrap();

    assert!(fs.is_dir("/opt/data"));
    assert!(!fs.is_dir("/home/opt"));
}

#[test]
fn test_mkdir_tree_is_idempotent() {
    let fs = MemoryFs::builder().extended(false).build();
    mkdir_tree(&fs, "a/b").unwrap();
    assert!(mkdir_tree(&fs, "a/b").is_ok());
}

#[test]
fn test_mkdir_tree_empty_path_does_nothing() {
    let fs = MemoryFs::builder().extended(false).build();
    mkdir_tree(&fs, "").unwrap();
    assert_eq!(fs.cwd(), "/");
    assert_eq!(fs.file_count(), 0);
}

#[test]
fn test_mkdir_tree_propagates_fs_errors() {
    let fs = MemoryFs::builder().extended(false).build();
    fs.write_file("/a", b"file".to_vec()).unwrap();

    let err = mkdir_tree(&fs, "a/b").unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
}

#[test]
fn test_absolutize_relative_and_absolute() {
    assert_eq!(absolutize("/", "a/./b"), "/a/b");
    assert_eq!(absolutize("/x", "../y"), "/y");
    assert_eq!(absolutize("/home", "/etc/conf"), "/etc/conf");
}

#[test]
fn test_absolutize_parent_at_root_stays_at_root() {
    assert_eq!(absolutize("/", "../../a"), "/a");
    assert_eq!(absolutize("/", ".."), "/");
}

#[test]
fn test_absolutize_strips_trailing_slash() {
    assert_eq!(absolutize("/", "a/b/"), "/a/b");
}
