use std::fs;
use std::path::Path;

use ferret_engine::{commit_part, create_part_file, ensure_output_dir, part_path};
use tempfile::TempDir;

#[test]
fn part_path_appends_suffix() {
    assert_eq!(
        part_path(Path::new("/tmp/dl/archive.tar.gz")),
        Path::new("/tmp/dl/archive.tar.gz.part")
    );
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn rejects_file_as_output_dir() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    assert!(ensure_output_dir(&file_path).is_err());
    assert!(create_part_file(&file_path.join("doc.part")).is_err());
}

#[test]
fn commit_replaces_existing_download() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("nested").join("doc.txt");
    let tmp = part_path(&local);

    create_part_file(&tmp).unwrap();
    fs::write(&tmp, "first").unwrap();
    commit_part(&tmp, &local).unwrap();
    assert_eq!(fs::read_to_string(&local).unwrap(), "first");
    assert!(!tmp.exists());

    create_part_file(&tmp).unwrap();
    fs::write(&tmp, "second").unwrap();
    commit_part(&tmp, &local).unwrap();
    assert_eq!(fs::read_to_string(&local).unwrap(), "second");
}

#[test]
fn failed_commit_keeps_the_part_file() {
    let temp = TempDir::new().unwrap();
    let tmp = temp.path().join("doc.txt.part");
    fs::write(&tmp, "data").unwrap();

    let blocked = temp.path().join("missing-dir").join("doc.txt");
    assert!(commit_part(&tmp, &blocked).is_err());
    assert_eq!(fs::read_to_string(&tmp).unwrap(), "data");
}
