use mailsink::{allocate, Error, Spool};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::thread;

#[test]
fn allocates_a_fresh_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let (path, file) = allocate(dir.path(), "1234", "eml").unwrap();
    assert!(path.exists());
    assert_eq!(file.metadata().unwrap().len(), 0);
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("1234_"));
    assert!(name.ends_with(".eml"));
}

#[test]
fn concurrent_allocations_never_collide() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Mutex::new(HashSet::new());
    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..16 {
                    let (path, _file) = allocate(dir.path(), "99", "eml").unwrap();
                    assert!(paths.lock().unwrap().insert(path), "path allocated twice");
                }
            });
        }
    });
    assert_eq!(paths.lock().unwrap().len(), 8 * 16);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 8 * 16);
}

#[test]
fn missing_directory_is_an_error() {
    let err = allocate(Path::new("/no/such/directory"), "1", "eml").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn spool_files_carry_timestamp_and_extension() {
    let dir = tempfile::tempdir().unwrap();
    let spool = Spool::new(dir.path(), "eml");
    let (path, _file) = spool.create().unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    let (stem, ext) = name.rsplit_once('.').unwrap();
    assert_eq!(ext, "eml");
    let (timestamp, random) = stem.split_once('_').unwrap();
    assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
    assert!(random.chars().all(|c| c.is_ascii_digit()));
}
