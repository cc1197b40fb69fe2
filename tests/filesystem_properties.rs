//! Behavioral properties of the filesystem adapter and file handles,
//! checked against every bundled backend

mod common;

use common::{test_fs, Backend};
use rstest::rstest;
use webdavfs::{FsError, Whence};

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_round_trip(#[case] backend: Backend) {
    let fs = test_fs(backend);
    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

    let mut file = fs.open_file("/blob.bin", "wb").unwrap();
    assert_eq!(file.write(&payload).unwrap(), payload.len());
    file.close().unwrap();

    let mut file = fs.open_file("/blob.bin", "rb").unwrap();
    assert_eq!(file.read(None).unwrap(), payload);
    file.close().unwrap();

    let info = fs.stat("/blob.bin").unwrap();
    assert!(info.is_file());
    assert_eq!(info.size(), 4096);
    assert_eq!(info.name(), "blob.bin");
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_seek_bounds(#[case] backend: Backend) {
    let fs = test_fs(backend);
    fs.set_bytes("/s", b"0123456789").unwrap();
    let mut file = fs.open_file("/s", "rb").unwrap();

    assert_eq!(file.seek(0, Whence::Start).unwrap(), 0);
    assert_eq!(file.tell(), 0);
    assert!(matches!(file.seek(-1, Whence::Start), Err(FsError::InvalidArgument { .. })));
    assert!(matches!(file.seek(1, Whence::End), Err(FsError::InvalidArgument { .. })));

    file.seek(2, Whence::Start).unwrap();
    assert_eq!(file.seek(-5, Whence::Current).unwrap(), 0);
    assert_eq!(file.seek(-3, Whence::End).unwrap(), 7);
    assert_eq!(file.read(None).unwrap(), b"789");
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_truncate_grow_pads_with_zeros(#[case] backend: Backend) {
    let fs = test_fs(backend);
    fs.set_bytes("/t", b"abc").unwrap();

    let mut file = fs.open_file("/t", "r+b").unwrap();
    assert_eq!(file.truncate(Some(5)).unwrap(), 5);
    file.close().unwrap();
    assert_eq!(fs.get_bytes("/t").unwrap(), b"abc\0\0");

    fs.set_bytes("/t", b"abc").unwrap();
    let mut file = fs.open_file("/t", "r+b").unwrap();
    assert_eq!(file.truncate(Some(1)).unwrap(), 1);
    file.close().unwrap();
    assert_eq!(fs.get_bytes("/t").unwrap(), b"a");
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_missing_file_policy(#[case] backend: Backend) {
    let fs = test_fs(backend);

    let err = fs.open_file("/missing.txt", "r").unwrap_err();
    assert!(matches!(err, FsError::ResourceNotFound { ref path, .. } if path == "/missing.txt"));

    let file = fs.open_file("/missing.txt", "w").unwrap();
    drop(file);
    assert!(fs.exists("/missing.txt").unwrap());
    assert_eq!(fs.get_bytes("/missing.txt").unwrap(), b"");
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_directory_creation_idempotence(#[case] backend: Backend) {
    let fs = test_fs(backend);
    fs.make_dir("/d", false).unwrap();
    fs.make_dir("/d", true).unwrap();
    assert!(matches!(fs.make_dir("/d", false), Err(FsError::AlreadyExists { .. })));
    assert!(fs.is_dir("/d").unwrap());
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_non_empty_directory_protection(#[case] backend: Backend) {
    let fs = test_fs(backend);
    fs.make_dir("/d", false).unwrap();
    assert!(fs.create("/d/file", false).unwrap());

    assert!(matches!(fs.remove_dir("/d"), Err(FsError::DirectoryNotEmpty { .. })));
    fs.remove("/d/file").unwrap();
    fs.remove_dir("/d").unwrap();
    assert!(!fs.exists("/d").unwrap());
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_overwrite_gating(#[case] backend: Backend) {
    let fs = test_fs(backend);
    fs.set_bytes("/a", b"from a").unwrap();
    fs.set_bytes("/b", b"from b").unwrap();

    assert!(matches!(fs.copy("/a", "/b", false), Err(FsError::AlreadyExists { ref path, .. }) if path == "/b"));
    assert_eq!(fs.get_bytes("/b").unwrap(), b"from b");

    fs.copy("/a", "/b", true).unwrap();
    assert_eq!(fs.get_bytes("/b").unwrap(), b"from a");

    fs.set_bytes("/c", b"from c").unwrap();
    assert!(matches!(fs.move_to("/c", "/a", false), Err(FsError::AlreadyExists { .. })));
    fs.move_to("/c", "/a", true).unwrap();
    assert_eq!(fs.get_bytes("/a").unwrap(), b"from c");
    assert!(!fs.exists("/c").unwrap());
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_list_requires_directory(#[case] backend: Backend) {
    let fs = test_fs(backend);
    fs.make_dir("/docs", false).unwrap();
    fs.set_bytes("/docs/one", b"1").unwrap();
    fs.make_dir("/docs/sub", false).unwrap();

    let mut names = fs.list("/docs").unwrap();
    names.sort();
    assert_eq!(names, vec!["one", "sub"]);

    assert!(matches!(fs.list("/docs/one"), Err(FsError::NotADirectory { .. })));
    assert!(fs.list("/nope").unwrap_err().is_not_found());
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_random_access_edit(#[case] backend: Backend) {
    let fs = test_fs(backend);
    fs.set_bytes("/doc.txt", b"Hello, World!").unwrap();

    let mut file = fs.open_file("/doc.txt", "r+b").unwrap();
    file.seek(7, Whence::Start).unwrap();
    file.write(b"Rust!").unwrap();
    file.seek(0, Whence::Start).unwrap();
    assert_eq!(file.read(Some(5)).unwrap(), b"Hello");
    file.close().unwrap();

    assert_eq!(fs.get_bytes("/doc.txt").unwrap(), b"Hello, Rust!!");
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_append_mode(#[case] backend: Backend) {
    let fs = test_fs(backend);
    fs.set_bytes("/log", b"a\n").unwrap();

    let mut file = fs.open_file("/log", "ab").unwrap();
    assert_eq!(file.tell(), 2);
    file.write(b"b\n").unwrap();
    file.close().unwrap();

    let mut file = fs.open_file("/log", "a").unwrap();
    file.write(b"c\n").unwrap();
    file.close().unwrap();

    assert_eq!(fs.get_bytes("/log").unwrap(), b"a\nb\nc\n");
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::local(Backend::Local)]
fn test_copy_and_move_report_missing_paths(#[case] backend: Backend) {
    let fs = test_fs(backend);
    fs.set_bytes("/src", b"x").unwrap();

    let err = fs.copy("/ghost", "/dst", false).unwrap_err();
    assert!(matches!(err, FsError::ResourceNotFound { ref path, .. } if path == "/ghost"));

    let err = fs.move_to("/src", "/no/such/dst", false).unwrap_err();
    assert!(matches!(err, FsError::ResourceNotFound { ref path, .. } if path == "/no/such/dst"));
    assert!(fs.exists("/src").unwrap());
}
