//! File-based compression tests.

use ppmz::{Error, compress_path, decompress_path};
use tempfile::TempDir;

mod common;

use common::{options, random_bytes, sample_text};

#[test]
fn test_path_roundtrip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    let packed = dir.path().join("input.ppm");
    let restored = dir.path().join("restored.txt");
    let data = sample_text();
    std::fs::write(&input, &data).unwrap();

    let options = options(3);
    let compressed = compress_path(&input, &packed, &options).unwrap();
    assert_eq!(compressed.uncompressed_size, data.len() as u64);
    assert_eq!(
        compressed.compressed_size,
        std::fs::metadata(&packed).unwrap().len()
    );

    let decompressed = decompress_path(&packed, &restored, &options).unwrap();
    assert_eq!(decompressed.uncompressed_size, data.len() as u64);
    assert_eq!(std::fs::read(&restored).unwrap(), data);
}

#[test]
fn test_path_roundtrip_empty_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty");
    let packed = dir.path().join("empty.ppm");
    let restored = dir.path().join("empty.out");
    std::fs::write(&input, b"").unwrap();

    compress_path(&input, &packed, &options(0)).unwrap();
    assert!(std::fs::metadata(&packed).unwrap().len() > 0);
    decompress_path(&packed, &restored, &options(0)).unwrap();
    assert!(std::fs::read(&restored).unwrap().is_empty());
}

#[test]
fn test_path_roundtrip_binary() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("random.bin");
    let packed = dir.path().join("random.ppm");
    let restored = dir.path().join("random.out");
    let data = random_bytes(99, 64 * 1024);
    std::fs::write(&input, &data).unwrap();

    compress_path(&input, &packed, &options(2)).unwrap();
    decompress_path(&packed, &restored, &options(2)).unwrap();
    assert_eq!(std::fs::read(&restored).unwrap(), data);
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = compress_path(
        dir.path().join("does-not-exist"),
        dir.path().join("out"),
        &options(3),
    );
    match result {
        Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected I/O error, got {:?}", other),
    }
}

#[test]
fn test_unwritable_output_is_io_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    std::fs::write(&input, b"data").unwrap();
    let result = compress_path(&input, dir.path().join("no/such/dir/out"), &options(3));
    assert!(matches!(result, Err(Error::Io(_))));
}
