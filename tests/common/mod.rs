//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Get the path to the NVG fixtures shipped with the reader crate
pub fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .join("crates")
        .join("nvg-io")
        .join("tests")
        .join("fixtures")
}

pub fn harbour_fixture() -> PathBuf {
    fixtures_dir().join("harbour.nvg")
}

/// Write `contents` to a temporary file with the given suffix
pub fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}
