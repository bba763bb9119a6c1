#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use result_lens::data::{Row, row_from_json};
use serde_json::Value as Json;
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Converts a JSON array of objects into rows.
pub fn rows(value: Json) -> Vec<Row> {
    value
        .as_array()
        .expect("fixture rows must be an array")
        .iter()
        .cloned()
        .map(|item| row_from_json(item).expect("fixture row must be an object"))
        .collect()
}

/// Builds `count` rows from a generator closure returning JSON objects.
pub fn generated_rows<F>(count: usize, make: F) -> Vec<Row>
where
    F: Fn(usize) -> Json,
{
    (0..count)
        .map(|i| row_from_json(make(i)).expect("generated row must be an object"))
        .collect()
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
