// Shared test helpers for scan setup and output inspection.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use techscan::Config;

/// Writes `lines` joined with `\n` to a `urls.txt` in `dir`.
#[allow(dead_code)] // Used by other test files
pub fn write_list(dir: &TempDir, lines: &[&str]) -> PathBuf {
    let path = dir.path().join("urls.txt");
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).expect("Failed to write URL list");
    path
}

/// Config reading `list` and writing `results.json` in `dir`.
#[allow(dead_code)] // Used by other test files
pub fn test_config(dir: &TempDir, list: PathBuf, concurrency: usize) -> Config {
    Config {
        list_file: list,
        output: dir.path().join("results.json"),
        concurrency,
        timeout_seconds: 5,
        ..Default::default()
    }
}

/// Parses the JSON results file.
#[allow(dead_code)] // Used by other test files
pub fn read_results(path: &Path) -> BTreeMap<String, BTreeSet<String>> {
    let content = std::fs::read_to_string(path).expect("Failed to read results file");
    serde_json::from_str(&content).expect("Results file should be valid JSON")
}
