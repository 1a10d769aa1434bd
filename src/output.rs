//! JSON result output.

use std::path::Path;

use crate::error_handling::ScanError;
use crate::run::ScanResults;

/// Serializes the result map as a 2-space indented JSON object.
///
/// Successful URLs always appear, even with no detected technologies (`[]`).
/// An empty map renders as `{}`.
pub fn render_results(results: &ScanResults) -> Result<String, ScanError> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Serializes the result map and writes it to `path`, replacing any existing file.
///
/// # Errors
///
/// `ScanError::Serialize` if marshaling fails, `ScanError::Write` if the
/// file cannot be written.
pub async fn write_results(path: &Path, results: &ScanResults) -> Result<(), ScanError> {
    let rendered = render_results(results)?;
    tokio::fs::write(path, rendered)
        .await
        .map_err(|source| ScanError::Write {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    #[test]
    fn test_render_empty_results() {
        let results = ScanResults::new();
        assert_eq!(render_results(&results).expect("Should render"), "{}");
    }

    #[test]
    fn test_render_uses_two_space_indent() {
        let mut results = ScanResults::new();
        results.insert(
            "https://example.com".to_string(),
            BTreeSet::from(["Nginx".to_string(), "PHP".to_string()]),
        );
        results.insert("https://empty.example".to_string(), BTreeSet::new());

        let rendered = render_results(&results).expect("Should render");
        assert_eq!(
            rendered,
            "{\n  \"https://empty.example\": [],\n  \"https://example.com\": [\n    \"Nginx\",\n    \"PHP\"\n  ]\n}"
        );
    }

    #[tokio::test]
    async fn test_write_results_creates_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("out.json");
        let mut results = ScanResults::new();
        results.insert("https://example.com".to_string(), BTreeSet::new());

        write_results(&path, &results)
            .await
            .expect("Should write results");

        let written = std::fs::read_to_string(&path).expect("Should read output");
        let parsed: serde_json::Value = serde_json::from_str(&written).expect("Valid JSON");
        assert_eq!(parsed["https://example.com"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_write_results_truncates_existing_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("out.json");
        std::fs::write(&path, "a much longer previous content than the new one")
            .expect("Failed to seed file");

        write_results(&path, &ScanResults::new())
            .await
            .expect("Should write results");

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "{}");
    }

    #[tokio::test]
    async fn test_write_results_missing_directory_is_write_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("no_such_dir").join("out.json");

        let result = write_results(&path, &ScanResults::new()).await;
        assert!(
            matches!(result, Err(ScanError::Write { .. })),
            "Expected Write error, got {:?}",
            result
        );
    }
}
