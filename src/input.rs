//! URL list loading.

use std::path::Path;

use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error_handling::ScanError;

/// Reads the URL list, one URL per line.
///
/// Empty lines are skipped. Every other line is kept verbatim: only the line
/// terminator (`\n` or `\r\n`) is removed, so surrounding whitespace, duplicates
/// and ordering all survive. Invalid UTF-8 is replaced with U+FFFD; such a
/// line fails later as a malformed URL rather than aborting the run.
///
/// # Errors
///
/// - `ScanError::ListOpen` if the file cannot be opened
/// - `ScanError::ListRead` if a read fails part-way
pub async fn read_url_list(path: &Path) -> Result<Vec<String>, ScanError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| ScanError::ListOpen {
            path: path.to_path_buf(),
            source,
        })?;

    let mut lines = BufReader::new(file).split(b'\n');
    let mut urls = Vec::new();
    let mut skipped = 0usize;

    loop {
        let segment = lines
            .next_segment()
            .await
            .map_err(|source| ScanError::ListRead {
                path: path.to_path_buf(),
                source,
            })?;
        let Some(mut line) = segment else {
            break;
        };
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.is_empty() {
            skipped += 1;
            continue;
        }
        urls.push(String::from_utf8_lossy(&line).into_owned());
    }

    debug!(
        "Read {} URLs from {} ({} empty lines skipped)",
        urls.len(),
        path.display(),
        skipped
    );
    Ok(urls)
}
