//! Fingerprint ruleset loading and compilation.
//!
//! Rules come from the bundled `technologies.json` or from a local path
//! (a single JSON file, or a directory of `*.json` files such as the split
//! per-letter Wappalyzer layout). Patterns are compiled once here so detection
//! never touches the regex compiler.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

use crate::fingerprint::models::{RulesetDocument, Technology};
use crate::fingerprint::patterns::{strip_directives, NameMatcher, Pattern};

const EMBEDDED_RULESET: &str = include_str!("technologies.json");

/// Source label used for the bundled ruleset.
pub(crate) const EMBEDDED_SOURCE: &str = "embedded";

/// A technology with all patterns compiled.
#[derive(Debug, Clone, Default)]
pub(crate) struct CompiledTechnology {
    /// (lowercased header name, pattern)
    pub(crate) headers: Vec<(String, Pattern)>,
    pub(crate) cookies: Vec<(NameMatcher, Pattern)>,
    /// (lowercased meta key, patterns)
    pub(crate) meta: Vec<(String, Vec<Pattern>)>,
    pub(crate) script: Vec<Pattern>,
    pub(crate) html: Vec<Pattern>,
    /// Names with directives stripped
    pub(crate) implies: Vec<String>,
    pub(crate) excludes: Vec<String>,
}

impl CompiledTechnology {
    pub(crate) fn has_patterns(&self) -> bool {
        !(self.headers.is_empty()
            && self.cookies.is_empty()
            && self.meta.is_empty()
            && self.script.is_empty()
            && self.html.is_empty())
    }
}

/// Ruleset ready for detection.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRuleset {
    pub(crate) technologies: HashMap<String, CompiledTechnology>,
    /// Where the rules came from (`embedded` or a path)
    pub(crate) source: String,
    /// Regex-looking patterns that failed to compile and fell back to substring matching
    pub(crate) invalid_patterns: usize,
}

impl CompiledRuleset {
    pub(crate) fn compile(source: impl Into<String>, technologies: HashMap<String, Technology>) -> Self {
        let mut invalid_patterns = 0usize;
        let mut compile_pattern = |raw: &str| {
            let (pattern, fell_back) = Pattern::compile(raw);
            if fell_back {
                invalid_patterns += 1;
            }
            pattern
        };

        let mut compiled = HashMap::with_capacity(technologies.len());
        for (name, tech) in technologies {
            let headers = tech
                .headers
                .iter()
                .map(|(header, raw)| (header.to_lowercase(), compile_pattern(raw)))
                .collect();
            let cookies = tech
                .cookies
                .iter()
                .map(|(cookie, raw)| (NameMatcher::compile(cookie), compile_pattern(raw)))
                .collect();
            let meta = tech
                .meta
                .iter()
                .map(|(key, raws)| {
                    let patterns = raws.iter().map(|raw| compile_pattern(raw)).collect();
                    (key.to_lowercase(), patterns)
                })
                .collect();
            let script = tech.script.iter().map(|raw| compile_pattern(raw)).collect();
            let html = tech.html.iter().map(|raw| compile_pattern(raw)).collect();
            let implies = tech
                .implies
                .iter()
                .map(|name| strip_directives(name).trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
            let excludes = tech
                .excludes
                .iter()
                .map(|name| strip_directives(name).trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();

            compiled.insert(
                name,
                CompiledTechnology {
                    headers,
                    cookies,
                    meta,
                    script,
                    html,
                    implies,
                    excludes,
                },
            );
        }

        let source = source.into();
        if invalid_patterns > 0 {
            log::warn!(
                "{} fingerprint pattern(s) from {} are not valid regexes and use substring matching",
                invalid_patterns,
                source
            );
        }

        CompiledRuleset {
            technologies: compiled,
            source,
            invalid_patterns,
        }
    }
}

/// Parses the bundled ruleset.
pub(crate) fn load_embedded() -> Result<HashMap<String, Technology>> {
    parse_document(EMBEDDED_RULESET).context("Failed to parse embedded technologies JSON")
}

fn parse_document(content: &str) -> Result<HashMap<String, Technology>> {
    let document: RulesetDocument =
        serde_json::from_str(content).context("Failed to parse technologies JSON")?;
    Ok(document.into_technologies())
}

/// Loads technologies from a local path (handles both single file and directory).
///
/// In a directory, files that cannot be read or parsed are logged and skipped.
/// A single file that cannot be parsed is an error.
pub(crate) async fn load_from_path(path: &Path) -> Result<HashMap<String, Technology>> {
    if path.is_dir() {
        let mut all_technologies = HashMap::new();
        let mut entries = fs::read_dir(path)
            .await
            .with_context(|| format!("Failed to read ruleset directory {}", path.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let file_path = entry.path();
            if file_path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&file_path).await {
                Ok(content) => match parse_document(&content) {
                    Ok(techs) => all_technologies.extend(techs),
                    Err(e) => log::warn!("Failed to parse {}: {:#}", file_path.display(), e),
                },
                Err(e) => log::warn!("Failed to read {}: {}", file_path.display(), e),
            }
        }

        Ok(all_technologies)
    } else {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read ruleset file {}", path.display()))?;
        parse_document(&content)
    }
}
