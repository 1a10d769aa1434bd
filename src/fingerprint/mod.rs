//! Technology detection using Wappalyzer-style fingerprint rulesets.
//!
//! The scanner only depends on the [`Fingerprinter`] trait. The default
//! implementation, [`RulesetFingerprinter`], matches a ruleset against a
//! single HTTP response:
//! - headers (names and values compared case-insensitively)
//! - cookies set by the response (`Set-Cookie`), with `*` wildcards in names
//! - `<meta>` tags (`name`, `property`, `http-equiv`)
//! - `<script src>` URLs
//! - HTML text
//!
//! Matches then pull in their `implies` transitively and drop anything
//! listed in another match's `excludes`.

mod detection;
mod models;
mod patterns;
mod ruleset;

use anyhow::Result;
use reqwest::header::HeaderMap;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

pub use models::Technology;

use ruleset::{CompiledRuleset, EMBEDDED_SOURCE};

/// Maps an HTTP response to the set of technology names it reveals.
///
/// Implementations must be thread-safe: one instance is shared by every
/// scan task.
pub trait Fingerprinter: Send + Sync {
    /// Returns the technologies detected in a response. Never fails; an
    /// unrecognisable response yields an empty set.
    fn fingerprint(&self, headers: &HeaderMap, body: &[u8]) -> BTreeSet<String>;
}

impl<F> Fingerprinter for F
where
    F: Fn(&HeaderMap, &[u8]) -> BTreeSet<String> + Send + Sync,
{
    fn fingerprint(&self, headers: &HeaderMap, body: &[u8]) -> BTreeSet<String> {
        self(headers, body)
    }
}

/// Fingerprinter backed by a compiled technology ruleset.
#[derive(Debug, Clone)]
pub struct RulesetFingerprinter {
    ruleset: Arc<CompiledRuleset>,
}

impl RulesetFingerprinter {
    /// Uses the ruleset bundled with the binary.
    pub fn embedded() -> Result<Self> {
        let technologies = ruleset::load_embedded()?;
        Ok(Self::from_technologies(EMBEDDED_SOURCE, technologies))
    }

    /// Loads a ruleset from a JSON file or a directory of JSON files.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let technologies = ruleset::load_from_path(path).await?;
        if technologies.is_empty() {
            log::warn!(
                "Fingerprint ruleset at {} contains no technologies",
                path.display()
            );
        }
        Ok(Self::from_technologies(
            path.display().to_string(),
            technologies,
        ))
    }

    /// Compiles already-parsed technology rules.
    pub fn from_technologies(
        source: impl Into<String>,
        technologies: HashMap<String, Technology>,
    ) -> Self {
        RulesetFingerprinter {
            ruleset: Arc::new(CompiledRuleset::compile(source, technologies)),
        }
    }

    /// Number of technologies in the ruleset.
    pub fn technology_count(&self) -> usize {
        self.ruleset.technologies.len()
    }

    /// Where the ruleset was loaded from (`embedded` or a path).
    pub fn source(&self) -> &str {
        &self.ruleset.source
    }
}

impl Fingerprinter for RulesetFingerprinter {
    fn fingerprint(&self, headers: &HeaderMap, body: &[u8]) -> BTreeSet<String> {
        detection::detect_technologies(&self.ruleset, headers, body)
    }
}

/// Builds the fingerprinter for a scan: the ruleset at `path` if given,
/// otherwise the embedded one.
pub async fn init_fingerprinter(path: Option<&Path>) -> Result<Arc<dyn Fingerprinter>> {
    let fingerprinter = match path {
        Some(path) => RulesetFingerprinter::from_path(path).await?,
        None => RulesetFingerprinter::embedded()?,
    };
    log::info!(
        "Loaded {} technology fingerprints from {}",
        fingerprinter.technology_count(),
        fingerprinter.source()
    );
    Ok(Arc::new(fingerprinter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, SET_COOKIE};

    fn embedded() -> RulesetFingerprinter {
        RulesetFingerprinter::embedded().expect("Embedded ruleset should load")
    }

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_server_header_detects_nginx() {
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("nginx/1.25.3"));
        let detected = embedded().fingerprint(&headers, b"<html></html>");
        assert_eq!(detected, names(&["Nginx"]));
    }

    #[test]
    fn test_wordpress_generator_implies_php_and_mysql() {
        let body = br#"<html><head><meta name="generator" content="WordPress 6.4.2"></head><body></body></html>"#;
        let detected = embedded().fingerprint(&HeaderMap::new(), body);
        assert_eq!(detected, names(&["MySQL", "PHP", "WordPress"]));
    }

    #[test]
    fn test_implies_chain_through_asp_net() {
        let mut headers = HeaderMap::new();
        headers.insert("x-powered-by", HeaderValue::from_static("ASP.NET"));
        let detected = embedded().fingerprint(&headers, b"");
        assert_eq!(
            detected,
            names(&["ASP.NET", "Microsoft IIS", "Windows Server"])
        );
    }

    #[test]
    fn test_angular_excludes_angularjs() {
        let body = br#"<html><body><app-root ng-version="17.0.8"></app-root><div ng-app="legacy"></div></body></html>"#;
        let detected = embedded().fingerprint(&HeaderMap::new(), body);
        assert!(detected.contains("Angular"));
        assert!(!detected.contains("AngularJS"));
    }

    #[test]
    fn test_wildcard_cookie_detects_google_analytics() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("_ga_K2Z9QX=GS1.1.1700000000; Path=/; Secure"),
        );
        let detected = embedded().fingerprint(&headers, b"");
        assert_eq!(detected, names(&["Google Analytics"]));
    }

    #[test]
    fn test_script_src_detects_jquery() {
        let body = br#"<html><head><script src="https://code.jquery.com/jquery-3.7.1.min.js"></script></head></html>"#;
        let detected = embedded().fingerprint(&HeaderMap::new(), body);
        assert!(detected.contains("jQuery"), "Detected: {:?}", detected);
    }

    #[test]
    fn test_captured_versions_are_not_reported() {
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("nginx/1.25.3"));
        let body = br#"<script src="/static/jquery-3.7.1.min.js"></script>"#;
        let detected = embedded().fingerprint(&headers, body);
        assert_eq!(detected, names(&["Nginx", "jQuery"]));
    }

    #[test]
    fn test_empty_response_detects_nothing() {
        let detected = embedded().fingerprint(&HeaderMap::new(), b"");
        assert!(detected.is_empty(), "Detected: {:?}", detected);
    }

    #[test]
    fn test_closure_is_a_fingerprinter() {
        let fixed = |_: &HeaderMap, _: &[u8]| names(&["Static"]);
        let fingerprinter: Arc<dyn Fingerprinter> = Arc::new(fixed);
        assert_eq!(
            fingerprinter.fingerprint(&HeaderMap::new(), b""),
            names(&["Static"])
        );
    }

    #[tokio::test]
    async fn test_init_fingerprinter_from_custom_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("rules.json");
        tokio::fs::write(
            &path,
            r#"{"Acme Server": {"headers": {"Server": "^acme"}, "implies": "Acme OS"}}"#,
        )
        .await
        .expect("Failed to write ruleset");

        let fingerprinter = init_fingerprinter(Some(&path))
            .await
            .expect("Custom ruleset should load");
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("ACME/2"));
        assert_eq!(
            fingerprinter.fingerprint(&headers, b""),
            names(&["Acme OS", "Acme Server"])
        );
    }

    #[tokio::test]
    async fn test_init_fingerprinter_missing_file_fails() {
        let result = init_fingerprinter(Some(Path::new("/nonexistent/rules.json"))).await;
        assert!(result.is_err());
    }
}
