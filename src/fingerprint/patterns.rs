//! Pattern compilation and matching for technology detection.
//!
//! Wappalyzer patterns can be:
//! - Empty (the field only has to be present)
//! - Simple strings (substring match)
//! - Regexes (if they start with ^ or contain regex special chars)
//!
//! Any `\;version:\1` / `\;confidence:50` suffix is stripped before compiling.
//! Matching is case-insensitive. Substring patterns are lowercased at compile
//! time and expect lowercased input, which `ResponseSignals` guarantees.

use regex::{Regex, RegexBuilder};

/// Compiled regexes are capped so a pathological ruleset entry cannot blow up memory.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// A compiled pattern.
#[derive(Debug, Clone)]
pub(crate) enum Pattern {
    /// Empty pattern: matches any value
    Any,
    /// Case-insensitive regex
    Regex(Regex),
    /// Lowercased substring
    Substring(String),
}

impl Pattern {
    /// Compiles a raw ruleset pattern.
    ///
    /// Returns the pattern and whether it had to fall back from an invalid
    /// regex to a substring match.
    pub(crate) fn compile(raw: &str) -> (Pattern, bool) {
        let body = strip_directives(raw);
        if body.is_empty() {
            return (Pattern::Any, false);
        }

        if !looks_like_regex(body) {
            return (Pattern::Substring(body.to_lowercase()), false);
        }

        match RegexBuilder::new(body)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
        {
            Ok(re) => (Pattern::Regex(re), false),
            Err(e) => {
                log::debug!("Pattern '{}' is not a valid regex ({}), using substring match", body, e);
                (Pattern::Substring(body.to_lowercase()), true)
            }
        }
    }

    /// Matches the pattern against lowercased text.
    pub(crate) fn is_match(&self, text: &str) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Regex(re) => re.is_match(text),
            Pattern::Substring(needle) => text.contains(needle.as_str()),
        }
    }
}

/// Removes Wappalyzer directives (`\;version:...`, `\;confidence:...`).
pub(crate) fn strip_directives(raw: &str) -> &str {
    raw.split("\\;").next().unwrap_or(raw)
}

fn looks_like_regex(pattern: &str) -> bool {
    pattern.starts_with('^')
        || pattern.contains('$')
        || pattern.contains('\\')
        || pattern.contains('[')
        || pattern.contains('(')
        || pattern.contains('*')
        || pattern.contains('+')
        || pattern.contains('?')
        || pattern.contains('|')
}

/// Compiles a cookie-name matcher. Names may contain `*` wildcards
/// (e.g. `_ga_*` matches `_ga_123456`).
#[derive(Debug, Clone)]
pub(crate) enum NameMatcher {
    Exact(String),
    Wildcard(Regex),
}

impl NameMatcher {
    pub(crate) fn compile(name: &str) -> NameMatcher {
        let name = name.to_lowercase();
        if !name.contains('*') {
            return NameMatcher::Exact(name);
        }
        let escaped: Vec<String> = name.split('*').map(regex::escape).collect();
        match Regex::new(&format!("^{}$", escaped.join(".*"))) {
            Ok(re) => NameMatcher::Wildcard(re),
            // Escaped literals joined by `.*` always compile; keep the literal just in case
            Err(_) => NameMatcher::Exact(name),
        }
    }

    pub(crate) fn is_match(&self, candidate: &str) -> bool {
        match self {
            NameMatcher::Exact(name) => name == candidate,
            NameMatcher::Wildcard(re) => re.is_match(candidate),
        }
    }
}
