//! Technology matching logic.
//!
//! A technology matches when any one of its patterns matches the response
//! (headers, then cookies, meta tags, script sources and HTML).

use crate::fingerprint::detection::signals::ResponseSignals;
use crate::fingerprint::patterns::Pattern;
use crate::fingerprint::ruleset::CompiledTechnology;

/// Checks if a technology matches based on its patterns.
///
/// Technologies with no patterns never match; they can only be added
/// through another technology's `implies`.
pub(crate) fn matches_technology(name: &str, tech: &CompiledTechnology, signals: &ResponseSignals) -> bool {
    if !tech.has_patterns() {
        return false;
    }

    for (header_name, pattern) in &tech.headers {
        if let Some(value) = signals.headers.get(header_name) {
            if pattern.is_match(value) {
                log::debug!("{} matched via header {}='{}'", name, header_name, value);
                return true;
            }
        }
    }

    for (cookie_name, pattern) in &tech.cookies {
        let matched = signals
            .cookies
            .iter()
            .any(|(candidate, value)| cookie_name.is_match(candidate) && pattern.is_match(value));
        if matched {
            log::debug!("{} matched via cookie {:?}", name, cookie_name);
            return true;
        }
    }

    for (meta_key, patterns) in &tech.meta {
        if check_meta_patterns(meta_key, patterns, signals) {
            log::debug!("{} matched via meta {}", name, meta_key);
            return true;
        }
    }

    for pattern in &tech.script {
        if let Some(src) = signals.script_sources.iter().find(|src| pattern.is_match(src)) {
            log::debug!("{} matched via script src '{}'", name, src);
            return true;
        }
    }

    if tech.html.iter().any(|pattern| pattern.is_match(&signals.html)) {
        log::debug!("{} matched via html", name);
        return true;
    }

    false
}

/// Matches meta patterns.
///
/// Keys with a `property:` or `http-equiv:` prefix only look at that
/// attribute; bare keys (like `generator`) try `name:`, `property:` and
/// `http-equiv:` in turn.
fn check_meta_patterns(meta_key: &str, patterns: &[Pattern], signals: &ResponseSignals) -> bool {
    let check = |key: &str| {
        signals.meta.get(key).is_some_and(|values| {
            values
                .iter()
                .any(|value| patterns.iter().any(|pattern| pattern.is_match(value)))
        })
    };

    if meta_key.starts_with("property:") || meta_key.starts_with("http-equiv:") {
        return check(meta_key);
    }

    ["name", "property", "http-equiv"]
        .iter()
        .any(|prefix| check(&format!("{}:{}", prefix, meta_key)))
}
