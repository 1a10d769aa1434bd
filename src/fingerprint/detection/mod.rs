//! Technology detection.
//!
//! Matching runs in three passes:
//! 1. every technology with patterns is matched against the response signals
//! 2. `implies` are followed transitively
//! 3. technologies excluded by another detected technology are removed

mod matching;
mod signals;

use std::collections::BTreeSet;

use reqwest::header::HeaderMap;

use crate::fingerprint::ruleset::CompiledRuleset;

use matching::matches_technology;
use signals::ResponseSignals;

/// Detects technologies from response headers and body.
pub(crate) fn detect_technologies(
    ruleset: &CompiledRuleset,
    headers: &HeaderMap,
    body: &[u8],
) -> BTreeSet<String> {
    let signals = ResponseSignals::from_response(headers, body);
    log::debug!(
        "Technology detection: {} headers, {} cookies, {} meta tags, {} script sources, {} body bytes",
        signals.headers.len(),
        signals.cookies.len(),
        signals.meta.len(),
        signals.script_sources.len(),
        signals.html.len()
    );

    let matched: BTreeSet<String> = ruleset
        .technologies
        .iter()
        .filter(|(name, tech)| matches_technology(name, tech, &signals))
        .map(|(name, _)| name.clone())
        .collect();

    let with_implied = resolve_implies(matched, ruleset);
    apply_technology_exclusions(with_implied, ruleset)
}

/// Adds implied technologies until no new names appear.
///
/// Implied names missing from the ruleset are still reported; they just
/// imply nothing further.
pub(crate) fn resolve_implies(
    mut detected: BTreeSet<String>,
    ruleset: &CompiledRuleset,
) -> BTreeSet<String> {
    let mut pending: Vec<String> = detected.iter().cloned().collect();
    while let Some(name) = pending.pop() {
        let Some(tech) = ruleset.technologies.get(&name) else {
            continue;
        };
        for implied in &tech.implies {
            if detected.insert(implied.clone()) {
                pending.push(implied.clone());
            }
        }
    }
    detected
}

/// Applies technology exclusions, removing technologies that are excluded by others.
///
/// A technology is excluded if any other detected technology lists it in its `excludes` field.
/// For example, if TechA excludes TechB, and both are detected, TechB will be removed.
pub(crate) fn apply_technology_exclusions(
    detected: BTreeSet<String>,
    ruleset: &CompiledRuleset,
) -> BTreeSet<String> {
    detected
        .iter()
        .filter(|tech_name| {
            !detected.iter().any(|other| {
                other != *tech_name
                    && ruleset
                        .technologies
                        .get(other)
                        .is_some_and(|tech| tech.excludes.contains(tech_name))
            })
        })
        .cloned()
        .collect()
}
