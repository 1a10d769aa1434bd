//! Extraction of the response data that fingerprint rules are matched against.

use reqwest::header::{HeaderMap, SET_COOKIE};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

const META_SELECTOR_STR: &str = "meta[content]";
const SCRIPT_SRC_SELECTOR_STR: &str = "script[src]";

static META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(META_SELECTOR_STR).expect("Failed to parse meta selector - this is a bug")
});

static SCRIPT_SRC_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(SCRIPT_SRC_SELECTOR_STR)
        .expect("Failed to parse script selector - this is a bug")
});

/// Lowercased view of one HTTP response.
#[derive(Debug, Default, Clone)]
pub(crate) struct ResponseSignals {
    /// header name -> value (repeated headers joined with ", ")
    pub(crate) headers: HashMap<String, String>,
    /// cookie name -> value, from `Set-Cookie`
    pub(crate) cookies: HashMap<String, String>,
    /// `name:<key>`, `property:<key>` or `http-equiv:<key>` -> content values
    pub(crate) meta: HashMap<String, Vec<String>>,
    pub(crate) script_sources: Vec<String>,
    /// Full body text
    pub(crate) html: String,
}

impl ResponseSignals {
    /// Builds signals from response headers and raw body bytes.
    ///
    /// Bodies that are not valid UTF-8 are decoded lossily; binary bodies
    /// simply produce no meta tags or scripts.
    pub(crate) fn from_response(headers: &HeaderMap, body: &[u8]) -> Self {
        let html = String::from_utf8_lossy(body);
        let (meta, script_sources) = extract_document_signals(&html);

        ResponseSignals {
            headers: normalize_headers(headers),
            cookies: extract_cookies(headers),
            meta,
            script_sources,
            html: html.to_lowercase(),
        }
    }
}

fn normalize_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut normalized: HashMap<String, String> = HashMap::with_capacity(headers.len());
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        normalized
            .entry(name.as_str().to_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value.to_lowercase());
            })
            .or_insert_with(|| value.to_lowercase());
    }
    normalized
}

fn extract_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|hv| hv.to_str().ok())
        .filter_map(|cookie_str| {
            let pair = cookie_str.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_lowercase(), value.trim().to_lowercase()))
        })
        .collect()
}

fn extract_document_signals(html: &str) -> (HashMap<String, Vec<String>>, Vec<String>) {
    let document = Html::parse_document(html);

    let mut meta: HashMap<String, Vec<String>> = HashMap::new();
    for element in document.select(&META_SELECTOR) {
        let Some(content) = element.value().attr("content") else {
            continue;
        };
        let key = ["name", "property", "http-equiv"]
            .into_iter()
            .find_map(|attr| {
                element
                    .value()
                    .attr(attr)
                    .map(|value| format!("{}:{}", attr, value.trim().to_lowercase()))
            });
        if let Some(key) = key {
            meta.entry(key).or_default().push(content.to_lowercase());
        }
    }

    let script_sources = document
        .select(&SCRIPT_SRC_SELECTOR)
        .filter_map(|element| element.value().attr("src"))
        .map(|src| src.trim().to_lowercase())
        .filter(|src| !src.is_empty())
        .collect();

    (meta, script_sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_headers_are_lowercased_and_joined() {
        let mut headers = HeaderMap::new();
        headers.insert("Server", HeaderValue::from_static("Nginx/1.25"));
        headers.append("Via", HeaderValue::from_static("1.1 varnish"));
        headers.append("Via", HeaderValue::from_static("1.1 CloudFront"));

        let signals = ResponseSignals::from_response(&headers, b"");
        assert_eq!(signals.headers["server"], "nginx/1.25");
        assert_eq!(signals.headers["via"], "1.1 varnish, 1.1 cloudfront");
    }

    #[test]
    fn test_cookies_from_set_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("PHPSESSID=AbC123; path=/; HttpOnly"),
        );
        headers.append(SET_COOKIE, HeaderValue::from_static("_ga_XYZ=GA1.1; Secure"));
        headers.append(SET_COOKIE, HeaderValue::from_static("malformed"));

        let signals = ResponseSignals::from_response(&headers, b"");
        assert_eq!(signals.cookies.len(), 2);
        assert_eq!(signals.cookies["phpsessid"], "abc123");
        assert_eq!(signals.cookies["_ga_xyz"], "ga1.1");
    }

    #[test]
    fn test_meta_and_script_extraction() {
        let body = br#"<!DOCTYPE html>
<html><head>
<meta name="Generator" content="WordPress 6.4.2">
<meta name="generator" content="Elementor 3.18">
<meta property="og:site_name" content="Example">
<meta http-equiv="X-UA-Compatible" content="IE=edge">
<meta charset="utf-8">
<script src="/wp-includes/js/jquery/jquery.min.js"></script>
<script>var inline = true;</script>
</head><body></body></html>"#;

        let signals = ResponseSignals::from_response(&HeaderMap::new(), body);
        assert_eq!(
            signals.meta["name:generator"],
            vec!["wordpress 6.4.2".to_string(), "elementor 3.18".to_string()]
        );
        assert_eq!(signals.meta["property:og:site_name"], vec!["example"]);
        assert_eq!(signals.meta["http-equiv:x-ua-compatible"], vec!["ie=edge"]);
        assert_eq!(signals.meta.len(), 3);
        assert_eq!(
            signals.script_sources,
            vec!["/wp-includes/js/jquery/jquery.min.js"]
        );
        assert!(signals.html.contains("var inline = true;"));
    }

    #[test]
    fn test_binary_body_is_tolerated() {
        let body = [0xff, 0xfe, 0x00, 0x42, 0x80];
        let signals = ResponseSignals::from_response(&HeaderMap::new(), &body);
        assert!(signals.meta.is_empty());
        assert!(signals.script_sources.is_empty());
    }
}
