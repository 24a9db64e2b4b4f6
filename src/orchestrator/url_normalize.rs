//! Canonical URL form used as the deduplication key.
//!
//! Two result URLs that differ only in case of scheme/host, fragment,
//! default port, tracking parameters, query-parameter order, or a trailing
//! slash refer to the same page and must collide in the result set.

use url::Url;

/// Query parameters that carry tracking state rather than identity.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "msclkid",
    "ref",
    "ref_src",
    "si",
];

/// Produce the canonical dedupe key for a URL.
///
/// Unparseable input is returned verbatim — it still participates in
/// dedupe, just by literal string equality.
pub fn normalize_url(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw.trim()) else {
        return raw.to_string();
    };

    parsed.set_fragment(None);

    if matches!(
        (parsed.scheme(), parsed.port()),
        ("http", Some(80)) | ("https", Some(443))
    ) {
        let _ = parsed.set_port(None);
    }

    let mut kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.to_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    kept.sort();
    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        let rebuilt = kept
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        parsed.set_query(Some(&rebuilt));
    }

    let path = parsed.path().to_owned();
    if path.len() > 1 {
        if let Some(trimmed) = path.strip_suffix('/') {
            parsed.set_path(trimmed);
        }
    }

    // Url::parse lowercases scheme and host, so serialisation is canonical.
    parsed.to_string()
}
