//! Multi-pattern candidate extraction from rendered page content.
//!
//! [`extract`] is pure and deterministic: given identical input it yields an
//! identical ordered candidate list. An ordered table of pattern matchers is
//! tried in priority order and every hit is pooled; each candidate then runs
//! the validation/cleaning gauntlet (length checks, noise blocklist,
//! whitespace normalisation) before it is appended, stopping once
//! `max_wanted` candidates survive.
//!
//! New site layouts are accommodated by adding a matcher to [`PATTERNS`],
//! not by touching the control flow.

use crate::types::SearchResult;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Minimum title length after trimming; shorter titles are heading fragments.
const MIN_TITLE_LEN: usize = 4;

/// Minimum URL length; shorter strings are partial links.
const MIN_URL_LEN: usize = 12;

/// URL substrings identifying search-results pages, navigation/utility
/// paths, and redirect/tracking shapes. Any match rejects the candidate.
const NOISE_URL_SUBSTRINGS: &[&str] = &[
    "/search?",
    "/search/",
    "duckduckgo.com/?q=",
    "duckduckgo.com/l/",
    "google.com/url?",
    "bing.com/ck/",
    "accounts.google.",
    "policies.google.",
    "support.google.",
    "webcache.googleusercontent.",
    "/preferences",
    "/settings",
    "/login",
    "/signin",
    "/images/",
];

/// Image-asset extensions; links to bare images are not results.
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico"];

/// A (title, url, snippet) triple before validation and cleaning.
#[derive(Debug)]
struct RawCandidate {
    title: String,
    url: String,
    snippet: String,
}

/// One entry in the ordered pattern table.
struct Pattern {
    name: &'static str,
    matcher: fn(&str) -> Vec<RawCandidate>,
}

/// Patterns in priority order. The markdown heading pattern is primary; the
/// alternates cover image-card links, numbered reference lists, and raw HTML
/// heading+anchor pairs.
static PATTERNS: &[Pattern] = &[
    Pattern {
        name: "markdown-heading",
        matcher: markdown_headings,
    },
    Pattern {
        name: "image-link",
        matcher: image_links,
    },
    Pattern {
        name: "numbered-reference",
        matcher: numbered_references,
    },
    Pattern {
        name: "html-heading-anchor",
        matcher: html_heading_anchors,
    },
];

/// Extract up to `max_wanted` cleaned candidates from rendered content.
pub fn extract(raw: &str, max_wanted: usize) -> Vec<SearchResult> {
    let mut candidates = Vec::new();
    if max_wanted == 0 || raw.trim().is_empty() {
        return candidates;
    }

    for pattern in PATTERNS {
        let hits = (pattern.matcher)(raw);
        if !hits.is_empty() {
            tracing::trace!(pattern = pattern.name, hits = hits.len(), "pattern fired");
        }
        for hit in hits {
            if let Some(cleaned) = validate_and_clean(hit) {
                candidates.push(cleaned);
                if candidates.len() >= max_wanted {
                    return candidates;
                }
            }
        }
    }

    candidates
}

// ── Pattern matchers ───────────────────────────────────────────────────

static MD_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#{1,6}\s*\[([^\]]+)\]\(\s*(https?://[^)\s]+)\s*\)\s*$")
        .expect("hard-coded pattern")
});

/// Primary pattern: `### [Title](url)` heading followed by body text until
/// the next such heading or end of content.
fn markdown_headings(raw: &str) -> Vec<RawCandidate> {
    let matches: Vec<regex::Captures<'_>> = MD_HEADING_RE.captures_iter(raw).collect();
    let mut out = Vec::with_capacity(matches.len());

    for (i, caps) in matches.iter().enumerate() {
        let Some(whole) = caps.get(0) else { continue };
        let body_start = whole.end();
        let body_end = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(raw.len(), |m| m.start());
        out.push(RawCandidate {
            title: caps[1].to_string(),
            url: caps[2].to_string(),
            snippet: raw[body_start..body_end].to_string(),
        });
    }

    out
}

static IMAGE_CARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[!\[([^\]]*)\]\([^)]*\)\]\(\s*(https?://[^)\s]+)\s*\)")
        .expect("hard-coded pattern")
});

static IMAGE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[^\]]*\]\([^)]*\)\s*\[([^\]]+)\]\(\s*(https?://[^)\s]+)\s*\)")
        .expect("hard-coded pattern")
});

/// Image-prefixed links: `[![alt](img)](url)` cards and `![](img) [Title](url)`
/// pairs. The snippet is the remainder of the line.
fn image_links(raw: &str) -> Vec<RawCandidate> {
    let mut out = Vec::new();
    for re in [&*IMAGE_CARD_RE, &*IMAGE_PREFIX_RE] {
        for caps in re.captures_iter(raw) {
            let Some(whole) = caps.get(0) else { continue };
            let rest_of_line = raw[whole.end()..]
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
            out.push(RawCandidate {
                title: caps[1].to_string(),
                url: caps[2].to_string(),
                snippet: rest_of_line,
            });
        }
    }
    out
}

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\d{1,3}\.\s*\[([^\]]+)\]\(\s*(https?://[^)\s]+)\s*\)[ \t]*[-–:]?[ \t]*(.*)$")
        .expect("hard-coded pattern")
});

/// Numbered reference lists: `1. [Title](url) trailing snippet`.
fn numbered_references(raw: &str) -> Vec<RawCandidate> {
    NUMBERED_RE
        .captures_iter(raw)
        .map(|caps| RawCandidate {
            title: caps[1].to_string(),
            url: caps[2].to_string(),
            snippet: caps[3].to_string(),
        })
        .collect()
}

/// Raw HTML heading+anchor pairs, for fetch engines that hand back HTML
/// rather than a markdown rendering. The snippet is the text of the
/// heading's following siblings up to the next heading.
fn html_heading_anchors(raw: &str) -> Vec<RawCandidate> {
    if !raw.contains('<') {
        return Vec::new();
    }

    let Ok(heading_sel) = Selector::parse("h1, h2, h3, h4") else {
        return Vec::new();
    };
    let Ok(anchor_sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let fragment = Html::parse_document(raw);
    let mut out = Vec::new();

    for heading in fragment.select(&heading_sel) {
        let Some(anchor) = heading.select(&anchor_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let title = anchor.text().collect::<String>();

        let mut snippet = String::new();
        for sibling in heading.next_siblings() {
            if let Some(element) = ElementRef::wrap(sibling) {
                if matches!(
                    element.value().name(),
                    "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
                ) {
                    break;
                }
                snippet.push_str(&element.text().collect::<String>());
                snippet.push(' ');
            } else if let Some(text) = sibling.value().as_text() {
                snippet.push_str(text);
                snippet.push(' ');
            }
        }

        out.push(RawCandidate {
            title,
            url: href.to_string(),
            snippet,
        });
    }

    out
}

// ── Validation and cleaning ────────────────────────────────────────────

fn validate_and_clean(candidate: RawCandidate) -> Option<SearchResult> {
    let title = clean_text(&candidate.title);
    let url = candidate.url.trim().to_string();

    if title.len() < MIN_TITLE_LEN || url.len() < MIN_URL_LEN {
        return None;
    }
    if is_noise_url(&url) {
        return None;
    }

    let snippet = clean_text(&candidate.snippet);
    if title.is_empty() || url.is_empty() || snippet.is_empty() {
        return None;
    }

    Some(SearchResult {
        title,
        url,
        snippet,
    })
}

/// Reject URLs pointing at search pages, utility paths, image assets,
/// redirectors, or anything that is not absolute http(s).
fn is_noise_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    if !lowered.starts_with("http://") && !lowered.starts_with("https://") {
        return true;
    }
    if NOISE_URL_SUBSTRINGS.iter().any(|noise| lowered.contains(noise)) {
        return true;
    }
    // Check the path only; a query string may legitimately mention images.
    let path = lowered.split('?').next().unwrap_or(&lowered);
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Collapse internal whitespace to single spaces and trim ellipsis markers
/// (`...` or `…`) from either end. A sentence-final period stays.
fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut cleaned = collapsed.trim();
    loop {
        let before = cleaned;
        for marker in ["...", "\u{2026}"] {
            cleaned = cleaned.strip_prefix(marker).unwrap_or(cleaned);
            cleaned = cleaned.strip_suffix(marker).unwrap_or(cleaned);
        }
        cleaned = cleaned.trim();
        if cleaned == before {
            break;
        }
    }
    cleaned.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKDOWN_PAGE: &str = "\
### [Rust Programming Language](https://www.rust-lang.org/)
A language empowering everyone to build reliable and efficient software.

### [The Rust Book](https://doc.rust-lang.org/book/)
An introductory book about Rust,
spread over two lines.

### [Search again](https://www.google.com/search?q=rust)
This one links back to a results page and must be filtered.
";

    #[test]
    fn markdown_headings_extracted_in_order() {
        let results = extract(MARKDOWN_PAGE, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].url, "https://www.rust-lang.org/");
        assert!(results[0].snippet.contains("reliable and efficient"));
        assert_eq!(results[1].url, "https://doc.rust-lang.org/book/");
    }

    #[test]
    fn search_page_urls_filtered() {
        let results = extract(MARKDOWN_PAGE, 10);
        assert!(results.iter().all(|r| !r.url.contains("/search?")));
    }

    #[test]
    fn multiline_snippet_collapsed() {
        let results = extract(MARKDOWN_PAGE, 10);
        assert_eq!(
            results[1].snippet,
            "An introductory book about Rust, spread over two lines."
        );
    }

    #[test]
    fn early_exit_at_max_wanted() {
        let results = extract(MARKDOWN_PAGE, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Rust Programming Language");
    }

    #[test]
    fn zero_max_wanted_returns_empty() {
        assert!(extract(MARKDOWN_PAGE, 0).is_empty());
    }

    #[test]
    fn empty_content_returns_empty() {
        assert!(extract("", 5).is_empty());
        assert!(extract("   \n\n  ", 5).is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let first = extract(MARKDOWN_PAGE, 10);
        let second = extract(MARKDOWN_PAGE, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn image_card_link_extracted() {
        let raw = "[![Mars rover photo essay](https://cdn.example.com/t.jpg)](https://example.com/mars-rover) Curiosity marks ten years on the surface.";
        let results = extract(raw, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Mars rover photo essay");
        assert_eq!(results[0].url, "https://example.com/mars-rover");
        assert!(results[0].snippet.contains("ten years"));
    }

    #[test]
    fn image_prefix_link_extracted() {
        let raw = "![](https://cdn.example.com/thumb.png) [Deep sea discovery](https://example.com/deep-sea) New species found in the trench.";
        let results = extract(raw, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Deep sea discovery");
        assert_eq!(results[0].url, "https://example.com/deep-sea");
    }

    #[test]
    fn numbered_reference_list_extracted() {
        let raw = "\
1. [First source](https://example.com/one) - Coverage of the event.
2. [Second source](https://example.org/two): Independent analysis.
3. [Broken](ftp://example.net/three) - wrong scheme.
";
        let results = extract(raw, 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First source");
        assert_eq!(results[0].snippet, "Coverage of the event.");
        assert_eq!(results[1].url, "https://example.org/two");
    }

    #[test]
    fn html_heading_anchor_extracted() {
        let raw = r#"<html><body>
<h3><a href="https://example.com/story">Breaking story</a></h3>
<p>Details about the breaking story.</p>
<h3><a href="https://example.com/other">Other story</a></h3>
<p>Different details.</p>
</body></html>"#;
        let results = extract(raw, 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Breaking story");
        assert!(results[0].snippet.contains("Details about the breaking story"));
        assert!(!results[0].snippet.contains("Different details"));
    }

    #[test]
    fn short_title_rejected() {
        let raw = "### [Ad](https://example.com/advert-page)\nSome body text here.";
        assert!(extract(raw, 5).is_empty());
    }

    #[test]
    fn relative_url_rejected() {
        let raw = r#"<h2><a href="/local/page">A perfectly long title</a></h2><p>Body.</p>"#;
        assert!(extract(raw, 5).is_empty());
    }

    #[test]
    fn image_asset_url_rejected() {
        let raw = "### [A chart of results](https://example.com/chart.png)\nThe chart body.";
        assert!(extract(raw, 5).is_empty());
    }

    #[test]
    fn redirector_url_rejected() {
        let raw = "### [Wrapped result link](https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com)\nBody text.";
        assert!(extract(raw, 5).is_empty());
    }

    #[test]
    fn empty_snippet_rejected() {
        let raw = "### [A title without any body](https://example.com/page)\n";
        assert!(extract(raw, 5).is_empty());
    }

    #[test]
    fn ellipsis_markers_trimmed() {
        let raw = "### [Trailing ellipsis here](https://example.com/page)\n...clipped snippet text...";
        let results = extract(raw, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].snippet, "clipped snippet text");
    }

    #[test]
    fn unicode_ellipsis_trimmed() {
        let raw = "### [Unicode ellipsis test](https://example.com/page)\nsnippet body…";
        let results = extract(raw, 5);
        assert_eq!(results[0].snippet, "snippet body");
    }

    #[test]
    fn sentence_final_period_kept() {
        let raw = "### [Period stays put](https://example.com/page)\nSnippet text.";
        let results = extract(raw, 5);
        assert_eq!(results[0].snippet, "Snippet text.");
    }

    #[test]
    fn stacked_ellipses_trimmed_period_kept() {
        let raw = "### [Stacked markers](https://example.com/page)\n…... Ends with a sentence. ...…";
        let results = extract(raw, 5);
        assert_eq!(results[0].snippet, "Ends with a sentence.");
    }

    #[test]
    fn noise_detection_cases() {
        assert!(is_noise_url("https://www.google.com/search?q=x"));
        assert!(is_noise_url("https://example.com/search/results"));
        assert!(is_noise_url("https://duckduckgo.com/l/?uddg=x"));
        assert!(is_noise_url("https://www.bing.com/ck/a?x=1"));
        assert!(is_noise_url("https://example.com/photo.jpeg"));
        assert!(is_noise_url("https://accounts.google.com/signin"));
        assert!(is_noise_url("ftp://example.com/file"));
        assert!(is_noise_url("/relative/path"));
        assert!(!is_noise_url("https://example.com/article"));
        assert!(!is_noise_url("https://en.wikipedia.org/wiki/Rust"));
    }

    #[test]
    fn patterns_pool_across_kinds() {
        let raw = "\
### [Heading result](https://example.com/heading)
Heading body text.

1. [Numbered result](https://example.com/numbered) - Numbered snippet.
";
        let results = extract(raw, 5);
        assert_eq!(results.len(), 2);
        // Primary pattern hits come first regardless of textual position.
        assert_eq!(results[0].url, "https://example.com/heading");
        assert_eq!(results[1].url, "https://example.com/numbered");
    }
}
