//! The external fetch-engine boundary.
//!
//! The pipeline treats page fetching and rendering as an opaque collaborator
//! behind [`FetchEngine`]: give it a URL and options, get back a success
//! flag, a final URL, and rendered text — or an error. [`HttpFetchEngine`]
//! is the built-in implementation: a plain HTTP client that renders HTML to
//! a markdown-flavoured text form. Render-capable engines (headless
//! browsers) can be plugged in through the same trait.

use crate::config::SearchConfig;
use crate::error::SearchError;
use rand::seq::SliceRandom;
use regex::Regex;
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

/// Realistic browser User-Agent strings, rotated per request.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Page-cache behaviour requested from the fetch engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Always fetch fresh. The pipeline never persists across queries, so
    /// this is the default.
    #[default]
    Bypass,
    /// The engine may serve its own cached rendering.
    Enabled,
}

/// Options passed to the fetch engine for one page.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Minimum words the rendered page must contain to count as content.
    /// Thinner pages come back with `content: None`.
    pub min_word_threshold: usize,
    /// Condition to wait for before rendering (e.g. a CSS selector).
    /// Advisory — engines without a browser ignore it.
    pub wait_for: Option<String>,
    /// Cache behaviour requested from the engine.
    pub cache_mode: CacheMode,
    /// Whether the engine may stream partial content. Advisory.
    pub streaming: bool,
    /// Per-page timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent; `None` rotates through the built-in list.
    pub user_agent: Option<String>,
}

impl FetchOptions {
    /// Derive fetch options from a search configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            min_word_threshold: config.min_word_threshold,
            wait_for: Some("css:body".into()),
            cache_mode: CacheMode::Bypass,
            streaming: false,
            timeout_seconds: config.timeout_seconds,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// What the fetch engine reports for one page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Whether the engine considers the fetch successful. Content may still
    /// be absent on success.
    pub success: bool,
    /// The URL after redirects.
    pub final_url: String,
    /// Rendered textual/markdown content, if any was produced.
    pub content: Option<String>,
}

/// An external page-fetching-and-rendering engine.
///
/// Implementations must be `Send + Sync`; the dispatcher invokes them
/// concurrently. A failed page is an `Err` — the dispatcher converts it to a
/// failed outcome without aborting sibling fetches.
pub trait FetchEngine: Send + Sync {
    /// Fetch `url` and render it to text.
    fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> impl Future<Output = Result<FetchedPage, SearchError>> + Send;
}

/// Built-in fetch engine: reqwest + HTML-to-text rendering.
///
/// No JavaScript execution; pages that require it simply render thin and are
/// filtered by the word threshold.
#[derive(Debug, Default)]
pub struct HttpFetchEngine;

impl FetchEngine for HttpFetchEngine {
    async fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<FetchedPage, SearchError> {
        tracing::trace!(url, "http fetch");

        let client = build_client(options)?;
        let response = client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::FetchEngine(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::FetchEngine(format!("HTTP error: {e}")))?;

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| SearchError::FetchEngine(format!("body read failed: {e}")))?;

        tracing::trace!(url, bytes = html.len(), "response received");

        let rendered = render_html(&html);
        let word_count = rendered.split_whitespace().count();
        let content = if word_count >= options.min_word_threshold {
            Some(rendered)
        } else {
            None
        };

        Ok(FetchedPage {
            success: true,
            final_url,
            content,
        })
    }
}

/// Build a [`reqwest::Client`] for page fetching.
fn build_client(options: &FetchOptions) -> Result<reqwest::Client, SearchError> {
    let ua = match options.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(options.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::FetchEngine(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

static BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<(script|style|nav|footer|header|aside|noscript|svg|iframe)\b[^>]*>.*?</(?:script|style|nav|footer|header|aside|noscript|svg|iframe)>",
    )
    .expect("hard-coded pattern")
});

static HEADING_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<h[1-6][^>]*>\s*<a\b[^>]*href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>\s*</h[1-6]>"#,
    )
    .expect("hard-coded pattern")
});

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#)
        .expect("hard-coded pattern")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<[^>]+>").expect("hard-coded pattern")
});

/// Render raw HTML to the markdown-flavoured text form the extraction engine
/// consumes: heading+anchor pairs become `### [title](url)` blocks, plain
/// anchors become inline `[text](url)` links, remaining markup is stripped.
pub fn render_html(html: &str) -> String {
    let without_boilerplate = BOILERPLATE_RE.replace_all(html, " ");
    let with_headings = HEADING_ANCHOR_RE.replace_all(&without_boilerplate, |caps: &regex::Captures<'_>| {
        let title = flatten_inline(&caps[2]);
        format!("\n\n### [{title}]({})\n", &caps[1])
    });
    let with_links = ANCHOR_RE.replace_all(&with_headings, |caps: &regex::Captures<'_>| {
        let text = flatten_inline(&caps[2]);
        if text.is_empty() {
            String::new()
        } else {
            format!("[{text}]({})", &caps[1])
        }
    });
    let stripped = TAG_RE.replace_all(&with_links, " ");
    collapse_blank_runs(&unescape_entities(&stripped))
}

/// Strip nested tags and collapse whitespace inside link/heading text.
fn flatten_inline(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unescape_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

/// Collapse runs of spaces and limit blank lines to one separator, keeping
/// the block structure extraction relies on.
fn collapse_blank_runs(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut blank_pending = false;
    for line in text.lines() {
        let compact = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if compact.is_empty() {
            blank_pending = !lines.is_empty();
        } else {
            if blank_pending {
                lines.push(String::new());
                blank_pending = false;
            }
            lines.push(compact);
        }
    }
    lines.join("\n")
}
