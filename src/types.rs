//! Core types for the aggregation pipeline: categories, results, responses,
//! and per-URL fetch outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic category detected for a query.
///
/// The declared order here is significant: the classifier breaks score ties
/// by picking the first category (in this order) that reaches the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Technology, software, devices.
    Tech,
    /// Government, elections, legislation.
    Politics,
    /// Medicine, wellness, public health.
    Health,
    /// Research, natural sciences, space.
    Science,
    /// Finance, markets, companies.
    Business,
    /// Everything else; also the zero-score fallback.
    General,
}

impl Category {
    /// Returns the lowercase tag used in responses and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Politics => "politics",
            Self::Health => "health",
            Self::Science => "science",
            Self::Business => "business",
            Self::General => "general",
        }
    }

    /// All category variants, in tie-breaking order.
    pub fn all() -> &'static [Category] {
        &[
            Self::Tech,
            Self::Politics,
            Self::Health,
            Self::Science,
            Self::Business,
            Self::General,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single cleaned search result.
///
/// The snippet serialises as `content` — the wire field name the FactVerify
/// frontend consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// Absolute http(s) URL of the result.
    pub url: String,
    /// A cleaned text snippet summarising the page content.
    #[serde(rename = "content")]
    pub snippet: String,
}

/// The response for one search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Deduplicated results in discovery order, at most `max_results` long.
    pub results: Vec<SearchResult>,
    /// The category detected for the query.
    pub category: Category,
    /// Present only when `results` is empty. An empty result set is a valid
    /// terminal state, not a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The outcome of fetching and rendering a single source URL.
///
/// Transient: produced by the dispatcher, consumed immediately by the
/// extraction engine, never retained. A failed fetch is an outcome with
/// `success = false`, not an error.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The URL that was dispatched.
    pub source_url: String,
    /// Whether the fetch engine reported success.
    pub success: bool,
    /// The URL after redirects, when known.
    pub final_url: Option<String>,
    /// Rendered textual content. May be `None` or thin even on success.
    pub content: Option<String>,
    /// Human-readable failure description when `success` is false.
    pub error: Option<String>,
}

/// Static liveness payload for the health side-channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `"healthy"` while the process is able to answer.
    pub status: &'static str,
    /// Service identifier.
    pub service: &'static str,
}
