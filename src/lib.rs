//! # factverify-search
//!
//! Embedded search aggregation for FactVerify: one free-text query in, a
//! bounded list of cleaned, deduplicated results out. No API keys, no
//! external services — source pages are fetched through a pluggable fetch
//! engine and mined for structured results.
//!
//! ## Pipeline
//!
//! - Classifies the query into a topic category via keyword scoring
//! - Plans category-aware source URLs and query variations
//! - Fetches sources concurrently under a concurrency ceiling and a
//!   memory-pressure admission guard, streaming outcomes as they complete
//! - Extracts (title, url, snippet) candidates through an ordered pattern
//!   table with noise filtering
//! - Deduplicates by canonical URL, first seen wins, capped at the
//!   requested result count
//! - Escalates through fallback tiers (encyclopedia topic page, query
//!   variations) until satisfied or exhausted
//!
//! ## Failure posture
//!
//! Individual source failures are absorbed and logged; the pipeline always
//! produces a well-formed response. An empty result set is reported in the
//! response's `error` field, not as a Rust error. Search queries are logged
//! only at trace level and never persisted.

pub mod category;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod memory;
pub mod orchestrator;
pub mod planner;
pub mod types;

use std::sync::Arc;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use fetch::{CacheMode, FetchEngine, FetchOptions, FetchedPage, HttpFetchEngine};
pub use types::{Category, FetchOutcome, HealthStatus, SearchResponse, SearchResult};

/// Aggregate search results for a query using the built-in HTTP fetch engine.
///
/// Classifies the query, fetches and mines the planned sources, and
/// escalates through fallback tiers until `config.max_results` results are
/// found or every tier is exhausted.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration or an empty
/// query, and [`SearchError::Internal`] for a broken orchestration
/// invariant. Finding nothing is not an error: the response carries an
/// explanatory `error` field and an empty result list.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> factverify_search::Result<()> {
/// let config = factverify_search::SearchConfig::default();
/// let response = factverify_search::search("electric car", &config).await?;
/// for result in &response.results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<SearchResponse> {
    search_with_engine(query, config, Arc::new(HttpFetchEngine)).await
}

/// [`search`] with an injected fetch engine.
///
/// The seam for render-capable fetch engines and for tests, which script
/// the engine instead of touching the network.
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_with_engine<E>(
    query: &str,
    config: &SearchConfig,
    engine: Arc<E>,
) -> Result<SearchResponse>
where
    E: FetchEngine + 'static,
{
    config.validate()?;
    if query.trim().is_empty() {
        return Err(SearchError::Config("query must not be empty".into()));
    }
    orchestrator::search::orchestrate_search(query, config, engine).await
}

/// Search with sensible default configuration.
///
/// Convenience wrapper around [`search`] using [`SearchConfig::default()`].
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_default(query: &str) -> Result<SearchResponse> {
    search(query, &SearchConfig::default()).await
}

/// Static liveness probe for the health side-channel. Not part of the
/// pipeline contract.
pub fn health_check() -> HealthStatus {
    HealthStatus {
        status: "healthy",
        service: "factverify-search",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_rejects_zero_max_results() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        let result = search("test", &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("max_results"));
    }

    #[tokio::test]
    async fn search_rejects_empty_query() {
        let config = SearchConfig::default();
        let result = search("   ", &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("query"));
    }

    #[tokio::test]
    async fn search_rejects_zero_concurrency() {
        let config = SearchConfig {
            concurrency_limit: 0,
            ..Default::default()
        };
        let result = search("test", &config).await;
        assert!(result.is_err());
    }

    #[test]
    fn health_check_is_static() {
        let health = health_check();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "factverify-search");
    }
}
