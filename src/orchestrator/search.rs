//! The tiered escalation controller.
//!
//! One query runs through a small state machine: the primary source tier,
//! then an encyclopedia topic fallback, then query-variation fan-out, until
//! either the result set is full or every tier has run. States are never
//! revisited; the fallback tiers only execute while their entry thresholds
//! are unmet.
//!
//! Per-source failures never cross a tier boundary — they are logged where
//! they happen and contribute zero candidates. An empty final set is a valid
//! terminal state reported in the response, not an error.

use std::sync::Arc;

use crate::category;
use crate::config::SearchConfig;
use crate::dispatch::dispatch;
use crate::error::SearchError;
use crate::extract;
use crate::fetch::{FetchEngine, FetchOptions};
use crate::planner;
use crate::types::{Category, SearchResponse, SearchResult};

use super::result_set::ResultSet;

/// Response message when every tier comes up empty.
pub const NO_RESULTS_MESSAGE: &str =
    "No relevant information found. The query might be too specific or recent.";

/// The variation tier only runs when fewer than this many results exist —
/// stricter than the other tiers, to avoid fan-out when a few good results
/// are already in hand.
const VARIATION_ENTRY_THRESHOLD: usize = 2;

/// How many query variations the variation tier tries.
const MAX_VARIATION_QUERIES: usize = 2;

/// How many planned sources each variation fetches.
const VARIATION_SOURCE_COUNT: usize = 3;

/// Per-outcome extraction cap within the variation tier.
const VARIATION_EXTRACT_CAP: usize = 2;

/// Character budget for the synthesised topic-fallback snippet.
const TOPIC_SUMMARY_CHARS: usize = 1000;

/// Escalation tiers for one query. Created in `Initial`, mutated only by
/// the controller, monotonic: a state is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationState {
    /// Primary per-category sources.
    Initial,
    /// Single canonical encyclopedia page for the literal query term.
    TopicFallback,
    /// Query-variation fan-out over a reduced source subset.
    VariationFallback,
    /// Terminal.
    Done,
}

/// Run the full aggregation pipeline for one query.
///
/// # Errors
///
/// Returns [`SearchError::Internal`] only for a broken orchestration
/// invariant. "No results found" is a success with the `error` response
/// field set.
pub async fn orchestrate_search<E>(
    query: &str,
    config: &SearchConfig,
    engine: Arc<E>,
) -> Result<SearchResponse, SearchError>
where
    E: FetchEngine + 'static,
{
    let category = category::classify(query);
    tracing::debug!(query, %category, max_results = config.max_results, "search started");

    let options = FetchOptions::from_config(config);
    let mut results = ResultSet::new(config.max_results);
    let mut state = EscalationState::Initial;

    while state != EscalationState::Done {
        state = match state {
            EscalationState::Initial => {
                let sources = planner::plan_sources(query, category);
                drain_tier(&engine, sources, &options, config, &mut results, None).await;
                tracing::debug!(tier = "initial", count = results.len(), "tier complete");
                if results.is_full() {
                    EscalationState::Done
                } else {
                    EscalationState::TopicFallback
                }
            }
            EscalationState::TopicFallback => {
                topic_fallback(&engine, query, &options, &mut results).await;
                tracing::debug!(tier = "topic", count = results.len(), "tier complete");
                if results.is_full() {
                    EscalationState::Done
                } else {
                    EscalationState::VariationFallback
                }
            }
            EscalationState::VariationFallback => {
                if results.len() < VARIATION_ENTRY_THRESHOLD {
                    variation_fallback(&engine, query, category, &options, config, &mut results)
                        .await;
                    tracing::debug!(tier = "variation", count = results.len(), "tier complete");
                } else {
                    tracing::debug!(
                        tier = "variation",
                        count = results.len(),
                        "tier skipped — threshold already met"
                    );
                }
                EscalationState::Done
            }
            EscalationState::Done => EscalationState::Done,
        };
    }

    build_response(query, category, config, results)
}

/// Dispatch a URL set and merge extracted candidates as outcomes complete.
///
/// Stops draining as soon as the result set fills; remaining in-flight
/// fetches are abandoned, not cancelled. `extract_cap` bounds the number of
/// candidates taken from any single outcome (on top of remaining capacity).
async fn drain_tier<E>(
    engine: &Arc<E>,
    urls: Vec<String>,
    options: &FetchOptions,
    config: &SearchConfig,
    results: &mut ResultSet,
    extract_cap: Option<usize>,
) where
    E: FetchEngine + 'static,
{
    if urls.is_empty() {
        return;
    }

    let mut rx = dispatch(
        Arc::clone(engine),
        urls,
        options.clone(),
        config.concurrency_limit,
        config.memory_budget,
    );

    while !results.is_full() {
        let Some(outcome) = rx.recv().await else {
            break;
        };
        if !outcome.success {
            // Failure already logged by the dispatcher; zero candidates.
            continue;
        }
        let Some(content) = outcome.content.as_deref() else {
            tracing::trace!(source = %outcome.source_url, "success with no content");
            continue;
        };
        if content.trim().is_empty() {
            continue;
        }

        let remaining = config.max_results.saturating_sub(results.len());
        let wanted = extract_cap.map_or(remaining, |cap| cap.min(remaining));
        let candidates = extract::extract(content, wanted);
        tracing::debug!(
            source = %outcome.source_url,
            extracted = candidates.len(),
            "outcome processed"
        );
        results.merge_all(candidates);
    }
}

/// Fetch the canonical encyclopedia page for the literal query and merge a
/// single synthesised result from its content.
async fn topic_fallback<E>(
    engine: &Arc<E>,
    query: &str,
    options: &FetchOptions,
    results: &mut ResultSet,
) where
    E: FetchEngine,
{
    let topic_url = planner::plan_topic_page(query);
    tracing::debug!(url = %topic_url, "topic fallback fetch");

    match engine.fetch(&topic_url, options).await {
        Ok(page) if page.success => {
            let Some(content) = page.content else {
                tracing::trace!("topic page rendered empty");
                return;
            };
            let snippet = summarise(&content);
            if snippet.is_empty() {
                return;
            }
            results.merge(SearchResult {
                title: format!("Information about {query}"),
                url: topic_url,
                snippet,
            });
        }
        Ok(_) => {
            tracing::debug!("topic page fetch reported failure");
        }
        Err(err) => {
            tracing::warn!(url = %topic_url, error = %err, "topic fallback failed");
        }
    }
}

/// Try up to the first [`MAX_VARIATION_QUERIES`] query variations against a
/// reduced source subset, with a tight per-outcome extraction cap.
async fn variation_fallback<E>(
    engine: &Arc<E>,
    query: &str,
    category: Category,
    options: &FetchOptions,
    config: &SearchConfig,
    results: &mut ResultSet,
) where
    E: FetchEngine + 'static,
{
    let variations = planner::plan_variations(query, category);

    for variation in variations.iter().take(MAX_VARIATION_QUERIES) {
        if results.is_full() {
            break;
        }
        let sources: Vec<String> = planner::plan_sources(variation, category)
            .into_iter()
            .take(VARIATION_SOURCE_COUNT)
            .collect();
        tracing::debug!(variation = %variation, sources = sources.len(), "variation dispatch");
        drain_tier(
            engine,
            sources,
            options,
            config,
            results,
            Some(VARIATION_EXTRACT_CAP),
        )
        .await;
    }
}

/// Bounded-length, whitespace-collapsed prefix of the topic page content.
fn summarise(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= TOPIC_SUMMARY_CHARS {
        return collapsed;
    }
    let mut prefix: String = collapsed.chars().take(TOPIC_SUMMARY_CHARS).collect();
    prefix.push_str("...");
    prefix
}

fn build_response(
    query: &str,
    category: Category,
    config: &SearchConfig,
    results: ResultSet,
) -> Result<SearchResponse, SearchError> {
    let results = results.into_results();
    if results.len() > config.max_results {
        // The result set is capped at merge time; exceeding it here means
        // the orchestration is broken.
        return Err(SearchError::Internal(format!(
            "result set exceeded max_results: {} > {}",
            results.len(),
            config.max_results
        )));
    }

    let error = if results.is_empty() {
        tracing::debug!(query, "all tiers exhausted with no results");
        Some(NO_RESULTS_MESSAGE.to_string())
    } else {
        None
    };

    Ok(SearchResponse {
        results,
        category,
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarise_short_content_untouched() {
        assert_eq!(summarise("brief body"), "brief body");
    }

    #[test]
    fn summarise_collapses_whitespace() {
        assert_eq!(summarise("a\n\nb   c"), "a b c");
    }

    #[test]
    fn summarise_truncates_with_ellipsis() {
        let long = "word ".repeat(500);
        let summary = summarise(&long);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), TOPIC_SUMMARY_CHARS + 3);
    }

    #[test]
    fn summarise_respects_char_boundaries() {
        let long = "é".repeat(2 * TOPIC_SUMMARY_CHARS);
        let summary = summarise(&long);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn empty_result_set_builds_error_response() {
        let config = SearchConfig::default();
        let response =
            build_response("q", Category::General, &config, ResultSet::new(5)).expect("build");
        assert!(response.results.is_empty());
        assert_eq!(response.error.as_deref(), Some(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn populated_result_set_has_no_error() {
        let config = SearchConfig::default();
        let mut set = ResultSet::new(5);
        set.merge(SearchResult {
            title: "Title".into(),
            url: "https://example.com/a".into(),
            snippet: "snippet".into(),
        });
        let response = build_response("q", Category::Tech, &config, set).expect("build");
        assert_eq!(response.results.len(), 1);
        assert!(response.error.is_none());
        assert_eq!(response.category, Category::Tech);
    }

    #[test]
    fn escalation_states_are_distinct() {
        let states = [
            EscalationState::Initial,
            EscalationState::TopicFallback,
            EscalationState::VariationFallback,
            EscalationState::Done,
        ];
        for (i, a) in states.iter().enumerate() {
            for (j, b) in states.iter().enumerate() {
                assert_eq!(i == j, a == b);
            }
        }
    }
}
