//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls result count, fetch concurrency, the memory
//! admission budget, and per-page fetch behaviour. These are the only
//! process-wide knobs; everything else is per-request state.

use crate::error::SearchError;

/// Configuration for one search aggregation request.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of results to return after deduplication.
    pub max_results: usize,
    /// Maximum number of fetches in flight at once. Deliberately low —
    /// each fetch drives a full page render in the fetch engine.
    pub concurrency_limit: usize,
    /// Fraction of physical RAM that may be in use before the dispatcher
    /// pauses admission of new fetches. In `(0.0, 1.0]`.
    pub memory_budget: f64,
    /// Per-page fetch timeout in seconds.
    pub timeout_seconds: u64,
    /// Minimum words a rendered page must contain to count as content.
    pub min_word_threshold: usize,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            concurrency_limit: 2,
            memory_budget: 0.6,
            timeout_seconds: 20,
            min_word_threshold: 5,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `concurrency_limit` must be greater than 0
    /// - `memory_budget` must be in `(0.0, 1.0]`
    /// - `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.concurrency_limit == 0 {
            return Err(SearchError::Config(
                "concurrency_limit must be greater than 0".into(),
            ));
        }
        if !(self.memory_budget > 0.0 && self.memory_budget <= 1.0) {
            return Err(SearchError::Config(
                "memory_budget must be in (0.0, 1.0]".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
