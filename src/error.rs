//! Error types for the factverify-search crate.
//!
//! Per-source fetch failures are never surfaced through these types — they
//! are absorbed into [`crate::types::FetchOutcome`] and logged. Errors here
//! are reserved for invalid configuration, fetch-engine construction
//! problems, and broken internal invariants.

/// Errors that can occur during a search aggregation request.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The fetch engine could not be constructed or used at all
    /// (as distinct from an individual page failing to fetch).
    #[error("fetch engine error: {0}")]
    FetchEngine(String),

    /// A broken internal invariant during orchestration. Surfaced to the
    /// caller as a service-level failure, distinct from "no results found".
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for factverify-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_config() {
        let err = SearchError::Config("max_results must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "config error: max_results must be greater than 0"
        );
    }

    #[test]
    fn display_fetch_engine() {
        let err = SearchError::FetchEngine("client build failed".into());
        assert_eq!(err.to_string(), "fetch engine error: client build failed");
    }

    #[test]
    fn display_internal() {
        let err = SearchError::Internal("result set over capacity".into());
        assert_eq!(err.to_string(), "internal error: result set over capacity");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
