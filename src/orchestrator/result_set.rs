//! The capped, URL-deduplicated result collection one query accumulates.
//!
//! Insertion order is discovery order. The dedupe key is the canonical URL
//! form from [`super::url_normalize`]; the first candidate to produce a
//! given key wins, so membership is order-independent for equal inputs even
//! though merge order follows fetch completion.

use std::collections::HashSet;

use crate::types::SearchResult;

use super::url_normalize::normalize_url;

/// An insertion-ordered set of results, deduplicated by canonical URL and
/// capped at a fixed size.
#[derive(Debug)]
pub struct ResultSet {
    results: Vec<SearchResult>,
    seen: HashSet<String>,
    capacity: usize,
}

impl ResultSet {
    /// Create an empty set capped at `capacity` results.
    pub fn new(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
            seen: HashSet::new(),
            capacity,
        }
    }

    /// Merge one candidate. Returns `true` if it was accepted.
    ///
    /// Rejected when the set is full or a result with the same canonical
    /// URL is already present (first-seen wins).
    pub fn merge(&mut self, candidate: SearchResult) -> bool {
        if self.is_full() {
            return false;
        }
        let key = normalize_url(&candidate.url);
        if !self.seen.insert(key) {
            tracing::trace!(url = %candidate.url, "duplicate result dropped");
            return false;
        }
        self.results.push(candidate);
        true
    }

    /// Merge a batch of candidates in order, stopping at capacity.
    pub fn merge_all(&mut self, candidates: Vec<SearchResult>) {
        for candidate in candidates {
            if self.is_full() {
                break;
            }
            self.merge(candidate);
        }
    }

    /// Number of accepted results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no results have been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Whether the cap has been reached.
    pub fn is_full(&self) -> bool {
        self.results.len() >= self.capacity
    }

    /// Consume the set, yielding results in discovery order.
    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
    }
}
