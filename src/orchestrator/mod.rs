//! Aggregation and escalation: the controller that turns a query into a
//! bounded, deduplicated result set.
//!
//! The controller classifies the query, plans sources, streams fetch
//! outcomes through extraction, merges candidates into a capped
//! first-seen-wins result set, and escalates through fallback tiers until
//! satisfied or exhausted.

pub mod result_set;
pub mod search;
pub mod url_normalize;
