//! Core traits and types for the search client abstraction
//!
//! This module defines the `SearchClient` trait so the enumeration
//! resolver can run against Elasticsearch or an in-memory double.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::request::SearchBody;

/// Root-cause reason fragment Elasticsearch reports when `from + size`
/// exceeds `index.max_result_window`
pub const RESULT_WINDOW_TOO_LARGE: &str = "Result window is too large";

/// A single terms-aggregation bucket
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AggregationBucket {
    pub key: String,
    pub doc_count: u64,
    #[serde(default)]
    pub doc_count_error_upper_bound: i64,
}

impl AggregationBucket {
    pub fn new(key: impl Into<String>, doc_count: u64) -> Self {
        Self {
            key: key.into(),
            doc_count,
            doc_count_error_upper_bound: 0,
        }
    }
}

/// What the enumeration core reads back from a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResponse {
    /// Buckets of the `terms` aggregation, in engine order
    pub buckets: Vec<AggregationBucket>,
    /// Total number of matching documents
    pub hits_total: u64,
}

/// One entry of an Elasticsearch `error.root_cause` array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RootCause {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub reason: String,
}

/// Errors raised by a search client
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("search rejected with status {status}: {reason}")]
    Rejected {
        status: u16,
        reason: String,
        root_cause: Vec<RootCause>,
    },

    #[error("unexpected search response: {0}")]
    InvalidResponse(String),
}

impl SearchError {
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }

    pub fn root_causes(&self) -> &[RootCause] {
        match self {
            Self::Rejected { root_cause, .. } => root_cause,
            _ => &[],
        }
    }

    /// True when the engine refused the query because the requested
    /// window is deeper than its result-window limit
    pub fn is_result_window_exceeded(&self) -> bool {
        self.root_causes()
            .iter()
            .any(|cause| cause.reason.contains(RESULT_WINDOW_TOO_LARGE))
    }
}

/// The search client trait
///
/// Implementations must be Send + Sync; one client is shared by all
/// concurrent enumeration calls.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Execute `body` against `index`
    async fn search(&self, index: &str, body: &SearchBody) -> Result<SearchResponse, SearchError>;
}
