//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use host_enumeration_gateway::filter::{CoreSchema, SchemaFilterCompiler};
use host_enumeration_gateway::search::{
    AggregationBucket, RootCause, SearchBody, SearchClient, SearchError, SearchResponse,
};
use host_enumeration_gateway::EnumerationResolver;

pub const INDEX: &str = "xjoin.inventory.hosts";

/// Search client double: replays queued responses and records every request
#[derive(Default)]
pub struct RecordingSearchClient {
    responses: Mutex<VecDeque<Result<SearchResponse, SearchError>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl RecordingSearchClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: Result<SearchResponse, SearchError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn push_buckets(&self, buckets: &[(&str, u64)]) -> &Self {
        self.push(Ok(SearchResponse {
            buckets: buckets
                .iter()
                .map(|(key, count)| AggregationBucket::new(*key, *count))
                .collect(),
            hits_total: 0,
        }))
    }

    pub fn push_hits(&self, hits_total: u64) -> &Self {
        self.push(Ok(SearchResponse {
            buckets: Vec::new(),
            hits_total,
        }))
    }

    /// Recorded `(index, body)` pairs, oldest first
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_bodies(&self) -> Vec<Value> {
        self.requests().into_iter().map(|(_, body)| body).collect()
    }
}

#[async_trait]
impl SearchClient for RecordingSearchClient {
    async fn search(&self, index: &str, body: &SearchBody) -> Result<SearchResponse, SearchError> {
        self.requests
            .lock()
            .unwrap()
            .push((index.to_string(), serde_json::to_value(body).unwrap()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SearchError::InvalidResponse("no response queued".into())))
    }
}

/// Rejection the engine returns when from + size passes max_result_window
pub fn window_too_large() -> SearchError {
    SearchError::Rejected {
        status: 400,
        reason: "all shards failed".into(),
        root_cause: vec![RootCause {
            kind: "illegal_argument_exception".into(),
            reason: "Result window is too large, from + size must be less than or equal to: \
                     [10000] but was [11000]."
                .into(),
        }],
    }
}

pub fn host_schema() -> CoreSchema {
    CoreSchema::from_yaml(
        r#"
fields:
  - name: display_name
    type: string
  - name: org_id
    type: string
  - name: insights_id
    type: uuid
  - name: stale_timestamp
    type: timestamp
  - name: tags
    type: nested
    fields:
      - name: namespace
        type: string
      - name: key
        type: string
      - name: value
        type: string
  - name: system_profile_facts
    type: object
    fields:
      - name: number_of_cpus
        type: integer
"#,
    )
    .unwrap()
}

pub fn resolver(client: Arc<RecordingSearchClient>) -> EnumerationResolver {
    EnumerationResolver::new(
        client,
        Arc::new(SchemaFilterCompiler),
        Arc::new(host_schema()),
        INDEX,
    )
}
