//! Elasticsearch HTTP client
//!
//! Issues `_search` requests over HTTP and reshapes the JSON response into
//! a [`SearchResponse`]. Engine-side rejections are decoded from the
//! standard error envelope so callers can inspect the root cause.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::request::SearchBody;
use super::traits::{AggregationBucket, RootCause, SearchClient, SearchError, SearchResponse};
use crate::config::ElasticsearchConfig;

pub struct ElasticsearchClient {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl ElasticsearchClient {
    pub fn new(config: &ElasticsearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SearchError::transport)?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            credentials: config
                .credentials()
                .map(|(user, pass)| (user.to_string(), pass.to_string())),
        })
    }

    fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.base_url, index)
    }
}

#[async_trait]
impl SearchClient for ElasticsearchClient {
    async fn search(&self, index: &str, body: &SearchBody) -> Result<SearchResponse, SearchError> {
        let url = self.search_url(index);
        tracing::debug!(%url, size = body.size, from = ?body.from, "Executing search request");

        let mut request = self.client.post(&url).json(body);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(SearchError::transport)?;
        let status = response.status();
        let text = response.text().await.map_err(SearchError::transport)?;

        if !status.is_success() {
            let err = parse_error(status.as_u16(), &text);
            tracing::warn!(status = status.as_u16(), error = %err, "Search request rejected");
            return Err(err);
        }

        parse_response(&text)
    }
}

// ============================================================================
// Response decoding
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    hits: Option<RawHits>,
    #[serde(default)]
    aggregations: Option<RawAggregations>,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    #[serde(default)]
    total: Option<RawTotal>,
}

/// ES 7+ reports `{ "value": n, "relation": .. }`, older versions a bare number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

#[derive(Debug, Deserialize)]
struct RawAggregations {
    #[serde(default)]
    terms: Option<RawTerms>,
}

#[derive(Debug, Deserialize)]
struct RawTerms {
    #[serde(default)]
    buckets: Vec<AggregationBucket>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Structured {
        #[serde(default)]
        root_cause: Vec<RootCause>,
        #[serde(default)]
        reason: String,
    },
    Message(String),
}

pub(crate) fn parse_response(text: &str) -> Result<SearchResponse, SearchError> {
    let raw: RawResponse =
        serde_json::from_str(text).map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

    let hits_total = match raw.hits.and_then(|hits| hits.total) {
        Some(RawTotal::Count(value)) | Some(RawTotal::Object { value }) => value,
        None => 0,
    };
    let buckets = raw
        .aggregations
        .and_then(|aggs| aggs.terms)
        .map(|terms| terms.buckets)
        .unwrap_or_default();

    Ok(SearchResponse {
        buckets,
        hits_total,
    })
}

pub(crate) fn parse_error(status: u16, text: &str) -> SearchError {
    match serde_json::from_str::<ErrorEnvelope>(text).map(|envelope| envelope.error) {
        Ok(ErrorBody::Structured { root_cause, reason }) => SearchError::Rejected {
            status,
            reason,
            root_cause,
        },
        Ok(ErrorBody::Message(reason)) => SearchError::Rejected {
            status,
            reason,
            root_cause: vec![],
        },
        Err(_) => SearchError::Rejected {
            status,
            reason: text.to_string(),
            root_cause: vec![],
        },
    }
}
