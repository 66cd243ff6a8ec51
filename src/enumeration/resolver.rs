//! Enumeration resolver
//!
//! Runs one enumeration request end to end:
//!
//! ```text
//! Validating -> Filtering -> Querying -> (RecoveringWindowOverflow)? -> Decoding -> Done
//! ```
//!
//! Arguments are checked before anything touches the network. The only
//! follow-up request ever issued is the count query used to tell a real
//! result-window overflow apart from a page past the end of the data.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::adapters::{
    EnumerationAdapter, HostOperatingSystem, HostOperatingSystemsAdapter,
    HostOperatingSystemsArgs, HostTag, HostTagsAdapter, HostTagsArgs,
};
use super::order::resolve_order;
use super::pagination::PageWindow;
use crate::error::EnumerationError;
use crate::filter::{Constraint, CoreSchema, FilterCompiler, FilterTree};
use crate::search::{SearchBody, SearchClient, SearchError};

/// Path under which host fields live in the index
pub const ENTITY_PATH_PREFIX: &[&str] = &["host"];

/// Field the account scope is matched against
pub const ORG_ID_FIELD: &str = "host.org_id";

/// One enumeration call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumerationRequest {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Option<String>,
    pub order_how: Option<String>,
    pub host_filter: Option<FilterTree>,
    /// Account scoping constraints, applied ahead of the host filter
    pub scope: Vec<Constraint>,
}

impl EnumerationRequest {
    pub fn with_scope(mut self, scope: Vec<Constraint>) -> Self {
        self.scope = scope;
        self
    }
}

impl From<HostTagsArgs> for EnumerationRequest {
    fn from(args: HostTagsArgs) -> Self {
        Self {
            limit: args.limit,
            offset: args.offset,
            order_by: args.order_by,
            order_how: args.order_how,
            host_filter: args.host_filter,
            scope: Vec::new(),
        }
    }
}

impl From<HostOperatingSystemsArgs> for EnumerationRequest {
    fn from(args: HostOperatingSystemsArgs) -> Self {
        Self {
            limit: args.limit,
            offset: args.offset,
            order_by: args.order_by,
            order_how: args.order_how,
            host_filter: args.host_filter,
            scope: Vec::new(),
        }
    }
}

/// Restrict a request to one organization
pub fn org_scope(org_id: &str) -> Constraint {
    Constraint::term(ORG_ID_FIELD, Value::String(org_id.to_string()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnumerationMeta {
    /// Records in this page after decoding
    pub count: usize,
    /// Buckets the engine returned under the aggregation cap; an
    /// approximation of the number of distinct values
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumerationResult<T> {
    pub data: Vec<T>,
    pub meta: EnumerationMeta,
}

impl<T> EnumerationResult<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            meta: EnumerationMeta::default(),
        }
    }
}

pub struct EnumerationResolver {
    client: Arc<dyn SearchClient>,
    compiler: Arc<dyn FilterCompiler>,
    schema: Arc<CoreSchema>,
    index: String,
}

impl EnumerationResolver {
    pub fn new(
        client: Arc<dyn SearchClient>,
        compiler: Arc<dyn FilterCompiler>,
        schema: Arc<CoreSchema>,
        index: impl Into<String>,
    ) -> Self {
        Self {
            client,
            compiler,
            schema,
            index: index.into(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// List distinct host tags
    pub async fn list_host_tags(
        &self,
        args: HostTagsArgs,
        scope: Vec<Constraint>,
    ) -> Result<EnumerationResult<HostTag>, EnumerationError> {
        let adapter = HostTagsAdapter::new(args.filter.as_ref());
        self.resolve(&adapter, EnumerationRequest::from(args).with_scope(scope))
            .await
    }

    /// List distinct host operating systems
    pub async fn list_host_operating_systems(
        &self,
        args: HostOperatingSystemsArgs,
        scope: Vec<Constraint>,
    ) -> Result<EnumerationResult<HostOperatingSystem>, EnumerationError> {
        self.resolve(
            &HostOperatingSystemsAdapter,
            EnumerationRequest::from(args).with_scope(scope),
        )
        .await
    }

    pub async fn resolve<A: EnumerationAdapter>(
        &self,
        adapter: &A,
        request: EnumerationRequest,
    ) -> Result<EnumerationResult<A::Record>, EnumerationError> {
        let window = PageWindow::from_args(request.limit, request.offset)?;
        let order = resolve_order::<A::OrderBy>(
            request.order_by.as_deref(),
            request.order_how.as_deref(),
        )?;

        let mut filter = request.scope;
        filter.extend(self.compiler.compile(
            ENTITY_PATH_PREFIX,
            request.host_filter.as_ref(),
            &self.schema,
        )?);

        let body = SearchBody::aggregation(filter, adapter.aggregation().with_order(order));
        tracing::debug!(
            kind = adapter.kind(),
            index = %self.index,
            limit = window.limit,
            offset = window.offset,
            constraints = body.filter().len(),
            "Resolving enumeration"
        );

        let response = match self.client.search(&self.index, &body).await {
            Ok(response) => response,
            Err(err) if err.is_result_window_exceeded() => {
                return self.recover_window_overflow(&body, window, err).await;
            }
            Err(err) => return Err(EnumerationError::SearchBackend(err)),
        };

        let total = response.buckets.len();
        let mut data = Vec::with_capacity(window.limit.min(total));
        for bucket in window.slice(&response.buckets) {
            if let Some(record) = adapter.decode(bucket)? {
                data.push(record);
            }
        }

        Ok(EnumerationResult {
            meta: EnumerationMeta {
                count: data.len(),
                total,
            },
            data,
        })
    }

    /// The engine rejects windows past its limit even when the page would be
    /// empty anyway. Count the matching hosts: an offset beyond them is an
    /// empty page, anything else is a real overflow.
    async fn recover_window_overflow<T: Send>(
        &self,
        body: &SearchBody,
        window: PageWindow,
        cause: SearchError,
    ) -> Result<EnumerationResult<T>, EnumerationError> {
        tracing::warn!(
            index = %self.index,
            offset = window.offset,
            error = %cause,
            "Result window exceeded, counting matching hosts"
        );

        let count = self
            .client
            .search(&self.index, &body.count_only())
            .await
            .map_err(EnumerationError::SearchBackend)?;

        if count.hits_total >= window.offset as u64 {
            return Err(EnumerationError::RequestWindowExceeded {
                offset: window.offset,
                hits: count.hits_total,
                source: cause,
            });
        }

        tracing::info!(
            offset = window.offset,
            hits = count.hits_total,
            "Offset is past the matching hosts, returning an empty page"
        );
        Ok(EnumerationResult::empty())
    }
}
