//! Search engine access
//!
//! The enumeration core only talks to the engine through the
//! [`SearchClient`] trait. [`ElasticsearchClient`] is the HTTP
//! implementation used by the server binary.

pub mod elasticsearch;
pub mod request;
pub mod traits;

pub use elasticsearch::ElasticsearchClient;
pub use request::{
    IncludeFilter, OrderClause, OrderSpec, SearchBody, SortDirection, SortField, TermsAggregation,
    TermsSource, AGGREGATION_NAME, AGGREGATION_SIZE,
};
pub use traits::{
    AggregationBucket, RootCause, SearchClient, SearchError, SearchResponse,
    RESULT_WINDOW_TOO_LARGE,
};
