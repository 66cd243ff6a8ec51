//! Per-kind enumeration adapters
//!
//! An adapter tells the resolver what to aggregate over, which `order_by`
//! names it accepts and how to decode a bucket.

pub mod operating_systems;
pub mod tags;

pub use operating_systems::{
    HostOperatingSystem, HostOperatingSystemsAdapter, HostOperatingSystemsArgs,
    OperatingSystemOrderBy,
};
pub use tags::{HostTag, HostTagsAdapter, HostTagsArgs, TagFilter, TagOrderBy, TagSearch};

use serde::Serialize;

use super::order::OrderByKey;
use crate::error::EnumerationError;
use crate::search::{AggregationBucket, TermsAggregation};

pub trait EnumerationAdapter: Send + Sync {
    type OrderBy: OrderByKey;
    type Record: Serialize + Send;

    /// Short name used in logs
    fn kind(&self) -> &'static str;

    /// The aggregation to run, without its order clauses
    fn aggregation(&self) -> TermsAggregation;

    /// Decode one bucket; `Ok(None)` drops it from the page
    fn decode(&self, bucket: &AggregationBucket) -> Result<Option<Self::Record>, EnumerationError>;
}
