//! Distinct host tags

use serde::{Deserialize, Serialize};

use super::EnumerationAdapter;
use crate::enumeration::decoder::{decode_tag_key, TagKey};
use crate::enumeration::order::OrderByKey;
use crate::error::EnumerationError;
use crate::filter::FilterTree;
use crate::search::{AggregationBucket, IncludeFilter, SortField, TermsAggregation};

/// Keyword field holding each tag as `namespace/key=value`
pub const TAGS_SEARCH_FIELD: &str = "host.tags_search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOrderBy {
    Count,
    Tag,
}

impl OrderByKey for TagOrderBy {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "count" => Some(Self::Count),
            "tag" => Some(Self::Tag),
            _ => None,
        }
    }

    fn sort_field(self) -> SortField {
        match self {
            Self::Count => SortField::Count,
            Self::Tag => SortField::Key,
        }
    }
}

/// Restricts the enumerated tag strings themselves
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TagSearch {
    /// Exact `namespace/key=value` string
    pub eq: Option<String>,
    /// Lucene regular expression over the tag string
    pub regex: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TagFilter {
    pub search: Option<TagSearch>,
}

/// Arguments of the "list distinct tags" operation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HostTagsArgs {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Option<String>,
    pub order_how: Option<String>,
    pub filter: Option<TagFilter>,
    #[serde(rename = "hostFilter")]
    pub host_filter: Option<FilterTree>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostTag {
    pub tag: TagKey,
    pub count: u64,
}

#[derive(Debug, Clone, Default)]
pub struct HostTagsAdapter {
    include: Option<IncludeFilter>,
}

impl HostTagsAdapter {
    /// `eq` wins over `regex` when both are set; empty strings are ignored
    pub fn new(filter: Option<&TagFilter>) -> Self {
        let search = filter.and_then(|f| f.search.as_ref());
        let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());

        let include = search.and_then(|search| {
            non_empty(&search.eq)
                .map(|eq| IncludeFilter::Exact(vec![eq]))
                .or_else(|| non_empty(&search.regex).map(IncludeFilter::Pattern))
        });

        Self { include }
    }
}

impl EnumerationAdapter for HostTagsAdapter {
    type OrderBy = TagOrderBy;
    type Record = HostTag;

    fn kind(&self) -> &'static str {
        "tags"
    }

    fn aggregation(&self) -> TermsAggregation {
        TermsAggregation::field(TAGS_SEARCH_FIELD).with_include(self.include.clone())
    }

    fn decode(&self, bucket: &AggregationBucket) -> Result<Option<HostTag>, EnumerationError> {
        Ok(Some(HostTag {
            tag: decode_tag_key(&bucket.key)?,
            count: bucket.doc_count,
        }))
    }
}
