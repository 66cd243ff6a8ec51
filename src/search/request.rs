//! Search request bodies
//!
//! Typed rendering of the small slice of the Elasticsearch query DSL the
//! enumeration queries need: a filtered `bool` query plus one `terms`
//! aggregation named [`AGGREGATION_NAME`].

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::filter::Constraint;

/// Name under which the enumeration aggregation is requested and read back
pub const AGGREGATION_NAME: &str = "terms";

/// Bucket cap used to approximate "all distinct values"
pub const AGGREGATION_SIZE: u32 = 10_000;

/// Sort direction of an order clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive parse of `asc` / `desc`
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Native bucket sort fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// `_count`: bucket document count
    Count,
    /// `_key`: bucket key
    Key,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "_count",
            Self::Key => "_key",
        }
    }
}

/// One `{ field: direction }` entry of a terms aggregation `order`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderClause {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Serialize for OrderClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field.as_str(), self.direction.as_str())?;
        map.end()
    }
}

/// Ordered sort clauses sent with the aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderSpec(Vec<OrderClause>);

impl OrderSpec {
    pub fn push(&mut self, field: SortField, direction: SortDirection) {
        self.0.push(OrderClause { field, direction });
    }

    pub fn clauses(&self) -> &[OrderClause] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Restricts which bucket keys the aggregation returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IncludeFilter {
    /// Exact key values
    Exact(Vec<String>),
    /// Lucene regular expression
    Pattern(String),
}

/// Where the aggregation reads its bucket keys from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TermsSource {
    Field(String),
    Script(String),
}

/// A `terms` aggregation definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermsAggregation {
    #[serde(flatten)]
    pub source: TermsSource,
    pub size: u32,
    pub show_term_doc_count_error: bool,
    #[serde(skip_serializing_if = "OrderSpec::is_empty")]
    pub order: OrderSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<IncludeFilter>,
}

impl TermsAggregation {
    fn with_source(source: TermsSource) -> Self {
        Self {
            source,
            size: AGGREGATION_SIZE,
            show_term_doc_count_error: true,
            order: OrderSpec::default(),
            include: None,
        }
    }

    /// Aggregate over the values of an indexed field
    pub fn field(field: impl Into<String>) -> Self {
        Self::with_source(TermsSource::Field(field.into()))
    }

    /// Aggregate over the values produced by a painless script
    pub fn script(script: impl Into<String>) -> Self {
        Self::with_source(TermsSource::Script(script.into()))
    }

    pub fn with_include(mut self, include: Option<IncludeFilter>) -> Self {
        self.include = include;
        self
    }

    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.order = order;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedAggregation {
    pub terms: TermsAggregation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregations {
    #[serde(rename = "terms")]
    pub named: NamedAggregation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterQuery {
    pub filter: Vec<Constraint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Query {
    #[serde(rename = "bool")]
    pub bool_query: FilterQuery,
}

/// Body of a `_search` request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggs: Option<Aggregations>,
    pub query: Query,
    #[serde(rename = "_source")]
    pub source: Vec<String>,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_total_hits: Option<bool>,
}

impl SearchBody {
    /// Aggregation-only request: no source fields, no document hits
    pub fn aggregation(filter: Vec<Constraint>, terms: TermsAggregation) -> Self {
        Self {
            aggs: Some(Aggregations {
                named: NamedAggregation { terms },
            }),
            query: Query {
                bool_query: FilterQuery { filter },
            },
            source: Vec::new(),
            size: 0,
            from: None,
            track_total_hits: None,
        }
    }

    /// Count-only variant of this request: same filter, zero-size window
    /// at offset zero, no aggregation
    pub fn count_only(&self) -> Self {
        Self {
            aggs: None,
            query: self.query.clone(),
            source: Vec::new(),
            size: 0,
            from: Some(0),
            track_total_hits: Some(true),
        }
    }

    pub fn filter(&self) -> &[Constraint] {
        &self.query.bool_query.filter
    }

    pub fn terms(&self) -> Option<&TermsAggregation> {
        self.aggs.as_ref().map(|aggs| &aggs.named.terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aggregation_body_shape() {
        let mut order = OrderSpec::default();
        order.push(SortField::Count, SortDirection::Desc);
        order.push(SortField::Key, SortDirection::Asc);

        let body = SearchBody::aggregation(
            vec![],
            TermsAggregation::field("host.tags_search").with_order(order),
        );

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "aggs": {
                    "terms": {
                        "terms": {
                            "field": "host.tags_search",
                            "size": 10000,
                            "show_term_doc_count_error": true,
                            "order": [{"_count": "DESC"}, {"_key": "ASC"}]
                        }
                    }
                },
                "query": {"bool": {"filter": []}},
                "_source": [],
                "size": 0
            })
        );
    }

    #[test]
    fn test_script_source_and_include() {
        let terms = TermsAggregation::script("return 'x';")
            .with_include(Some(IncludeFilter::Pattern("NS.*".into())));
        let value = serde_json::to_value(&terms).unwrap();

        assert_eq!(value["script"], "return 'x';");
        assert_eq!(value["include"], "NS.*");
        assert!(value.get("field").is_none());
        assert!(value.get("order").is_none());
    }

    #[test]
    fn test_count_only_keeps_filter() {
        let body = SearchBody::aggregation(
            vec![Constraint::term("host.org_id", json!("123"))],
            TermsAggregation::field("host.tags_search"),
        );
        let count = body.count_only();

        assert_eq!(count.filter(), body.filter());
        assert_eq!(
            serde_json::to_value(&count).unwrap(),
            json!({
                "query": {"bool": {"filter": [{"term": {"host.org_id": "123"}}]}},
                "_source": [],
                "size": 0,
                "from": 0,
                "track_total_hits": true
            })
        );
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("Desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("down"), None);
    }
}
