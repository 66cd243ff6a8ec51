//! Native query constraints
//!
//! A [`Constraint`] is one entry of the `bool.filter` list sent to the
//! search engine. It serializes straight to Elasticsearch query DSL.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Term {
        field: String,
        value: Value,
    },
    Wildcard {
        field: String,
        pattern: String,
        case_insensitive: bool,
    },
    Range {
        field: String,
        bounds: RangeBounds,
    },
    Exists {
        field: String,
    },
    Bool(BoolConstraint),
    Nested {
        path: String,
        constraints: Vec<Constraint>,
    },
}

/// Bounds of a range constraint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<Value>,
}

impl RangeBounds {
    pub fn is_empty(&self) -> bool {
        self.gt.is_none() && self.gte.is_none() && self.lt.is_none() && self.lte.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolConstraint {
    pub filter: Vec<Constraint>,
    pub should: Vec<Constraint>,
    pub must_not: Vec<Constraint>,
}

impl Constraint {
    pub fn term(field: impl Into<String>, value: Value) -> Self {
        Self::Term {
            field: field.into(),
            value,
        }
    }

    /// Field has no value
    pub fn missing(field: impl Into<String>) -> Self {
        Self::none(vec![Self::Exists {
            field: field.into(),
        }])
    }

    /// All of `constraints` hold
    pub fn all(constraints: Vec<Constraint>) -> Self {
        Self::Bool(BoolConstraint {
            filter: constraints,
            ..Default::default()
        })
    }

    /// At least one of `constraints` holds
    pub fn any(constraints: Vec<Constraint>) -> Self {
        Self::Bool(BoolConstraint {
            should: constraints,
            ..Default::default()
        })
    }

    /// None of `constraints` hold
    pub fn none(constraints: Vec<Constraint>) -> Self {
        Self::Bool(BoolConstraint {
            must_not: constraints,
            ..Default::default()
        })
    }

    /// Render as Elasticsearch query DSL
    pub fn to_query(&self) -> Value {
        match self {
            Self::Term { field, value } => json!({ "term": { field: value } }),
            Self::Wildcard {
                field,
                pattern,
                case_insensitive,
            } => {
                let mut body = Map::new();
                body.insert("value".into(), json!(pattern));
                if *case_insensitive {
                    body.insert("case_insensitive".into(), json!(true));
                }
                json!({ "wildcard": { field: body } })
            }
            Self::Range { field, bounds } => json!({ "range": { field: bounds } }),
            Self::Exists { field } => json!({ "exists": { "field": field } }),
            Self::Bool(b) => {
                let mut body = Map::new();
                if !b.filter.is_empty() {
                    body.insert("filter".into(), render_all(&b.filter));
                }
                if !b.should.is_empty() {
                    body.insert("should".into(), render_all(&b.should));
                    body.insert("minimum_should_match".into(), json!(1));
                }
                if !b.must_not.is_empty() {
                    body.insert("must_not".into(), render_all(&b.must_not));
                }
                json!({ "bool": body })
            }
            Self::Nested { path, constraints } => json!({
                "nested": {
                    "path": path,
                    "query": { "bool": { "filter": render_all(constraints) } }
                }
            }),
        }
    }
}

fn render_all(constraints: &[Constraint]) -> Value {
    Value::Array(constraints.iter().map(Constraint::to_query).collect())
}

impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_query().serialize(serializer)
    }
}
