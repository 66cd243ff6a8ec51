//! Schema-driven host filter compiler
//!
//! A filter tree is a JSON object whose keys are either schema fields or the
//! combinators `AND`, `OR` and `NOT`:
//!
//! ```text
//! {
//!   "display_name": { "matches": "web*" },
//!   "system_profile_facts": { "number_of_cpus": { "gte": 4 } },
//!   "OR": [ { "reporter": { "eq": "puptoo" } }, { "reporter": { "eq": "yupana" } } ],
//!   "NOT": { "ansible_host": { "is": null } }
//! }
//! ```
//!
//! Scalar fields take an operator object; `object` fields take another
//! filter tree addressed below the field's path; `nested` fields take a
//! filter tree that is wrapped in a `nested` query.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::constraint::{Constraint, RangeBounds};
use super::schema::{CoreSchema, FieldDefinition, FieldType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("unknown filter field: {0}")]
    UnknownField(String),
    #[error("unsupported operator '{operator}' for field {field}")]
    UnsupportedOperator { field: String, operator: String },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("malformed filter at {path}: {reason}")]
    Malformed { path: String, reason: String },
}

/// An unparsed, structured host filter
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FilterTree(Map<String, Value>);

impl FilterTree {
    pub fn new(entries: Map<String, Value>) -> Self {
        Self(entries)
    }

    pub fn from_value(value: Value) -> Result<Self, FilterError> {
        match value {
            Value::Object(entries) => Ok(Self(entries)),
            other => Err(FilterError::Malformed {
                path: "hostFilter".into(),
                reason: format!("expected an object, got {other}"),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Compiles a filter tree into native constraints
pub trait FilterCompiler: Send + Sync {
    /// `prefix` is the entity path every field is addressed under
    /// (e.g. `["host"]`). An absent tree compiles to no constraints.
    fn compile(
        &self,
        prefix: &[&str],
        filter: Option<&FilterTree>,
        schema: &CoreSchema,
    ) -> Result<Vec<Constraint>, FilterError>;
}

/// Compiler that types every field against the [`CoreSchema`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaFilterCompiler;

impl FilterCompiler for SchemaFilterCompiler {
    fn compile(
        &self,
        prefix: &[&str],
        filter: Option<&FilterTree>,
        schema: &CoreSchema,
    ) -> Result<Vec<Constraint>, FilterError> {
        let Some(tree) = filter else {
            return Ok(Vec::new());
        };

        let scope = Scope {
            path: prefix.join("."),
            fields: &schema.fields,
        };
        compile_tree(tree.entries(), &scope)
    }
}

/// Fields visible at one level of the tree, and the path they live under
struct Scope<'a> {
    path: String,
    fields: &'a [FieldDefinition],
}

impl<'a> Scope<'a> {
    fn field_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn child(&self, def: &'a FieldDefinition) -> Scope<'a> {
        Scope {
            path: self.field_path(&def.name),
            fields: &def.fields,
        }
    }
}

fn compile_tree(tree: &Map<String, Value>, scope: &Scope<'_>) -> Result<Vec<Constraint>, FilterError> {
    let mut constraints = Vec::new();

    for (name, node) in tree {
        match name.as_str() {
            "AND" => {
                for arm in as_array(node, scope, name)? {
                    let arm = compile_tree(as_object(arm, scope, name)?, scope)?;
                    constraints.push(Constraint::all(arm));
                }
            }
            "OR" => {
                let arms = as_array(node, scope, name)?
                    .iter()
                    .map(|arm| compile_tree(as_object(arm, scope, name)?, scope).map(Constraint::all))
                    .collect::<Result<Vec<_>, _>>()?;
                // an empty OR list places no restriction
                if !arms.is_empty() {
                    constraints.push(Constraint::any(arms));
                }
            }
            "NOT" => {
                let inner = compile_tree(as_object(node, scope, name)?, scope)?;
                constraints.push(Constraint::none(vec![Constraint::all(inner)]));
            }
            _ => {
                let def = scope
                    .lookup(name)
                    .ok_or_else(|| FilterError::UnknownField(scope.field_path(name)))?;
                constraints.extend(compile_field(def, node, scope)?);
            }
        }
    }

    Ok(constraints)
}

fn compile_field<'a>(
    def: &'a FieldDefinition,
    node: &Value,
    scope: &Scope<'a>,
) -> Result<Vec<Constraint>, FilterError> {
    let field = scope.field_path(&def.name);
    let operators = as_object(node, scope, &def.name)?;

    match def.field_type {
        FieldType::Object => compile_tree(operators, &scope.child(def)),
        FieldType::Nested => {
            let inner = compile_tree(operators, &scope.child(def))?;
            Ok(vec![Constraint::Nested {
                path: field,
                constraints: inner,
            }])
        }
        scalar => compile_operators(&field, scalar, operators),
    }
}

fn compile_operators(
    field: &str,
    field_type: FieldType,
    operators: &Map<String, Value>,
) -> Result<Vec<Constraint>, FilterError> {
    let mut constraints = Vec::new();
    let mut bounds = RangeBounds::default();

    for (operator, value) in operators {
        match operator.as_str() {
            "is" if value.is_null() => constraints.push(Constraint::missing(field)),
            "is" if field_type == FieldType::Boolean => {
                constraints.push(Constraint::term(field, typed_value(field, field_type, value)?))
            }
            "is" => {
                return Err(FilterError::InvalidValue {
                    field: field.to_string(),
                    reason: "'is' only accepts null for this field".into(),
                })
            }
            "eq" => constraints.push(Constraint::term(field, typed_value(field, field_type, value)?)),
            "matches" | "matches_lc" if field_type == FieldType::String => {
                let pattern = value.as_str().ok_or_else(|| FilterError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("expected a pattern string, got {value}"),
                })?;
                constraints.push(Constraint::Wildcard {
                    field: field.to_string(),
                    pattern: pattern.to_string(),
                    case_insensitive: operator == "matches_lc",
                });
            }
            "gt" | "gte" | "lt" | "lte" if is_ordered(field_type) => {
                let bound = Some(typed_value(field, field_type, value)?);
                match operator.as_str() {
                    "gt" => bounds.gt = bound,
                    "gte" => bounds.gte = bound,
                    "lt" => bounds.lt = bound,
                    _ => bounds.lte = bound,
                }
            }
            _ => {
                return Err(FilterError::UnsupportedOperator {
                    field: field.to_string(),
                    operator: operator.clone(),
                })
            }
        }
    }

    if !bounds.is_empty() {
        constraints.push(Constraint::Range {
            field: field.to_string(),
            bounds,
        });
    }

    Ok(constraints)
}

fn is_ordered(field_type: FieldType) -> bool {
    matches!(
        field_type,
        FieldType::Integer | FieldType::Float | FieldType::Timestamp
    )
}

/// Check `value` against the field type and return its native form
fn typed_value(field: &str, field_type: FieldType, value: &Value) -> Result<Value, FilterError> {
    let invalid = |reason: String| FilterError::InvalidValue {
        field: field.to_string(),
        reason,
    };

    match field_type {
        FieldType::String => value
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| invalid(format!("expected a string, got {value}"))),
        FieldType::Integer => value
            .as_i64()
            .map(Value::from)
            .ok_or_else(|| invalid(format!("expected an integer, got {value}"))),
        FieldType::Float => value
            .as_f64()
            .map(Value::from)
            .ok_or_else(|| invalid(format!("expected a number, got {value}"))),
        FieldType::Boolean => value
            .as_bool()
            .map(Value::from)
            .ok_or_else(|| invalid(format!("expected a boolean, got {value}"))),
        FieldType::Timestamp => {
            let raw = value
                .as_str()
                .ok_or_else(|| invalid(format!("expected an RFC 3339 timestamp, got {value}")))?;
            chrono::DateTime::parse_from_rfc3339(raw)
                .map_err(|e| invalid(format!("{raw:?} is not an RFC 3339 timestamp: {e}")))?;
            Ok(Value::String(raw.to_string()))
        }
        FieldType::Uuid => {
            let raw = value
                .as_str()
                .ok_or_else(|| invalid(format!("expected a UUID, got {value}")))?;
            let id = uuid::Uuid::parse_str(raw)
                .map_err(|e| invalid(format!("{raw:?} is not a UUID: {e}")))?;
            Ok(Value::String(id.hyphenated().to_string()))
        }
        FieldType::Object | FieldType::Nested => {
            Err(invalid("containers do not take scalar values".into()))
        }
    }
}

fn as_object<'v>(
    value: &'v Value,
    scope: &Scope<'_>,
    name: &str,
) -> Result<&'v Map<String, Value>, FilterError> {
    value.as_object().ok_or_else(|| FilterError::Malformed {
        path: scope.field_path(name),
        reason: format!("expected an object, got {value}"),
    })
}

fn as_array<'v>(value: &'v Value, scope: &Scope<'_>, name: &str) -> Result<&'v [Value], FilterError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| FilterError::Malformed {
            path: scope.field_path(name),
            reason: format!("expected a list, got {value}"),
        })
}
