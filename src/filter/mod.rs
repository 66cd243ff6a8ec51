//! Host filter translation
//!
//! Turns the structured `hostFilter` argument into native term/range
//! constraints. The enumeration resolver only depends on the
//! [`FilterCompiler`] trait; [`SchemaFilterCompiler`] is the implementation
//! driven by the host field schema.

pub mod compiler;
pub mod constraint;
pub mod schema;

pub use compiler::{FilterCompiler, FilterError, FilterTree, SchemaFilterCompiler};
pub use constraint::{BoolConstraint, Constraint, RangeBounds};
pub use schema::{CoreSchema, FieldDefinition, FieldType};
