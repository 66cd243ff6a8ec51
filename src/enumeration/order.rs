//! Order-by resolution
//!
//! Maps the caller's `order_by` / `order_how` pair onto the aggregation's
//! native sort clauses. The bucket key is always appended as the final
//! ascending tie-breaker: the engine only orders buckets approximately,
//! and pages cut from different responses must line up.

use crate::error::EnumerationError;
use crate::search::{OrderSpec, SortDirection, SortField};

/// A closed set of accepted `order_by` names for one enumeration kind
pub trait OrderByKey: Sized + Copy {
    /// Exact, case-sensitive match of an accepted name
    fn parse(name: &str) -> Option<Self>;

    fn sort_field(self) -> SortField;
}

pub fn parse_order_by<K: OrderByKey>(order_by: Option<&str>) -> Result<Option<K>, EnumerationError> {
    order_by
        .filter(|name| !name.is_empty())
        .map(|name| {
            K::parse(name).ok_or_else(|| {
                EnumerationError::invalid_argument(format!("invalid order_by parameter: {name}"))
            })
        })
        .transpose()
}

pub fn parse_order_how(order_how: Option<&str>) -> Result<Option<SortDirection>, EnumerationError> {
    order_how
        .filter(|how| !how.is_empty())
        .map(|how| {
            SortDirection::parse(how).ok_or_else(|| {
                EnumerationError::invalid_argument(format!("invalid order_how parameter: {how}"))
            })
        })
        .transpose()
}

pub fn resolve_order<K: OrderByKey>(
    order_by: Option<&str>,
    order_how: Option<&str>,
) -> Result<OrderSpec, EnumerationError> {
    let key = parse_order_by::<K>(order_by)?;
    let direction = parse_order_how(order_how)?;

    let mut order = OrderSpec::default();
    match (key, direction) {
        (Some(key), Some(direction)) => order.push(key.sort_field(), direction),
        (Some(key), None) => order.push(key.sort_field(), SortDirection::Asc),
        (None, Some(direction)) => order.push(SortField::Count, direction),
        (None, None) => {}
    }
    order.push(SortField::Key, SortDirection::Asc);

    Ok(order)
}
