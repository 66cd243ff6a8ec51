//! Pagination over aggregation buckets
//!
//! The engine returns every bucket under the aggregation cap in one
//! response; the requested page is cut out of that list here.

use crate::error::EnumerationError;

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_OFFSET: usize = 0;
pub const MAX_LIMIT: i64 = 100;

pub fn validate_limit(limit: Option<i64>) -> Result<(), EnumerationError> {
    match limit {
        Some(value) if value < 0 => Err(EnumerationError::invalid_argument(format!(
            "limit: value must be 0 or greater (was {value})"
        ))),
        Some(value) if value > MAX_LIMIT => Err(EnumerationError::invalid_argument(format!(
            "limit: value must be {MAX_LIMIT} or less (was {value})"
        ))),
        _ => Ok(()),
    }
}

pub fn validate_offset(offset: Option<i64>) -> Result<(), EnumerationError> {
    match offset {
        Some(value) if value < 0 => Err(EnumerationError::invalid_argument(format!(
            "offset: value must be 0 or greater (was {value})"
        ))),
        _ => Ok(()),
    }
}

/// Apply defaults. Values that do not fit a `usize` fall back to the
/// default, so validate first.
pub fn normalize(limit: Option<i64>, offset: Option<i64>) -> (usize, usize) {
    let limit = limit
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or(DEFAULT_LIMIT);
    let offset = offset
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or(DEFAULT_OFFSET);
    (limit, offset)
}

/// `items[offset..offset + limit]`, clamped to the list
pub fn slice<T>(items: &[T], limit: usize, offset: usize) -> &[T] {
    if offset >= items.len() {
        return &[];
    }
    let end = offset.saturating_add(limit).min(items.len());
    &items[offset..end]
}

/// A validated limit/offset pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: usize,
    pub offset: usize,
}

impl PageWindow {
    pub fn from_args(limit: Option<i64>, offset: Option<i64>) -> Result<Self, EnumerationError> {
        validate_limit(limit)?;
        validate_offset(offset)?;
        let (limit, offset) = normalize(limit, offset);
        Ok(Self { limit, offset })
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        slice(items, self.limit, self.offset)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_limit_bounds() {
        assert!(validate_limit(None).is_ok());
        assert!(validate_limit(Some(0)).is_ok());
        assert!(validate_limit(Some(100)).is_ok());

        let err = validate_limit(Some(101)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument: limit: value must be 100 or less (was 101)"
        );
        assert!(validate_limit(Some(-1)).is_err());
    }

    #[test]
    fn test_offset_bounds() {
        assert!(validate_offset(None).is_ok());
        assert!(validate_offset(Some(0)).is_ok());

        let err = validate_offset(Some(-1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument: offset: value must be 0 or greater (was -1)"
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(normalize(None, None), (10, 0));
        assert_eq!(normalize(Some(3), Some(7)), (3, 7));
        assert_eq!(PageWindow::from_args(None, None).unwrap(), PageWindow::default());
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let items = [1, 2, 3];
        assert!(slice(&items, 10, 3).is_empty());
        assert!(slice(&items, 10, 1000).is_empty());
        assert_eq!(slice(&items, 10, 1), &[2, 3]);
        assert_eq!(slice(&items, 1, 2), &[3]);
        assert!(slice(&items, 0, 0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_slice_is_contiguous_subrange(
            len in 0usize..200,
            limit in 0i64..=100,
            offset in 0i64..300,
        ) {
            let items: Vec<usize> = (0..len).collect();
            let window = PageWindow::from_args(Some(limit), Some(offset)).unwrap();
            let page = window.slice(&items);

            prop_assert!(page.len() <= limit as usize);
            let expected: Vec<usize> = (offset as usize..(offset + limit) as usize)
                .filter(|i| *i < len)
                .collect();
            prop_assert_eq!(page.to_vec(), expected);
        }

        #[test]
        fn prop_out_of_range_limit_always_rejected(limit in prop_oneof![i64::MIN..0, 101i64..i64::MAX]) {
            let first = PageWindow::from_args(Some(limit), None).unwrap_err().to_string();
            let second = PageWindow::from_args(Some(limit), None).unwrap_err().to_string();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_negative_offset_always_rejected(offset in i64::MIN..0) {
            prop_assert!(PageWindow::from_args(None, Some(offset)).is_err());
        }
    }
}
