//! Error taxonomy for enumeration requests
//!
//! Every failure of an enumeration call is reported through
//! [`EnumerationError`]. Argument problems are raised before any search
//! request is issued; backend problems wrap the underlying [`SearchError`].

use thiserror::Error;

use crate::filter::FilterError;
use crate::search::SearchError;

#[derive(Debug, Error)]
pub enum EnumerationError {
    /// limit/offset out of bounds, unknown order_by, bad order_how or a
    /// host filter the compiler rejected
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bucket key that does not have the expected composite shape
    #[error("malformed bucket key: cannot split {key:?} using '{delimiter}'")]
    MalformedKey { key: String, delimiter: char },

    /// The engine refused the result window and the page was not empty
    #[error("request window exceeded: offset {offset} is within {hits} matching hosts")]
    RequestWindowExceeded {
        offset: usize,
        hits: u64,
        #[source]
        source: SearchError,
    },

    #[error("search backend error: {0}")]
    SearchBackend(#[source] SearchError),
}

impl EnumerationError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::RequestWindowExceeded { .. } => 400,
            Self::MalformedKey { .. } => 500,
            Self::SearchBackend(_) => 502,
        }
    }
}

impl From<FilterError> for EnumerationError {
    fn from(err: FilterError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<SearchError> for EnumerationError {
    fn from(err: SearchError) -> Self {
        Self::SearchBackend(err)
    }
}
