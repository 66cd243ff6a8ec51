//! HTTP server for the enumeration API

pub mod routes;

pub use routes::{router, ApiError, AppState, ORG_ID_HEADER};
