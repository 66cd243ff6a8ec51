//! Host Enumeration Gateway - distinct tags and operating systems of hosts
//!
//! Answers "list distinct X across hosts" requests. Each request is
//! validated, turned into a single terms aggregation against the host
//! index, and the aggregation buckets are sliced into a page and decoded
//! into typed records.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  HTTP API (axum): /api/v1/hosts/tags, /operating-systems        │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Enumeration Resolver                            │
//! │   pagination -> ordering -> host filter -> aggregation -> decode │
//! └─────────────────────────────────────────────────────────────────┘
//!                │                                  │
//!                ▼                                  ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────────┐
//! │  FilterCompiler (schema)     │  │  SearchClient (Elasticsearch)│
//! └──────────────────────────────┘  └──────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use host_enumeration_gateway::{
//!     CoreSchema, ElasticsearchClient, EnumerationResolver, GatewayConfig, SchemaFilterCompiler,
//! };
//!
//! let config = GatewayConfig::from_file("config/gateway.yaml")?.with_env_overrides()?;
//! let schema = CoreSchema::from_file(&config.schema_path)?;
//! let client = ElasticsearchClient::new(&config.elasticsearch)?;
//!
//! let resolver = EnumerationResolver::new(
//!     Arc::new(client),
//!     Arc::new(SchemaFilterCompiler),
//!     Arc::new(schema),
//!     config.elasticsearch.index.clone(),
//! );
//! let page = resolver.list_host_tags(args, Vec::new()).await?;
//! ```

pub mod config;
pub mod enumeration;
pub mod error;
pub mod filter;
pub mod search;
pub mod server;

// Re-export main types
pub use config::{ConfigError, ElasticsearchConfig, GatewayConfig};
pub use enumeration::{
    EnumerationMeta, EnumerationResolver, EnumerationResult, HostOperatingSystem,
    HostOperatingSystemsArgs, HostTag, HostTagsArgs, OperatingSystemKey, TagKey,
};
pub use error::EnumerationError;
pub use filter::{CoreSchema, FilterCompiler, FilterError, FilterTree, SchemaFilterCompiler};
pub use search::{ElasticsearchClient, SearchClient, SearchError};
pub use server::{router, AppState};
