//! Configuration for the enumeration gateway

pub mod gateway;

pub use gateway::{ConfigError, ElasticsearchConfig, GatewayConfig, DEFAULT_CONFIG_PATH};
