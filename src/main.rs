//! Host Enumeration Gateway Server
//!
//! Main entry point for the enumeration HTTP service.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use host_enumeration_gateway::{
    config::DEFAULT_CONFIG_PATH, router, AppState, CoreSchema, ElasticsearchClient,
    EnumerationResolver, GatewayConfig, SchemaFilterCompiler,
};

/// Environment variable naming the configuration file
const CONFIG_PATH_ENV: &str = "HOST_ENUMERATION_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so LOG_LEVEL can drive the filter
    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = GatewayConfig::from_file(&config_path)
        .and_then(GatewayConfig::with_env_overrides)
        .with_context(|| format!("loading configuration from {config_path}"))?;

    // Initialize logging
    let default_filter = format!(
        "host_enumeration_gateway={},tower_http=info",
        config.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        path = %config_path,
        index = %config.elasticsearch.index,
        es_url = %config.elasticsearch.url,
        "Configuration loaded"
    );

    let schema = CoreSchema::from_file(&config.schema_path)
        .with_context(|| format!("loading host schema from {}", config.schema_path))?;
    tracing::info!(fields = schema.fields.len(), "Host schema loaded");

    let client = ElasticsearchClient::new(&config.elasticsearch)?;
    let resolver = Arc::new(EnumerationResolver::new(
        Arc::new(client),
        Arc::new(SchemaFilterCompiler),
        Arc::new(schema),
        config.elasticsearch.index.clone(),
    ));

    let app = router(AppState::new(resolver));

    let addr = format!("[::]:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(addr = %addr, "Host enumeration gateway listening");

    axum::serve(listener, app).await?;

    Ok(())
}
