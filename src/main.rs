//! geo-catalogue - Geolocation lookup-and-cache service
//!
//! This is the composition root that wires together all the components.

use geo_catalogue::adapters::inbound::ApiServer;
use geo_catalogue::adapters::outbound::{
    IpStackConfig, IpStackProvider, SqliteGeolocationStore, SystemNameResolver,
};
use geo_catalogue::infrastructure::{shutdown_signal, RetryPolicy};
use geo_catalogue::{load_config, AddressNormalizer, CatalogueService, GeolocationProvider};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting geo-catalogue listen={} db={}",
        cfg.listen_addr,
        cfg.database_url
    );

    // ===== COMPOSITION ROOT =====

    // Geolocation store (SQLite)
    let store = Arc::new(
        SqliteGeolocationStore::open(&cfg.database_url)?.with_retry_policy(RetryPolicy::bounded(
            cfg.store_retry_attempts,
            cfg.store_retry_timeout(),
        )),
    );

    // Provider (ipstack), only with an access key
    let provider: Option<Arc<dyn GeolocationProvider>> = match &cfg.ipstack_access_key {
        Some(key) => {
            let config = IpStackConfig {
                base_url: cfg.ipstack_base_url.clone(),
                access_key: key.clone(),
                request_timeout: cfg.provider_timeout(),
            };
            tracing::info!("ipstack fallback enabled ({})", config.base_url);
            Some(Arc::new(IpStackProvider::new(config)?) as Arc<dyn GeolocationProvider>)
        }
        None => {
            tracing::info!("no ipstack access key, catalogue misses will return 404");
            None
        }
    };

    let normalizer = AddressNormalizer::new(Arc::new(SystemNameResolver::new()));
    let service = Arc::new(
        CatalogueService::new(normalizer, store, provider)
            .with_provider_deadline(cfg.provider_deadline()),
    );

    let server = ApiServer::new(cfg.listen_addr.clone(), service);
    server.run(shutdown_signal()).await?;

    tracing::info!("geo-catalogue stopped");
    Ok(())
}
