use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use tracing::{info, warn};

use otp_api::{create_app, telemetry, AppState};
use otp_core::{KeyValueStore, OtpService};
use otp_infra::{LogSmsTransport, MemoryStore, RedisClient};
use otp_shared::{AppConfig, CacheBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.logging)?;

    info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.cache.backend,
        "Starting OTP API server"
    );

    match config.cache.backend {
        CacheBackend::Redis => {
            let store = Arc::new(RedisClient::new(config.cache.clone()).await?);
            serve(store, &config).await
        }
        CacheBackend::Memory => {
            warn!("Using the in-memory store; codes and counters are not shared between instances");
            let store = Arc::new(MemoryStore::new());
            let purge = Arc::clone(&store).spawn_purge_task(Duration::from_secs(
                config.cache.purge_interval_seconds.max(1),
            ));
            let result = serve(store, &config).await;
            purge.abort();
            result
        }
    }
}

/// Build the service over `store` and run the HTTP server until shutdown
async fn serve<K>(store: Arc<K>, config: &AppConfig) -> anyhow::Result<()>
where
    K: KeyValueStore + 'static,
{
    let otp_service = Arc::new(OtpService::new(store, config.otp.clone())?);
    let transport = Arc::new(LogSmsTransport::new());

    if config.server.expose_code_in_response {
        warn!("Issued codes are echoed in responses; never enable this in production");
    }

    let state = web::Data::new(AppState::new(
        otp_service,
        transport,
        config.server.expose_code_in_response,
    ));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(state.clone()))
        .bind(&bind_address)?
        .run()
        .await?;

    Ok(())
}
