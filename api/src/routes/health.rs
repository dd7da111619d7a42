use actix_web::{web, HttpResponse};
use tracing::warn;

use otp_core::{KeyValueStore, MessageTransport};

use crate::routes::otp::AppState;

/// Health check endpoint handler
///
/// Reports 503 when the key-value store does not answer, so load balancers
/// stop routing to an instance that cannot issue or verify codes.
pub async fn health_check<K, T>(state: web::Data<AppState<K, T>>) -> HttpResponse
where
    K: KeyValueStore + 'static,
    T: MessageTransport + 'static,
{
    let store_up = match state.otp_service.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            false
        }
    };

    let (mut response, status) = if store_up {
        (HttpResponse::Ok(), "healthy")
    } else {
        (HttpResponse::ServiceUnavailable(), "unhealthy")
    };

    response.json(serde_json::json!({
        "status": status,
        "service": "otp-api",
        "version": env!("CARGO_PKG_VERSION"),
        "store": if store_up { "up" } else { "down" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
