//! Application factory
//!
//! Builds the actix-web application around an already constructed
//! [`AppState`], so the binary and the tests share one route table.

use actix_web::body::MessageBody;
use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use otp_core::{KeyValueStore, MessageTransport};

use crate::routes::health::health_check;
use crate::routes::otp::{request_code::request_code, verify_code::verify_code, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<K, T>(
    app_state: web::Data<AppState<K, T>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    K: KeyValueStore + 'static,
    T: MessageTransport + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            let message = err.to_string();
            actix_web::error::InternalError::from_response(
                err,
                crate::dto::ErrorResponse::new("invalid_json", message)
                    .to_response(actix_web::http::StatusCode::BAD_REQUEST),
            )
            .into()
        }))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check::<K, T>))
        .service(
            web::scope("/api/v1/otp")
                .route("/request", web::post().to(request_code::<K, T>))
                .route("/verify", web::post().to(verify_code::<K, T>)),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
