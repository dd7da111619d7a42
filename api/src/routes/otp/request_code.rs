use actix_web::{web, HttpResponse};
use tracing::{info, warn};
use validator::Validate;

use otp_core::{KeyValueStore, MessageTransport};
use otp_shared::mask_subject;

use super::AppState;
use crate::dto::otp::{RequestCodeRequest, RequestCodeResponse};
use crate::handlers::{handle_otp_error, handle_validation_error};

/// Handler for POST /api/v1/otp/request
///
/// # Request Body
///
/// ```json
/// { "phone_number": "+989121234567" }
/// ```
///
/// # Response
///
/// ```json
/// { "detail": "OTP sent", "expires_in": 120, "requests_remaining": 4 }
/// ```
///
/// Delivery is best-effort: a transport failure is logged and the code stays
/// valid, so the client can simply retry verification or request again.
pub async fn request_code<K, T>(
    state: web::Data<AppState<K, T>>,
    request: web::Json<RequestCodeRequest>,
) -> HttpResponse
where
    K: KeyValueStore + 'static,
    T: MessageTransport + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_error(&errors);
    }
    let subject = request.subject();

    let issued = match state.otp_service.generate_and_cache(subject).await {
        Ok(issued) => issued,
        Err(error) => return handle_otp_error(&error),
    };

    match state.transport.send_code(subject, &issued.code).await {
        Ok(message_id) => info!(
            subject = %mask_subject(subject),
            provider = state.transport.provider_name(),
            message_id = %message_id,
            "Verification code delivered"
        ),
        Err(reason) => warn!(
            subject = %mask_subject(subject),
            provider = state.transport.provider_name(),
            reason = %reason,
            "Verification code delivery failed"
        ),
    }

    HttpResponse::Ok().json(RequestCodeResponse {
        detail: "OTP sent".to_string(),
        expires_in: issued.expires_in_seconds,
        requests_remaining: issued.requests_remaining,
        otp: state.expose_code.then(|| issued.code.clone()),
    })
}
