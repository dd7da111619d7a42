use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_core::{KeyValueStore, MessageTransport};

use super::AppState;
use crate::dto::otp::{VerifyCodeRequest, VerifyCodeResponse};
use crate::handlers::{handle_otp_error, handle_validation_error};

/// Handler for POST /api/v1/otp/verify
///
/// On success the code is consumed and the verified subject is returned for
/// the session layer to act on.
pub async fn verify_code<K, T>(
    state: web::Data<AppState<K, T>>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse
where
    K: KeyValueStore + 'static,
    T: MessageTransport + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_error(&errors);
    }
    let subject = request.subject();

    match state.otp_service.verify(subject, &request.otp).await {
        Ok(()) => HttpResponse::Ok().json(VerifyCodeResponse {
            verified: true,
            phone_number: subject.to_string(),
        }),
        Err(error) => handle_otp_error(&error),
    }
}
