use actix_web::{http::StatusCode, HttpResponse};
use otp_core::OtpError;
use validator::ValidationErrors;

use crate::dto::ErrorResponse;

/// HTTP status for an OTP error
pub fn status_for(error: &OtpError) -> StatusCode {
    match error {
        OtpError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        OtpError::CodeExpiredOrMissing
        | OtpError::CodeMismatch
        | OtpError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
        OtpError::BackendUnavailable { .. } | OtpError::InvalidConfiguration { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Convert an OTP error into an HTTP response.
///
/// Server-side failures get a generic message so backend details stay in
/// the logs.
pub fn handle_otp_error(error: &OtpError) -> HttpResponse {
    let status = status_for(error);

    let message = if error.is_client_error() {
        tracing::debug!(error = %error, "Request rejected");
        error.to_string()
    } else {
        tracing::error!(error = %error, "OTP backend failure");
        "Service temporarily unavailable, please try again later".to_string()
    };

    ErrorResponse::new(error.code(), message).to_response(status)
}

/// Convert request validation failures into a 400 response
pub fn handle_validation_error(errors: &ValidationErrors) -> HttpResponse {
    let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    tracing::debug!(fields = ?fields, "Request validation failed");

    ErrorResponse::new(
        "validation_error",
        format!("Invalid request data: {}", fields.join(", ")),
    )
    .to_response(StatusCode::BAD_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&OtpError::RateLimitExceeded {
                limit: 5,
                window_seconds: 3600
            }),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(status_for(&OtpError::CodeMismatch), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&OtpError::CodeExpiredOrMissing),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&OtpError::BackendUnavailable {
                message: "connection refused".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_backend_details_are_hidden() {
        let response = handle_otp_error(&OtpError::BackendUnavailable {
            message: "redis://secret@host timed out".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "backend_unavailable");
        assert_eq!(
            body["message"],
            "Service temporarily unavailable, please try again later"
        );
        assert!(!body.to_string().contains("secret@host"));
    }

    #[actix_web::test]
    async fn test_client_errors_keep_their_message() {
        let response = handle_otp_error(&OtpError::CodeMismatch);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], OtpError::CodeMismatch.code());
        assert_eq!(body["message"], OtpError::CodeMismatch.to_string());
    }
}
