//! End-to-end OTP flows over the in-memory store

use std::sync::Arc;
use std::time::Duration;

use otp_core::{MessageTransport, OtpError, OtpService};
use otp_infra::{LogSmsTransport, MemoryStore};
use otp_shared::{OtpConfig, RateLimitMode};

const SUBJECT: &str = "+989121234567";

fn service(config: OtpConfig) -> Arc<OtpService<MemoryStore>> {
    Arc::new(OtpService::new(Arc::new(MemoryStore::new()), config).unwrap())
}

#[tokio::test]
async fn test_request_deliver_verify() {
    let otp = service(OtpConfig::default());
    let transport = LogSmsTransport::new();

    let issued = otp.generate_and_cache(SUBJECT).await.unwrap();
    transport.send_code(SUBJECT, &issued.code).await.unwrap();
    assert_eq!(transport.message_count(), 1);

    otp.verify(SUBJECT, &issued.code).await.unwrap();
    assert_eq!(
        otp.verify(SUBJECT, &issued.code).await,
        Err(OtpError::CodeExpiredOrMissing)
    );
}

#[tokio::test(start_paused = true)]
async fn test_limit_then_window_reset() {
    let otp = service(OtpConfig::default());

    for _ in 0..5 {
        otp.generate_and_cache(SUBJECT).await.unwrap();
    }
    assert!(matches!(
        otp.generate_and_cache(SUBJECT).await,
        Err(OtpError::RateLimitExceeded {
            limit: 5,
            window_seconds: 3600
        })
    ));

    tokio::time::advance(Duration::from_secs(3600)).await;

    let issued = otp.generate_and_cache(SUBJECT).await.unwrap();
    assert_eq!(issued.requests_remaining, 4);
}

#[tokio::test(start_paused = true)]
async fn test_code_expires() {
    let otp = service(OtpConfig::default());
    let issued = otp.generate_and_cache(SUBJECT).await.unwrap();

    tokio::time::advance(Duration::from_secs(121)).await;

    assert_eq!(
        otp.verify(SUBJECT, &issued.code).await,
        Err(OtpError::CodeExpiredOrMissing)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_verification_consumes_once() {
    let otp = service(OtpConfig::default());
    let issued = otp.generate_and_cache(SUBJECT).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let otp = otp.clone();
            let code = issued.code.clone();
            tokio::spawn(async move { otp.verify(SUBJECT, &code).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => successes += 1,
            Err(error) => assert_eq!(error, OtpError::CodeExpiredOrMissing),
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_strict_mode_caps_concurrent_requests() {
    let config = OtpConfig::default().with_mode(RateLimitMode::Strict);
    let otp = service(config);

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let otp = otp.clone();
            tokio::spawn(async move { otp.generate_and_cache(SUBJECT).await })
        })
        .collect();

    let mut issued = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => issued += 1,
            Err(error) => assert!(matches!(error, OtpError::RateLimitExceeded { .. })),
        }
    }
    assert_eq!(issued, 5);
}

#[tokio::test]
async fn test_failed_delivery_leaves_code_usable() {
    let otp = service(OtpConfig::default());
    let transport = LogSmsTransport::new();
    transport.set_simulate_failure(true);

    let issued = otp.generate_and_cache(SUBJECT).await.unwrap();
    assert!(transport.send_code(SUBJECT, &issued.code).await.is_err());

    otp.verify(SUBJECT, &issued.code).await.unwrap();
}
