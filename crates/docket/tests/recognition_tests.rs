//! Integration tests for the recognition orchestrator.

mod helpers;

use base64::Engine as _;
use docket::{DocketError, RecognitionOutcome, Recognizer, WorkRequest};
use helpers::{VendorState, png_payload, spawn_vendor, test_config};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_unsupported_media_type_makes_no_network_calls() {
    let vendor = Arc::new(VendorState::default());
    let base_url = spawn_vendor(vendor.clone()).await;
    let recognizer = Recognizer::new(test_config(&base_url)).unwrap();

    let err = recognizer
        .recognize(WorkRequest::new(vec![1, 2, 3], "image/tiff"))
        .await
        .unwrap_err();

    assert!(matches!(err, DocketError::InvalidInput(_)));
    assert_eq!(vendor.submit_calls(), 0);
    assert_eq!(vendor.poll_calls(), 0);
}

#[tokio::test]
async fn test_oversized_payload_makes_no_network_calls() {
    let vendor = Arc::new(VendorState::default());
    let base_url = spawn_vendor(vendor.clone()).await;
    let recognizer = Recognizer::new(test_config(&base_url)).unwrap();

    let oversized = WorkRequest::new(vec![0u8; docket::MAX_IMAGE_BYTES + 1], "image/png");
    let err = recognizer.recognize(oversized).await.unwrap_err();

    assert!(matches!(err, DocketError::InvalidInput(_)));
    assert_eq!(vendor.submit_calls(), 0);
}

#[tokio::test]
async fn test_successful_recognition() {
    let vendor = Arc::new(VendorState::default());
    vendor.set_poll_responses(vec![
        (200, json!({"status": "pending"})),
        (
            200,
            json!({"status": "success", "output": {"text_result": "Hello", "language": "en"}}),
        ),
    ]);
    let base_url = spawn_vendor(vendor.clone()).await;
    let recognizer = Recognizer::new(test_config(&base_url)).unwrap();

    let outcome = recognizer
        .recognize(WorkRequest::new(png_payload(), "image/png"))
        .await
        .unwrap();

    match outcome {
        RecognitionOutcome::Success { text, language, .. } => {
            assert_eq!(text, "Hello");
            assert_eq!(language.as_deref(), Some("en"));
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

#[tokio::test]
async fn test_segments_payload_joins_in_order() {
    let vendor = Arc::new(VendorState::default());
    vendor.set_poll_responses(vec![(
        200,
        json!({"status": "success", "output": {"segments": [{"text": "A"}, {"text": "B"}]}}),
    )]);
    let base_url = spawn_vendor(vendor.clone()).await;
    let recognizer = Recognizer::new(test_config(&base_url)).unwrap();

    let outcome = recognizer
        .recognize(WorkRequest::new(png_payload(), "image/png"))
        .await
        .unwrap();

    match outcome {
        RecognitionOutcome::Success { text, .. } => assert_eq!(text, "A\nB"),
        other => panic!("expected Success, got {other:?}"),
    }
}

#[tokio::test]
async fn test_base64_only_payload_settles_as_no_text() {
    let blob = base64::engine::general_purpose::STANDARD.encode(vec![9u8; 512]);
    let vendor = Arc::new(VendorState::default());
    vendor.set_poll_responses(vec![(
        200,
        json!({"status": "success", "output": {"image_base64": blob}}),
    )]);
    let base_url = spawn_vendor(vendor.clone()).await;
    let recognizer = Recognizer::new(test_config(&base_url)).unwrap();

    let outcome = recognizer
        .recognize(WorkRequest::new(png_payload(), "image/png"))
        .await
        .unwrap();

    assert!(matches!(outcome, RecognitionOutcome::NoTextFound { .. }), "got: {outcome:?}");
}

#[tokio::test]
async fn test_vendor_failure_becomes_failure_outcome() {
    let vendor = Arc::new(VendorState::default());
    vendor.set_poll_responses(vec![(
        200,
        json!({"status": "failed", "error": {"message": "bad scan"}}),
    )]);
    let base_url = spawn_vendor(vendor.clone()).await;
    let recognizer = Recognizer::new(test_config(&base_url)).unwrap();

    let outcome = recognizer
        .recognize(WorkRequest::new(png_payload(), "image/png"))
        .await
        .unwrap();

    match outcome {
        RecognitionOutcome::Failure { reason, .. } => assert!(reason.contains("bad scan"), "got: {reason}"),
        other => panic!("expected Failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_result_file_reference_is_fetched() {
    let vendor = Arc::new(VendorState::default());
    vendor.set_result_file("# Invoice\n\nTotal due: 42.00");
    let base_url = spawn_vendor(vendor.clone()).await;
    vendor.set_poll_responses(vec![(
        200,
        json!({"status": "success", "output": {"file_url": format!("{}/files/result.md", base_url)}}),
    )]);
    let recognizer = Recognizer::new(test_config(&base_url)).unwrap();

    let outcome = recognizer
        .recognize(WorkRequest::new(png_payload(), "image/png"))
        .await
        .unwrap();

    match outcome {
        RecognitionOutcome::Success { text, .. } => assert!(text.contains("Total due: 42.00")),
        other => panic!("expected Success, got {other:?}"),
    }
}
