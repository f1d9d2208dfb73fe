/*!
 * Tests for translation dispatch: retry policy, credential checks and
 * artifact persistence
 */

use anyhow::Result;
use std::sync::Arc;

use lexis::errors::TranslationError;
use lexis::providers::mock::MockBackend;
use lexis::translation::TranslationService;
use crate::common;
use crate::common::mock_providers::{FlakyBackend, RecordingBackend};

#[test]
fn test_translatePayload_withWorkingBackend_shouldReturnText() {
    let backend = MockBackend::working();
    let service = TranslationService::with_backend(Arc::new(backend.clone()), "test-model");

    let result = tokio_test::block_on(async {
        service.translate_payload("hola mundo", "chunk_1.md").await
    });

    let text = result.expect("working backend should translate");
    assert!(text.contains("hola mundo"));
    assert_eq!(backend.request_count(), 1);
}

/// A transient transport error gets exactly one retry
#[tokio::test]
async fn test_translatePayload_withOneTransientFailure_shouldRetryOnce() -> Result<()> {
    let backend = Arc::new(FlakyBackend::new(1));
    let service = TranslationService::with_backend(backend.clone(), "m");

    let text = service.translate_payload("hola", "chunk_1.md").await?;

    assert!(text.contains("hola"));
    assert_eq!(backend.request_count(), 2);
    Ok(())
}

/// Two consecutive transient failures exhaust the retry budget
#[tokio::test]
async fn test_translatePayload_withRepeatedTransientFailures_shouldGiveUpAfterOneRetry() {
    let backend = Arc::new(FlakyBackend::new(2));
    let service = TranslationService::with_backend(backend.clone(), "m");

    let err = service.translate_payload("hola", "chunk_1.md").await.unwrap_err();

    assert!(matches!(err, TranslationError::Provider(_)));
    assert_eq!(backend.request_count(), 2);
}

/// Non-transient provider errors are never retried
#[tokio::test]
async fn test_translatePayload_withApiError_shouldNotRetry() {
    let backend = MockBackend::failing();
    let service = TranslationService::with_backend(Arc::new(backend.clone()), "m");

    let err = service.translate_payload("hola", "chunk_1.md").await.unwrap_err();

    assert!(matches!(err, TranslationError::Provider(_)));
    assert_eq!(backend.request_count(), 1);
}

/// A blank result is a distinct failure and gets no retry
#[tokio::test]
async fn test_translatePayload_withBlankResult_shouldFailWithoutRetry() {
    let backend = MockBackend::empty();
    let service = TranslationService::with_backend(Arc::new(backend.clone()), "m");

    let err = service.translate_payload("hola", "chunk_1.md").await.unwrap_err();

    match err {
        TranslationError::EmptyTranslation { chunk } => assert_eq!(chunk, "chunk_1.md"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(backend.request_count(), 1);
}

/// A missing credential fails the job before any request is sent
#[tokio::test]
async fn test_translatePayload_withMissingCredential_shouldFailBeforeRequest() {
    let backend = MockBackend::working();
    let service = TranslationService::with_backend(Arc::new(backend.clone()), "m")
        .require_credential("", "ANTHROPIC_API_KEY");

    let err = service.translate_payload("hola", "chunk_1.md").await.unwrap_err();

    match err {
        TranslationError::MissingCredential { env_var, .. } => {
            assert_eq!(env_var, "ANTHROPIC_API_KEY");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_dispatch_shouldPersistArtifact() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let artifact = temp_dir.path().join("chunk_1_English.md");
    let service = TranslationService::with_backend(Arc::new(MockBackend::working()), "m");

    service.dispatch("hola", "chunk_1.md", &artifact).await?;

    let written = std::fs::read_to_string(&artifact)?;
    assert!(written.contains("hola"));
    Ok(())
}

/// A failed job leaves no partial artifact behind
#[tokio::test]
async fn test_dispatch_withFailingBackend_shouldLeaveNoArtifact() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let artifact = temp_dir.path().join("chunk_1_English.md");
    let service = TranslationService::with_backend(Arc::new(MockBackend::failing()), "m");

    assert!(service.dispatch("hola", "chunk_1.md", &artifact).await.is_err());
    assert!(!artifact.exists());
    Ok(())
}

#[tokio::test]
async fn test_dispatch_withWrapWidth_shouldWrapPersistedOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let artifact = temp_dir.path().join("chunk_1_English.md");
    let backend = RecordingBackend::new();
    let long_line = "word ".repeat(40);
    let service =
        TranslationService::with_backend(Arc::new(backend), "m").wrap_width(Some(40));

    service.dispatch(long_line.trim(), "chunk_1.md", &artifact).await?;

    let written = std::fs::read_to_string(&artifact)?;
    assert!(written.lines().all(|l| l.len() <= 40));
    Ok(())
}
