/*!
 * End-to-end batch translation tests over real temp directories with
 * scripted backends.
 */

use anyhow::Result;
use std::sync::Arc;

use lexis::app_controller::Controller;
use lexis::providers::mock::MockBackend;
use lexis::translation::TranslationService;
use lexis::translation::request::MAIN_CONTENT_MARKER;
use crate::common;
use crate::common::mock_providers::RecordingBackend;

#[tokio::test]
async fn test_run_overDirectory_shouldDispatchInNaturalOrder() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    for (name, content) in [
        ("chunk_10.md", "décimo"),
        ("chunk_2.md", "segundo"),
        ("chunk_1.md", "primero"),
    ] {
        common::create_test_file(&dir, name, content)?;
    }

    let backend = Arc::new(RecordingBackend::new());
    let service = TranslationService::with_backend(backend.clone(), "m");
    let controller = Controller::with_service(common::test_config(), service)?;

    let summary = controller.run(dir, false).await?;

    assert_eq!(summary.translated, 3);
    let payloads = backend.payloads();
    let positions: Vec<usize> = ["primero", "segundo", "décimo"]
        .iter()
        .map(|needle| payloads.iter().position(|p| p.contains(needle)).unwrap())
        .collect();
    assert_eq!(positions, vec![0, 1, 2]);
    Ok(())
}

/// A second run over the same directory dispatches nothing
#[tokio::test]
async fn test_run_twice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_chunk_set(&dir, &["uno", "dos", "tres"])?;

    let backend = MockBackend::working();
    let service = TranslationService::with_backend(Arc::new(backend.clone()), "m");
    let controller = Controller::with_service(common::test_config(), service)?;

    let first = controller.run(dir.clone(), false).await?;
    assert_eq!(first.translated, 3);
    assert_eq!(backend.request_count(), 3);

    let second = controller.run(dir, false).await?;
    assert!(second.is_success());
    assert_eq!(second.translated, 0);
    assert_eq!(second.skipped, 3);
    assert_eq!(backend.request_count(), 3);
    Ok(())
}

/// With force_overwrite every chunk is retranslated
#[tokio::test]
async fn test_run_withForceOverwrite_shouldRetranslateEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_chunk_set(&dir, &["uno", "dos"])?;

    let backend = MockBackend::working();
    let service = TranslationService::with_backend(Arc::new(backend.clone()), "m");
    let controller = Controller::with_service(common::test_config(), service)?;

    controller.run(dir.clone(), false).await?;
    let second = controller.run(dir, true).await?;

    assert_eq!(second.translated, 2);
    assert_eq!(backend.request_count(), 4);
    Ok(())
}

/// With context disabled no framing markers reach the backend
#[tokio::test]
async fn test_run_withZeroContextLines_shouldSendUnframedContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_chunk_set(&dir, &["uno", "dos"])?;

    let backend = Arc::new(RecordingBackend::new());
    let service = TranslationService::with_backend(backend.clone(), "m");
    let mut config = common::test_config();
    config.context_lines = 0;
    let controller = Controller::with_service(config, service)?;

    controller.run(dir, false).await?;

    for payload in backend.payloads() {
        assert!(!payload.contains(MAIN_CONTENT_MARKER));
    }
    Ok(())
}

/// Middle chunks carry bounded context from both neighbors
#[tokio::test]
async fn test_run_withContextEnabled_shouldFrameMiddleChunk() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "chunk_1.md", "a1\na2\na3")?;
    common::create_test_file(&dir, "chunk_2.md", "b1")?;
    common::create_test_file(&dir, "chunk_3.md", "c1\nc2\nc3")?;

    let backend = Arc::new(RecordingBackend::new());
    let service = TranslationService::with_backend(backend.clone(), "m");
    let mut config = common::test_config();
    config.context_lines = 2;
    let controller = Controller::with_service(config, service)?;

    controller.run(dir, false).await?;

    let payloads = backend.payloads();
    // Match on the main-content block: the neighbors' payloads also carry
    // "b1" as context
    let middle_body = format!("{}\nb1", MAIN_CONTENT_MARKER);
    let middle = payloads
        .iter()
        .find(|p| p.contains(&middle_body))
        .expect("middle chunk payload");
    // Tail of the previous chunk, head of the next, bounded to 2 lines
    assert!(middle.contains("a2") && middle.contains("a3"));
    assert!(!middle.contains("a1"));
    assert!(middle.contains("c1") && middle.contains("c2"));
    assert!(!middle.contains("c3"));
    assert!(middle.contains(MAIN_CONTENT_MARKER));
    Ok(())
}

/// One failing chunk never torpedoes the rest of the batch
#[tokio::test]
async fn test_run_withOneFailingChunk_shouldTranslateTheOthers() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_chunk_set(&dir, &["uno", "dos", "tres"])?;

    // Second request returns a blank translation
    let backend = MockBackend::empty_at(1);
    let service = TranslationService::with_backend(Arc::new(backend), "m");
    let controller = Controller::with_service(common::test_config(), service)?;

    let summary = controller.run(dir.clone(), false).await?;

    assert_eq!(summary.translated, 2);
    assert_eq!(summary.failed, 1);
    assert!(!summary.is_success());
    assert!(dir.join("chunk_1_English.md").exists());
    assert!(!dir.join("chunk_2_English.md").exists());
    assert!(dir.join("chunk_3_English.md").exists());
    Ok(())
}

/// The dictionary is injected into every request payload
#[tokio::test]
async fn test_run_withDictionary_shouldInjectTermsIntoEveryRequest() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_chunk_set(&dir, &["el gato duerme", "el perro ladra"])?;
    let dict_path = common::create_test_file(&dir, "terms.dict", "gato: cat\nperro: dog\n")?;

    let backend = Arc::new(RecordingBackend::new());
    let service = TranslationService::with_backend(backend.clone(), "m");
    let mut config = common::test_config();
    config.dictionary = Some(dict_path);
    let controller = Controller::with_service(config, service)?;

    let summary = controller.run(dir, false).await?;

    assert_eq!(summary.translated, 2);
    for payload in backend.payloads() {
        assert!(payload.contains("gato -> cat"));
        assert!(payload.contains("perro -> dog"));
    }
    Ok(())
}

/// A malformed dictionary aborts before any dispatch
#[tokio::test]
async fn test_run_withMalformedDictionary_shouldAbortBeforeDispatch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_chunk_set(&dir, &["uno"])?;
    let dict_path = common::create_test_file(&dir, "terms.dict", "no separator here\n")?;

    let backend = MockBackend::working();
    let service = TranslationService::with_backend(Arc::new(backend.clone()), "m");
    let mut config = common::test_config();
    config.dictionary = Some(dict_path);

    assert!(Controller::with_service(config, service).is_err());
    assert_eq!(backend.request_count(), 0);
    Ok(())
}

/// A single explicit file translates to a sibling artifact
#[tokio::test]
async fn test_run_withSingleFile_shouldNameArtifactAfterTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&dir, "chapter3.md", "bonjour")?;

    let service = TranslationService::with_backend(Arc::new(MockBackend::working()), "m");
    let mut config = common::test_config();
    config.target_language = "French".to_string();
    let controller = Controller::with_service(config, service)?;

    let summary = controller.run(input, false).await?;

    assert_eq!(summary.translated, 1);
    assert!(dir.join("chapter3_French.md").exists());
    Ok(())
}

/// Artifacts land in the configured output directory when one is set
#[tokio::test]
async fn test_run_withOutputDir_shouldWriteArtifactsThere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_chunk_set(&dir, &["uno"])?;
    let out_dir = temp_dir.path().join("out");

    let service = TranslationService::with_backend(Arc::new(MockBackend::working()), "m");
    let mut config = common::test_config();
    config.output_dir = Some(out_dir.clone());
    let controller = Controller::with_service(config, service)?;

    controller.run(dir.clone(), false).await?;

    assert!(out_dir.join("chunk_1_English.md").exists());
    assert!(!dir.join("chunk_1_English.md").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_overEmptyDirectory_shouldSucceedWithNothingToDo() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;

    let service = TranslationService::with_backend(Arc::new(MockBackend::working()), "m");
    let controller = Controller::with_service(common::test_config(), service)?;

    let summary = controller.run(temp_dir.path().to_path_buf(), false).await?;

    assert!(summary.is_success());
    assert_eq!(summary.translated + summary.failed + summary.skipped, 0);
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInputPath_shouldFail() -> Result<()> {
    let service = TranslationService::with_backend(Arc::new(MockBackend::working()), "m");
    let controller = Controller::with_service(common::test_config(), service)?;

    let result = controller
        .run(std::path::PathBuf::from("./no_such_input_987"), false)
        .await;

    assert!(result.is_err());
    Ok(())
}
