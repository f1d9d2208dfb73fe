/*!
 * Tests for request assembly and payload marker framing
 */

use anyhow::Result;

use lexis::dictionary::{Dictionary, DictionaryFormat};
use lexis::translation::context::ContextWindow;
use lexis::translation::request::{
    MAIN_CONTENT_MARKER, NEXT_CONTEXT_MARKER, PREVIOUS_CONTEXT_MARKER, RequestAssembler,
};

fn assembler() -> RequestAssembler {
    RequestAssembler::new(
        "Translate from {source_language} to {target_language}.",
        "Spanish",
        "English",
    )
}

#[test]
fn test_new_shouldSubstituteLanguagePlaceholders() {
    let request = assembler().assemble("hola", &ContextWindow::default());
    assert!(request.contains("Translate from Spanish to English."));
    assert!(!request.contains("{source_language}"));
    assert!(!request.contains("{target_language}"));
}

/// With context disabled the payload is the chunk text unmodified
#[test]
fn test_payload_withEmptyWindow_shouldBeByteIdentical() {
    let content = "# Título\n\nhola mundo\n";

    let payload = assembler().payload(content, &ContextWindow::default());

    assert_eq!(payload, content);
    assert!(!payload.contains(MAIN_CONTENT_MARKER));
}

#[test]
fn test_payload_withBothSides_shouldFrameAllThreeBlocks() {
    let window = ContextWindow {
        prefix: vec!["previous tail".to_string()],
        suffix: vec!["next head".to_string()],
    };

    let payload = assembler().payload("main body", &window);

    let prev_pos = payload.find(PREVIOUS_CONTEXT_MARKER).unwrap();
    let main_pos = payload.find(MAIN_CONTENT_MARKER).unwrap();
    let next_pos = payload.find(NEXT_CONTEXT_MARKER).unwrap();
    assert!(prev_pos < main_pos && main_pos < next_pos);
    assert!(payload.contains("previous tail"));
    assert!(payload.contains("main body"));
    assert!(payload.contains("next head"));
}

#[test]
fn test_payload_withPrefixOnly_shouldOmitNextMarker() {
    let window = ContextWindow {
        prefix: vec!["tail".to_string()],
        suffix: Vec::new(),
    };

    let payload = assembler().payload("body", &window);

    assert!(payload.contains(PREVIOUS_CONTEXT_MARKER));
    assert!(payload.contains(MAIN_CONTENT_MARKER));
    assert!(!payload.contains(NEXT_CONTEXT_MARKER));
}

#[test]
fn test_payload_withSuffixOnly_shouldOmitPreviousMarker() {
    let window = ContextWindow {
        prefix: Vec::new(),
        suffix: vec!["head".to_string()],
    };

    let payload = assembler().payload("body", &window);

    assert!(!payload.contains(PREVIOUS_CONTEXT_MARKER));
    assert!(payload.contains(MAIN_CONTENT_MARKER));
    assert!(payload.contains(NEXT_CONTEXT_MARKER));
}

#[test]
fn test_assemble_shouldOrderPromptDictionaryPayload() -> Result<()> {
    let dict = Dictionary::parse("gato: cat\n", DictionaryFormat::Colon)?;
    let assembler = assembler().with_dictionary(&dict);

    let request = assembler.assemble("el gato duerme", &ContextWindow::default());

    let prompt_pos = request.find("Translate from Spanish").unwrap();
    let dict_pos = request.find("gato -> cat").unwrap();
    let content_pos = request.find("el gato duerme").unwrap();
    assert!(prompt_pos < dict_pos && dict_pos < content_pos);
    Ok(())
}

#[test]
fn test_assemble_withoutDictionary_shouldOmitDictionarySection() {
    let request = assembler().assemble("hola", &ContextWindow::default());
    assert!(!request.contains("## Translation Dictionary"));
}
