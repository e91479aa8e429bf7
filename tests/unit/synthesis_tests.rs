/*!
 * Tests for utterance splitting and the sentence-level synthesizer
 */

use std::sync::Arc;

use dubwai::app_config::SpeechConfig;
use dubwai::errors::SynthesisError;
use dubwai::synthesis::{SpeechSynthesizer, split_utterances};

use crate::common::mock_providers::MockSpeech;

fn synthesizer(provider: MockSpeech) -> SpeechSynthesizer {
    SpeechSynthesizer::new(Arc::new(provider), SpeechConfig::default(), "ar")
}

/// Test splitting on Latin terminal punctuation
#[test]
fn test_splitUtterances_withLatinPunctuation_shouldSplitSentences() {
    let units = split_utterances("Hello. How are you?");
    assert_eq!(units, vec!["Hello.", "How are you?"]);
}

/// Test splitting on Arabic terminal punctuation
#[test]
fn test_splitUtterances_withArabicPunctuation_shouldSplitSentences() {
    let units = split_utterances("مرحبا بكم، كيف حالكم؟ أهلا وسهلا.");
    assert_eq!(units, vec!["مرحبا بكم،", "كيف حالكم؟", "أهلا وسهلا."]);
}

/// Test text without terminal punctuation stays one utterance
#[test]
fn test_splitUtterances_withNoTerminalMark_shouldKeepWholeText() {
    let units = split_utterances("no punctuation at all");
    assert_eq!(units, vec!["no punctuation at all"]);
}

/// Test blank input yields no utterances
#[test]
fn test_splitUtterances_withBlankInput_shouldReturnEmpty() {
    assert!(split_utterances("").is_empty());
    assert!(split_utterances("   \n\t ").is_empty());
}

/// Test whitespace runs collapse into a single boundary
#[test]
fn test_splitUtterances_withWhitespaceRuns_shouldNotEmitBlankUnits() {
    let units = split_utterances("First.   \n\n  Second!  ");
    assert_eq!(units, vec!["First.", "Second!"]);
}

/// Test a terminal mark mid-token does not split without whitespace
#[test]
fn test_splitUtterances_withMarkInsideToken_shouldNotSplit() {
    let units = split_utterances("version 1.2 is out. done");
    assert_eq!(units, vec!["version 1.2 is out.", "done"]);
}

/// Test every utterance produces a clip followed by a pause
#[tokio::test]
async fn test_synthesize_withTwoSentences_shouldProduceClipPausePairs() {
    let service = synthesizer(MockSpeech::new(100));

    let outcome = service.synthesize("Hello. How are you?").await.unwrap();

    assert_eq!(outcome.segments.len(), 4);
    assert_eq!(outcome.clip_count(), 2);
    assert!(outcome.skipped.is_empty());

    assert!(!outcome.segments[0].is_pause());
    assert!(outcome.segments[1].is_pause());
    assert!(!outcome.segments[2].is_pause());
    assert!(outcome.segments[3].is_pause());
}

/// Test inserted pauses carry the configured duration
#[tokio::test]
async fn test_synthesize_withDefaultConfig_shouldInsertConfiguredPause() {
    let config = SpeechConfig::default();
    let service = synthesizer(MockSpeech::new(100));

    let outcome = service.synthesize("One sentence only.").await.unwrap();

    let pause = outcome.segments.last().unwrap();
    assert!(pause.is_pause());
    assert_eq!(pause.duration_ms(), config.pause_ms);
}

/// Test a failing utterance is skipped and recorded, not fatal
#[tokio::test]
async fn test_synthesize_withOneFailingUtterance_shouldSkipAndContinue() {
    let service = synthesizer(MockSpeech::new(100).fail_on("How"));

    let outcome = service.synthesize("Hello. How are you? Goodbye.").await.unwrap();

    assert_eq!(outcome.clip_count(), 2);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].index, 1);
    assert!(outcome.skipped[0].preview.contains("How"));
}

/// Test all utterances failing aborts with SynthesisError
#[tokio::test]
async fn test_synthesize_withAllUtterancesFailing_shouldFailWithSynthesisError() {
    let service = synthesizer(MockSpeech::new(100).fail_all());

    let result = service.synthesize("Hello. How are you?").await;

    match result {
        Err(SynthesisError::NoUtterances { attempted }) => assert_eq!(attempted, 2),
        other => panic!("Expected NoUtterances, got {:?}", other.map(|_| ())),
    }
}

/// Test the provider receives one request per utterance
#[tokio::test]
async fn test_synthesize_withThreeSentences_shouldCallProviderPerUtterance() {
    let provider = MockSpeech::new(100);
    let tracker = provider.tracker();
    let service = synthesizer(provider);

    service.synthesize("One. Two. Three.").await.unwrap();

    assert_eq!(tracker.lock().unwrap().call_count, 3);
}
