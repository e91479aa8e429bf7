/*!
 * End-to-end pipeline tests with mock providers
 *
 * Everything external is mocked except ffmpeg; tests that export MP3 skip
 * themselves when ffmpeg is not installed.
 */

use std::fs;
use std::sync::Arc;

use dubwai::app_config::Config;
use dubwai::app_controller::Controller;
use dubwai::audio::assemble;
use dubwai::chat::{IncomingKind, IncomingMessage};
use dubwai::dispatcher;
use dubwai::errors::AppError;
use dubwai::language_id;
use dubwai::synthesis::SpeechSynthesizer;
use dubwai::translation::TranslationService;

use crate::common::ffmpeg_available;
use crate::common::mock_providers::{
    MockChat, MockSpeech, MockTranslationMode, MockTranslator, MockTranscriber,
};

const ENGLISH_INPUT: &str = "Hello everyone, it is a real pleasure to meet you here today. \
    How are you doing on this fine sunny morning?";

const ARABIC_TRANSLATION: &str = "مرحبا بكم جميعا في هذا اليوم الجميل. كيف حالكم هذا الصباح؟";

const ARABIC_INPUT: &str = "مرحبا بكم جميعا في هذا اليوم الجميل. الطقس رائع هذا الأسبوع \
    والحديقة مليئة بالأزهار. أتمنى أن تكونوا جميعا بخير وأن تستمتعوا بوقتكم.";

fn controller(translator: MockTranslator, speech: MockSpeech) -> Controller {
    Controller::with_services(
        Config::default(),
        Arc::new(MockTranscriber::new("a transcript.")),
        Arc::new(translator),
        Arc::new(speech),
    )
}

/// Test the text stages end to end: English input is classified, translated
/// once, split into two utterances and assembled with a single pause gap
#[tokio::test]
async fn test_pipelineStages_withEnglishInput_shouldTranslateAndAssemble() {
    let config = Config::default();

    // Classification picks the pivot language
    let detected = language_id::classify(ENGLISH_INPUT);
    assert_eq!(detected, config.source_language);

    // Translation runs in exactly one chunk
    let translator = MockTranslator::new(MockTranslationMode::Fixed(ARABIC_TRANSLATION.to_string()));
    let tracker = translator.tracker();
    let translation = TranslationService::new(Arc::new(translator), 10_000);
    let arabic = translation.translate(ENGLISH_INPUT, "en", "ar").await.unwrap();
    assert_eq!(arabic, ARABIC_TRANSLATION);
    assert_eq!(tracker.lock().unwrap().call_count, 1);

    // Two Arabic sentences become two clips joined by one surviving pause
    let synthesizer =
        SpeechSynthesizer::new(Arc::new(MockSpeech::new(100)), config.speech.clone(), "ar");
    let outcome = synthesizer.synthesize(&arabic).await.unwrap();
    assert_eq!(outcome.clip_count(), 2);

    let track = assemble(&outcome.segments).unwrap();
    assert_eq!(track.duration_ms(), 2 * 100 + config.speech.pause_ms);
}

/// Test the full request flow: a plain-text English attachment produces one
/// transcript document and one MP3 audio attachment
#[tokio::test]
async fn test_processAttachment_withEnglishTextFile_shouldDeliverTxtAndMp3() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg not installed");
        return;
    }

    let service = controller(
        MockTranslator::new(MockTranslationMode::Fixed(ARABIC_TRANSLATION.to_string())),
        MockSpeech::new(100),
    );
    let chat = MockChat::with_payload(ENGLISH_INPUT.as_bytes().to_vec());

    service
        .process_attachment(&chat, 7, "file-1", "speech.txt")
        .await
        .unwrap();

    let documents = chat.sent_documents.lock().unwrap();
    let audio = chat.sent_audio.lock().unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].chat_id, 7);
    assert!(documents[0].path.to_string_lossy().ends_with(".txt"));
    assert_eq!(documents[0].bytes, ARABIC_TRANSLATION.as_bytes());

    assert_eq!(audio.len(), 1);
    assert!(audio[0].path.to_string_lossy().ends_with(".mp3"));
    assert!(!audio[0].bytes.is_empty());

    // Transient artifacts are gone after delivery
    assert!(!documents[0].path.exists());
    assert!(!audio[0].path.exists());
}

/// Test already-target-language input bypasses the translator entirely
#[tokio::test]
async fn test_processAttachment_withArabicTextFile_shouldBypassTranslator() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg not installed");
        return;
    }

    let translator = MockTranslator::new(MockTranslationMode::Echo);
    let tracker = translator.tracker();
    let service = controller(translator, MockSpeech::new(100));
    let chat = MockChat::with_payload(ARABIC_INPUT.as_bytes().to_vec());

    service
        .process_attachment(&chat, 3, "file-2", "arabic.txt")
        .await
        .unwrap();

    // The translator never ran and the transcript is the input verbatim
    assert_eq!(tracker.lock().unwrap().call_count, 0);
    let documents = chat.sent_documents.lock().unwrap();
    assert_eq!(documents[0].bytes, ARABIC_INPUT.as_bytes());
}

/// Test a dead video link fails with a retrieval error and sends nothing
#[tokio::test]
async fn test_processLink_withDeadLink_shouldFailWithoutAttachments() {
    let service = controller(
        MockTranslator::new(MockTranslationMode::Echo),
        MockSpeech::new(100),
    );
    let chat = MockChat::default();

    let result = service
        .process_link(&chat, 9, "https://youtu.be/zzzzzzzzzzz-does-not-exist")
        .await;

    assert!(matches!(result, Err(AppError::Retrieval(_))));
    assert!(chat.sent_documents.lock().unwrap().is_empty());
    assert!(chat.sent_audio.lock().unwrap().is_empty());
}

/// Test the handler reports an extraction failure to the user as a short
/// message and sends no attachments
#[tokio::test]
async fn test_handleIncoming_withEmptyAttachment_shouldReportShortMessage() {
    let service = controller(
        MockTranslator::new(MockTranslationMode::Echo),
        MockSpeech::new(100),
    );
    let chat = MockChat::with_payload(Vec::new());

    service
        .handle_incoming(&chat, IncomingMessage {
            chat_id: 5,
            kind: IncomingKind::Attachment {
                file_id: "file-3".to_string(),
                file_name: "empty.txt".to_string(),
            },
        })
        .await;

    let texts = chat.sent_texts.lock().unwrap();
    let last = &texts.last().unwrap().1;
    assert!(last.contains("No text"));
    assert!(chat.sent_documents.lock().unwrap().is_empty());
    assert!(chat.sent_audio.lock().unwrap().is_empty());
}

/// Test plain text that is not a video link gets a usage hint
#[tokio::test]
async fn test_handleIncoming_withPlainChatText_shouldReplyWithHint() {
    let service = controller(
        MockTranslator::new(MockTranslationMode::Echo),
        MockSpeech::new(100),
    );
    let chat = MockChat::default();

    service
        .handle_incoming(&chat, IncomingMessage {
            chat_id: 4,
            kind: IncomingKind::Text("hello bot".to_string()),
        })
        .await;

    let texts = chat.sent_texts.lock().unwrap();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].1.contains("file or a video link"));
}

/// Test the start command greets with the target language
#[tokio::test]
async fn test_handleIncoming_withStartCommand_shouldGreet() {
    let service = controller(
        MockTranslator::new(MockTranslationMode::Echo),
        MockSpeech::new(100),
    );
    let chat = MockChat::default();

    service
        .handle_incoming(&chat, IncomingMessage {
            chat_id: 2,
            kind: IncomingKind::Command("start".to_string()),
        })
        .await;

    let texts = chat.sent_texts.lock().unwrap();
    assert!(texts[0].1.contains("Arabic"));
}

/// Test delivery removes both artifacts on success
#[tokio::test]
async fn test_deliver_withWorkingTransport_shouldSendAndCleanUp() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("transcript.ar.txt");
    let audio = dir.path().join("dub.ar.mp3");
    fs::write(&transcript, "نص").unwrap();
    fs::write(&audio, b"mp3-bytes").unwrap();

    let chat = MockChat::default();
    dispatcher::deliver(&chat, 1, &transcript, &audio, 0).await.unwrap();

    assert_eq!(chat.sent_documents.lock().unwrap().len(), 1);
    assert_eq!(chat.sent_audio.lock().unwrap().len(), 1);
    assert!(!transcript.exists());
    assert!(!audio.exists());
}

/// Test delivery removes both artifacts even when sending fails
#[tokio::test]
async fn test_deliver_withFailingTransport_shouldStillCleanUp() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("transcript.ar.txt");
    let audio = dir.path().join("dub.ar.mp3");
    fs::write(&transcript, "نص").unwrap();
    fs::write(&audio, b"mp3-bytes").unwrap();

    let chat = MockChat::failing();
    let result = dispatcher::deliver(&chat, 1, &transcript, &audio, 2).await;

    assert!(result.is_err());
    assert!(!transcript.exists());
    assert!(!audio.exists());
}
