/*!
 * Tests for input normalization
 */

use std::fs;
use std::io::Write;
use std::sync::Arc;

use dubwai::extraction::{DocumentExtractor, docx, markup, media_link, pdf};

use crate::common::mock_providers::{MockTranscriber, wav_bytes};

fn extractor() -> DocumentExtractor {
    DocumentExtractor::new(Arc::new(MockTranscriber::new("a transcribed sentence.")))
}

/// Build a minimal word-processor document with the given paragraphs
fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let mut body = String::new();
    for paragraph in paragraphs {
        body.push_str(&format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", paragraph));
    }
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

/// Test empty files extract to an empty string for every supported
/// extension, never an error
#[tokio::test]
async fn test_extract_withEmptyFiles_shouldReturnEmptyStringForAllKinds() {
    let dir = tempfile::tempdir().unwrap();
    let service = extractor();

    for name in ["e.txt", "e.md", "e.html", "e.pdf", "e.docx", "e.mp3", "e.xyz"] {
        let path = dir.path().join(name);
        fs::write(&path, b"").unwrap();

        let text = service.extract(&path, name).await.unwrap();
        assert_eq!(text, "", "expected empty extraction for {}", name);
    }
}

/// Test plain text passes through unchanged
#[tokio::test]
async fn test_extract_withPlainText_shouldPassThrough() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note.txt");
    fs::write(&path, "Hello. How are you?").unwrap();

    let text = extractor().extract(&path, "note.txt").await.unwrap();
    assert_eq!(text, "Hello. How are you?");
}

/// Test unknown extensions signal "no content" rather than failing
#[tokio::test]
async fn test_extract_withUnknownExtension_shouldReturnEmptyString() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, b"\x00\x01\x02\x03").unwrap();

    let text = extractor().extract(&path, "data.bin").await.unwrap();
    assert_eq!(text, "");
}

/// Test markup extraction strips tags and hidden content
#[tokio::test]
async fn test_extract_withHtmlFile_shouldStripMarkup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.html");
    fs::write(
        &path,
        "<html><head><style>body { color: red; }</style></head>\
         <body><h1>Title</h1><p>Hello <b>world</b>.</p>\
         <script>var hidden = 1;</script></body></html>",
    )
    .unwrap();

    let text = extractor().extract(&path, "page.html").await.unwrap();

    assert!(text.contains("Title"));
    assert!(text.contains("Hello"));
    assert!(text.contains("world"));
    assert!(!text.contains('<'));
    assert!(!text.contains("color: red"));
    assert!(!text.contains("hidden"));
}

/// Test word-processor paragraphs come out in order, newline separated
#[tokio::test]
async fn test_extract_withDocxFile_shouldJoinParagraphsWithNewlines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("letter.docx");
    fs::write(&path, docx_bytes(&["First paragraph.", "Second paragraph."])).unwrap();

    let text = extractor().extract(&path, "letter.docx").await.unwrap();
    assert_eq!(text, "First paragraph.\nSecond paragraph.");
}

/// Test a ready-to-transcribe WAV goes through speech-to-text untouched
#[tokio::test]
async fn test_extract_withWhisperReadyWav_shouldTranscribe() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.wav");
    fs::write(&path, wav_bytes(200)).unwrap();

    let text = extractor().extract(&path, "clip.wav").await.unwrap();
    assert_eq!(text, "a transcribed sentence.");
}

/// Test malformed non-empty documents are unreadable, not empty
#[test]
fn test_pdfExtract_withGarbageBytes_shouldFail() {
    assert!(pdf::extract_text(b"not a pdf at all").is_err());
}

/// Test malformed archives are unreadable, not empty
#[test]
fn test_docxExtract_withGarbageBytes_shouldFail() {
    assert!(docx::extract_text(b"not a zip archive").is_err());
}

/// Test tag stripping keeps visible text only
#[test]
fn test_stripTags_withNestedMarkup_shouldKeepVisibleText() {
    let text = markup::strip_tags("<div><p>one</p><p>two <i>three</i></p></div>");
    assert!(text.contains("one"));
    assert!(text.contains("two"));
    assert!(text.contains("three"));
    assert!(!text.contains("div"));
}

/// Test video link detection
#[test]
fn test_isVideoLink_withMixedInput_shouldMatchOnlyVideoLinks() {
    assert!(media_link::is_video_link("https://www.youtube.com/watch?v=abc123"));
    assert!(media_link::is_video_link("check this https://youtu.be/abc123"));
    assert!(!media_link::is_video_link("https://example.com/video"));
    assert!(!media_link::is_video_link("just some text"));
}

/// Test link retrieval from a dead link yields a retrieval error
#[tokio::test]
async fn test_fetchAudioTrack_withUnreachableLink_shouldFail() {
    let dir = tempfile::tempdir().unwrap();
    let result = media_link::fetch_audio_track(
        "https://youtu.be/zzzzzzzzzzz-does-not-exist",
        dir.path(),
    )
    .await;
    assert!(result.is_err());
    assert!(!dir.path().join("audio.wav").exists());
}
