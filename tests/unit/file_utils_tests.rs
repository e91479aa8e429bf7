/*!
 * Tests for file utilities and media-kind detection
 */

use std::fs;

use dubwai::file_utils::{FileManager, MediaKind, detect_media_kind};

/// Test extension-based media kind detection
#[test]
fn test_detectMediaKind_withKnownExtensions_shouldClassifyCorrectly() {
    assert_eq!(detect_media_kind("speech.mp3"), MediaKind::Audio);
    assert_eq!(detect_media_kind("speech.wav"), MediaKind::Audio);
    assert_eq!(detect_media_kind("speech.m4a"), MediaKind::Audio);
    assert_eq!(detect_media_kind("voice.ogg"), MediaKind::Audio);
    assert_eq!(detect_media_kind("voice.oga"), MediaKind::Audio);
    assert_eq!(detect_media_kind("report.pdf"), MediaKind::Pdf);
    assert_eq!(detect_media_kind("letter.docx"), MediaKind::WordDocument);
    assert_eq!(detect_media_kind("notes.txt"), MediaKind::PlainText);
    assert_eq!(detect_media_kind("readme.md"), MediaKind::PlainText);
    assert_eq!(detect_media_kind("doc.rtf"), MediaKind::PlainText);
    assert_eq!(detect_media_kind("page.html"), MediaKind::Markup);
    assert_eq!(detect_media_kind("page.htm"), MediaKind::Markup);
}

/// Test detection is case-insensitive
#[test]
fn test_detectMediaKind_withUppercaseExtensions_shouldClassifyCorrectly() {
    assert_eq!(detect_media_kind("SPEECH.MP3"), MediaKind::Audio);
    assert_eq!(detect_media_kind("Report.PDF"), MediaKind::Pdf);
    assert_eq!(detect_media_kind("Page.Html"), MediaKind::Markup);
}

/// Test unknown and missing extensions
#[test]
fn test_detectMediaKind_withUnknownOrMissingExtension_shouldReturnUnknown() {
    assert_eq!(detect_media_kind("archive.zip"), MediaKind::Unknown);
    assert_eq!(detect_media_kind("binary.exe"), MediaKind::Unknown);
    assert_eq!(detect_media_kind("no_extension"), MediaKind::Unknown);
    assert_eq!(detect_media_kind(""), MediaKind::Unknown);
}

/// Test permissive reading drops invalid byte sequences
#[test]
fn test_readToStringLossy_withInvalidUtf8_shouldDropBadSequences() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.txt");
    fs::write(&path, b"good text \xff\xfe more text").unwrap();

    let content = FileManager::read_to_string_lossy(&path).unwrap();

    assert!(content.contains("good text"));
    assert!(content.contains("more text"));
    assert!(!content.contains('\u{FFFD}'));
}

/// Test output path naming follows {stem}.{language}.{extension}
#[test]
fn test_generateOutputPath_withStemAndLanguage_shouldComposeName() {
    let path = FileManager::generate_output_path("transcript", "/tmp/work", "ar", "txt");
    assert_eq!(path.to_string_lossy(), "/tmp/work/transcript.ar.txt");

    let path = FileManager::generate_output_path("talk.mp3", "/tmp/work", "ar", "mp3");
    assert_eq!(path.to_string_lossy(), "/tmp/work/talk.ar.mp3");
}

/// Test non-recursive extension search finds only matching files
#[test]
fn test_findFilesWithExtension_withMixedDirectory_shouldFindOnlyMatches() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.wav"), b"x").unwrap();
    fs::write(dir.path().join("b.WAV"), b"x").unwrap();
    fs::write(dir.path().join("c.txt"), b"x").unwrap();

    let found = FileManager::find_files_with_extension(dir.path(), "wav").unwrap();

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| {
        p.extension().unwrap().to_string_lossy().eq_ignore_ascii_case("wav")
    }));
}

/// Test directory creation is idempotent
#[test]
fn test_ensureDir_withNestedPath_shouldCreateAndTolerateExisting() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a/b/c");

    FileManager::ensure_dir(&nested).unwrap();
    assert!(nested.is_dir());
    FileManager::ensure_dir(&nested).unwrap();
}
