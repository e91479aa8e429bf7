use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and media-kind utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string with permissive decoding. Invalid byte
    /// sequences are dropped rather than failing the read.
    pub fn read_to_string_lossy<P: AsRef<Path>>(path: P) -> Result<String> {
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))?;
        Ok(String::from_utf8_lossy(&bytes).replace('\u{FFFD}', ""))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @generates: Output path as {stem}.{language}.{extension}
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        language: &str,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(language);
        output_filename.push('.');
        output_filename.push_str(extension);

        output_dir.as_ref().join(output_filename)
    }

    /// Find files with a specific extension directly inside a directory.
    /// Non-recursive; used to locate the track a downloader dropped into
    /// a working directory.
    pub fn find_files_with_extension<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in fs::read_dir(dir.as_ref()).context("Failed to read directory")? {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(wanted) {
                        result.push(path);
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }
}

/// Media kind declared by a filename, decided on the extension alone.
/// The pipeline picks its extractor based on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Recorded audio handled by speech-to-text
    Audio,
    /// PDF document
    Pdf,
    /// Word-processor document
    WordDocument,
    /// Plain text (including lightweight markup read as-is)
    PlainText,
    /// HTML markup, stripped to visible text
    Markup,
    /// Anything else; extraction yields no content
    Unknown,
}

/// Classify a filename into a [`MediaKind`] by its extension,
/// case-insensitively. A missing extension maps to `Unknown`.
pub fn detect_media_kind(filename: &str) -> MediaKind {
    let ext = Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" | "wav" | "m4a" | "ogg" | "oga" => MediaKind::Audio,
        "pdf" => MediaKind::Pdf,
        "docx" => MediaKind::WordDocument,
        "txt" | "md" | "rtf" => MediaKind::PlainText,
        "html" | "htm" => MediaKind::Markup,
        _ => MediaKind::Unknown,
    }
}
