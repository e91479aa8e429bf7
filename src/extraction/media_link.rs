use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;

use crate::errors::RetrievalError;
use crate::file_utils::FileManager;

// @module: Audio retrieval from video-sharing links

// @const: Video-sharing link pattern
static VIDEO_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(youtube\.com|youtu\.be)").unwrap()
});

/// Timeout for the whole download-and-extract run
const RETRIEVAL_TIMEOUT: Duration = Duration::from_secs(300);

/// Whether a text message looks like a supported video link
pub fn is_video_link(text: &str) -> bool {
    VIDEO_LINK_REGEX.is_match(text)
}

/// Download the best available audio track for a link into the working
/// directory and return the path to the produced WAV file.
///
/// The retriever post-processes to WAV itself; if no WAV shows up in the
/// working directory the link had no usable audio track. That failure is
/// surfaced to the caller, never retried.
pub async fn fetch_audio_track(url: &str, workdir: &Path) -> Result<PathBuf, RetrievalError> {
    let output_template = workdir.join("audio.%(ext)s").to_string_lossy().into_owned();
    debug!("Fetching audio track for {}", url);

    let download_future = Command::new("yt-dlp")
        .args([
            "-x",
            "--audio-format", "wav",
            "--no-playlist",
            "-q",
            "-o", &output_template,
            url,
        ])
        .output();

    let result = tokio::select! {
        result = download_future => {
            result.map_err(|e| RetrievalError::Download(format!("Failed to launch yt-dlp: {}", e)))?
        },
        _ = tokio::time::sleep(RETRIEVAL_TIMEOUT) => {
            return Err(RetrievalError::Download(format!(
                "Retrieval timed out after {:?}", RETRIEVAL_TIMEOUT
            )));
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
        error!("yt-dlp failed for {}: {}", url, last_line);
        return Err(RetrievalError::Download(last_line.to_string()));
    }

    let wav_files = FileManager::find_files_with_extension(workdir, "wav")
        .map_err(|e| RetrievalError::Download(e.to_string()))?;

    wav_files
        .into_iter()
        .next()
        .ok_or_else(|| RetrievalError::NoAudioTrack { url: url.to_string() })
}
