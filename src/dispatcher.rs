use std::path::Path;

use log::{info, warn};

use crate::chat::ChatTransport;
use crate::errors::AppError;

// @module: Final delivery of the transcript and the dubbed audio

/// Send the transcript as a downloadable document and the audio as a
/// playable attachment, then delete both transient files.
///
/// Cleanup runs on every exit path; a failed send never leaves the
/// artifacts behind.
pub async fn deliver(
    chat: &dyn ChatTransport,
    chat_id: i64,
    transcript_path: &Path,
    audio_path: &Path,
    skipped_utterances: usize,
) -> Result<(), AppError> {
    let audio_caption = if skipped_utterances > 0 {
        format!("Dubbed audio ({} sentence(s) skipped)", skipped_utterances)
    } else {
        "Dubbed audio".to_string()
    };

    let send_result = send_both(chat, chat_id, transcript_path, audio_path, &audio_caption).await;

    for path in [transcript_path, audio_path] {
        if let Err(e) = std::fs::remove_file(path) {
            if path.exists() {
                warn!("Failed to remove transient file {:?}: {}", path, e);
            }
        }
    }

    send_result
}

async fn send_both(
    chat: &dyn ChatTransport,
    chat_id: i64,
    transcript_path: &Path,
    audio_path: &Path,
    audio_caption: &str,
) -> Result<(), AppError> {
    chat.send_document(chat_id, transcript_path, "Translated transcript")
        .await?;
    chat.send_audio(chat_id, audio_path, audio_caption).await?;

    info!("Delivered transcript and audio to chat {}", chat_id);
    Ok(())
}
