use log::debug;

use crate::language_utils;

// @module: Best-effort language classification

/// Upper bound on the classified sample, in characters. Classification cost
/// grows with input size and gains nothing past a few thousand characters.
const SAMPLE_CHARS: usize = 3000;

/// Tag returned whenever classification fails. This is also the pivot
/// language in the default configuration, so unclassifiable text goes
/// through translation rather than being dubbed verbatim.
pub const FALLBACK_TAG: &str = "en";

/// Classify a text sample and return a best-guess two-letter language tag.
///
/// Fails open: any classification problem (no detection, or a detected
/// language with no two-letter code) yields [`FALLBACK_TAG`], never an error.
pub fn classify(text: &str) -> String {
    let sample: String = text.chars().take(SAMPLE_CHARS).collect();
    if sample.trim().is_empty() {
        return FALLBACK_TAG.to_string();
    }

    let Some(info) = whatlang::detect(&sample) else {
        debug!("Language detection returned nothing, falling back to '{}'", FALLBACK_TAG);
        return FALLBACK_TAG.to_string();
    };

    let code = part3_for_detection(info.lang().code());
    match language_utils::normalize_to_part1(code) {
        Ok(tag) => tag,
        Err(_) => {
            debug!("Detected '{}' has no two-letter tag, falling back to '{}'", code, FALLBACK_TAG);
            FALLBACK_TAG.to_string()
        }
    }
}

/// The detector reports individual languages where ISO 639-1 only has a
/// macrolanguage tag. Fold those onto the macrolanguage so they normalize.
fn part3_for_detection(code: &str) -> &str {
    match code {
        "arb" => "ara", // Standard Arabic
        "cmn" => "zho", // Mandarin Chinese
        "pes" => "fas", // Iranian Persian
        "azj" => "aze", // North Azerbaijani
        "nob" => "nor", // Norwegian Bokmal
        "zsm" => "msa", // Standard Malay
        "ydd" => "yid", // Eastern Yiddish
        _ => code,
    }
}
