use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::errors::RetrievalError;

/// Extract paragraph text from a word-processor document.
///
/// The payload is a zip archive; the body lives in `word/document.xml`.
/// Paragraphs come out in document order, one newline separator each.
pub fn extract_text(data: &[u8]) -> Result<String, RetrievalError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| RetrievalError::Unreadable(format!("DOCX archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| RetrievalError::Unreadable(format!("DOCX body missing: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| RetrievalError::Unreadable(format!("DOCX body: {}", e)))?;

    paragraphs_from_xml(&xml)
}

fn paragraphs_from_xml(xml: &str) -> Result<String, RetrievalError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => {
                    paragraphs.push(current.clone());
                    current.clear();
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let piece = t
                    .unescape()
                    .map_err(|e| RetrievalError::Unreadable(format!("DOCX text: {}", e)))?;
                current.push_str(&piece);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RetrievalError::Unreadable(format!("DOCX XML: {}", e)));
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
