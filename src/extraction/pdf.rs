use lopdf::Document;

use crate::errors::RetrievalError;

/// Extract text from a PDF payload, page by page.
///
/// A page that yields no extractable text contributes an empty string;
/// only a document that cannot be parsed at all is an error.
pub fn extract_text(data: &[u8]) -> Result<String, RetrievalError> {
    let doc = Document::load_mem(data)
        .map_err(|e| RetrievalError::Unreadable(format!("PDF: {}", e)))?;

    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        text.push_str(&doc.extract_text(&[*page_number]).unwrap_or_default());
    }

    Ok(text)
}
