use scraper::Html;

/// Strip markup and return visible text only.
///
/// Script and style contents are not visible text and are skipped.
pub fn strip_tags(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut out = String::new();
    for node in document.tree.nodes() {
        if let Some(text) = node.value().as_text() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style"))
            });
            if !hidden {
                out.push_str(text);
            }
        }
    }

    // Parsed markup leaves runs of blank lines behind; collapse them.
    let mut lines: Vec<&str> = Vec::new();
    for line in out.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }

    lines.join("\n")
}
