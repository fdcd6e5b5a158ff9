//! Keyword Extractor — pulls labeled free-text spans out of an unstructured resume.
//!
//! Rules:
//! - The label is matched case-insensitively on word boundaries, so `projects`
//!   never matches inside `subprojects`.
//! - The label must be followed by at least one separator (whitespace, `:` or `-`).
//!   The whole separator run is consumed, including line breaks.
//! - Only the first matching occurrence is used.
//! - The span runs until the first blank line (empty or whitespace-only) or the
//!   end of the document.
//! - The span is split on line breaks, bullet markers, commas and dashes; each
//!   fragment is trimmed and empty fragments are dropped.

use regex::Regex;

/// Characters that separate fragments inside a captured span.
const FRAGMENT_DELIMITERS: &[char] = &['\n', ',', '•', '◦', '▪', '‣', '-', '–', '—'];

/// Extracts the fragments listed under `section_label` in `document`.
///
/// Returns an empty vec when the label is absent or its span is empty.
pub fn extract(document: &str, section_label: &str) -> Vec<String> {
    let label = section_label.trim();
    if label.is_empty() {
        return vec![];
    }

    let normalized = document.replace("\r\n", "\n");
    match find_section_body(&normalized, label) {
        Some(body) => split_fragments(capture_span(body)),
        None => vec![],
    }
}

/// Returns the text following the first `<label><separators>` occurrence.
fn find_section_body<'a>(document: &'a str, label: &str) -> Option<&'a str> {
    let pattern = format!(r"(?i)\b{}\b[\s:\-]+", regex::escape(label));
    // Label is escaped; a compile failure here means "section absent".
    let re = Regex::new(&pattern).ok()?;
    re.find(document).map(|m| &document[m.end()..])
}

/// Cuts `body` at the first blank line.
fn capture_span(body: &str) -> &str {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim().is_empty() {
            break;
        }
        offset += line.len();
    }
    &body[..offset]
}

fn split_fragments(span: &str) -> Vec<String> {
    span.split(FRAGMENT_DELIMITERS)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(String::from)
        .collect()
}
