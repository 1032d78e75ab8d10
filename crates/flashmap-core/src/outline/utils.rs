use regex::Regex;
use std::sync::OnceLock;

/// Classification of one trimmed, non-blank outline line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LineKind<'a> {
    Heading { depth: usize, label: &'a str },
    Bullet { label: &'a str },
    Paragraph(&'a str),
}

pub(super) fn classify_line(line: &str) -> LineKind<'_> {
    if let Some((depth, label)) = split_heading(line) {
        return LineKind::Heading { depth, label };
    }
    if let Some(label) = split_bullet(line) {
        return LineKind::Bullet { label };
    }
    LineKind::Paragraph(line)
}

/// `#`-run followed by whitespace or end of line.
fn split_heading(line: &str) -> Option<(usize, &str)> {
    let depth = line.bytes().take_while(|b| *b == b'#').count();
    if depth == 0 {
        return None;
    }
    let rest = &line[depth..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((depth, rest.trim()))
}

fn split_bullet(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('•'))?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn sentence_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[。！？.!?]").expect("valid regex"))
}

fn fragment_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[，,\s]+").expect("valid regex"))
}

/// Trimmed pieces between sentence terminators, longer than `min_chars`.
pub(super) fn split_sentences(text: &str, min_chars: usize) -> Vec<&str> {
    sentence_splitter()
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() > min_chars)
        .collect()
}

/// Pieces between commas and whitespace runs, longer than `min_chars`.
pub(super) fn split_fragments(text: &str, min_chars: usize) -> Vec<&str> {
    fragment_splitter()
        .split(text)
        .filter(|s| s.chars().count() > min_chars)
        .collect()
}

/// The input with its first non-blank line removed.
pub(super) fn strip_first_content_line(text: &str) -> &str {
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        if !line.trim().is_empty() {
            return &text[offset..];
        }
    }
    ""
}
