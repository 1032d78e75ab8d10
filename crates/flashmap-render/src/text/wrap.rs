use serde::{Deserialize, Serialize};

use super::{HeuristicTextMeasurer, TextMeasurer, is_cjk};

/// Scoring weights of the multi-strategy wrapper (config section `wrap`).
///
/// Lower scores are better. The defaults favour 2-3 lines of comfortable length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WrapConfig {
    pub short_line_units: usize,
    pub short_line_penalty: i64,
    pub overflow_penalty: i64,
    pub comfortable_reward: i64,
    /// Upper bound of the comfortable band, as a multiple of `max_chars_per_line` units.
    pub comfortable_upper_ratio: f64,
    pub max_preferred_lines: usize,
    pub extra_line_penalty: i64,
    /// Best scores above this fall back to a plain character wrap.
    pub hard_wrap_threshold: i64,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            short_line_units: 6,
            short_line_penalty: 50,
            overflow_penalty: 30,
            comfortable_reward: 10,
            comfortable_upper_ratio: 1.8,
            max_preferred_lines: 3,
            extra_line_penalty: 20,
            hard_wrap_threshold: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakStrategy {
    /// After `。！？.!?`.
    Sentence,
    /// After `，、；：,;:`.
    Clause,
    /// After whitespace runs.
    Whitespace,
    /// Between two adjacent CJK characters.
    CjkBoundary,
}

impl BreakStrategy {
    pub const ALL: [BreakStrategy; 4] = [
        BreakStrategy::Sentence,
        BreakStrategy::Clause,
        BreakStrategy::Whitespace,
        BreakStrategy::CjkBoundary,
    ];

    /// Splits `text` into pieces that concatenate back to `text`.
    pub fn split(self, text: &str) -> Vec<&str> {
        match self {
            BreakStrategy::Sentence => split_after_runs(text, |ch| {
                matches!(ch, '。' | '！' | '？' | '.' | '!' | '?')
            }),
            BreakStrategy::Clause => split_after_runs(text, |ch| {
                matches!(ch, '，' | '、' | '；' | '：' | ',' | ';' | ':')
            }),
            BreakStrategy::Whitespace => split_after_runs(text, char::is_whitespace),
            BreakStrategy::CjkBoundary => split_cjk_boundaries(text),
        }
    }
}

/// Cuts after each run of boundary characters, keeping trailing whitespace on the left piece.
fn split_after_runs(text: &str, is_boundary: impl Fn(char) -> bool) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if !is_boundary(ch) {
            continue;
        }
        let mut end = idx + ch.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if !(is_boundary(next) || next.is_whitespace()) {
                break;
            }
            end = next_idx + next.len_utf8();
            chars.next();
        }
        pieces.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn split_cjk_boundaries(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut prev_cjk = false;
    for (idx, ch) in text.char_indices() {
        let cjk = is_cjk(ch);
        if cjk && prev_cjk {
            pieces.push(&text[start..idx]);
            start = idx;
        }
        prev_cjk = cjk;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Greedy line filling. A piece wider than the budget is character-wrapped.
pub(super) fn fill_lines(pieces: &[&str], budget: usize, measurer: &dyn TextMeasurer) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    let mut cur_units = 0usize;
    for piece in pieces {
        let units = measurer.units(piece);
        if cur_units + units <= budget {
            cur.push_str(piece);
            cur_units += units;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
            cur_units = 0;
        }
        if units <= budget {
            cur.push_str(piece);
            cur_units = units;
            continue;
        }
        let mut wrapped = hard_wrap(piece, budget, measurer);
        if let Some(last) = wrapped.pop() {
            lines.extend(wrapped);
            cur_units = measurer.units(&last);
            cur = last;
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Character wrap. Every line takes at least one character, so a zero budget still terminates.
pub(super) fn hard_wrap(text: &str, budget: usize, measurer: &dyn TextMeasurer) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    let mut cur_units = 0usize;
    for ch in text.chars() {
        let units = measurer.char_units(ch);
        if !cur.is_empty() && cur_units + units > budget {
            lines.push(std::mem::take(&mut cur));
            cur_units = 0;
        }
        cur.push(ch);
        cur_units += units;
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

pub(super) fn score_lines(
    lines: &[String],
    max_chars_per_line: usize,
    budget: usize,
    measurer: &dyn TextMeasurer,
    config: &WrapConfig,
) -> i64 {
    let comfortable_min = max_chars_per_line as f64;
    let comfortable_max = max_chars_per_line as f64 * config.comfortable_upper_ratio;

    let mut score = 0i64;
    for line in lines {
        let units = measurer.units(line.trim());
        if units < config.short_line_units {
            score += config.short_line_penalty;
        }
        if units > budget {
            score += config.overflow_penalty;
        }
        let u = units as f64;
        if u >= comfortable_min && u <= comfortable_max {
            score -= config.comfortable_reward;
        }
    }
    if lines.len() > config.max_preferred_lines {
        let extra = (lines.len() - config.max_preferred_lines) as i64;
        score += extra * config.extra_line_penalty;
    }
    score
}

/// Joins neighbours whose combined width stays within the budget.
pub(super) fn merge_lines(lines: Vec<String>, budget: usize, measurer: &dyn TextMeasurer) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut last_units = 0usize;
    for line in lines {
        let units = measurer.units(&line);
        if let Some(last) = out.last_mut() {
            if last_units + units <= budget {
                last.push_str(&line);
                last_units += units;
                continue;
            }
        }
        out.push(line);
        last_units = units;
    }
    out
}

/// Wraps `text` into lines of at most `max_chars_per_line * 2` units.
///
/// Lines are never trimmed: `lines.concat() == text`. Only a single character wider than the
/// budget can produce an over-wide line.
pub fn wrap_label(
    text: &str,
    max_chars_per_line: usize,
    measurer: &dyn TextMeasurer,
    config: &WrapConfig,
) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let budget = max_chars_per_line.saturating_mul(2);
    if measurer.units(text) <= budget {
        return vec![text.to_string()];
    }

    let mut best: Option<(i64, BreakStrategy, Vec<String>)> = None;
    for strategy in BreakStrategy::ALL {
        let pieces = strategy.split(text);
        let lines = fill_lines(&pieces, budget, measurer);
        let score = score_lines(&lines, max_chars_per_line, budget, measurer, config);
        if best.as_ref().is_none_or(|(best_score, _, _)| score < *best_score) {
            best = Some((score, strategy, lines));
        }
    }

    let lines = match best {
        Some((score, _, lines)) if score <= config.hard_wrap_threshold => lines,
        Some((score, strategy, _)) => {
            tracing::trace!(score, ?strategy, "no acceptable break strategy; hard wrapping");
            hard_wrap(text, budget, measurer)
        }
        None => hard_wrap(text, budget, measurer),
    };
    merge_lines(lines, budget, measurer)
}

/// [`wrap_label`] with the default heuristic measurer and weights.
pub fn wrap(text: &str, max_chars_per_line: usize) -> Vec<String> {
    wrap_label(
        text,
        max_chars_per_line,
        &HeuristicTextMeasurer::default(),
        &WrapConfig::default(),
    )
}
