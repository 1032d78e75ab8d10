//! Text measurement without font files.
//!
//! Widths are estimated per character class. The same estimate drives both label wrapping
//! (in abstract "units") and shape sizing (in pixels), so the two never disagree.

mod wrap;


use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

pub use wrap::{BreakStrategy, WrapConfig, wrap, wrap_label};

pub trait TextMeasurer {
    /// Wrap units of one character. A narrow glyph counts as 1.
    fn char_units(&self, ch: char) -> usize;

    fn char_width_px(&self, ch: char) -> f64;

    fn units(&self, text: &str) -> usize {
        text.chars().map(|ch| self.char_units(ch)).sum()
    }

    fn width_px(&self, text: &str) -> f64 {
        text.chars().map(|ch| self.char_width_px(ch)).sum()
    }
}

/// Per-class glyph estimates (config section `glyphs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlyphMetrics {
    pub narrow_units: usize,
    pub wide_units: usize,
    pub narrow_px: f64,
    pub wide_px: f64,
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self {
            narrow_units: 1,
            wide_units: 2,
            narrow_px: 8.0,
            wide_px: 14.0,
        }
    }
}

/// Two-class estimate: CJK characters are wide, everything else is narrow.
#[derive(Debug, Clone, Default)]
pub struct HeuristicTextMeasurer {
    pub metrics: GlyphMetrics,
}

impl HeuristicTextMeasurer {
    pub fn new(metrics: GlyphMetrics) -> Self {
        Self { metrics }
    }
}

impl TextMeasurer for HeuristicTextMeasurer {
    fn char_units(&self, ch: char) -> usize {
        if is_cjk(ch) {
            self.metrics.wide_units
        } else {
            self.metrics.narrow_units
        }
    }

    fn char_width_px(&self, ch: char) -> f64 {
        if is_cjk(ch) {
            self.metrics.wide_px
        } else {
            self.metrics.narrow_px
        }
    }
}

/// Uses the East Asian Width table: one unit per terminal column.
///
/// Zero-width and control characters measure as 0.
#[derive(Debug, Clone)]
pub struct UnicodeWidthTextMeasurer {
    pub column_px: f64,
}

impl Default for UnicodeWidthTextMeasurer {
    fn default() -> Self {
        Self {
            column_px: GlyphMetrics::default().narrow_px,
        }
    }
}

impl TextMeasurer for UnicodeWidthTextMeasurer {
    fn char_units(&self, ch: char) -> usize {
        ch.width().unwrap_or(0)
    }

    fn char_width_px(&self, ch: char) -> f64 {
        self.char_units(ch) as f64 * self.column_px
    }
}

/// CJK ideographs, kana, hangul syllables, CJK punctuation and fullwidth forms.
pub fn is_cjk(ch: char) -> bool {
    matches!(
        ch,
        '\u{3000}'..='\u{303F}'
            | '\u{3040}'..='\u{30FF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{AC00}'..='\u{D7AF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{FF00}'..='\u{FF60}'
            | '\u{FFE0}'..='\u{FFE6}'
    )
}
