#![forbid(unsafe_code)]

//! Mind map layout + SVG rendering (headless).
//!
//! The pipeline is `OutlineNode` → [`layout_outline`] → [`MindmapLayout`] →
//! [`svg::render_mindmap_svg`]. Text is measured with a pluggable [`TextMeasurer`].

pub mod layout;
pub mod model;
pub mod svg;
pub mod text;

use flashmap_core::FlashmapConfig;
use std::sync::Arc;

pub use layout::{LayoutConfig, LevelStyle, LevelStyles, layout_outline};
pub use model::{Bounds, ColorToken, LayoutEdge, LayoutPoint, MindmapLayout, PositionedNode};
pub use text::{HeuristicTextMeasurer, TextMeasurer, UnicodeWidthTextMeasurer, WrapConfig};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] flashmap_core::Error),
    #[error("invalid render option `{option}`: {message}")]
    InvalidOption { option: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
    pub layout: LayoutConfig,
    pub levels: LevelStyles,
    pub wrap: WrapConfig,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(HeuristicTextMeasurer::default()),
            layout: LayoutConfig::default(),
            levels: LevelStyles::default(),
            wrap: WrapConfig::default(),
        }
    }
}

impl LayoutOptions {
    /// Reads the `layout`, `levels`, `wrap` and `glyphs` sections.
    pub fn from_config(config: &FlashmapConfig) -> Result<Self> {
        Ok(Self {
            text_measurer: Arc::new(HeuristicTextMeasurer::new(config.section("glyphs")?)),
            layout: config.section("layout")?,
            levels: config.section("levels")?,
            wrap: config.section("wrap")?,
        })
    }

    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.text_measurer = measurer;
        self
    }
}
