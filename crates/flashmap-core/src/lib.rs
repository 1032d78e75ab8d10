#![forbid(unsafe_code)]

//! Outline parser + three-level mind map model (headless).
//!
//! Design goals:
//! - accept loosely structured markdown-ish text and never fail on it
//! - produce a root → category → leaf tree with stable ids
//! - keep every empirical threshold configurable (`parse` config section)

pub mod config;
pub mod error;
pub mod outline;

pub use config::FlashmapConfig;
pub use error::{Error, Result};
pub use outline::{
    Level, NodeId, OutlineBuilder, OutlineNode, OutlineParser, OutlineSource, ParseOptions,
    parse_outline,
};
