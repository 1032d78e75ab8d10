//! Markdown-ish outline → three-level tree (root, categories, leaves).

mod builder;
mod model;
mod options;
mod parse;
mod utils;


pub use builder::OutlineBuilder;
pub use model::{Level, NodeId, OutlineIter, OutlineNode};
pub use options::ParseOptions;
pub use parse::{OutlineParser, OutlineSource, parse_outline};
