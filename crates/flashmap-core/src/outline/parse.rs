use crate::{FlashmapConfig, Result};

use super::builder::OutlineBuilder;
use super::model::OutlineNode;
use super::options::ParseOptions;
use super::utils::{
    LineKind, classify_line, split_fragments, split_sentences, strip_first_content_line,
};

/// Which path produced the categories of a parsed outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineSource {
    /// Headings, bullets or a promoted paragraph.
    Structure,
    /// Prose split on sentence terminators.
    Sentences,
    /// Prose split on commas and whitespace.
    Fragments,
}

#[derive(Debug, Clone, Default)]
pub struct OutlineParser {
    options: ParseOptions,
}

impl OutlineParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Reads the `parse` section of `config`.
    pub fn with_config(config: &FlashmapConfig) -> Result<Self> {
        Ok(Self::with_options(config.section("parse")?))
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse(&self, text: &str, fallback_title: &str) -> OutlineNode {
        self.parse_with_source(text, fallback_title).0
    }

    /// Like [`OutlineParser::parse`], also reporting which path produced the categories.
    pub fn parse_with_source(&self, text: &str, fallback_title: &str) -> (OutlineNode, OutlineSource) {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .peekable();

        let mut builder = OutlineBuilder::new(fallback_title);
        let mut body = text;
        if let Some(LineKind::Heading { depth: 1, label }) = lines.peek().copied().map(classify_line)
        {
            builder.set_root_text(label);
            body = strip_first_content_line(text);
            lines.next();
        }

        let mut walk = Walk::new(&self.options);
        for line in lines {
            walk.visit(&mut builder, line);
        }

        // Structural lines that were all dropped (orphan leaves) still leave an empty root.
        let source = if walk.saw_structure && builder.category_count() > 0 {
            OutlineSource::Structure
        } else {
            self.apply_fallback(&mut builder, body)
        };

        let root = builder.finish();
        tracing::debug!(
            root = %root.text,
            categories = root.children.len(),
            nodes = root.count_nodes(),
            source = ?source,
            dropped = walk.dropped,
            "parsed outline"
        );
        (root, source)
    }

    fn apply_fallback(&self, builder: &mut OutlineBuilder, body: &str) -> OutlineSource {
        let opts = &self.options;
        let sentences = split_sentences(body, opts.min_sentence_chars);
        if sentences.len() > 1 {
            let mut fresh = OutlineBuilder::new(builder.root_text());
            for sentence in sentences.into_iter().take(opts.max_fallback_categories) {
                fresh.push_category(sentence);
            }
            *builder = fresh;
            return OutlineSource::Sentences;
        }
        if builder.category_count() > 0 {
            return OutlineSource::Structure;
        }
        for fragment in split_fragments(body, opts.min_fragment_chars)
            .into_iter()
            .take(opts.max_fallback_categories)
        {
            builder.push_category(fragment);
        }
        OutlineSource::Fragments
    }
}

/// State of the line walk. `current` indexes the open category inside the builder.
struct Walk<'a> {
    options: &'a ParseOptions,
    current: Option<usize>,
    saw_structure: bool,
    dropped: usize,
}

impl<'a> Walk<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            current: None,
            saw_structure: false,
            dropped: 0,
        }
    }

    fn visit(&mut self, builder: &mut OutlineBuilder, line: &str) {
        match classify_line(line) {
            LineKind::Heading { depth: 1 | 2, label } => {
                self.saw_structure = true;
                self.open_category(builder, label);
            }
            LineKind::Heading { depth: 3, label } | LineKind::Bullet { label } => {
                self.saw_structure = true;
                self.add_leaf(builder, label);
            }
            LineKind::Heading { .. } => {}
            LineKind::Paragraph(text) => {
                if self.current.is_none()
                    && !text.starts_with('#')
                    && self.options.accepts_paragraph(text)
                {
                    self.open_category(builder, text);
                }
            }
        }
    }

    fn open_category(&mut self, builder: &mut OutlineBuilder, label: &str) {
        if self
            .options
            .max_categories
            .is_some_and(|max| builder.category_count() >= max)
        {
            tracing::debug!(label, "category limit reached; dropping heading");
            self.dropped += 1;
            self.current = None;
            return;
        }
        self.current = Some(builder.push_category(label));
    }

    fn add_leaf(&mut self, builder: &mut OutlineBuilder, label: &str) {
        let Some(category) = self.current else {
            tracing::debug!(label, "leaf before any category; dropped");
            self.dropped += 1;
            return;
        };
        if self
            .options
            .max_leaves_per_category
            .is_some_and(|max| builder.leaf_count(category) >= max)
        {
            tracing::debug!(label, "leaf limit reached; dropped");
            self.dropped += 1;
            return;
        }
        builder.push_leaf(category, label);
    }
}

/// Parses `text` with default [`ParseOptions`].
pub fn parse_outline(text: &str, fallback_title: &str) -> OutlineNode {
    OutlineParser::new().parse(text, fallback_title)
}
