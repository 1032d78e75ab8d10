#![forbid(unsafe_code)]

//! `flashmap` turns loosely structured outline text (markdown-ish headings, bullets, or plain
//! prose) into a three-level mind map and renders it headlessly.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`flashmap::render`)
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use flashmap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use flashmap_render::model::{
        Bounds, ColorToken, LayoutEdge, LayoutPoint, MindmapLayout, PositionedNode,
    };
    pub use flashmap_render::svg::{
        LevelFont, LevelFonts, SvgRenderOptions, palette_colors, render_mindmap_svg,
    };
    pub use flashmap_render::text::{
        GlyphMetrics, HeuristicTextMeasurer, TextMeasurer, UnicodeWidthTextMeasurer, WrapConfig,
        wrap, wrap_label,
    };
    pub use flashmap_render::{LayoutConfig, LayoutOptions, LevelStyle, LevelStyles, layout_outline};

    use flashmap_core::{FlashmapConfig, OutlineNode, OutlineParser};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum FlashmapError {
        #[error(transparent)]
        Core(#[from] flashmap_core::Error),
        #[error(transparent)]
        Render(#[from] flashmap_render::Error),
    }

    pub type Result<T> = std::result::Result<T, FlashmapError>;

    /// Converts an arbitrary string into a conservative SVG `id` token, so several mind maps can
    /// be inlined into one page without their scoped CSS and `<defs>` ids colliding.
    ///
    /// This helper:
    /// - trims whitespace
    /// - replaces unsupported characters with `-`
    /// - ensures the id starts with an ASCII letter by prefixing `fm-` when needed
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "fm-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
            out.push(if ok { ch } else { '-' });
        }

        let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_ok {
            out.insert_str(0, "fm-");
        }

        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "fm" {
            return "fm-untitled".to_string();
        }
        out.to_string()
    }

    /// Parse → layout → SVG in one call.
    pub fn render_svg(
        parser: &OutlineParser,
        text: &str,
        fallback_title: &str,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let outline = parser.parse(text, fallback_title);
        let layout = layout_outline(&outline, layout_options)?;
        Ok(render_mindmap_svg(&layout, svg_options)?)
    }

    /// Bundles the parser and the layout/SVG options for repeated rendering.
    ///
    /// All work is CPU-bound and does not perform I/O.
    #[derive(Clone, Default)]
    pub struct MindmapRenderer {
        pub parser: OutlineParser,
        pub layout: LayoutOptions,
        pub svg: SvgRenderOptions,
    }

    impl MindmapRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Builds every stage from one layered config.
        pub fn with_config(config: &FlashmapConfig) -> Result<Self> {
            Ok(Self {
                parser: OutlineParser::with_config(config)?,
                layout: LayoutOptions::from_config(config)?,
                svg: SvgRenderOptions::from_config(config)?,
            })
        }

        pub fn parse(&self, text: &str, fallback_title: &str) -> OutlineNode {
            self.parser.parse(text, fallback_title)
        }

        pub fn layout(&self, text: &str, fallback_title: &str) -> Result<MindmapLayout> {
            let outline = self.parse(text, fallback_title);
            Ok(layout_outline(&outline, &self.layout)?)
        }

        pub fn render_svg(&self, text: &str, fallback_title: &str) -> Result<String> {
            self.render_svg_with(text, fallback_title, &self.svg)
        }

        pub fn render_svg_with(
            &self,
            text: &str,
            fallback_title: &str,
            svg: &SvgRenderOptions,
        ) -> Result<String> {
            render_svg(&self.parser, text, fallback_title, &self.layout, svg)
        }

        pub fn render_svg_with_diagram_id(
            &self,
            text: &str,
            fallback_title: &str,
            diagram_id: &str,
        ) -> Result<String> {
            let mut svg = self.svg.clone();
            svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            self.render_svg_with(text, fallback_title, &svg)
        }

        #[cfg(feature = "raster")]
        pub fn render_png(
            &self,
            text: &str,
            fallback_title: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(text, fallback_title)?;
            raster::svg_to_png(&svg, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg(
            &self,
            text: &str,
            fallback_title: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(text, fallback_title)?;
            raster::svg_to_jpeg(&svg, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_pdf(&self, text: &str, fallback_title: &str) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(text, fallback_title)?;
            raster::svg_to_pdf(&svg)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn sanitize_svg_id_produces_safe_tokens() {
            assert_eq!(sanitize_svg_id("  "), "fm-untitled");
            assert_eq!(sanitize_svg_id("my map"), "my-map");
            assert_eq!(sanitize_svg_id("2024 plan"), "fm-2024-plan");
            assert_eq!(sanitize_svg_id("a<>b"), "a-b");
            assert_eq!(sanitize_svg_id("中文"), "fm-untitled");
            assert_eq!(sanitize_svg_id("--x--"), "fm-x");
        }

        #[test]
        fn renderer_runs_the_whole_pipeline() {
            let renderer = MindmapRenderer::new();
            let svg = renderer
                .render_svg("# Topic\n## A\n- a1\n## B", "X")
                .unwrap();
            let doc = roxmltree::Document::parse(&svg).unwrap();
            assert!(doc.root_element().has_tag_name("svg"));

            let layout = renderer.layout("# Topic\n## A\n- a1\n## B", "X").unwrap();
            assert_eq!(layout.nodes.len(), 4);
        }

        #[test]
        fn renderer_sanitizes_diagram_ids() {
            let renderer = MindmapRenderer::new();
            let svg = renderer
                .render_svg_with_diagram_id("## A", "X", "weekly review #3")
                .unwrap();
            assert!(svg.starts_with(r#"<svg id="weekly-review-3""#));
        }

        #[test]
        fn renderer_reads_config() {
            let config = FlashmapConfig::from_value(serde_json::json!({
                "parse": { "maxCategories": 1 },
                "layout": { "rootX": 200 },
                "svg": { "diagramId": "cfg" }
            }));
            let renderer = MindmapRenderer::with_config(&config).unwrap();
            let layout = renderer.layout("## A\n## B", "X").unwrap();
            assert_eq!(layout.nodes.len(), 2);
            assert_eq!(layout.nodes[0].x, 200.0);
            let svg = renderer.render_svg("## A", "X").unwrap();
            assert!(svg.starts_with(r#"<svg id="cfg""#));
        }

        #[test]
        fn invalid_config_is_reported() {
            let config = FlashmapConfig::from_value(serde_json::json!({
                "layout": { "rootX": "left" }
            }));
            assert!(matches!(
                MindmapRenderer::with_config(&config),
                Err(FlashmapError::Render(_))
            ));
        }
    }
}
