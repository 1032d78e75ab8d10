//! SVG document assembly for a laid-out mind map.

mod curve;
mod timing;
mod util;

use flashmap_core::{FlashmapConfig, Level};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

use crate::model::{ColorToken, MindmapLayout, PositionedNode};
use crate::{Error, Result};

use curve::cubic_path_d;
use timing::PhaseTimer;
use util::{escape_xml_display, fmt_display, normalize_css_font_family};

pub const DEFAULT_DIAGRAM_ID: &str = "flashmap";
pub const DEFAULT_FONT_FAMILY: &str = "'PingFang SC','Microsoft YaHei',Arial,sans-serif";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelFont {
    pub size: f64,
    pub weight: u16,
    pub color: String,
}

impl Default for LevelFont {
    fn default() -> Self {
        LevelFonts::default().leaf
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelFonts {
    pub root: LevelFont,
    pub category: LevelFont,
    pub leaf: LevelFont,
}

impl Default for LevelFonts {
    fn default() -> Self {
        Self {
            root: LevelFont {
                size: 16.0,
                weight: 600,
                color: "#1f2937".to_string(),
            },
            category: LevelFont {
                size: 14.0,
                weight: 500,
                color: "#374151".to_string(),
            },
            leaf: LevelFont {
                size: 13.0,
                weight: 400,
                color: "#4b5563".to_string(),
            },
        }
    }
}

impl LevelFonts {
    fn iter(&self) -> [(Level, &LevelFont); 3] {
        [
            (Level::Root, &self.root),
            (Level::Category, &self.category),
            (Level::Leaf, &self.leaf),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root element id; also scopes the CSS and the `<defs>` ids.
    pub diagram_id: Option<String>,
    pub font_family: String,
    /// Solid background color. `None` paints the default soft gradient.
    pub background: Option<String>,
    pub fonts: LevelFonts,
    /// Drop shadow under node shapes.
    pub shadows: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            background: None,
            fonts: LevelFonts::default(),
            shadows: true,
        }
    }
}

impl SvgRenderOptions {
    /// Reads the `fonts` section plus `svg.fontFamily`, `svg.background` and `svg.shadows`.
    pub fn from_config(config: &FlashmapConfig) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            diagram_id: config.get_str("svg.diagramId").map(str::to_string),
            font_family: config
                .get_str("svg.fontFamily")
                .map(str::to_string)
                .unwrap_or(defaults.font_family),
            background: config.get_str("svg.background").map(str::to_string),
            fonts: config.section("fonts")?,
            shadows: config.get_bool("svg.shadows").unwrap_or(defaults.shadows),
        })
    }
}

/// Fill and stroke of a palette token.
pub fn palette_colors(token: ColorToken) -> (&'static str, &'static str) {
    match token {
        ColorToken::Center => ("#ffffff", "#6366f1"),
        ColorToken::Purple => ("#faf5ff", "#a855f7"),
        ColorToken::Blue => ("#eff6ff", "#3b82f6"),
        ColorToken::Green => ("#ecfdf5", "#10b981"),
        ColorToken::Orange => ("#fffbeb", "#f59e0b"),
        ColorToken::Red => ("#fef2f2", "#ef4444"),
        ColorToken::Indigo => ("#eef2ff", "#6366f1"),
    }
}

fn validate_color(option: &str, value: &str) -> Result<()> {
    svgtypes::Color::from_str(value.trim())
        .map(|_| ())
        .map_err(|err| Error::InvalidOption {
            option: option.to_string(),
            message: format!("{value:?} is not a color: {err}"),
        })
}

fn validate_diagram_id(id: &str) -> Result<()> {
    let mut chars = id.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            option: "diagram_id".to_string(),
            message: format!("{id:?} must start with a letter and contain only [A-Za-z0-9_-]"),
        })
    }
}

fn write_style(out: &mut String, id: &str, options: &SvgRenderOptions) {
    let font_family = normalize_css_font_family(&options.font_family);
    let _ = write!(
        out,
        r#"<style>#{id}{{font-family:{font};}}#{id} .edge{{fill:none;stroke-width:2.5;stroke-linecap:round;stroke-linejoin:round;opacity:0.85;}}#{id} .node .shape{{stroke-width:2;}}#{id} .node text{{text-anchor:middle;dominant-baseline:central;}}"#,
        font = escape_xml_display(&font_family),
    );
    for (level, font) in options.fonts.iter() {
        let _ = write!(
            out,
            r#"#{id} .level-{lvl} text{{font-size:{size}px;font-weight:{weight};fill:{color};}}"#,
            lvl = level.as_u8(),
            size = fmt_display(font.size),
            weight = font.weight,
            color = escape_xml_display(font.color.trim()),
        );
    }
    for token in std::iter::once(ColorToken::Center).chain(ColorToken::PALETTE) {
        let (fill, stroke) = palette_colors(token);
        let name = token.as_str();
        let _ = write!(
            out,
            r#"#{id} .color-{name} .shape{{fill:{fill};stroke:{stroke};}}#{id} .edge.color-{name}{{stroke:{stroke};}}"#,
        );
    }
    let _ = write!(out, r#"#{id} .color-center .shape{{stroke-width:3;}}</style>"#);
}

fn write_defs(out: &mut String, id: &str, options: &SvgRenderOptions) {
    out.push_str("<defs>");
    write_style(out, id, options);
    if options.background.is_none() {
        let _ = write!(
            out,
            r##"<linearGradient id="{id}-bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#f8fafc"/><stop offset="0.5" stop-color="#ffffff"/><stop offset="1" stop-color="#f8fafc"/></linearGradient>"##,
        );
    }
    if options.shadows {
        let _ = write!(
            out,
            r##"<filter id="{id}-shadow" x="-20%" y="-20%" width="140%" height="160%"><feDropShadow dx="0" dy="2" stdDeviation="4" flood-color="#0f172a" flood-opacity="0.08"/></filter>"##,
        );
    }
    out.push_str("</defs>");
}

fn write_node(out: &mut String, id: &str, node: &PositionedNode, shadows: bool) {
    let _ = write!(
        out,
        r#"<g id="{id}-{node_id}" class="node level-{lvl} color-{color}">"#,
        node_id = node.id,
        lvl = node.level.as_u8(),
        color = node.color.as_str(),
    );
    let filter = if shadows {
        format!(r#" filter="url(#{id}-shadow)""#)
    } else {
        String::new()
    };
    if node.level == Level::Root {
        let _ = write!(
            out,
            r#"<ellipse class="shape" cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}"{filter}/>"#,
            cx = fmt_display(node.x),
            cy = fmt_display(node.y),
            rx = fmt_display(node.width / 2.0),
            ry = fmt_display(node.height / 2.0),
        );
    } else {
        let _ = write!(
            out,
            r#"<rect class="shape" x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" ry="{r}"{filter}/>"#,
            x = fmt_display(node.x - node.width / 2.0),
            y = fmt_display(node.y - node.height / 2.0),
            w = fmt_display(node.width),
            h = fmt_display(node.height),
            r = fmt_display(node.corner_radius),
        );
    }

    let first_y = node.y - (node.lines.len().saturating_sub(1)) as f64 * node.line_height / 2.0;
    for (i, line) in node.lines.iter().enumerate() {
        let _ = write!(
            out,
            r#"<text x="{x}" y="{y}">{text}</text>"#,
            x = fmt_display(node.x),
            y = fmt_display(first_y + i as f64 * node.line_height),
            text = escape_xml_display(line.trim()),
        );
    }
    out.push_str("</g>");
}

/// Serializes a layout into a standalone SVG document.
///
/// Only option values can fail; every layout renders, including a root without children.
pub fn render_mindmap_svg(layout: &MindmapLayout, options: &SvgRenderOptions) -> Result<String> {
    let id = options.diagram_id.as_deref().unwrap_or(DEFAULT_DIAGRAM_ID);
    validate_diagram_id(id)?;
    if let Some(bg) = options.background.as_deref() {
        validate_color("background", bg)?;
    }
    for (_, font) in options.fonts.iter() {
        validate_color("fonts.color", &font.color)?;
    }

    let mut timer = PhaseTimer::from_env();
    let w = fmt_display(layout.width);
    let h = fmt_display(layout.height);
    let mut out = String::with_capacity(2048 + layout.nodes.len() * 320);
    let _ = write!(
        out,
        r#"<svg id="{id}" width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" role="graphics-document document" aria-roledescription="mindmap">"#,
    );
    if let Some(root) = layout.root() {
        let _ = write!(out, "<title>{}</title>", escape_xml_display(&root.text));
    }

    write_defs(&mut out, id, options);
    match options.background.as_deref() {
        Some(bg) => {
            let _ = write!(
                out,
                r#"<rect class="background" x="0" y="0" width="{w}" height="{h}" fill="{fill}"/>"#,
                fill = escape_xml_display(bg.trim()),
            );
        }
        None => {
            let _ = write!(
                out,
                r#"<rect class="background" x="0" y="0" width="{w}" height="{h}" fill="url(#{id}-bg)"/>"#,
            );
        }
    }
    timer.lap("defs");

    out.push_str(r#"<g class="edges">"#);
    for edge in &layout.edges {
        let _ = write!(
            out,
            r#"<path id="{id}-{edge_id}" class="edge color-{color}" d="{d}"/>"#,
            edge_id = escape_xml_display(&edge.id),
            color = edge.color.as_str(),
            d = cubic_path_d(&edge.points),
        );
    }
    out.push_str("</g>");
    timer.lap("edges");

    out.push_str(r#"<g class="nodes">"#);
    for node in &layout.nodes {
        write_node(&mut out, id, node, options.shadows);
    }
    out.push_str("</g>");
    timer.lap("nodes");

    out.push_str("</svg>");
    timer.finish(layout.nodes.len());
    Ok(out)
}
