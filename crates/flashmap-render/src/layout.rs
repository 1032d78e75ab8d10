use flashmap_core::{Level, NodeId, OutlineNode};
use serde::{Deserialize, Serialize};

use crate::model::{ColorToken, LayoutEdge, LayoutPoint, MindmapLayout, PositionedNode};
use crate::text::{TextMeasurer, WrapConfig, wrap_label};
use crate::{LayoutOptions, Result};

/// Spacing and canvas constants (config section `layout`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub root_x: f64,
    /// Horizontal distance between root, category and leaf columns.
    pub tier_spacing: f64,
    /// Vertical slot of one leaf.
    pub leaf_height: f64,
    pub leaf_gap: f64,
    pub min_category_height: f64,
    pub category_gap: f64,
    pub min_canvas_width: f64,
    pub min_canvas_height: f64,
    pub canvas_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root_x: 160.0,
            tier_spacing: 250.0,
            leaf_height: 80.0,
            leaf_gap: 15.0,
            min_category_height: 60.0,
            category_gap: 40.0,
            min_canvas_width: 1400.0,
            min_canvas_height: 1000.0,
            canvas_margin: 200.0,
        }
    }
}

impl LayoutConfig {
    fn leaf_stack_height(&self, leaves: usize) -> f64 {
        if leaves == 0 {
            return 0.0;
        }
        leaves as f64 * self.leaf_height + (leaves - 1) as f64 * self.leaf_gap
    }

    /// Vertical extent reserved for a category with `leaves` children whose own shape is
    /// `shape_height` tall.
    pub fn category_extent(&self, leaves: usize, shape_height: f64) -> f64 {
        self.leaf_stack_height(leaves)
            .max(self.min_category_height)
            .max(shape_height)
    }
}

/// Shape and wrap parameters of one tree level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelStyle {
    pub max_chars_per_line: usize,
    pub line_height: f64,
    pub padding: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub corner_radius: f64,
}

impl Default for LevelStyle {
    fn default() -> Self {
        LevelStyles::default().leaf
    }
}

/// Config section `levels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelStyles {
    pub root: LevelStyle,
    pub category: LevelStyle,
    pub leaf: LevelStyle,
}

impl Default for LevelStyles {
    fn default() -> Self {
        Self {
            root: LevelStyle {
                max_chars_per_line: 12,
                line_height: 22.0,
                padding: 32.0,
                min_width: 140.0,
                min_height: 70.0,
                corner_radius: 30.0,
            },
            category: LevelStyle {
                max_chars_per_line: 10,
                line_height: 20.0,
                padding: 28.0,
                min_width: 120.0,
                min_height: 60.0,
                corner_radius: 25.0,
            },
            leaf: LevelStyle {
                max_chars_per_line: 12,
                line_height: 18.0,
                padding: 24.0,
                min_width: 160.0,
                min_height: 50.0,
                corner_radius: 20.0,
            },
        }
    }
}

impl LevelStyles {
    pub fn for_level(&self, level: Level) -> &LevelStyle {
        match level {
            Level::Root => &self.root,
            Level::Category => &self.category,
            Level::Leaf => &self.leaf,
        }
    }
}

struct LabelShape {
    lines: Vec<String>,
    width: f64,
    height: f64,
}

fn shape_label(
    text: &str,
    style: &LevelStyle,
    measurer: &dyn TextMeasurer,
    wrap: &WrapConfig,
) -> LabelShape {
    let lines = wrap_label(text, style.max_chars_per_line, measurer, wrap);
    let widest = lines
        .iter()
        .map(|line| measurer.width_px(line.trim()))
        .fold(0.0_f64, f64::max);
    LabelShape {
        width: (widest + 2.0 * style.padding).max(style.min_width),
        height: (lines.len() as f64 * style.line_height + style.padding).max(style.min_height),
        lines,
    }
}

/// Builds positioned nodes and connectors.
///
/// Positions depend on the tree shape, [`LayoutConfig`] and the wrapped line count of category
/// labels. Pixel widths only size the shapes and the canvas.
pub fn layout_outline(root: &OutlineNode, options: &LayoutOptions) -> Result<MindmapLayout> {
    root.validate()?;

    let measurer = options.text_measurer.as_ref();
    let cfg = &options.layout;
    let category_x = cfg.root_x + cfg.tier_spacing;
    let leaf_x = category_x + cfg.tier_spacing;

    let shape_of = |node: &OutlineNode| {
        shape_label(
            &node.text,
            options.levels.for_level(node.level),
            measurer,
            &options.wrap,
        )
    };

    let category_shapes: Vec<LabelShape> = root.children.iter().map(shape_of).collect();
    let extents: Vec<f64> = root
        .children
        .iter()
        .zip(&category_shapes)
        .map(|(category, shape)| cfg.category_extent(category.children.len(), shape.height))
        .collect();
    let gaps = extents.len().saturating_sub(1) as f64 * cfg.category_gap;
    let total_extent = extents.iter().sum::<f64>() + gaps;

    let height = cfg.min_canvas_height.max(total_extent + cfg.canvas_margin);
    let center_y = height / 2.0;

    let mut nodes = Vec::with_capacity(root.count_nodes());
    let mut edges = Vec::with_capacity(root.count_nodes().saturating_sub(1));

    let mut place = |node: &OutlineNode,
                     shape: LabelShape,
                     parent: Option<NodeId>,
                     x: f64,
                     y: f64,
                     color: ColorToken| {
        let style = options.levels.for_level(node.level);
        nodes.push(PositionedNode {
            id: node.id,
            parent,
            level: node.level,
            text: node.text.clone(),
            x,
            y,
            width: shape.width,
            height: shape.height,
            corner_radius: style.corner_radius,
            line_height: style.line_height,
            lines: shape.lines,
            color,
        });
    };

    place(root, shape_of(root), None, cfg.root_x, center_y, ColorToken::Center);

    let mut cursor = center_y - total_extent / 2.0;
    let categories = root.children.iter().zip(category_shapes).zip(&extents);
    for (index, ((category, shape), extent)) in categories.enumerate() {
        let color = ColorToken::palette(index);
        let category_y = cursor + extent / 2.0;
        place(category, shape, Some(root.id), category_x, category_y, color);
        edges.push(connector(
            root.id,
            (cfg.root_x, center_y),
            category.id,
            (category_x, category_y),
            color,
        ));

        let stack = cfg.leaf_stack_height(category.children.len());
        let first_leaf_y = category_y - stack / 2.0 + cfg.leaf_height / 2.0;
        for (slot, leaf) in category.children.iter().enumerate() {
            let leaf_y = first_leaf_y + slot as f64 * (cfg.leaf_height + cfg.leaf_gap);
            place(leaf, shape_of(leaf), Some(category.id), leaf_x, leaf_y, color);
            edges.push(connector(
                category.id,
                (category_x, category_y),
                leaf.id,
                (leaf_x, leaf_y),
                color,
            ));
        }

        cursor += extent + cfg.category_gap;
    }

    let right_edge = nodes
        .iter()
        .map(|n| n.x + n.width / 2.0)
        .fold(0.0_f64, f64::max);
    let width = cfg.min_canvas_width.max(right_edge + cfg.canvas_margin);

    tracing::debug!(
        width,
        height,
        nodes = nodes.len(),
        edges = edges.len(),
        "laid out mind map"
    );

    Ok(MindmapLayout {
        width,
        height,
        nodes,
        edges,
    })
}

fn connector(
    from: NodeId,
    (px, py): (f64, f64),
    to: NodeId,
    (cx, cy): (f64, f64),
    color: ColorToken,
) -> LayoutEdge {
    let dx = cx - px;
    LayoutEdge {
        id: format!("edge-{}-{}", from.index(), to.index()),
        from,
        to,
        color,
        points: [
            LayoutPoint { x: px, y: py },
            LayoutPoint {
                x: px + dx * 0.6,
                y: py,
            },
            LayoutPoint {
                x: px + dx * 0.4,
                y: cy,
            },
            LayoutPoint { x: cx, y: cy },
        ],
    }
}
