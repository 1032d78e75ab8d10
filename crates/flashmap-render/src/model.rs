use flashmap_core::{Level, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

/// Symbolic color of a node and of the connector leading to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorToken {
    Center,
    Purple,
    Blue,
    Green,
    Orange,
    Red,
    Indigo,
}

impl ColorToken {
    pub const PALETTE: [ColorToken; 6] = [
        ColorToken::Purple,
        ColorToken::Blue,
        ColorToken::Green,
        ColorToken::Orange,
        ColorToken::Red,
        ColorToken::Indigo,
    ];

    /// Palette entry for the `index`-th category (cycles).
    pub fn palette(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorToken::Center => "center",
            ColorToken::Purple => "purple",
            ColorToken::Blue => "blue",
            ColorToken::Green => "green",
            ColorToken::Orange => "orange",
            ColorToken::Red => "red",
            ColorToken::Indigo => "indigo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub level: Level,
    pub text: String,
    /// Shape center.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub line_height: f64,
    /// Wrapped label; concatenates back to `text`.
    pub lines: Vec<String>,
    pub color: ColorToken,
}

impl PositionedNode {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.x - self.width / 2.0,
            min_y: self.y - self.height / 2.0,
            max_x: self.x + self.width / 2.0,
            max_y: self.y + self.height / 2.0,
        }
    }
}

/// Cubic connector from a parent center to a child center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEdge {
    pub id: String,
    pub from: NodeId,
    pub to: NodeId,
    pub color: ColorToken,
    /// Start, first control, second control, end.
    pub points: [LayoutPoint; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapLayout {
    pub width: f64,
    pub height: f64,
    /// Pre-order: root, then each category followed by its leaves.
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<LayoutEdge>,
}

impl MindmapLayout {
    pub fn node(&self, id: NodeId) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn root(&self) -> Option<&PositionedNode> {
        self.nodes.first()
    }

    /// Union of all node shapes.
    pub fn content_bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.nodes.iter().flat_map(|n| {
            let b = n.bounds();
            [(b.min_x, b.min_y), (b.max_x, b.max_y)]
        }))
    }
}
