use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::{Error, Result};

/// Identifier of a node inside one outline tree.
///
/// The root is always `NodeId::ROOT`; other ids follow creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Level {
    Root,
    Category,
    Leaf,
}

impl Level {
    pub fn as_u8(self) -> u8 {
        match self {
            Level::Root => 0,
            Level::Category => 1,
            Level::Leaf => 2,
        }
    }

    /// Level a child of this node must have, if any.
    pub fn child_level(self) -> Option<Level> {
        match self {
            Level::Root => Some(Level::Category),
            Level::Category => Some(Level::Leaf),
            Level::Leaf => None,
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Level::Root),
            1 => Ok(Level::Category),
            2 => Ok(Level::Leaf),
            other => Err(format!("outline level must be 0, 1 or 2 (got {other})")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    pub id: NodeId,
    pub text: String,
    pub level: Level,
    #[serde(default)]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(id: NodeId, text: impl Into<String>, level: Level) -> Self {
        Self {
            id,
            text: text.into(),
            level,
            children: Vec::new(),
        }
    }

    pub fn categories(&self) -> &[OutlineNode] {
        &self.children
    }

    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutlineNode::count_nodes)
            .sum::<usize>()
    }

    /// Pre-order traversal in stored child order.
    pub fn iter(&self) -> OutlineIter<'_> {
        OutlineIter { stack: vec![self] }
    }

    /// Checks the three-level shape: a root, category children, leaf grandchildren.
    pub fn validate(&self) -> Result<()> {
        if self.level != Level::Root {
            return Err(Error::InvalidOutline {
                message: format!("{} is the tree root but has level {}", self.id, self.level.as_u8()),
            });
        }
        let mut seen = HashSet::new();
        validate_node(self, &mut seen)
    }
}

fn validate_node(node: &OutlineNode, seen: &mut HashSet<NodeId>) -> Result<()> {
    if !seen.insert(node.id) {
        return Err(Error::InvalidOutline {
            message: format!("duplicate node id {}", node.id),
        });
    }
    let expected = node.level.child_level();
    for child in &node.children {
        if Some(child.level) != expected {
            return Err(Error::InvalidOutline {
                message: format!(
                    "{} (level {}) cannot be a child of {} (level {})",
                    child.id,
                    child.level.as_u8(),
                    node.id,
                    node.level.as_u8()
                ),
            });
        }
        validate_node(child, seen)?;
    }
    Ok(())
}

pub struct OutlineIter<'a> {
    stack: Vec<&'a OutlineNode>,
}

impl<'a> Iterator for OutlineIter<'a> {
    type Item = &'a OutlineNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
