use super::model::{Level, NodeId, OutlineNode};

/// Incremental tree construction for the parser walk.
///
/// Categories are addressed by index; the walk keeps its own "current category" index
/// instead of holding a reference into the tree.
#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    root_text: String,
    categories: Vec<OutlineNode>,
    next_id: u32,
}

impl OutlineBuilder {
    pub fn new(root_text: impl Into<String>) -> Self {
        Self {
            root_text: root_text.into(),
            categories: Vec::new(),
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn root_text(&self) -> &str {
        &self.root_text
    }

    pub fn set_root_text(&mut self, text: impl Into<String>) {
        self.root_text = text.into();
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn leaf_count(&self, category: usize) -> usize {
        self.categories
            .get(category)
            .map(|c| c.children.len())
            .unwrap_or(0)
    }

    /// Appends a category and returns its index.
    pub fn push_category(&mut self, text: impl Into<String>) -> usize {
        let id = self.alloc_id();
        self.categories
            .push(OutlineNode::new(id, text, Level::Category));
        self.categories.len() - 1
    }

    /// Appends a leaf under `category`. Returns `false` when the index is unknown.
    pub fn push_leaf(&mut self, category: usize, text: impl Into<String>) -> bool {
        if category >= self.categories.len() {
            return false;
        }
        let id = self.alloc_id();
        self.categories[category]
            .children
            .push(OutlineNode::new(id, text, Level::Leaf));
        true
    }

    pub fn finish(self) -> OutlineNode {
        OutlineNode {
            id: NodeId::ROOT,
            text: self.root_text,
            level: Level::Root,
            children: self.categories,
        }
    }
}
