use super::Block;
use crate::types::BlockId;

/// Common fields for all blocks
///
/// `id` is `None` for blocks built locally (by a parser or by hand) that
/// have not been sent to Notion yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockCommon {
    pub id: Option<BlockId>,
    pub children: Vec<Block>,
    pub has_children: bool,
    pub archived: bool,
}

impl BlockCommon {
    pub fn new(id: BlockId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }

    /// Append a nested block, keeping `has_children` consistent.
    pub fn push_child(&mut self, child: Block) {
        self.children.push(child);
        self.has_children = true;
    }
}
