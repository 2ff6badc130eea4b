use super::{BlockIndex, NodeId};

/// an enum to describe what a node is, and what only that kind of node owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// a folder owning its children, in creation order
    Folder { children: Vec<NodeId> },
    /// a regular file backed by a block chain
    File {
        first_block: BlockIndex,
        /// highest position ever written, in content units
        size: u64,
        /// read/write offset, reset when the file is opened or closed
        cursor: u64,
    },
}

impl NodeKind {
    pub fn folder() -> Self {
        NodeKind::Folder {
            children: Vec::new(),
        }
    }

    pub fn file(first_block: BlockIndex) -> Self {
        NodeKind::File {
            first_block,
            size: 1,
            cursor: 0,
        }
    }
}
