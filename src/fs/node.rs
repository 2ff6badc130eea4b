use std::fmt;

use crate::utils::time_util::{self, TimeDurationStruct};

use super::{BlockIndex, NodeKind, ROOT_NODE};

/// a stable handle to a node, the index of its slot in the node table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn is_root(self) -> bool {
        self == ROOT_NODE
    }
}

/// the four DOS style attribute flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attributes {
    pub readonly: bool,
    pub archive: bool,
    pub system: bool,
    pub hidden: bool,
}

impl Attributes {
    /// content, name and existence of a locked node can't change
    pub fn is_locked(&self) -> bool {
        self.readonly || self.system
    }
}

/// shown in `RASH` order, `-` for a cleared flag
impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            flag(self.readonly, 'R'),
            flag(self.archive, 'A'),
            flag(self.system, 'S'),
            flag(self.hidden, 'H')
        )
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub created_at: TimeDurationStruct,
    pub modified_at: TimeDurationStruct,
    pub attributes: Attributes,
    /// owning folder, the root is its own parent
    pub parent: NodeId,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(name: impl Into<String>, parent: NodeId, kind: NodeKind) -> Self {
        let now = time_util::now();
        Node {
            name: name.into(),
            created_at: now,
            modified_at: now,
            attributes: Attributes::default(),
            parent,
            kind,
        }
    }
}

/// This block is about node metadata
impl Node {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    pub fn update_modified_at(&mut self) {
        self.modified_at = time_util::now();
    }

    /// size in content units, always 0 for a folder
    pub fn size(&self) -> u64 {
        match self.kind {
            NodeKind::File { size, .. } => size,
            NodeKind::Folder { .. } => 0,
        }
    }

    pub fn first_block(&self) -> Option<BlockIndex> {
        match self.kind {
            NodeKind::File { first_block, .. } => Some(first_block),
            NodeKind::Folder { .. } => None,
        }
    }

    pub fn cursor(&self) -> Option<u64> {
        match self.kind {
            NodeKind::File { cursor, .. } => Some(cursor),
            NodeKind::Folder { .. } => None,
        }
    }

    pub fn children(&self) -> Option<&[NodeId]> {
        match &self.kind {
            NodeKind::Folder { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            NodeKind::Folder { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_file_node() {
        let node = Node::new("a.txt", ROOT_NODE, NodeKind::file(3));
        assert!(node.is_file());
        assert_eq!(node.size(), 1);
        assert_eq!(node.first_block(), Some(3));
        assert_eq!(node.cursor(), Some(0));
        assert_eq!(node.children(), None);
        assert_eq!(node.created_at, node.modified_at);
    }

    #[test]
    fn test_new_folder_node() {
        let node = Node::new("docs", ROOT_NODE, NodeKind::folder());
        assert!(node.is_folder());
        assert_eq!(node.size(), 0);
        assert_eq!(node.first_block(), None);
        assert_eq!(node.children(), Some(&[][..]));
    }

    #[test]
    fn test_attributes() {
        let mut attrs = Attributes::default();
        assert!(!attrs.is_locked());
        assert_eq!(attrs.to_string(), "----");
        attrs.readonly = true;
        attrs.hidden = true;
        assert!(attrs.is_locked());
        assert_eq!(attrs.to_string(), "R--H");
        let system = Attributes {
            system: true,
            ..Attributes::default()
        };
        assert!(system.is_locked());
    }
}
