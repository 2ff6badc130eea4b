//! what does our filesystem look like in the memory

use log::{debug, trace};

use crate::utils::fs_size_calculator;

use super::{
    parse_path, AllocTable, BlockIndex, BlockManager, FsError, FsResult, Node, NodeId, NodeKind,
    ParsedPath, BLOCK_SIZE, CURRENT_DIR, FAT_END, MAX_BLOCK_COUNT, PARENT_DIR, ROOT_NAME,
    ROOT_NODE,
};

/// geometry of the simulated disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsConfig {
    pub block_count: u32,
    pub block_size: u32,
}

impl Default for FsConfig {
    fn default() -> Self {
        FsConfig {
            block_count: MAX_BLOCK_COUNT,
            block_size: BLOCK_SIZE,
        }
    }
}

impl FsConfig {
    pub fn new(block_count: u32, block_size: u32) -> anyhow::Result<Self> {
        if block_count == 0 || block_count == FAT_END {
            anyhow::bail!("block count must be between 1 and {}", FAT_END - 1);
        }
        if block_size == 0 {
            anyhow::bail!("block size must not be 0");
        }
        Ok(FsConfig {
            block_count,
            block_size,
        })
    }
}

/// it has the following layout:
/// - a pool of free blocks
/// - the allocation table linking blocks into chains
/// - the node table, slot 0 is the root folder
#[derive(Debug)]
pub struct FileSystem {
    config: FsConfig,
    pub(crate) block_manager: BlockManager,
    pub(crate) alloc_table: AllocTable,
    /// deleted nodes leave a `None` behind, slots are never reused
    nodes: Vec<Option<Node>>,
    /// current working folder, always a live folder
    pub(crate) current: NodeId,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new(FsConfig::default())
    }
}

impl FileSystem {
    /// create an empty filesystem with only the root folder
    pub fn new(config: FsConfig) -> Self {
        debug!(
            "creating filesystem with {} blocks of {} units",
            config.block_count, config.block_size
        );
        let root = Node::new(ROOT_NAME, ROOT_NODE, NodeKind::folder());
        FileSystem {
            config,
            block_manager: BlockManager::new(config.block_count),
            alloc_table: AllocTable::new(config.block_count),
            nodes: vec![Some(root)],
            current: ROOT_NODE,
        }
    }
}

/// get nodes and geometry of this filesystem
impl FileSystem {
    #[inline]
    pub fn config(&self) -> FsConfig {
        self.config
    }

    #[inline]
    pub fn block_size(&self) -> u32 {
        self.config.block_size
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.block_manager.capacity()
    }

    #[inline]
    pub fn free_blocks(&self) -> usize {
        self.block_manager.free_blocks()
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        ROOT_NODE
    }

    #[inline]
    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn node(&self, id: NodeId) -> FsResult<&Node> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(FsError::InvalidNode)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> FsResult<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(FsError::InvalidNode)
    }

    /// children of a folder, in creation order
    pub fn children(&self, id: NodeId) -> FsResult<&[NodeId]> {
        self.node(id)?.children().ok_or(FsError::NotAFolder)
    }

    /// find a direct child of `folder` by name
    pub fn child_named(&self, folder: NodeId, name: &str) -> FsResult<Option<NodeId>> {
        for &child in self.children(folder)? {
            if self.node(child)?.name == name {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    /// every live node, root included
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| NodeId(index))
    }
}

/// path resolution
impl FileSystem {
    /// where a parsed path starts, the root or the current folder
    pub(crate) fn start_of(&self, path: &ParsedPath) -> NodeId {
        if path.is_absolute {
            ROOT_NODE
        } else {
            self.current
        }
    }

    /// walk `components` from `start`
    ///
    /// `..` goes to the parent, `.` and empty components stay put, anything
    /// else must name a child of the current folder.
    pub fn resolve<S: AsRef<str>>(&self, start: NodeId, components: &[S]) -> FsResult<NodeId> {
        let mut current = start;
        for component in components {
            let node = self.node(current)?;
            if node.is_file() {
                // files have no children
                return Err(FsError::NotFound);
            }
            current = match component.as_ref() {
                "" | CURRENT_DIR => current,
                PARENT_DIR => node.parent,
                name => self.child_named(current, name)?.ok_or(FsError::NotFound)?,
            };
        }
        Ok(current)
    }

    /// resolve a textual path from the root or the current folder
    pub fn lookup(&self, path: &str) -> FsResult<NodeId> {
        let parsed = parse_path(path);
        self.resolve(self.start_of(&parsed), parsed.components.as_slice())
    }

    /// resolve everything but the last component, which must name a new entry
    pub(crate) fn resolve_parent<'p>(&self, path: &'p ParsedPath) -> FsResult<(NodeId, &'p str)> {
        let (name, prefix) = path.split_last().ok_or(FsError::InvalidName)?;
        let parent = self
            .resolve(self.start_of(path), prefix)
            .map_err(|_| FsError::ParentNotFound)?;
        if self.node(parent)?.is_file() {
            return Err(FsError::ParentIsFile);
        }
        Ok((parent, name))
    }

    /// absolute path of a node, `/` for the root
    pub fn path_of(&self, id: NodeId) -> FsResult<String> {
        let mut names = Vec::new();
        let mut current = id;
        while !current.is_root() {
            let node = self.node(current)?;
            names.push(node.name.as_str());
            current = node.parent;
        }
        if names.is_empty() {
            return Ok("/".to_string());
        }
        names.reverse();
        Ok(names.iter().map(|name| format!("/{name}")).collect())
    }
}

/// tree operations
impl FileSystem {
    /// put a new node into the table and under its parent
    pub(crate) fn attach(&mut self, node: Node) -> FsResult<NodeId> {
        let parent = node.parent;
        let id = NodeId(self.nodes.len());
        let parent_node = self.node_mut(parent)?;
        parent_node
            .children_mut()
            .ok_or(FsError::ParentIsFile)?
            .push(id);
        parent_node.update_modified_at();
        self.nodes.push(Some(node));
        Ok(id)
    }

    /// remove a node from its parent and from the table
    pub(crate) fn detach(&mut self, id: NodeId) -> FsResult<Node> {
        let parent = self.node(id)?.parent;
        let parent_node = self.node_mut(parent)?;
        let siblings = parent_node.children_mut().ok_or(FsError::InvalidNode)?;
        let position = siblings
            .iter()
            .position(|child| *child == id)
            .ok_or(FsError::InvalidNode)?;
        siblings.remove(position);
        parent_node.update_modified_at();
        let node = self.nodes[id.0].take().ok_or(FsError::InvalidNode)?;
        if self.current == id {
            self.current = parent;
        }
        Ok(node)
    }
}

/// block chain operations
impl FileSystem {
    /// the block chain of a file
    pub fn chain_of(&self, id: NodeId) -> FsResult<Vec<BlockIndex>> {
        let first = self.node(id)?.first_block().ok_or(FsError::NotAFile)?;
        self.alloc_table.chain(first, self.capacity())
    }

    /// give a new chain of one block to a file
    pub(crate) fn allocate_first_block(&mut self) -> FsResult<BlockIndex> {
        let block = self.block_manager.acquire().ok_or(FsError::OutOfSpace)?;
        self.alloc_table.terminate(block);
        Ok(block)
    }

    /// append blocks to a chain until it has `wanted` blocks
    /// # Return
    /// the chain length, which is less than `wanted` if no free block was left
    pub(crate) fn grow_chain(&mut self, first: BlockIndex, wanted: u64) -> FsResult<u64> {
        let mut last = first;
        let mut length = 1;
        while let Some(next) = self.alloc_table.next(last) {
            last = next;
            length += 1;
            if length > self.capacity() as u64 {
                return Err(FsError::ChainCorrupt);
            }
        }
        while length < wanted {
            let Some(block) = self.block_manager.acquire() else {
                debug!("no free block left, chain stays at {length} blocks");
                return Ok(length);
            };
            self.alloc_table.terminate(block);
            self.alloc_table.link(last, block);
            trace!("block {} of the chain is {block}", length);
            last = block;
            length += 1;
        }
        Ok(length)
    }

    /// give every block of a chain back to the block manager
    pub(crate) fn release_chain(&mut self, first: BlockIndex) -> FsResult<usize> {
        let chain = self.alloc_table.chain(first, self.capacity())?;
        for block in &chain {
            self.alloc_table.terminate(*block);
            self.block_manager.release(*block);
        }
        Ok(chain.len())
    }

    /// the number of blocks a file of `size` units needs
    pub(crate) fn blocks_for(&self, size: u64) -> u64 {
        fs_size_calculator::blocks_for(size, self.block_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(fs: &mut FileSystem, parent: NodeId, name: &str) -> NodeId {
        fs.attach(Node::new(name, parent, NodeKind::folder())).unwrap()
    }

    #[test]
    fn test_new_filesystem() {
        let fs = FileSystem::new(FsConfig::new(16, 1024).unwrap());
        assert_eq!(fs.free_blocks(), 16);
        assert_eq!(fs.capacity(), 16);
        assert_eq!(fs.current(), ROOT_NODE);
        let root = fs.node(ROOT_NODE).unwrap();
        assert_eq!(root.name, ROOT_NAME);
        assert_eq!(root.parent, ROOT_NODE);
        assert!(root.is_folder());
    }

    #[test]
    fn test_default_geometry() {
        let config = FsConfig::default();
        assert_eq!(config.block_count, 131072);
        assert_eq!(config.block_size, 1024);
        assert!(FsConfig::new(0, 1024).is_err());
        assert!(FsConfig::new(8, 0).is_err());
    }

    #[test]
    fn test_resolve() -> anyhow::Result<()> {
        let mut fs = FileSystem::new(FsConfig::new(16, 1024)?);
        let a = folder(&mut fs, ROOT_NODE, "a");
        let b = folder(&mut fs, a, "b");

        assert_eq!(fs.resolve(ROOT_NODE, &["a", "b"])?, b);
        assert_eq!(fs.resolve(a, &["b"])?, b);
        assert_eq!(fs.resolve(b, &[".."])?, a);
        assert_eq!(fs.resolve(b, &["..", "..", ".."])?, ROOT_NODE);
        assert_eq!(fs.resolve(ROOT_NODE, &["a", "", "b"])?, b);
        assert_eq!(fs.resolve(ROOT_NODE, &["a", "b", "..", "b"])?, b);
        assert_eq!(fs.resolve(ROOT_NODE, &["b"]), Err(FsError::NotFound));
        assert_eq!(fs.resolve::<&str>(a, &[])?, a);

        assert_eq!(fs.lookup("/")?, ROOT_NODE);
        assert_eq!(fs.lookup("/a/b")?, b);
        fs.current = a;
        assert_eq!(fs.lookup("b")?, b);
        assert_eq!(fs.lookup("../a")?, a);
        Ok(())
    }

    #[test]
    fn test_path_of() -> anyhow::Result<()> {
        let mut fs = FileSystem::new(FsConfig::new(16, 1024)?);
        let d = folder(&mut fs, ROOT_NODE, "d");
        let e = folder(&mut fs, d, "e");
        assert_eq!(fs.path_of(ROOT_NODE)?, "/");
        assert_eq!(fs.path_of(d)?, "/d");
        assert_eq!(fs.path_of(e)?, "/d/e");
        Ok(())
    }

    #[test]
    fn test_detach_moves_current_up() -> anyhow::Result<()> {
        let mut fs = FileSystem::new(FsConfig::new(16, 1024)?);
        let d = folder(&mut fs, ROOT_NODE, "d");
        fs.current = d;
        fs.detach(d)?;
        assert_eq!(fs.current(), ROOT_NODE);
        assert_eq!(fs.node(d).err(), Some(FsError::InvalidNode));
        assert!(fs.children(ROOT_NODE)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_grow_and_release_chain() -> anyhow::Result<()> {
        let mut fs = FileSystem::new(FsConfig::new(4, 1024)?);
        let first = fs.allocate_first_block()?;
        assert_eq!(fs.grow_chain(first, 3)?, 3);
        assert_eq!(fs.alloc_table.chain(first, 4)?.len(), 3);
        assert_eq!(fs.free_blocks(), 1);
        // only one block left
        assert_eq!(fs.grow_chain(first, 10)?, 4);
        assert_eq!(fs.free_blocks(), 0);
        assert_eq!(fs.release_chain(first)?, 4);
        assert_eq!(fs.free_blocks(), 4);
        Ok(())
    }
}
