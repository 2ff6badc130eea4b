use log::{debug, info};

use super::{
    is_valid_name, parse_path, Attributes, FileSystem, FsError, FsResult, Node, NodeId, NodeKind,
    ParsedPath,
};
use crate::utils::fs_size_calculator::block_of;

/// create and delete nodes
impl FileSystem {
    /// create an empty file, it owns one block right away
    pub fn create_file(&mut self, path: &str) -> FsResult<NodeId> {
        info!("create_file() called with path: {path:?}");
        let parsed = parse_path(path);
        let (parent, name) = self.new_entry(&parsed)?;
        let block = self.allocate_first_block()?;
        match self.attach(Node::new(name, parent, NodeKind::file(block))) {
            Ok(id) => {
                debug!("file {path:?} starts at block {block}");
                Ok(id)
            }
            Err(e) => {
                self.release_chain(block)?;
                Err(e)
            }
        }
    }

    pub fn create_folder(&mut self, path: &str) -> FsResult<NodeId> {
        info!("create_folder() called with path: {path:?}");
        let parsed = parse_path(path);
        let (parent, name) = self.new_entry(&parsed)?;
        self.attach(Node::new(name, parent, NodeKind::folder()))
    }

    /// check that `path` names a free slot in an existing folder
    fn new_entry<'p>(&self, path: &'p ParsedPath) -> FsResult<(NodeId, &'p str)> {
        let (parent, name) = self.resolve_parent(path)?;
        if !is_valid_name(name) {
            return Err(FsError::InvalidName);
        }
        if self.child_named(parent, name)?.is_some() {
            return Err(FsError::AlreadyExists);
        }
        Ok((parent, name))
    }

    /// delete a file and give its whole block chain back
    pub fn delete_file(&mut self, id: NodeId) -> FsResult<()> {
        info!("delete_file() called with node: {id:?}");
        let node = self.node(id)?;
        let first_block = node.first_block().ok_or(FsError::NotAFile)?;
        if node.attributes.is_locked() {
            return Err(FsError::PermissionDenied);
        }
        let released = self.release_chain(first_block)?;
        debug!("released {released} blocks of {:?}", node_name(self, id));
        self.detach(id).map(|_| ())
    }

    /// delete an empty folder
    pub fn delete_folder(&mut self, id: NodeId) -> FsResult<()> {
        info!("delete_folder() called with node: {id:?}");
        let node = self.node(id)?;
        let children = node.children().ok_or(FsError::NotAFolder)?;
        if !children.is_empty() {
            return Err(FsError::NotEmpty);
        }
        if node.attributes.is_locked() {
            return Err(FsError::PermissionDenied);
        }
        if node.parent == id || self.node(node.parent).is_err() {
            return Err(FsError::InvalidNode);
        }
        self.detach(id).map(|_| ())
    }

    /// delete a folder and everything below it, depth first
    ///
    /// The first failure stops the walk, whatever was deleted before it
    /// stays deleted.
    pub fn delete_folder_recursive(&mut self, id: NodeId) -> FsResult<()> {
        info!("delete_folder_recursive() called with node: {id:?}");
        let children = self.children(id)?.to_vec();
        if id.is_root() {
            return Err(FsError::InvalidNode);
        }
        if self.node(id)?.attributes.is_locked() {
            return Err(FsError::PermissionDenied);
        }
        for child in children {
            let grandchildren = self.node(child)?.children().map(<[NodeId]>::len);
            match grandchildren {
                Some(0) => self.delete_folder(child)?,
                Some(_) => self.delete_folder_recursive(child)?,
                None => self.delete_file(child)?,
            }
        }
        self.delete_folder(id)
    }

    /// delete whatever `path` points at
    ///
    /// A non-empty folder is only deleted, recursively, if `confirm`
    /// agrees. It is asked once, with the path of the folder.
    /// # Return
    /// `false` if `confirm` declined and nothing was deleted
    pub fn remove(&mut self, path: &str, mut confirm: impl FnMut(&str) -> bool) -> FsResult<bool> {
        info!("remove() called with path: {path:?}");
        let id = self.lookup(path)?;
        if self.node(id)?.is_file() {
            return self.delete_file(id).map(|_| true);
        }
        match self.delete_folder(id) {
            Err(FsError::NotEmpty) => {
                if !confirm(&self.path_of(id)?) {
                    return Ok(false);
                }
                self.delete_folder_recursive(id).map(|_| true)
            }
            result => result.map(|_| true),
        }
    }
}

/// open, close and move around
impl FileSystem {
    /// find a file, its cursor starts at 0
    pub fn open_file(&mut self, path: &str) -> FsResult<NodeId> {
        info!("open_file() called with path: {path:?}");
        let id = self.lookup(path)?;
        self.seek(id, 0)?;
        Ok(id)
    }

    pub fn open_folder(&self, path: &str) -> FsResult<NodeId> {
        info!("open_folder() called with path: {path:?}");
        let id = self.lookup(path)?;
        if !self.node(id)?.is_folder() {
            return Err(FsError::NotAFolder);
        }
        Ok(id)
    }

    /// make a folder the current working folder
    pub fn change_folder(&mut self, path: &str) -> FsResult<NodeId> {
        info!("change_folder() called with path: {path:?}");
        let id = self.open_folder(path)?;
        self.current = id;
        Ok(id)
    }

    pub fn close_file(&mut self, id: NodeId) -> FsResult<()> {
        info!("close_file() called with node: {id:?}");
        self.seek(id, 0)
    }

    /// move the cursor of a file, it may point past the end
    pub fn seek(&mut self, id: NodeId, position: u64) -> FsResult<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::File { cursor, .. } => {
                *cursor = position;
                Ok(())
            }
            NodeKind::Folder { .. } => Err(FsError::NotAFile),
        }
    }
}

/// read and write data in a file
impl FileSystem {
    /// read up to `size` units from the cursor, never past the end of the file
    /// # Return
    /// the number of units read, the cursor moves by the same amount
    pub fn read_file(&mut self, id: NodeId, size: u64) -> FsResult<u64> {
        info!("read_file() called with node: {id:?}, size: {size}");
        let block_size = self.block_size() as u64;
        let NodeKind::File {
            first_block,
            size: file_size,
            cursor,
        } = self.node(id)?.kind
        else {
            return Err(FsError::NotAFile);
        };

        let end = cursor.saturating_add(size).min(file_size);
        if cursor >= end {
            return Ok(0);
        }
        let first_index = block_of(cursor, self.block_size());
        let mut block = self
            .alloc_table
            .nth(first_block, first_index)
            .ok_or(FsError::ChainCorrupt)?;
        // first position past the current block
        let mut boundary = (first_index + 1) * block_size;
        let mut result = Ok(());
        while boundary < end {
            match self.alloc_table.next(block) {
                Some(next) => {
                    debug!("read reached position {boundary}, moving from block {block} to {next}");
                    block = next;
                    boundary += block_size;
                }
                None => {
                    debug!("chain of {id:?} ends at block {block}, position {boundary}");
                    result = Err(FsError::ChainCorrupt);
                    break;
                }
            }
        }

        let stopped_at = if result.is_ok() { end } else { boundary };
        self.seek(id, stopped_at)?;
        result.map(|_| stopped_at - cursor)
    }

    /// write `size` units at the cursor, growing the chain as needed
    ///
    /// Blocks allocated before running out of space stay with the file,
    /// and size and cursor stop at the last position backed by a block.
    /// # Return
    /// the number of units written
    pub fn write_file(&mut self, id: NodeId, size: u64) -> FsResult<u64> {
        info!("write_file() called with node: {id:?}, size: {size}");
        let block_size = self.block_size() as u64;
        let node = self.node(id)?;
        let NodeKind::File {
            first_block,
            size: file_size,
            cursor,
        } = node.kind
        else {
            return Err(FsError::NotAFile);
        };
        if file_size == 0 {
            return Err(FsError::EmptyFile);
        }
        if node.attributes.is_locked() {
            return Err(FsError::PermissionDenied);
        }
        if size == 0 {
            return Ok(0);
        }

        let end = cursor.saturating_add(size);
        let wanted = self.blocks_for(end);
        let blocks = self.grow_chain(first_block, wanted)?;
        let reached = end.min(blocks.saturating_mul(block_size));

        let node = self.node_mut(id)?;
        if let NodeKind::File {
            size: file_size,
            cursor: file_cursor,
            ..
        } = &mut node.kind
        {
            *file_size = (*file_size).max(reached);
            *file_cursor = (*file_cursor).max(reached);
        }
        node.update_modified_at();

        if blocks < wanted {
            return Err(FsError::OutOfSpace);
        }
        Ok(end - cursor)
    }
}

/// attributes and names
impl FileSystem {
    pub fn get_attributes(&self, id: NodeId) -> FsResult<Attributes> {
        Ok(self.node(id)?.attributes)
    }

    /// replace all four attributes, refused while `system` is set
    pub fn set_attributes(&mut self, id: NodeId, attributes: Attributes) -> FsResult<()> {
        info!("set_attributes() called with node: {id:?}, attributes: {attributes}");
        let node = self.node_mut(id)?;
        if node.attributes.system {
            return Err(FsError::PermissionDenied);
        }
        node.attributes = attributes;
        node.update_modified_at();
        Ok(())
    }

    pub fn rename(&mut self, id: NodeId, name: &str) -> FsResult<()> {
        info!("rename() called with node: {id:?}, name: {name:?}");
        let node = self.node(id)?;
        if node.attributes.is_locked() {
            return Err(FsError::PermissionDenied);
        }
        if id.is_root() {
            return Err(FsError::InvalidNode);
        }
        if !is_valid_name(name) {
            return Err(FsError::InvalidName);
        }
        if node.name == name {
            return Ok(());
        }
        if self.child_named(node.parent, name)?.is_some() {
            return Err(FsError::AlreadyExists);
        }
        let node = self.node_mut(id)?;
        node.name = name.to_owned();
        node.update_modified_at();
        Ok(())
    }
}

fn node_name(fs: &FileSystem, id: NodeId) -> &str {
    fs.node(id).map_or("?", |node| node.name.as_str())
}
