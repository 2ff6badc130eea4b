//! the file allocation table, the only place where chain topology lives

use super::{BlockIndex, FsError, FsResult, FAT_END};

#[derive(Debug, Default)]
pub struct AllocTable {
    blocks: Vec<BlockIndex>,
}

impl AllocTable {
    pub fn new(block_count: u32) -> Self {
        AllocTable {
            blocks: vec![FAT_END; block_count as usize],
        }
    }

    /// mark `index` as the last block of its chain
    pub fn terminate(&mut self, index: BlockIndex) {
        self.blocks[index as usize] = FAT_END;
    }

    /// make `next` the successor of `index`
    pub fn link(&mut self, index: BlockIndex, next: BlockIndex) {
        self.blocks[index as usize] = next;
    }

    /// successor of `index`, `None` at the end of a chain
    pub fn next(&self, index: BlockIndex) -> Option<BlockIndex> {
        match self.blocks[index as usize] {
            FAT_END => None,
            next => Some(next),
        }
    }

    /// collect a whole chain starting at `first`
    /// # Params
    /// - `limit`: the maximum number of blocks the chain may have, a longer walk means a cycle
    pub fn chain(&self, first: BlockIndex, limit: usize) -> FsResult<Vec<BlockIndex>> {
        let mut chain = vec![first];
        let mut current = first;
        while let Some(next) = self.next(current) {
            if chain.len() >= limit || next as usize >= self.blocks.len() {
                return Err(FsError::ChainCorrupt);
            }
            chain.push(next);
            current = next;
        }
        Ok(chain)
    }

    /// the `n`-th block of a chain, counted from 0
    pub fn nth(&self, first: BlockIndex, n: u64) -> Option<BlockIndex> {
        let mut current = first;
        for _ in 0..n {
            current = self.next(current)?;
        }
        Some(current)
    }
}
