use std::collections::VecDeque;

use bitvec::prelude::*;
use log::trace;

use super::BlockIndex;

/// keeps track of free data blocks
///
/// free blocks are handed out in FIFO order: the block released first is
/// the first one to be reused.
#[derive(Debug, Default)]
pub struct BlockManager {
    free_list: VecDeque<BlockIndex>,
    /// a set bit means the block is free
    free_map: BitVec<u8, Lsb0>,
}

impl BlockManager {
    /// create a manager where every block in `0..block_count` is free
    pub fn new(block_count: u32) -> Self {
        BlockManager {
            free_list: (0..block_count).collect(),
            free_map: BitVec::repeat(true, block_count as usize),
        }
    }
}

/// for data block allocation
impl BlockManager {
    /// take a free block out of the pool
    pub fn acquire(&mut self) -> Option<BlockIndex> {
        let index = self.free_list.pop_front()?;
        self.free_map.set(index as usize, false);
        trace!("acquired block {index}, {} blocks left", self.free_list.len());
        Some(index)
    }

    /// return a block to the pool
    /// # Params
    /// - `index`: a block which is allocated and no longer referenced by any chain
    pub fn release(&mut self, index: BlockIndex) {
        debug_assert!(
            !self.is_free(index),
            "block {index} released while already free"
        );
        self.free_map.set(index as usize, true);
        self.free_list.push_back(index);
        trace!("released block {index}");
    }

    /// check if a block is currently in the free pool
    pub fn is_free(&self, index: BlockIndex) -> bool {
        self.free_map
            .get(index as usize)
            .as_deref()
            .copied()
            .unwrap_or(false)
    }

    /// calculate the number of free blocks
    pub fn free_blocks(&self) -> usize {
        self.free_list.len()
    }

    /// total number of blocks managed
    pub fn capacity(&self) -> usize {
        self.free_map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_in_order() {
        let mut manager = BlockManager::new(3);
        assert_eq!(manager.acquire(), Some(0));
        assert_eq!(manager.acquire(), Some(1));
        assert_eq!(manager.acquire(), Some(2));
        assert_eq!(manager.acquire(), None);
        assert_eq!(manager.free_blocks(), 0);
    }

    #[test]
    fn test_release_is_fifo() {
        let mut manager = BlockManager::new(4);
        let a = manager.acquire().unwrap();
        let b = manager.acquire().unwrap();
        manager.release(b);
        manager.release(a);
        // 2 and 3 were never handed out, so they come first
        assert_eq!(manager.acquire(), Some(2));
        assert_eq!(manager.acquire(), Some(3));
        assert_eq!(manager.acquire(), Some(b));
        assert_eq!(manager.acquire(), Some(a));
    }

    #[test]
    fn test_is_free() {
        let mut manager = BlockManager::new(2);
        assert!(manager.is_free(0));
        let block = manager.acquire().unwrap();
        assert!(!manager.is_free(block));
        assert!(manager.is_free(1));
        // out of range is never free
        assert!(!manager.is_free(2));
        manager.release(block);
        assert!(manager.is_free(block));
    }

    #[test]
    fn test_conservation() {
        let mut manager = BlockManager::new(16);
        let mut held = Vec::new();
        for round in 0..40 {
            if round % 3 == 2 {
                if let Some(block) = held.pop() {
                    manager.release(block);
                }
            } else if let Some(block) = manager.acquire() {
                held.push(block);
            }
            assert_eq!(manager.free_blocks() + held.len(), manager.capacity());
            assert!(held.iter().all(|b| !manager.is_free(*b)));
        }
    }
}
