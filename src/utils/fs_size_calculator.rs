//! This module contains functions to calculate sizes of different fs components

/// calculate how many blocks a file of `size` units occupies
/// # Arguments
/// - `size`: the file size in content units
/// - `block_size`: the number of content units per block
/// # Return
/// the length of the file's block chain, a file always owns at least one block
/// # Example
/// ```
/// use fatsim::utils::fs_size_calculator::blocks_for;
/// assert_eq!(blocks_for(1, 1024), 1);
/// assert_eq!(blocks_for(1024, 1024), 1);
/// assert_eq!(blocks_for(1025, 1024), 2);
/// assert_eq!(blocks_for(2048, 1024), 2);
/// ```
pub const fn blocks_for(size: u64, block_size: u32) -> u64 {
    let blocks = size.div_ceil(block_size as u64);
    if blocks == 0 {
        1
    } else {
        blocks
    }
}

/// calculate which block of a chain holds a position
/// # Example
/// ```
/// use fatsim::utils::fs_size_calculator::block_of;
/// assert_eq!(block_of(0, 1024), 0);
/// assert_eq!(block_of(1023, 1024), 0);
/// assert_eq!(block_of(1024, 1024), 1);
/// ```
pub const fn block_of(position: u64, block_size: u32) -> u64 {
    position / block_size as u64
}

/// calculate how many content units `block_count` blocks hold
/// # Example
/// ```
/// use fatsim::utils::fs_size_calculator::capacity;
/// assert_eq!(capacity(131072, 1024), 128 << 20);
/// ```
pub const fn capacity(block_count: u64, block_size: u32) -> u64 {
    block_count * block_size as u64
}
