//! our simulated filesystem
pub mod alloc_table;
pub mod block_manager;
pub mod error;
pub mod filekind;
pub mod fs_layout;
pub mod node;
pub mod path;
mod fs_api_impl;
pub use alloc_table::*;
pub use block_manager::*;
pub use error::*;
pub use filekind::*;
pub use fs_layout::*;
pub use node::*;
pub use path::*;

/// index of a data block, also an index into the [AllocTable]
pub type BlockIndex = u32;

/// 131072 blocks of 1 KiB each, 128 MiB in total
pub const MAX_BLOCK_COUNT: u32 = 131072;
pub const BLOCK_SIZE: u32 = 1024;
pub const ROOT_NODE: NodeId = NodeId(0);
pub const ROOT_NAME: &str = "root";
pub const PATH_SEPARATOR: char = '/';
/// marks the end of a block chain in the [AllocTable]
const FAT_END: BlockIndex = BlockIndex::MAX;
