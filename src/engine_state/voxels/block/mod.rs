//! # Block Module
//!
//! This module provides the block-related definitions of the voxel engine: block
//! types, block faces, tools, dropped items and the static [`BlockRegistry`] that
//! answers every per-type question (passability, break time, atlas rows, drops).

use block_type::BlockType;

pub mod block_side;
pub mod block_type;
pub mod item;
pub mod registry;
pub mod tool;

pub use block_side::BlockSide;
pub use item::ItemType;
pub use registry::{BlockDefinition, BlockFamily, BlockRegistry, BreakTime};
pub use tool::{HeldTool, ToolFamily, ToolTier};

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Maps each block type to its atlas row for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array contains 6 atlas rows, one for each face in the order:
/// [Front, Back, Bottom, Top, Left, Right]
///
/// Row numbers refer to `rendering::atlas::ATLAS_ROWS`.
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[usize; 6]; BlockType::ALL.len()] = [
    [0, 0, 2, 1, 0, 0],       // GRASS (top: grass_top, bottom: dirt, sides: grass)
    [2, 2, 2, 2, 2, 2],       // DIRT
    [3, 3, 3, 3, 3, 3],       // STONE
    [4, 4, 4, 4, 4, 4],       // WOOD
    [5, 5, 6, 6, 5, 5],       // LOG (rings on top and bottom)
    [7, 7, 7, 7, 7, 7],       // LEAVES
    [8, 8, 8, 8, 8, 8],       // BEDROCK
    [11, 9, 4, 10, 9, 9],     // CRAFTING_TABLE (front, top, planks underneath)
    [12, 12, 12, 12, 12, 12], // COAL_ORE
    [13, 13, 13, 13, 13, 13], // IRON_ORE
    [14, 14, 14, 14, 14, 14], // DIAMOND_ORE
    [15, 15, 15, 15, 15, 15], // WOOL
    [16, 16, 16, 16, 16, 16], // GLASS
];
