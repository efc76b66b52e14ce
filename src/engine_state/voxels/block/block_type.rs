//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion between
//! the enum, its compact numeric id and its string name.

use std::fmt;

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// Air is not a block type: an empty coordinate is simply absent from the
/// [`VoxelStore`](crate::engine_state::voxels::store::VoxelStore).
///
/// The `FromPrimitive` derive allows conversion from the compact `BlockTypeSize` id,
/// which is what glue code and debug tooling pass around.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum BlockType {
    /// Topsoil. Green top, grassy sides, dirt underneath.
    Grass,
    /// Subsoil below the grass layer.
    Dirt,
    /// Generic underground filler.
    Stone,
    /// Wooden planks.
    Wood,
    /// Tree trunk. Ring texture on top and bottom, bark on the sides.
    Log,
    /// Tree canopy. Passable and rendered on the transparent pass.
    Leaves,
    /// The unbreakable world floor.
    Bedrock,
    /// Crafting table with a distinct front, top and side.
    CraftingTable,
    CoalOre,
    IronOre,
    /// The rarest ore, only generated deep underground.
    DiamondOre,
    Wool,
    /// A second passable block, rendered on the transparent pass.
    Glass,
}

/// Name lookup used by `BlockType::from_name`.
static BLOCK_TYPE_BY_NAME: phf::Map<&'static str, BlockType> = phf::phf_map! {
    "grass" => BlockType::Grass,
    "dirt" => BlockType::Dirt,
    "stone" => BlockType::Stone,
    "wood" => BlockType::Wood,
    "log" => BlockType::Log,
    "leaves" => BlockType::Leaves,
    "bedrock" => BlockType::Bedrock,
    "crafting_table" => BlockType::CraftingTable,
    "coal_ore" => BlockType::CoalOre,
    "iron_ore" => BlockType::IronOre,
    "diamond_ore" => BlockType::DiamondOre,
    "wool" => BlockType::Wool,
    "glass" => BlockType::Glass,
};

impl BlockType {
    /// Every block type, in id order.
    pub const ALL: [BlockType; 13] = [
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::Wood,
        BlockType::Log,
        BlockType::Leaves,
        BlockType::Bedrock,
        BlockType::CraftingTable,
        BlockType::CoalOre,
        BlockType::IronOre,
        BlockType::DiamondOre,
        BlockType::Wool,
        BlockType::Glass,
    ];

    /// Converts a compact id back into a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id does not name a block type.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// The compact id of this block type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Looks a block type up by its snake_case name (e.g. `"coal_ore"`).
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_TYPE_BY_NAME.get(name).copied()
    }

    /// The snake_case name of this block type.
    pub fn name(self) -> &'static str {
        match self {
            BlockType::Grass => "grass",
            BlockType::Dirt => "dirt",
            BlockType::Stone => "stone",
            BlockType::Wood => "wood",
            BlockType::Log => "log",
            BlockType::Leaves => "leaves",
            BlockType::Bedrock => "bedrock",
            BlockType::CraftingTable => "crafting_table",
            BlockType::CoalOre => "coal_ore",
            BlockType::IronOre => "iron_ore",
            BlockType::DiamondOre => "diamond_ore",
            BlockType::Wool => "wool",
            BlockType::Glass => "glass",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
