//! Items produced when blocks are broken.

use std::fmt;

use super::block_type::BlockType;

/// Something that can be dropped into the world and picked up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// A placeable block.
    Block(BlockType),
    Coal,
    IronIngot,
    Diamond,
    /// Occasional bonus drop from leaves.
    Apple,
}

impl ItemType {
    pub fn name(self) -> &'static str {
        match self {
            ItemType::Block(block_type) => block_type.name(),
            ItemType::Coal => "coal",
            ItemType::IronIngot => "iron_ingot",
            ItemType::Diamond => "diamond",
            ItemType::Apple => "apple",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
