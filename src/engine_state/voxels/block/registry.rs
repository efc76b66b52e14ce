//! # Block Registry
//!
//! Static, immutable metadata for every [`BlockType`]. The registry is built once at
//! startup and shared (behind an `Arc`) with the mesh workers, which only ever read it.

use std::time::Duration;

use super::{
    block_side::BlockSide,
    block_type::BlockType,
    item::ItemType,
    tool::{break_time_factor, HeldTool, ToolFamily},
    BLOCK_TYPE_TO_TEXTURE_INDICES,
};

/// Coarse category of a block, used where behaviour depends on what a block *is*
/// rather than on its exact type (leaf decay, trunk support, ore drops).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockFamily {
    Terrain,
    /// Supports nearby foliage against decay.
    Trunk,
    /// Decays when no trunk is close enough.
    Foliage,
    /// Drops its processed material instead of itself.
    Ore,
    Crafted,
    Transparent,
    Bedrock,
}

/// How long a block takes to break.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BreakTime {
    Finite(Duration),
    Unbreakable,
}

impl BreakTime {
    /// The finite duration, or `None` for unbreakable blocks.
    pub fn duration(self) -> Option<Duration> {
        match self {
            BreakTime::Finite(duration) => Some(duration),
            BreakTime::Unbreakable => None,
        }
    }

    pub fn is_unbreakable(self) -> bool {
        matches!(self, BreakTime::Unbreakable)
    }
}

/// Registry entry for one block type.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockDefinition {
    pub block_type: BlockType,
    pub family: BlockFamily,
    /// Does not block movement and is meshed on the transparent pass.
    pub passable: bool,
    /// Break time with no tool modifiers applied.
    pub base_break_time: BreakTime,
    pub preferred_tool: Option<ToolFamily>,
    /// Atlas row per face, in `BlockSide` order.
    pub texture_indices: [usize; 6],
    /// What breaking this block drops.
    pub drop: ItemType,
}

/// Metadata table for every block type.
///
/// # Examples
///
/// ```
/// use blockworld::engine_state::voxels::block::{BlockRegistry, BlockSide, block_type::BlockType};
///
/// let registry = BlockRegistry::standard();
/// assert!(registry.is_passable(BlockType::Leaves));
/// assert_ne!(
///     registry.atlas_face_index(BlockType::Grass, BlockSide::TOP),
///     registry.atlas_face_index(BlockType::Grass, BlockSide::FRONT),
/// );
/// ```
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    definitions: Vec<BlockDefinition>,
}

fn seconds(secs: f64) -> BreakTime {
    BreakTime::Finite(Duration::from_secs_f64(secs))
}

impl BlockRegistry {
    /// Builds the registry with the standard block catalogue.
    pub fn standard() -> Self {
        let definitions = BlockType::ALL
            .into_iter()
            .map(Self::standard_definition)
            .collect();
        BlockRegistry { definitions }
    }

    fn standard_definition(block_type: BlockType) -> BlockDefinition {
        use BlockFamily::*;
        use ToolFamily::*;

        let (family, passable, base_break_time, preferred_tool, drop) = match block_type {
            BlockType::Grass => (Terrain, false, seconds(0.6), Some(Shovel), None),
            BlockType::Dirt => (Terrain, false, seconds(0.5), Some(Shovel), None),
            BlockType::Stone => (Terrain, false, seconds(1.5), Some(Pickaxe), None),
            BlockType::Wood => (Crafted, false, seconds(1.0), Some(Axe), None),
            BlockType::Log => (Trunk, false, seconds(1.2), Some(Axe), None),
            BlockType::Leaves => (Foliage, true, seconds(0.2), None, None),
            BlockType::Bedrock => (Bedrock, false, BreakTime::Unbreakable, Some(Pickaxe), None),
            BlockType::CraftingTable => (Crafted, false, seconds(1.25), Some(Axe), None),
            BlockType::CoalOre => (Ore, false, seconds(2.0), Some(Pickaxe), Some(ItemType::Coal)),
            BlockType::IronOre => (
                Ore,
                false,
                seconds(2.5),
                Some(Pickaxe),
                Some(ItemType::IronIngot),
            ),
            BlockType::DiamondOre => (
                Ore,
                false,
                seconds(3.0),
                Some(Pickaxe),
                Some(ItemType::Diamond),
            ),
            BlockType::Wool => (Crafted, false, seconds(0.8), None, None),
            BlockType::Glass => (Transparent, true, seconds(0.3), None, None),
        };

        BlockDefinition {
            block_type,
            family,
            passable,
            base_break_time,
            preferred_tool,
            texture_indices: BLOCK_TYPE_TO_TEXTURE_INDICES[block_type as usize],
            drop: drop.unwrap_or(ItemType::Block(block_type)),
        }
    }

    /// The full definition of a block type.
    pub fn get(&self, block_type: BlockType) -> &BlockDefinition {
        &self.definitions[block_type as usize]
    }

    pub fn is_passable(&self, block_type: BlockType) -> bool {
        self.get(block_type).passable
    }

    pub fn family(&self, block_type: BlockType) -> BlockFamily {
        self.get(block_type).family
    }

    pub fn is_foliage(&self, block_type: BlockType) -> bool {
        self.family(block_type) == BlockFamily::Foliage
    }

    pub fn is_trunk(&self, block_type: BlockType) -> bool {
        self.family(block_type) == BlockFamily::Trunk
    }

    /// What breaking a block of this type drops.
    pub fn drop_for(&self, block_type: BlockType) -> ItemType {
        self.get(block_type).drop
    }

    /// Atlas row used for one face of a block type.
    pub fn atlas_face_index(&self, block_type: BlockType, side: BlockSide) -> usize {
        self.get(block_type).texture_indices[side as usize]
    }

    /// How long breaking `block_type` takes while holding `held_tool`.
    ///
    /// # Arguments
    /// * `block_type` - The block being broken
    /// * `held_tool` - Identifier of the held item, `None` for an empty hand. Items that
    ///   are not tools count as an empty hand.
    ///
    /// # Returns
    /// `BreakTime::Unbreakable` for unbreakable blocks, otherwise the base time scaled
    /// by the tool rules in [`break_time_factor`].
    pub fn break_time(&self, block_type: BlockType, held_tool: Option<&str>) -> BreakTime {
        let definition = self.get(block_type);
        match definition.base_break_time {
            BreakTime::Unbreakable => BreakTime::Unbreakable,
            BreakTime::Finite(base) => {
                let held = held_tool.and_then(HeldTool::parse);
                let factor = break_time_factor(definition.preferred_tool, held);
                BreakTime::Finite(base.mul_f64(factor))
            }
        }
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(time: BreakTime) -> f64 {
        time.duration().expect("breakable").as_secs_f64()
    }

    #[test]
    fn stone_break_times_follow_tool_rules() {
        let registry = BlockRegistry::standard();

        let iron = secs(registry.break_time(BlockType::Stone, Some("iron_pickaxe")));
        let bare = secs(registry.break_time(BlockType::Stone, None));
        let wrong = secs(registry.break_time(BlockType::Stone, Some("iron_shovel")));

        assert!((iron - 0.3).abs() < 1e-6);
        assert!((bare - 2.25).abs() < 1e-6);
        assert!((wrong - 1.5).abs() < 1e-6);
    }

    #[test]
    fn tiers_scale_matching_tools() {
        let registry = BlockRegistry::standard();
        let wood = secs(registry.break_time(BlockType::Log, Some("wooden_axe")));
        let diamond = secs(registry.break_time(BlockType::Log, Some("diamond_axe")));
        assert!((wood - 0.4).abs() < 1e-6);
        assert!((diamond - 0.15).abs() < 1e-6);
    }

    #[test]
    fn bedrock_is_unbreakable_with_any_tool() {
        let registry = BlockRegistry::standard();
        assert!(registry.break_time(BlockType::Bedrock, None).is_unbreakable());
        assert!(registry
            .break_time(BlockType::Bedrock, Some("diamond_pickaxe"))
            .is_unbreakable());
    }

    #[test]
    fn ores_drop_processed_material() {
        let registry = BlockRegistry::standard();
        assert_eq!(registry.drop_for(BlockType::CoalOre), ItemType::Coal);
        assert_eq!(registry.drop_for(BlockType::IronOre), ItemType::IronIngot);
        assert_eq!(registry.drop_for(BlockType::DiamondOre), ItemType::Diamond);
        assert_eq!(
            registry.drop_for(BlockType::Stone),
            ItemType::Block(BlockType::Stone)
        );
    }

    #[test]
    fn multi_textured_blocks_resolve_per_face() {
        let registry = BlockRegistry::standard();
        assert_eq!(registry.atlas_face_index(BlockType::Grass, BlockSide::TOP), 1);
        assert_eq!(registry.atlas_face_index(BlockType::Grass, BlockSide::BOTTOM), 2);
        assert_eq!(registry.atlas_face_index(BlockType::Grass, BlockSide::LEFT), 0);
        assert_eq!(
            registry.atlas_face_index(BlockType::CraftingTable, BlockSide::FRONT),
            11
        );
        assert_eq!(
            registry.atlas_face_index(BlockType::CraftingTable, BlockSide::TOP),
            10
        );
        assert_eq!(
            registry.atlas_face_index(BlockType::CraftingTable, BlockSide::BACK),
            9
        );
    }

    #[test]
    fn only_leaves_and_glass_are_passable() {
        let registry = BlockRegistry::standard();
        let passable: Vec<_> = BlockType::ALL
            .into_iter()
            .filter(|block_type| registry.is_passable(*block_type))
            .collect();
        assert_eq!(passable, vec![BlockType::Leaves, BlockType::Glass]);
    }
}
