//! Notifications produced by world mutations.
//!
//! The core buffers these and the game loop drains them once per frame to spawn
//! item drops, play sounds and update UI.

use crate::engine_state::voxels::{
    block::{block_type::BlockType, item::ItemType},
    store::VoxelCoordinate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    /// A block was written into an empty coordinate.
    BlockPlaced {
        position: VoxelCoordinate,
        block_type: BlockType,
    },
    /// A block was removed. `drop` is what the item spawner should create.
    BlockBroken {
        position: VoxelCoordinate,
        block_type: BlockType,
        drop: ItemType,
    },
    /// An extra drop rolled on top of the regular one.
    BonusDrop {
        position: VoxelCoordinate,
        item: ItemType,
    },
}

impl WorldEvent {
    pub fn position(&self) -> VoxelCoordinate {
        match self {
            WorldEvent::BlockPlaced { position, .. }
            | WorldEvent::BlockBroken { position, .. }
            | WorldEvent::BonusDrop { position, .. } => *position,
        }
    }
}
