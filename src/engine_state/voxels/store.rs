//! # Voxel Store
//!
//! The single source of truth for world contents: a sparse map from integer voxel
//! coordinates to block types. A coordinate that is not in the map is air.
//!
//! The store does no bounds checking. World extent is a convention callers apply
//! themselves (terrain generation only writes inside the configured square).

use std::collections::{hash_map, HashMap};

use cgmath::Point3;

use super::block::block_type::BlockType;

/// Integer coordinate of a single voxel.
pub type VoxelCoordinate = Point3<i32>;

/// Sparse voxel storage backed by a hash map.
///
/// # Examples
///
/// ```
/// use blockworld::engine_state::voxels::{block::block_type::BlockType, store::VoxelStore};
/// use cgmath::Point3;
///
/// let mut store = VoxelStore::new();
/// store.set(Point3::new(1, 2, 3), BlockType::Stone);
/// assert_eq!(store.get(Point3::new(1, 2, 3)), Some(BlockType::Stone));
/// store.remove(Point3::new(1, 2, 3));
/// assert!(!store.contains(Point3::new(1, 2, 3)));
/// ```
#[derive(Debug, Default, Clone)]
pub struct VoxelStore {
    voxels: HashMap<VoxelCoordinate, BlockType>,
}

impl VoxelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block at `coord`, or `None` for air.
    #[inline]
    pub fn get(&self, coord: VoxelCoordinate) -> Option<BlockType> {
        self.voxels.get(&coord).copied()
    }

    /// Writes `block_type` at `coord`, replacing whatever was there.
    ///
    /// # Returns
    /// The block type previously stored at `coord`, if any.
    pub fn set(&mut self, coord: VoxelCoordinate, block_type: BlockType) -> Option<BlockType> {
        self.voxels.insert(coord, block_type)
    }

    /// Removes the voxel at `coord` entirely, turning it back into air.
    ///
    /// # Returns
    /// The block type that was removed, if any.
    pub fn remove(&mut self, coord: VoxelCoordinate) -> Option<BlockType> {
        self.voxels.remove(&coord)
    }

    #[inline]
    pub fn contains(&self, coord: VoxelCoordinate) -> bool {
        self.voxels.contains_key(&coord)
    }

    /// Number of non-air voxels.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Iterates over every stored voxel in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (VoxelCoordinate, BlockType)> + '_ {
        self.voxels.iter().map(|(coord, block_type)| (*coord, *block_type))
    }

    /// Iterates over every occupied coordinate in unspecified order.
    pub fn coordinates(&self) -> hash_map::Keys<'_, VoxelCoordinate, BlockType> {
        self.voxels.keys()
    }
}
