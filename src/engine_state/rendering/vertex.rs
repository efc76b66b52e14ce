//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format the mesher emits and the render glue uploads.

/// A vertex in the voxel rendering pipeline.
///
/// Represents a single point in world space with its atlas texture coordinate.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 20 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// World-space position
    pub position: [f32; 3],
    /// UV coordinates into the block atlas (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Size of one vertex in bytes, for building vertex buffer layouts.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    pub fn new(position: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Vertex {
            position,
            tex_coords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 20);
        let vertices = [Vertex::new([1.0, 2.0, 3.0], [0.5, 0.25])];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 20);
    }
}
