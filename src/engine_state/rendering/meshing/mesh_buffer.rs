use crate::engine_state::rendering::{atlas::UvRect, vertex::Vertex};

use super::face::Face;

/// Which render pass a mesh belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshLayer {
    /// Opaque, single-sided, full collision.
    Solid,
    /// Transparent, double-sided.
    Passable,
}

/// Triangle-list geometry for one layer of one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffer {
    layer: MeshLayer,
    vertices: Vec<Vertex>,
}

impl MeshBuffer {
    pub fn new(layer: MeshLayer) -> Self {
        MeshBuffer {
            layer,
            vertices: Vec::new(),
        }
    }

    pub fn layer(&self) -> MeshLayer {
        self.layer
    }

    /// Appends the two triangles of `face`.
    pub fn push_face(&mut self, face: &Face, uv: UvRect) {
        self.vertices.extend_from_slice(&face.vertices(uv));
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.iter().map(|vertex| vertex.position)
    }

    pub fn uvs(&self) -> impl Iterator<Item = [f32; 2]> + '_ {
        self.vertices.iter().map(|vertex| vertex.tex_coords)
    }

    /// Number of quads in the buffer.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Raw vertex bytes, ready for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// The output of one mesh walk: both layers of a chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMeshData {
    pub solid: MeshBuffer,
    pub passable: MeshBuffer,
}

impl ChunkMeshData {
    pub fn layer_mut(&mut self, layer: MeshLayer) -> &mut MeshBuffer {
        match layer {
            MeshLayer::Solid => &mut self.solid,
            MeshLayer::Passable => &mut self.passable,
        }
    }
}

impl Default for ChunkMeshData {
    fn default() -> Self {
        ChunkMeshData {
            solid: MeshBuffer::new(MeshLayer::Solid),
            passable: MeshBuffer::new(MeshLayer::Passable),
        }
    }
}
