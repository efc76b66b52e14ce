use cgmath::Point3;

use crate::engine_state::{
    rendering::{atlas::UvRect, vertex::Vertex},
    voxels::block::block_side::BlockSide,
};

/// A single quad face of a voxel, in world space.
///
/// The four corners are named as seen from outside the block, looking at the face:
/// lower-left, lower-right, upper-left, upper-right. Emitting the two triangles
/// `ll, lr, ur` and `ll, ur, ul` gives counter-clockwise winding for every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub ll: Point3<i32>,
    pub lr: Point3<i32>,
    pub ul: Point3<i32>,
    pub ur: Point3<i32>,
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face on `block_side` of the voxel whose minimum corner is `voxel`.
    pub fn new(voxel: Point3<i32>, block_side: BlockSide) -> Self {
        let (x, y, z) = (voxel.x, voxel.y, voxel.z);
        let [ll, lr, ul, ur] = match block_side {
            BlockSide::TOP => [
                Point3::new(x, y + 1, z + 1),
                Point3::new(x + 1, y + 1, z + 1),
                Point3::new(x, y + 1, z),
                Point3::new(x + 1, y + 1, z),
            ],
            BlockSide::BOTTOM => [
                Point3::new(x, y, z),
                Point3::new(x + 1, y, z),
                Point3::new(x, y, z + 1),
                Point3::new(x + 1, y, z + 1),
            ],
            BlockSide::RIGHT => [
                Point3::new(x + 1, y, z + 1),
                Point3::new(x + 1, y, z),
                Point3::new(x + 1, y + 1, z + 1),
                Point3::new(x + 1, y + 1, z),
            ],
            BlockSide::LEFT => [
                Point3::new(x, y, z),
                Point3::new(x, y, z + 1),
                Point3::new(x, y + 1, z),
                Point3::new(x, y + 1, z + 1),
            ],
            BlockSide::FRONT => [
                Point3::new(x, y, z + 1),
                Point3::new(x + 1, y, z + 1),
                Point3::new(x, y + 1, z + 1),
                Point3::new(x + 1, y + 1, z + 1),
            ],
            BlockSide::BACK => [
                Point3::new(x + 1, y, z),
                Point3::new(x, y, z),
                Point3::new(x + 1, y + 1, z),
                Point3::new(x, y + 1, z),
            ],
        };
        Face {
            ll,
            lr,
            ul,
            ur,
            block_side,
        }
    }

    /// Expands the quad into two triangles textured with `uv`.
    pub fn vertices(&self, uv: UvRect) -> [Vertex; 6] {
        let ll = Vertex::new(to_f32(self.ll), [uv.u_min, uv.v_min]);
        let lr = Vertex::new(to_f32(self.lr), [uv.u_max, uv.v_min]);
        let ul = Vertex::new(to_f32(self.ul), [uv.u_min, uv.v_max]);
        let ur = Vertex::new(to_f32(self.ur), [uv.u_max, uv.v_max]);
        [ll, lr, ur, ll, ur, ul]
    }
}

fn to_f32(point: Point3<i32>) -> [f32; 3] {
    [point.x as f32, point.y as f32, point.z as f32]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn as_vector(vertex: &Vertex) -> Vector3<f32> {
        Vector3::new(vertex.position[0], vertex.position[1], vertex.position[2])
    }

    #[test]
    fn triangles_face_outwards() {
        let uv = UvRect {
            u_min: 0.0,
            u_max: 1.0,
            v_min: 0.0,
            v_max: 1.0,
        };
        for side in BlockSide::all() {
            let vertices = Face::new(Point3::new(3, -2, 7), side).vertices(uv);
            let normal = side.normal().cast::<f32>().unwrap();
            for triangle in vertices.chunks(3) {
                let a = as_vector(&triangle[0]);
                let b = as_vector(&triangle[1]);
                let c = as_vector(&triangle[2]);
                let winding = (b - a).cross(c - a).normalize();
                assert!(
                    (winding - normal).magnitude() < 1e-5,
                    "{side:?} winds towards {winding:?}"
                );
            }
        }
    }

    #[test]
    fn faces_lie_on_their_side_of_the_cube() {
        let voxel = Point3::new(0, 0, 0);
        let top = Face::new(voxel, BlockSide::TOP);
        assert!([top.ll, top.lr, top.ul, top.ur].iter().all(|p| p.y == 1));
        let left = Face::new(voxel, BlockSide::LEFT);
        assert!([left.ll, left.lr, left.ul, left.ur].iter().all(|p| p.x == 0));
        let front = Face::new(voxel, BlockSide::FRONT);
        assert!([front.ll, front.lr, front.ul, front.ur].iter().all(|p| p.z == 1));
    }

    #[test]
    fn corners_carry_the_matching_uv_corner() {
        let uv = UvRect {
            u_min: 0.1,
            u_max: 0.9,
            v_min: 0.2,
            v_max: 0.3,
        };
        let vertices = Face::new(Point3::new(0, 0, 0), BlockSide::BACK).vertices(uv);
        assert_eq!(vertices[0].tex_coords, [0.1, 0.2]);
        assert_eq!(vertices[1].tex_coords, [0.9, 0.2]);
        assert_eq!(vertices[2].tex_coords, [0.9, 0.3]);
        assert_eq!(vertices[5].tex_coords, [0.1, 0.3]);
    }
}
