//! # Block Atlas Layout
//!
//! Every block texture lives in a single image: a vertical strip with one fixed-height
//! row per named sub-texture. A block face references its row by index.
//!
//! UV rectangles span the full row width, inset by a small padding on both axes so
//! that filtering and mipmapping never sample the neighbouring row.

/// Atlas rows, top to bottom.
pub const ATLAS_ROWS: [&str; 17] = [
    "grass",
    "grass_top",
    "dirt",
    "stone",
    "wood",
    "log",
    "log_top",
    "leaves",
    "bedrock",
    "crafting_table",
    "crafting_table_top",
    "crafting_table_front",
    "coal_ore",
    "iron_ore",
    "diamond_ore",
    "wool",
    "glass",
];

static ATLAS_ROW_BY_NAME: phf::Map<&'static str, usize> = phf::phf_map! {
    "grass" => 0,
    "grass_top" => 1,
    "dirt" => 2,
    "stone" => 3,
    "wood" => 4,
    "log" => 5,
    "log_top" => 6,
    "leaves" => 7,
    "bedrock" => 8,
    "crafting_table" => 9,
    "crafting_table_top" => 10,
    "crafting_table_front" => 11,
    "coal_ore" => 12,
    "iron_ore" => 13,
    "diamond_ore" => 14,
    "wool" => 15,
    "glass" => 16,
};

/// Looks up an atlas row by texture name.
pub fn row_index(name: &str) -> Option<usize> {
    ATLAS_ROW_BY_NAME.get(name).copied()
}

/// A UV rectangle inside the atlas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UvRect {
    pub u_min: f32,
    pub u_max: f32,
    pub v_min: f32,
    pub v_max: f32,
}

/// Geometry of the atlas strip.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtlasLayout {
    row_count: usize,
    padding: f32,
}

impl AtlasLayout {
    pub fn new(row_count: usize, padding: f32) -> Self {
        AtlasLayout { row_count, padding }
    }

    /// The layout of the standard block atlas.
    pub fn standard(padding: f32) -> Self {
        Self::new(ATLAS_ROWS.len(), padding)
    }

    /// Height of one row in UV units.
    pub fn row_height(&self) -> f32 {
        1.0 / self.row_count as f32
    }

    /// UV rectangle of `row`, counted from the top of the image.
    ///
    /// `v` grows upwards, so row 0 occupies the top of UV space.
    pub fn uv_rect(&self, row: usize) -> UvRect {
        let row_height = self.row_height();
        let row = row as f32;
        UvRect {
            u_min: self.padding,
            u_max: 1.0 - self.padding,
            v_min: 1.0 - (row + 1.0) * row_height + self.padding,
            v_max: 1.0 - row * row_height - self.padding,
        }
    }
}
