pub mod objects;
pub mod reader;
pub mod terrain;

mod atomic;

pub use objects::{export_object_coordinates, render_object_coordinates};
pub use reader::{read_object_coordinates, read_terrain_coordinates, ObjectPlacement, TerrainPoint};
pub use terrain::{export_terrain_coordinates, render_terrain_coordinates};

pub const DEFAULT_TERRAIN_FILE: &str = "terrain_coordinates.txt";
pub const DEFAULT_OBJECT_FILE: &str = "object_coordinates.txt";

/// Options controlling the text export format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Decimal places for terrain sample heights.
    pub terrain_precision: usize,
    /// Decimal places for object position, rotation and scale.
    pub object_precision: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            terrain_precision: 1,
            object_precision: 2,
        }
    }
}
