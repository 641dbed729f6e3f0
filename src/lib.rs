//! Load `.fsm` terrain/scene files and export their heightmap samples and
//! object placements as plain-text coordinate reports.
//!
//! ```no_run
//! use std::path::Path;
//! use fsm_tools_lib::export::{self, ExportOptions};
//! use fsm_tools_lib::scene::fsm::load_fsm;
//!
//! let scene = load_fsm(Path::new("map.fsm"))?;
//! let options = ExportOptions::default();
//! export::export_terrain_coordinates(&scene, Path::new("terrain_coordinates.txt"), &options)?;
//! export::export_object_coordinates(&scene, Path::new("object_coordinates.txt"), &options)?;
//! # Ok::<(), fsm_tools_lib::error::Error>(())
//! ```

pub mod error;
pub mod export;
pub mod scene;

pub use error::{Error, Result};
pub use scene::session::SceneSession;
pub use scene::source::{FsmSource, SceneSource};
pub use scene::{HeightmapLayer, ObjectInstance, Scene};
