// Common test utilities and helpers
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use cgmath::Vector3;
use fsm_tools_lib::scene::fsm::encode_scene;
use fsm_tools_lib::{HeightmapLayer, ObjectInstance, Scene};

/// One 2x2 layer and one object.
pub fn minimal_scene() -> Scene {
    let layer = HeightmapLayer::new(0, 2, 2, 1.0, vec![15.5, 15.8, 16.1, 16.4]).unwrap();
    let object = ObjectInstance::new("Tree01", Vector3::new(100.5, 50.2, 200.0), 0.0, 1.0);
    Scene::new(vec![layer], vec![object]).unwrap()
}

/// Two layers of different sizes and three objects, one name repeated.
pub fn village_scene() -> Scene {
    let ground = HeightmapLayer::new(0, 3, 2, 1.0, vec![15.5, 15.8, 16.1, 14.0, 13.5, 12.25]).unwrap();
    let water = HeightmapLayer::new(1, 1, 2, 4.0, vec![-2.0, -2.0]).unwrap();
    let objects = vec![
        ObjectInstance::new("Tree01", Vector3::new(100.5, 50.2, 200.0), 0.0, 1.0),
        ObjectInstance::new("Rock02", Vector3::new(150.3, 45.8, 195.5), 1.57, 0.8),
        ObjectInstance::new("Tree01", Vector3::new(120.0, 40.0, 201.0), 0.5, 1.25),
    ];
    Scene::new(vec![ground, water], objects).unwrap()
}

/// Encode `scene` and write it to `dir/name`.
pub fn write_fsm(dir: &Path, name: &str, scene: &Scene) -> PathBuf {
    let path = dir.join(name);
    let bytes = encode_scene(scene).expect("encode scene");
    std::fs::write(&path, bytes).expect("write fsm fixture");
    path
}

/// Write raw bytes as a scene file.
pub fn write_raw(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write raw fixture");
    path
}
