pub mod fsm;
pub mod math;
pub mod session;
pub mod source;

use std::collections::HashSet;

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Heightmap layers
// ============================================================================

/// A regular grid of elevation samples.
///
/// Samples are stored row-major: sample `i` sits at grid cell
/// `(i % width, i / width)`. The constructor guarantees
/// `samples.len() == width * height`, and the layer cannot be mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapLayer {
    layer_id: i32,
    width: u32,
    height: u32,
    scale: f32,
    samples: Vec<f32>,
}

impl HeightmapLayer {
    pub fn new(layer_id: i32, width: u32, height: u32, scale: f32, samples: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::format(format!(
                "layer {layer_id}: grid dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| Error::format(format!("layer {layer_id}: {width}x{height} overflows")))?;
        if samples.len() != expected {
            return Err(Error::format(format!(
                "layer {layer_id}: {width}x{height} grid needs {expected} samples, found {}",
                samples.len()
            )));
        }

        Ok(Self {
            layer_id,
            width,
            height,
            scale,
            samples,
        })
    }

    pub fn layer_id(&self) -> i32 {
        self.layer_id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// World units per sample.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Height at grid cell `(x, y)`, or `None` outside the grid.
    pub fn sample(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Iterate `(x, y, height)` in row-major order.
    pub fn grid_samples(&self) -> impl Iterator<Item = (u32, u32, f32)> + '_ {
        let width = self.width as usize;
        self.samples
            .iter()
            .enumerate()
            .map(move |(i, &h)| ((i % width) as u32, (i / width) as u32, h))
    }

    /// Lowest and highest sample, skipping NaN.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        self.samples
            .iter()
            .copied()
            .filter(|h| !h.is_nan())
            .fold(None, |acc, h| match acc {
                None => Some((h, h)),
                Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
            })
    }
}

// ============================================================================
// Object instances
// ============================================================================

/// A named entity placed in the scene. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInstance {
    name: String,
    position: Vector3<f32>,
    rotation: f32,
    scale: f32,
}

impl ObjectInstance {
    pub fn new(name: impl Into<String>, position: Vector3<f32>, rotation: f32, scale: f32) -> Self {
        Self {
            name: name.into(),
            position,
            rotation,
            scale,
        }
    }

    /// Identifier, not necessarily unique within a scene.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World position; Z is up.
    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// Yaw about the vertical axis, in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Uniform scale factor.
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Everything loaded from one scene file. The scene owns its layers and
/// objects outright; dropping it releases them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    layers: Vec<HeightmapLayer>,
    objects: Vec<ObjectInstance>,
}

impl Scene {
    pub fn new(layers: Vec<HeightmapLayer>, objects: Vec<ObjectInstance>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(layers.len());
        for layer in &layers {
            if !seen.insert(layer.layer_id) {
                return Err(Error::format(format!(
                    "duplicate layer id {}",
                    layer.layer_id
                )));
            }
        }
        Ok(Self { layers, objects })
    }

    pub fn heightmap_count(&self) -> usize {
        self.layers.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn layers(&self) -> &[HeightmapLayer] {
        &self.layers
    }

    pub fn objects(&self) -> &[ObjectInstance] {
        &self.objects
    }

    pub fn metadata(&self) -> SceneMetadata {
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                let range = layer.height_range();
                LayerMetadata {
                    layer_id: layer.layer_id,
                    width: layer.width,
                    height: layer.height,
                    scale: layer.scale,
                    sample_count: layer.samples.len(),
                    min_height: range.map(|r| r.0),
                    max_height: range.map(|r| r.1),
                }
            })
            .collect();

        let unique_object_names = self
            .objects
            .iter()
            .map(|o| o.name())
            .collect::<HashSet<_>>()
            .len();

        let bounds = self
            .objects
            .iter()
            .fold(None, |acc, o| math::extend_bounds(acc, o.position()));

        SceneMetadata {
            heightmap_count: self.layers.len(),
            object_count: self.objects.len(),
            unique_object_names,
            layers,
            object_bounds_min: bounds.map(|b| b.0.into()),
            object_bounds_max: bounds.map(|b| b.1.into()),
        }
    }
}

// ============================================================================
// Summaries
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LayerMetadata {
    pub layer_id: i32,
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub sample_count: usize,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SceneMetadata {
    pub heightmap_count: usize,
    pub object_count: usize,
    pub unique_object_names: usize,
    pub layers: Vec<LayerMetadata>,
    pub object_bounds_min: Option<[f32; 3]>,
    pub object_bounds_max: Option<[f32; 3]>,
}
