use binrw::binrw;
use cgmath::Vector3;

/// Little-endian `[f32; 3]` on disk, `cgmath::Vector3` in memory.
#[binrw]
#[derive(Debug, Clone, Copy, PartialEq)]
#[brw(little)]
pub struct FsmVector3(
    #[br(map = |raw: [f32; 3]| Vector3::new(raw[0], raw[1], raw[2]))]
    #[bw(map = |v: &Vector3<f32>| [v.x, v.y, v.z])]
    pub Vector3<f32>,
);

impl From<Vector3<f32>> for FsmVector3 {
    fn from(v: Vector3<f32>) -> Self {
        Self(v)
    }
}

/// Grow an axis-aligned box `(min, max)` to include `p`.
pub fn extend_bounds(
    bounds: Option<(Vector3<f32>, Vector3<f32>)>,
    p: Vector3<f32>,
) -> Option<(Vector3<f32>, Vector3<f32>)> {
    match bounds {
        None => Some((p, p)),
        Some((min, max)) => Some((
            Vector3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
            Vector3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
        )),
    }
}
