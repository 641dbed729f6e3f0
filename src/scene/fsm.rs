use std::io::{Cursor, Write};
use std::path::Path;

use binrw::{binrw, BinRead, BinWrite, Endian, VecArgs};
use tracing::{debug, warn};

use super::math::FsmVector3;
use super::{HeightmapLayer, ObjectInstance, Scene};
use crate::error::{Error, Result};

// ============================================================================
// .fsm container format (version 1, little-endian)
// ============================================================================

pub const FSM_MAGIC: [u8; 4] = *b"FSM\x1a";
pub const FSM_VERSION: u32 = 1;

// Fixed on-disk sizes, used to reject counts the file cannot possibly hold
// before allocating for them.
const LAYER_HEADER_SIZE: u64 = 20;
const OBJECT_RECORD_MIN_SIZE: u64 = 22;
const SAMPLE_SIZE: u64 = 4;

#[binrw]
#[derive(Debug, Clone)]
#[brw(little)]
pub struct FsmHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub layer_count: u32,
    pub object_count: u32,
}

/// Fixed part of a heightmap layer; `sample_count` f32 samples follow.
#[binrw]
#[derive(Debug, Clone)]
#[brw(little)]
pub struct FsmLayerHeader {
    pub layer_id: i32,
    pub width: i32,
    pub height: i32,
    pub scale: f32,
    pub sample_count: u32,
}

#[binrw]
#[derive(Debug, Clone)]
#[brw(little)]
pub struct FsmObjectRecord {
    pub name_len: u16,
    #[br(count = name_len)]
    pub name: Vec<u8>,
    pub position: FsmVector3,
    pub rotation: f32,
    pub scale: f32,
}

impl FsmObjectRecord {
    fn into_instance(self) -> ObjectInstance {
        let end = self
            .name
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |i| i + 1);
        let name = String::from_utf8_lossy(&self.name[..end]).to_string();
        ObjectInstance::new(name, self.position.0, self.rotation, self.scale)
    }
}

fn remaining(cursor: &Cursor<&[u8]>) -> u64 {
    (cursor.get_ref().len() as u64).saturating_sub(cursor.position())
}

// ============================================================================
// Parser
// ============================================================================

fn read_layer(cursor: &mut Cursor<&[u8]>, index: u32) -> Result<HeightmapLayer> {
    let header = FsmLayerHeader::read(cursor)?;

    if header.width <= 0 || header.height <= 0 {
        return Err(Error::format(format!(
            "layer {} (#{index}): invalid grid {}x{}",
            header.layer_id, header.width, header.height
        )));
    }

    let expected = (header.width as u64) * (header.height as u64);
    if expected != header.sample_count as u64 {
        return Err(Error::format(format!(
            "layer {} (#{index}): {}x{} grid declares {} samples, expected {}",
            header.layer_id, header.width, header.height, header.sample_count, expected
        )));
    }

    let needed = header.sample_count as u64 * SAMPLE_SIZE;
    if needed > remaining(cursor) {
        return Err(Error::format(format!(
            "layer {} (#{index}): {} samples need {} bytes, only {} remain",
            header.layer_id,
            header.sample_count,
            needed,
            remaining(cursor)
        )));
    }

    let samples: Vec<f32> = BinRead::read_options(
        cursor,
        Endian::Little,
        VecArgs {
            count: header.sample_count as usize,
            inner: (),
        },
    )?;

    debug!(
        layer_id = header.layer_id,
        width = header.width,
        height = header.height,
        scale = header.scale,
        "read heightmap layer"
    );

    HeightmapLayer::new(
        header.layer_id,
        header.width as u32,
        header.height as u32,
        header.scale,
        samples,
    )
}

/// Parse a complete scene from an in-memory `.fsm` buffer.
pub fn parse_fsm(data: &[u8]) -> Result<Scene> {
    let mut cursor = Cursor::new(data);

    let header = FsmHeader::read(&mut cursor)?;
    if header.magic != FSM_MAGIC {
        return Err(Error::format(format!(
            "bad signature {:02x?}, expected {:02x?}",
            header.magic, FSM_MAGIC
        )));
    }
    if header.version != FSM_VERSION {
        return Err(Error::format(format!(
            "unsupported version {}. Expected {}",
            header.version, FSM_VERSION
        )));
    }

    let min_body =
        header.layer_count as u64 * LAYER_HEADER_SIZE + header.object_count as u64 * OBJECT_RECORD_MIN_SIZE;
    if min_body > remaining(&cursor) {
        return Err(Error::format(format!(
            "header declares {} layers and {} objects but only {} bytes follow",
            header.layer_count,
            header.object_count,
            remaining(&cursor)
        )));
    }

    let mut layers = Vec::with_capacity(header.layer_count as usize);
    for index in 0..header.layer_count {
        layers.push(read_layer(&mut cursor, index)?);
    }

    let mut objects = Vec::with_capacity(header.object_count as usize);
    for _ in 0..header.object_count {
        let record = FsmObjectRecord::read(&mut cursor)?;
        objects.push(record.into_instance());
    }

    let trailing = remaining(&cursor);
    if trailing > 0 {
        warn!(trailing, "ignoring trailing bytes after last object record");
    }

    Scene::new(layers, objects)
}

/// Read and parse a `.fsm` file.
pub fn load_fsm(path: &Path) -> Result<Scene> {
    let data = std::fs::read(path).map_err(|e| Error::open(path, e))?;
    parse_fsm(&data)
}

// ============================================================================
// Writer
// ============================================================================

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::format(format!("{what} {value} does not fit in u32")))
}

fn to_i32(value: u32, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::format(format!("{what} {value} does not fit in i32")))
}

/// Serialize a scene into the `.fsm` container.
pub fn write_scene<W: Write + std::io::Seek>(scene: &Scene, writer: &mut W) -> Result<()> {
    let header = FsmHeader {
        magic: FSM_MAGIC,
        version: FSM_VERSION,
        layer_count: to_u32(scene.heightmap_count(), "layer count")?,
        object_count: to_u32(scene.object_count(), "object count")?,
    };
    header.write(writer)?;

    for layer in scene.layers() {
        let layer_header = FsmLayerHeader {
            layer_id: layer.layer_id(),
            width: to_i32(layer.width(), "layer width")?,
            height: to_i32(layer.height(), "layer height")?,
            scale: layer.scale(),
            sample_count: to_u32(layer.samples().len(), "sample count")?,
        };
        layer_header.write(writer)?;
        for sample in layer.samples() {
            sample.write_le(writer)?;
        }
    }

    for object in scene.objects() {
        let name = object.name().as_bytes().to_vec();
        let name_len = u16::try_from(name.len()).map_err(|_| {
            Error::format(format!("object name is {} bytes, limit is {}", name.len(), u16::MAX))
        })?;
        let record = FsmObjectRecord {
            name_len,
            name,
            position: object.position().into(),
            rotation: object.rotation(),
            scale: object.scale(),
        };
        record.write(writer)?;
    }

    Ok(())
}

/// Serialize a scene into a fresh byte buffer.
pub fn encode_scene(scene: &Scene) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_scene(scene, &mut cursor)?;
    Ok(cursor.into_inner())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn sample_scene() -> Scene {
        let layer = HeightmapLayer::new(0, 2, 2, 1.0, vec![15.5, 15.8, 16.1, 16.4]).unwrap();
        let objects = vec![
            ObjectInstance::new("Tree01", Vector3::new(100.5, 50.2, 200.0), 0.0, 1.0),
            ObjectInstance::new("House01", Vector3::new(200.0, 60.0, 180.0), 3.0, 1.5),
        ];
        Scene::new(vec![layer], objects).unwrap()
    }

    fn header_bytes(magic: &[u8; 4], version: u32, layers: u32, objects: u32) -> Vec<u8> {
        let mut data = magic.to_vec();
        data.extend_from_slice(&version.to_le_bytes());
        data.extend_from_slice(&layers.to_le_bytes());
        data.extend_from_slice(&objects.to_le_bytes());
        data
    }

    fn layer_bytes(id: i32, width: i32, height: i32, declared: u32, samples: &[f32]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&id.to_le_bytes());
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&1.0f32.to_le_bytes());
        data.extend_from_slice(&declared.to_le_bytes());
        for s in samples {
            data.extend_from_slice(&s.to_le_bytes());
        }
        data
    }

    #[test]
    fn encoded_layout_matches_format() {
        let bytes = encode_scene(&sample_scene()).unwrap();

        assert_eq!(&bytes[0..4], b"FSM\x1a");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(bytes[12..16].try_into().unwrap()), 2);

        // header + layer header + 4 samples + two objects (22 bytes + name)
        let expected = 16 + 20 + 16 + (22 + 6) + (22 + 7);
        assert_eq!(bytes.len(), expected);
    }

    #[test]
    fn parse_reads_back_encoded_scene() {
        let scene = sample_scene();
        let parsed = parse_fsm(&encode_scene(&scene).unwrap()).unwrap();
        assert_eq!(parsed, scene);
    }

    #[test]
    fn rejects_bad_signature() {
        let data = header_bytes(b"NOPE", 1, 0, 0);
        let err = parse_fsm(&data).unwrap_err();
        assert!(matches!(err, Error::Format(ref m) if m.contains("signature")), "{err}");
    }

    #[test]
    fn rejects_unsupported_version() {
        let data = header_bytes(&FSM_MAGIC, 9, 0, 0);
        assert!(matches!(parse_fsm(&data), Err(Error::Format(_))));
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(matches!(parse_fsm(&FSM_MAGIC), Err(Error::Format(_))));
        assert!(matches!(parse_fsm(&[]), Err(Error::Format(_))));
    }

    #[test]
    fn rejects_sample_count_mismatch() {
        let mut data = header_bytes(&FSM_MAGIC, 1, 1, 0);
        data.extend(layer_bytes(0, 2, 2, 3, &[1.0, 2.0, 3.0]));
        let err = parse_fsm(&data).unwrap_err();
        assert!(matches!(err, Error::Format(ref m) if m.contains("expected 4")), "{err}");
    }

    #[test]
    fn rejects_negative_dimensions() {
        let mut data = header_bytes(&FSM_MAGIC, 1, 1, 0);
        data.extend(layer_bytes(0, -2, 2, 0, &[]));
        assert!(matches!(parse_fsm(&data), Err(Error::Format(_))));
    }

    #[test]
    fn rejects_counts_larger_than_file() {
        let data = header_bytes(&FSM_MAGIC, 1, u32::MAX, u32::MAX);
        let err = parse_fsm(&data).unwrap_err();
        assert!(matches!(err, Error::Format(ref m) if m.contains("only 0 bytes follow")), "{err}");

        let mut data = header_bytes(&FSM_MAGIC, 1, 1, 0);
        data.extend(layer_bytes(0, 1000, 1000, 1_000_000, &[1.0]));
        assert!(matches!(parse_fsm(&data), Err(Error::Format(_))));
    }

    #[test]
    fn rejects_duplicate_layer_ids() {
        let mut data = header_bytes(&FSM_MAGIC, 1, 2, 0);
        data.extend(layer_bytes(4, 1, 1, 1, &[0.0]));
        data.extend(layer_bytes(4, 1, 1, 1, &[0.0]));
        assert!(matches!(parse_fsm(&data), Err(Error::Format(_))));
    }

    #[test]
    fn object_names_drop_trailing_nuls() {
        let mut data = header_bytes(&FSM_MAGIC, 1, 0, 1);
        data.extend_from_slice(&6u16.to_le_bytes());
        data.extend_from_slice(b"Rock\0\0");
        for v in [1.0f32, 2.0, 3.0, 0.5, 2.0] {
            data.extend_from_slice(&v.to_le_bytes());
        }

        let scene = parse_fsm(&data).unwrap();
        let rock = &scene.objects()[0];
        assert_eq!(rock.name(), "Rock");
        assert_eq!(rock.position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(rock.rotation(), 0.5);
        assert_eq!(rock.scale(), 2.0);
    }

    #[test]
    fn trailing_bytes_are_tolerated() {
        let mut data = encode_scene(&sample_scene()).unwrap();
        data.extend_from_slice(&[0xAB; 3]);
        assert_eq!(parse_fsm(&data).unwrap(), sample_scene());
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let err = load_fsm(Path::new("does/not/exist.fsm")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
