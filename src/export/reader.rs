//! Reads the coordinate reports back into records.
//!
//! This is the consumer side of the export: importers need exactly these
//! rules, so they live next to the writer. Comment lines (`#`) and blank
//! lines are skipped, as are rows with the wrong number of fields or fields
//! that do not parse. Quotes carry no meaning, and name fields are taken
//! verbatim; only numeric fields are trimmed.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// One `layer,x,y,height` row of a terrain report.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TerrainPoint {
    pub layer_id: i32,
    pub x: u32,
    pub y: u32,
    pub height: f32,
}

/// One `name,x,y,z,rotation,scale` row of an object report.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ObjectPlacement {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    pub scale: f32,
}

/// `verbatim` lists the field indexes that keep their surrounding whitespace.
fn read_rows<T, R>(reader: R, field_count: usize, verbatim: &[usize]) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(row = index, error = %e, "skipping unreadable row");
                continue;
            }
        };
        if record.len() != field_count {
            debug!(row = index, fields = record.len(), "skipping row with wrong field count");
            continue;
        }
        let record: csv::StringRecord = record
            .iter()
            .enumerate()
            .map(|(i, field)| if verbatim.contains(&i) { field } else { field.trim() })
            .collect();
        match record.deserialize::<T>(None) {
            Ok(row) => rows.push(row),
            Err(e) => debug!(row = index, error = %e, "skipping malformed row"),
        }
    }

    Ok(rows)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| Error::open(path, e))
}

/// Parse terrain rows from any reader.
pub fn parse_terrain_coordinates<R: Read>(reader: R) -> Result<Vec<TerrainPoint>> {
    read_rows(reader, 4, &[])
}

/// Parse object rows from any reader.
pub fn parse_object_coordinates<R: Read>(reader: R) -> Result<Vec<ObjectPlacement>> {
    read_rows(reader, 6, &[0])
}

pub fn read_terrain_coordinates(path: &Path) -> Result<Vec<TerrainPoint>> {
    parse_terrain_coordinates(open(path)?)
}

pub fn read_object_coordinates(path: &Path) -> Result<Vec<ObjectPlacement>> {
    parse_object_coordinates(open(path)?)
}
