use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use super::atomic::write_atomically;
use super::ExportOptions;
use crate::error::Result;
use crate::scene::Scene;

pub const OBJECT_HEADER: &str = "\
# Object Coordinates Export
# Format: ObjectName,X,Y,Z,Rotation,Scale

";

/// Names go out as a bare CSV field, so separators and line breaks are
/// replaced to keep one record per row. A leading `#` would turn the row
/// into a comment and is replaced as well.
fn sanitize_name(name: &str) -> Cow<'_, str> {
    let mut name = Cow::Borrowed(name);
    if name.contains([',', '\r', '\n']) {
        name = Cow::Owned(name.replace([',', '\r', '\n'], "_"));
    }
    if name.starts_with('#') {
        name = Cow::Owned(format!("_{}", &name[1..]));
    }
    name
}

/// Write the object placement report for `scene` to `out`, one
/// `name,x,y,z,rotation,scale` row per object in scene order.
pub fn render_object_coordinates<W: Write>(
    scene: &Scene,
    options: &ExportOptions,
    out: &mut W,
) -> io::Result<()> {
    out.write_all(OBJECT_HEADER.as_bytes())?;

    let p = options.object_precision;
    for object in scene.objects() {
        let position = object.position();
        writeln!(
            out,
            "{},{:.*},{:.*},{:.*},{:.*},{:.*}",
            sanitize_name(object.name()),
            p,
            position.x,
            p,
            position.y,
            p,
            position.z,
            p,
            object.rotation(),
            p,
            object.scale()
        )?;
    }

    Ok(())
}

/// Export every object placement of `scene` to `path`, replacing any
/// existing file.
pub fn export_object_coordinates(scene: &Scene, path: &Path, options: &ExportOptions) -> Result<()> {
    write_atomically(path, |w| render_object_coordinates(scene, options, w))?;

    info!(
        path = %path.display(),
        objects = scene.object_count(),
        "exported object coordinates"
    );
    Ok(())
}
