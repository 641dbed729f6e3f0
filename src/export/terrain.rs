use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use super::atomic::write_atomically;
use super::ExportOptions;
use crate::error::Result;
use crate::scene::Scene;

pub const TERRAIN_HEADER: &str = "\
# Terrain Coordinates Export
# Format: X,Y,Z (Height)
# LayerID,X,Y,Height
";

/// Write the terrain report for `scene` to `out`.
///
/// Layers appear in scene order, each as a blank line, a `# Layer` comment
/// and one `layer,x,y,height` row per sample in row-major order.
pub fn render_terrain_coordinates<W: Write>(
    scene: &Scene,
    options: &ExportOptions,
    out: &mut W,
) -> io::Result<()> {
    out.write_all(TERRAIN_HEADER.as_bytes())?;

    for layer in scene.layers() {
        writeln!(out)?;
        // Debug formatting gives the shortest round-trip form ("1.0", "0.25")
        writeln!(
            out,
            "# Layer {} - Width: {}, Height: {}, Scale: {:?}",
            layer.layer_id(),
            layer.width(),
            layer.height(),
            layer.scale()
        )?;

        let id = layer.layer_id();
        for (x, y, h) in layer.grid_samples() {
            writeln!(out, "{},{},{},{:.*}", id, x, y, options.terrain_precision, h)?;
        }
    }

    Ok(())
}

/// Export every heightmap sample of `scene` to `path`, replacing any
/// existing file.
pub fn export_terrain_coordinates(scene: &Scene, path: &Path, options: &ExportOptions) -> Result<()> {
    write_atomically(path, |w| render_terrain_coordinates(scene, options, w))?;

    let samples: usize = scene.layers().iter().map(|l| l.samples().len()).sum();
    info!(
        path = %path.display(),
        layers = scene.heightmap_count(),
        samples,
        "exported terrain coordinates"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::HeightmapLayer;

    fn render(scene: &Scene, options: &ExportOptions) -> String {
        let mut out = Vec::new();
        render_terrain_coordinates(scene, options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_scene_renders_header_only() {
        let text = render(&Scene::default(), &ExportOptions::default());
        assert_eq!(text, TERRAIN_HEADER);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn rows_follow_row_major_order() {
        let layer = HeightmapLayer::new(5, 3, 2, 0.25, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let scene = Scene::new(vec![layer], vec![]).unwrap();
        let text = render(&scene, &ExportOptions::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "# Layer 5 - Width: 3, Height: 2, Scale: 0.25");
        assert_eq!(lines[5], "5,0,0,0.0");
        assert_eq!(lines[7], "5,2,0,2.0");
        assert_eq!(lines[8], "5,0,1,3.0");
        assert_eq!(lines[10], "5,2,1,5.0");
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn precision_is_configurable() {
        let layer = HeightmapLayer::new(0, 1, 1, 1.0, vec![15.456]).unwrap();
        let scene = Scene::new(vec![layer], vec![]).unwrap();

        let options = ExportOptions {
            terrain_precision: 3,
            ..ExportOptions::default()
        };
        assert!(render(&scene, &options).ends_with("0,0,0,15.456\n"));
        assert!(render(&scene, &ExportOptions::default()).ends_with("0,0,0,15.5\n"));
    }
}
