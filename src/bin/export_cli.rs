use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use fsm_tools_lib::export::{self, ExportOptions, DEFAULT_OBJECT_FILE, DEFAULT_TERRAIN_FILE};
use fsm_tools_lib::{Scene, SceneSession};

/// Export terrain and object coordinates from an FSM scene file
#[derive(Parser, Debug)]
#[command(name = "fsm-export")]
#[command(version)]
struct Cli {
    /// Input .fsm scene file
    input: PathBuf,

    /// Terrain coordinates output
    #[arg(default_value = DEFAULT_TERRAIN_FILE)]
    terrain_out: PathBuf,

    /// Object coordinates output
    #[arg(default_value = DEFAULT_OBJECT_FILE)]
    objects_out: PathBuf,

    /// Decimal places for terrain heights
    #[arg(long, default_value_t = ExportOptions::default().terrain_precision)]
    terrain_precision: usize,

    /// Decimal places for object fields
    #[arg(long, default_value_t = ExportOptions::default().object_precision)]
    object_precision: usize,

    /// Print a scene summary instead of exporting
    #[arg(long)]
    info: bool,

    /// Print the summary as JSON on stdout (implies --info)
    #[arg(long)]
    json: bool,

    /// Read the exported files back and check their record counts
    #[arg(long)]
    verify: bool,
}

fn print_summary(scene: &Scene, json: bool) -> Result<()> {
    let metadata = scene.metadata();
    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("Heightmaps: {}", metadata.heightmap_count);
    for layer in &metadata.layers {
        let range = match (layer.min_height, layer.max_height) {
            (Some(lo), Some(hi)) => format!("{lo}..{hi}"),
            _ => "n/a".to_string(),
        };
        println!(
            "  Layer {}: {}x{}, scale {}, heights {}",
            layer.layer_id, layer.width, layer.height, layer.scale, range
        );
    }
    println!(
        "Objects: {} ({} unique names)",
        metadata.object_count, metadata.unique_object_names
    );
    Ok(())
}

fn verify_exports(scene: &Scene, terrain_out: &Path, objects_out: &Path) -> Result<()> {
    let points = export::read_terrain_coordinates(terrain_out)
        .with_context(|| format!("reading back {}", terrain_out.display()))?;
    let expected: usize = scene.layers().iter().map(|l| l.samples().len()).sum();
    if points.len() != expected {
        bail!(
            "{} has {} terrain rows, expected {}",
            terrain_out.display(),
            points.len(),
            expected
        );
    }

    let placements = export::read_object_coordinates(objects_out)
        .with_context(|| format!("reading back {}", objects_out.display()))?;
    if placements.len() != scene.object_count() {
        bail!(
            "{} has {} object rows, expected {}",
            objects_out.display(),
            placements.len(),
            scene.object_count()
        );
    }

    info!(terrain_rows = points.len(), object_rows = placements.len(), "verified exports");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let options = ExportOptions {
        terrain_precision: cli.terrain_precision,
        object_precision: cli.object_precision,
    };

    let mut session = SceneSession::new().with_options(options);
    session
        .load(&cli.input)
        .with_context(|| format!("failed to load scene {}", cli.input.display()))?;

    info!("heightmaps: {}", session.heightmap_count()?);
    info!("objects: {}", session.object_count()?);

    if cli.info || cli.json {
        print_summary(session.scene()?, cli.json)?;
        session.shutdown();
        return Ok(());
    }

    session
        .export_terrain_coordinates(&cli.terrain_out)
        .context("failed to export terrain coordinates")?;
    session
        .export_object_coordinates(&cli.objects_out)
        .context("failed to export object coordinates")?;

    if cli.verify {
        verify_exports(session.scene()?, &cli.terrain_out, &cli.objects_out)?;
    }

    session.shutdown();

    info!(
        terrain = %cli.terrain_out.display(),
        objects = %cli.objects_out.display(),
        "export complete"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Export failed: {:?}", e);
        std::process::exit(1);
    }
}
