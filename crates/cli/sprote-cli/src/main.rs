//! Sprote CLI - inspect and export skeletal animation projects without a UI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sprote_export::{ExportConfig, Exporter, FsAssetLoader, SoftwareRasterizer};
use sprote_skeleton_core::{load_project, pose, Skeleton};

/// Headless tools for Sprote projects
#[derive(Parser, Debug)]
#[command(name = "sprote")]
#[command(about = "Inspect and export Sprote skeletal animation projects")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the bone hierarchy and keyframe counts
    Info {
        project: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Render the animation to PNG frames or a GIF
    Export {
        project: PathBuf,
        #[arg(short, long, value_enum, default_value = "png")]
        format: Format,
        /// Output directory (png) or file (gif)
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long, default_value = "60")]
        fps: u32,
        /// Explicit frame count; overrides --duration
        #[arg(long)]
        frames: Option<u32>,
        /// Length in seconds (default 5.0)
        #[arg(long)]
        duration: Option<f32>,
        /// Use the last keyframe time as the duration
        #[arg(long, conflicts_with_all = ["frames", "duration"])]
        fit: bool,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
        /// Directory that relative image paths resolve against
        /// (defaults to the project's directory)
        #[arg(long)]
        assets: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Png,
    Gif,
}

fn open(project: &Path) -> Result<Skeleton> {
    load_project(project).with_context(|| format!("failed to load {}", project.display()))
}

fn info(project: &Path, json: bool) -> Result<()> {
    let skeleton = open(project)?;
    let orphans = skeleton.orphans();
    let duplicates = skeleton.duplicate_names();

    if json {
        let bones: Vec<serde_json::Value> = skeleton
            .bones()
            .iter()
            .map(|b| {
                serde_json::json!({
                    "name": b.name,
                    "parent": b.parent().and_then(|p| skeleton.get(p)).map(|p| p.name.clone()),
                    "length": b.length,
                    "angle": b.angle,
                    "keyframes": b.timeline.len(),
                    "image_path": b.image_path,
                })
            })
            .collect();
        let doc = serde_json::json!({
            "bones": bones,
            "roots": skeleton.roots().len(),
            "orphans": orphans.len(),
            "duplicate_names": duplicates,
            "animation_end": pose::animation_end(&skeleton),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{}: {} bones", project.display(), skeleton.len());
    for (id, depth) in skeleton.draw_order() {
        if let Some(b) = skeleton.get(id) {
            println!(
                "{:indent$}{} len={} angle={:.1} keys={}",
                "",
                b.name,
                b.length,
                b.angle,
                b.timeline.len(),
                indent = depth * 2
            );
        }
    }
    if !orphans.is_empty() {
        println!("orphans: {}", orphans.len());
    }
    if !duplicates.is_empty() {
        println!("duplicate names: {}", duplicates.join(", "));
    }
    if let Some(end) = pose::animation_end(&skeleton) {
        println!("last keyframe at {end:.3}s");
    }
    Ok(())
}

fn export(
    project: &Path,
    format: Format,
    out: &Path,
    mut cfg: ExportConfig,
    fit: bool,
    assets: Option<PathBuf>,
) -> Result<()> {
    let skeleton = open(project)?;
    if fit {
        cfg.duration = pose::animation_end(&skeleton).filter(|&end| end > 0.0);
        if cfg.duration.is_none() {
            log::warn!("no keyframes to fit; using the default length");
        }
    }
    let root = assets
        .or_else(|| project.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let raster = SoftwareRasterizer::with_assets(&cfg, FsAssetLoader::with_root(root));
    let mut exporter = Exporter::new(raster);

    let summary = match format {
        Format::Png => exporter.export_png_sequence(&skeleton, &cfg, out),
        Format::Gif => exporter.export_gif(&skeleton, &cfg, out),
    }
    .with_context(|| format!("export to {} failed", out.display()))?;

    println!(
        "wrote {} frames ({:.2}s) to {}",
        summary.frames,
        summary.duration,
        summary.output.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Command::Info { project, json } => info(&project, json),
        Command::Export {
            project,
            format,
            out,
            fps,
            frames,
            duration,
            fit,
            width,
            height,
            assets,
        } => {
            let cfg = ExportConfig {
                fps,
                total_frames: frames,
                duration,
                width,
                height,
                ..ExportConfig::default()
            };
            export(&project, format, &out, cfg, fit, assets)
        }
    }
}
