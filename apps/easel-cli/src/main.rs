mod config;
mod demo;

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use easel_render::{MemoryResources, PaintCommand, RecordingHost, Renderer};
use easel_time::{ManualClock, TimeManager};
use tracing_subscriber::EnvFilter;

use config::EngineConfig;
use demo::DemoScene;

#[derive(Parser)]
#[command(name = "easel-cli", about = "Headless driver for the easel renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run the demo scene through the frame loop and report paint statistics
    Run {
        /// Number of real frames to simulate
        #[arg(short, long, default_value = "120")]
        frames: u32,
        /// Real milliseconds between frames
        #[arg(long, default_value = "16")]
        frame_ms: f64,
        /// JSON or YAML settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the simulation rate
        #[arg(long)]
        fps: Option<f64>,
        /// Override the simulation time scale
        #[arg(long)]
        time_scale: Option<f64>,
        /// Override the surface width
        #[arg(long)]
        width: Option<u32>,
        /// Override the surface height
        #[arg(long)]
        height: Option<u32>,
    },
    /// Print the demo scene in paint order
    Tree,
}

struct Overrides {
    fps: Option<f64>,
    time_scale: Option<f64>,
    width: Option<u32>,
    height: Option<u32>,
}

fn resolve_config(path: Option<&PathBuf>, overrides: &Overrides) -> anyhow::Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(fps) = overrides.fps {
        config.time.fps = fps;
    }
    if let Some(scale) = overrides.time_scale {
        config.time.time_scale = scale;
    }
    if let Some(width) = overrides.width {
        config.renderer.width = width;
    }
    if let Some(height) = overrides.height {
        config.renderer.height = height;
    }
    Ok(config)
}

fn run(config: EngineConfig, frames: u32, frame_ms: f64) -> anyhow::Result<()> {
    let clock = ManualClock::new(0.0);
    let mut time = TimeManager::new(config.time, clock.clone())?;
    let mut renderer = Renderer::new(
        config.renderer.clone(),
        RecordingHost::new(),
        MemoryResources::new(),
    )?;
    let mut scene = DemoScene::build(
        f64::from(config.renderer.width),
        f64::from(config.renderer.height),
    )?;
    if let Some(root) = scene.entities.root() {
        renderer.bind_camera(root);
    }

    println!(
        "Run: frames={frames}, frame_ms={frame_ms}, fps={}, time_scale={}, surface={}x{}",
        config.time.fps, config.time.time_scale, config.renderer.width, config.renderer.height
    );

    let (mut ready_frames, mut steps) = (0u32, 0u64);
    let mut stats: BTreeMap<String, LayerStats> = BTreeMap::new();
    for frame in 0..frames {
        clock.advance(frame_ms);
        let Some(plan) = time.update().plan() else {
            continue;
        };
        ready_frames += 1;
        for _ in 0..plan.update_count {
            scene.step(plan.fixed_delta);
        }
        steps += u64::from(plan.update_count);

        if let Some(root) = scene.entities.root_mut() {
            renderer.render_tree(root, time.curr_time())?;
        }
        drain_surfaces(&mut renderer, &mut stats);
        tracing::debug!(
            frame,
            steps = plan.update_count,
            interpolation = plan.interpolation_time,
            "frame rendered"
        );
    }

    println!(
        "Frames: ready={ready_frames}/{frames}, steps={steps}, fps={}, residual_ms={:.3}",
        time.fps(),
        time.delta_time()
    );
    if let Some(pos) = scene.ball_position() {
        println!("Ball: x={:.2}, y={:.2}", pos.x, pos.y);
    }
    for layer in renderer.layers() {
        let Some(entry) = renderer.surface(layer) else {
            continue;
        };
        let totals = stats.get(layer).copied().unwrap_or_default();
        println!(
            "Layer {layer}: id={}, commands={}, fills={}, active={}",
            entry.surface.id(),
            totals.commands,
            totals.fills,
            entry.is_active
        );
    }
    Ok(())
}

/// Paint calls seen on one layer over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LayerStats {
    commands: u64,
    fills: u64,
}

/// Move each surface's recorded calls into the running totals so the logs
/// stay one frame long.
fn drain_surfaces(
    renderer: &mut Renderer<RecordingHost, MemoryResources>,
    stats: &mut BTreeMap<String, LayerStats>,
) {
    let layers: Vec<String> = renderer.layers().map(str::to_string).collect();
    for layer in layers {
        let Some(entry) = renderer.surface_mut(&layer) else {
            continue;
        };
        let commands = entry.surface.take_commands();
        let totals = stats.entry(layer).or_default();
        totals.commands += commands.len() as u64;
        totals.fills += commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::Fill))
            .count() as u64;
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("easel-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", easel_common::crate_info());
            println!("scene: {}", easel_scene::crate_info());
            println!("render: {}", easel_render::crate_info());
            println!("time: {}", easel_time::crate_info());
        }
        Commands::Run {
            frames,
            frame_ms,
            config,
            fps,
            time_scale,
            width,
            height,
        } => {
            let overrides = Overrides {
                fps,
                time_scale,
                width,
                height,
            };
            let config = resolve_config(config.as_ref(), &overrides)?;
            run(config, frames, frame_ms)?;
        }
        Commands::Tree => {
            let config = EngineConfig::default();
            let scene = DemoScene::build(
                f64::from(config.renderer.width),
                f64::from(config.renderer.height),
            )?;
            for node in scene.entities.items_to_render(None) {
                let depth = depth_of(&scene, node.id());
                let detail = node
                    .as_body()
                    .map(|body| format!(" {:?} {}", body.shape_kind(), body.debug_message()))
                    .unwrap_or_default();
                println!(
                    "{}{:?} [{}] layer={}{detail}",
                    "  ".repeat(depth),
                    node.node_type(),
                    node.id().short(),
                    node.canvas_id()
                );
            }
        }
    }

    Ok(())
}

fn depth_of(scene: &DemoScene, id: easel_common::NodeId) -> usize {
    let mut depth = 0;
    let mut current = id;
    while let Some(parent) = scene.entities.parent_of(current) {
        depth += 1;
        current = parent;
    }
    depth
}
