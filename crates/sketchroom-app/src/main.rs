//! SketchRoom command-line shell.
//!
//! Hydrates a room from a JSON row dump into an in-memory store, replays a
//! script of input events through the canvas, and writes the final frame
//! as SVG.

mod error;
mod replay;

use clap::Parser;
use error::{AppError, AppResult};
use kurbo::Size;
use sketchroom_core::storage::{MemoryStorage, Storage};
use sketchroom_core::{CanvasConfig, RoomSession};
use sketchroom_render::{RenderContext, Renderer, SvgRenderer};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Replay input against a collaborative canvas room and export SVG
#[derive(Parser)]
#[command(name = "sketchroom")]
#[command(about = "Replay input against a collaborative canvas room and export SVG")]
struct Cli {
    /// JSON array of stored rows to hydrate the room from
    #[arg(long)]
    rows: Option<PathBuf>,

    /// JSON array of input steps to replay
    #[arg(long)]
    script: Option<PathBuf>,

    /// Canvas configuration (JSON, missing keys take defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "local")]
    room: String,

    #[arg(long, default_value = "local-user")]
    user: String,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Where to write the SVG frame (default: stdout)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Where to write the room's rows after the replay
    #[arg(long)]
    rows_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match pollster::block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
                path: path.clone(),
                source,
            })?;
            CanvasConfig::from_json(&text)?
        }
        None => CanvasConfig::default(),
    };
    config.validate()?;

    let rows = match &cli.rows {
        Some(path) => replay::load_rows(path)?,
        None => Vec::new(),
    };
    let storage = Arc::new(MemoryStorage::with_rows(rows));
    let shared: Arc<dyn Storage> = storage.clone();

    let mut session = RoomSession::open(shared, config, &cli.room, &cli.user).await?;
    session.canvas.set_viewport_size(cli.width, cli.height);

    if let Some(path) = &cli.script {
        let steps: Vec<replay::Step> = replay::read_json(path)?;
        replay::replay(&mut session, &steps).await;
    }

    let mut renderer = SvgRenderer::new();
    let ctx = RenderContext::new(&session.canvas).with_viewport_size(Size::new(cli.width, cli.height));
    renderer.build_scene(&ctx)?;
    write_output(cli.out.as_deref(), &renderer.document())?;

    if let Some(path) = &cli.rows_out {
        let rows = storage.query_all(&cli.room).await?;
        let json = serde_json::to_string_pretty(&rows).map_err(|source| AppError::Json {
            path: path.clone(),
            source,
        })?;
        write_output(Some(path), &json)?;
    }

    session.close();
    Ok(())
}

fn write_output(path: Option<&Path>, contents: &str) -> AppResult<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents).map_err(|source| AppError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{contents}"),
    }
    Ok(())
}
