mod app;
mod logging;
mod notes;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;

use app::PhysicsConfig;
use notes::{NoteSource, NotesClient};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the notes API.
    #[arg(long, env = "NOTEGRAPH_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Browse a JSON snapshot (`{"notes": [...], "links": [...]}`) read-only
    /// instead of talking to the API.
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    #[arg(long, default_value_t = logging::default_log_level().to_owned())]
    log_level: String,

    #[command(flatten)]
    physics: PhysicsConfig,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(&args.log_level)?;

    let source = match args.snapshot {
        Some(path) => NoteSource::Snapshot(path),
        None => NoteSource::Api(
            NotesClient::new(&args.api_url)
                .with_context(|| format!("failed to set up client for {}", args.api_url))?,
        ),
    };
    info!("event=source_selected source={}", source.label());

    let physics = args.physics;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "notegraph",
        options,
        Box::new(move |cc| Ok(Box::new(app::NoteGraphApp::new(cc, source, physics)))),
    )
    .map_err(|error| anyhow!("ui exited with error: {error}"))
}
