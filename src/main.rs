use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inkboard::config::Config;
use inkboard::export;
use inkboard::input::DrawingSession;
use inkboard::replay;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "inkboard")]
#[command(version, about = "Freehand whiteboard with shape recognition, zoom/pan and undo")]
struct Cli {
    /// Use this config file instead of ~/.config/inkboard/config.toml
    #[arg(long, short = 'c', value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON gesture script and write the resulting drawing as PNG
    Replay {
        /// Gesture script (JSON array of events)
        script: PathBuf,

        /// Output PNG (defaults to the configured export directory)
        #[arg(long, short = 'o', value_name = "OUT.png")]
        output: Option<PathBuf>,

        /// Surface width in CSS pixels
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Surface height in CSS pixels
        #[arg(long, default_value_t = 600)]
        height: u32,

        /// Device pixel ratio
        #[arg(long, default_value_t = 1.0)]
        dpr: f64,
    },

    /// Replay a script and print how each stroke was classified
    Classify {
        /// Gesture script (JSON array of events)
        script: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn replay_script(
    config: &Config,
    script: &Path,
    width: u32,
    height: u32,
    dpr: f64,
) -> Result<(DrawingSession, replay::ReplaySummary)> {
    let events = replay::load_script(script)?;
    let mut session = DrawingSession::new(
        config,
        width,
        height,
        dpr,
        &tokio::runtime::Handle::current(),
    )
    .context("Failed to create drawing surface")?;

    let summary = replay::run(&mut session, &events)
        .await
        .with_context(|| format!("Failed to replay {}", script.display()))?;
    Ok((session, summary))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Replay {
            script,
            output,
            width,
            height,
            dpr,
        } => {
            let (mut session, summary) =
                replay_script(&config, &script, width, height, dpr).await?;
            println!("{summary}");

            let path = match output {
                Some(path) => {
                    let png = session.export_png().context("Failed to encode drawing")?;
                    export::write_png(&png, &path)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    path
                }
                None => session
                    .export_to_file(&config.export)
                    .context("Failed to export drawing")?,
            };
            println!("Saved {}", path.display());
        }
        Command::Classify { script } => {
            let (_, summary) = replay_script(&config, &script, 800, 600, 1.0).await?;
            for (index, stroke) in summary.strokes.iter().enumerate() {
                println!("stroke {}: {}", index + 1, stroke.kind());
            }
        }
    }

    Ok(())
}
