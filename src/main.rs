use anyhow::{anyhow, Context};
use clap::Parser;
use gesture_control_lib::core::config::EngineConfig;
use gesture_control_lib::core::session::GestureSession;
use gesture_control_lib::platform::input::{LoggingInjector, LoggingUiHandler};
use gesture_control_lib::platform::pose::ReplaySource;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "gesture-control",
    about = "Replay recorded hand poses through the gesture engine"
)]
struct Cli {
    /// JSON-lines file of pose frames
    #[arg(long)]
    input: PathBuf,

    /// Settings file (defaults to ~/.gesture_control/config/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pace frames by their timestamps instead of replaying as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Screen size as WIDTHxHEIGHT, overriding the settings file
    #[arg(long)]
    screen: Option<String>,
}

fn parse_screen(value: &str) -> anyhow::Result<(u32, u32)> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got {value}"))?;

    Ok((
        width.trim().parse().context("invalid screen width")?,
        height.trim().parse().context("invalid screen height")?,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_control=info,gesture_control_lib=info".into()),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)
            .map_err(|e| anyhow!("failed to load {}: {}", path.display(), e))?,
        None => EngineConfig::load().map_err(|e| anyhow!("failed to load settings: {}", e))?,
    };

    if let Some(screen) = &cli.screen {
        let (width, height) = parse_screen(screen)?;
        config.screen_width = width;
        config.screen_height = height;
    }

    let source = ReplaySource::open(&cli.input)
        .await?
        .with_realtime(cli.realtime);

    let session = GestureSession::new(config)?;
    session
        .start(
            source,
            Arc::new(LoggingInjector::new()),
            Box::new(LoggingUiHandler::new()),
        )
        .await?;

    tokio::select! {
        _ = session.finished() => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted, stopping session"),
    }
    let stats = session.stop().await?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
