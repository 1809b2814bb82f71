//! Hakai runtime host
//!
//! Composition root for the plugin runtime: loads the configuration,
//! initializes logging, bootstraps the discovered plugins and hands the
//! event bus to the application shell. The graphical shell lives in its
//! own process layer; when run standalone this binary publishes a short
//! scripted event sequence so a configured setup can be smoke-tested
//! from the command line.

use anyhow::Context;
use clap::Parser;
use hakai_config::{logging, AppConfig, ConfigDocument};
use hakai_events::{EntityId, GameEvent, PowerUpKind};
use hakai_runtime::Bootstrap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "hakai", about = "Hakai plugin runtime host", version)]
struct Cli {
    /// Path to the runtime configuration file
    #[arg(long, default_value = "hakai.yml")]
    config: PathBuf,

    /// Abort plugin discovery after this many milliseconds
    #[arg(long)]
    discovery_deadline_ms: Option<u64>,

    /// Load and validate a level descriptor before starting
    #[arg(long)]
    level: Option<PathBuf>,

    /// Publish the scripted smoke-test event sequence after startup
    #[arg(long)]
    smoke_test: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let document = ConfigDocument::from_path(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let app_config = AppConfig::from_document(&document)?;
    logging::initialize(&app_config);

    if let Some(level_path) = &cli.level {
        let level = hakai_config::LevelData::from_path(level_path)
            .with_context(|| format!("failed to load level {}", level_path.display()))?;
        info!(
            level = %level.level_name,
            number = level.level_number,
            brick_types = level.brick_types.len(),
            "Level descriptor validated"
        );
    }

    let mut bootstrap = Bootstrap::new(hakai_plugin_bundle::bundled_contracts());
    if let Some(ms) = cli.discovery_deadline_ms {
        bootstrap = bootstrap.with_discovery_deadline(Duration::from_millis(ms));
    }

    let (runtime, report) = bootstrap.run(&document);
    print!("{report}");
    if !report.is_clean() {
        warn!("Startup completed with failures; continuing with surviving plugins");
    }

    if cli.smoke_test {
        run_smoke_sequence(&runtime);
    }

    runtime.shutdown();
    Ok(())
}

/// A minimal stand-in for the application shell: publishes the kind of
/// event traffic one destroyed power-up brick produces.
fn run_smoke_sequence(runtime: &hakai_runtime::Runtime) {
    let bus = runtime.bus();
    info!("Publishing smoke-test event sequence");

    let events = [
        GameEvent::BrickHit { brick: EntityId(11) },
        GameEvent::BrickDestroyed { brick: EntityId(11) },
        GameEvent::ScoreChanged { score: 10 },
        GameEvent::PowerUpCollected {
            collector: EntityId(1),
            kind: PowerUpKind::SpawnBall,
        },
        GameEvent::BallLost,
        GameEvent::LivesChanged { lives: 2 },
    ];

    for event in events {
        if let Err(err) = bus.publish(event) {
            // Handler failures are non-fatal by design; surface and move on.
            warn!(%err, "Dispatch reported handler failures");
        }
    }
}
