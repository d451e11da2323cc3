//! glint daemon entry point.
//!
//! Wires configuration, the layer stack, the device families and the game
//! state feed together, then runs the render loop until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()           -- TOML file or defaults
//!  └─ build_stack()           -- [[layers]] → LayerStack
//!  └─ start services
//!       ├─ SimulatedDiscovery report thread
//!       ├─ Ctrl-C handler     (Tokio task)
//!       └─ RenderLoop::run    (ticks + hot-plug pump)
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use glint_core::GameState;
use glint_devices::DeviceManager;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use glint_daemon::application::build_stack::build_stack;
use glint_daemon::application::render_loop::RenderLoop;
use glint_daemon::application::state_feed::{StateFeed, StaticStateFeed};
use glint_daemon::infrastructure::simulated::SimulatedDiscovery;
use glint_daemon::infrastructure::state_feed::JsonFileStateFeed;
use glint_daemon::infrastructure::storage::config::{
    load_config, load_config_from, save_config_to, AppConfig,
};

/// Interval between simulated controller reports.
const SIMULATED_REPORT_INTERVAL: Duration = Duration::from_millis(4);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// glint lighting daemon.
///
/// Composites game-driven lighting layers and pushes the result to attached
/// controllers.
#[derive(Debug, Parser)]
#[command(name = "glint-daemon", about = "Game-state driven lighting daemon", version)]
struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, env = "GLINT_CONFIG")]
    config: Option<PathBuf>,

    /// JSON game-state snapshot, re-read every tick.  Overrides the config.
    #[arg(long, env = "GLINT_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Game kind of the snapshot (`dota2`, `rocket_league`).  Overrides the config.
    #[arg(long, env = "GLINT_STATE_KIND")]
    state_kind: Option<String>,

    /// Visual ticks per second.  Overrides the config.
    #[arg(long, env = "GLINT_FPS")]
    fps: Option<u32>,

    /// Number of simulated controllers.  Overrides the config.
    #[arg(long)]
    controllers: Option<usize>,

    /// Simulate a hot-plug every N seconds by unplugging and replugging the
    /// last simulated controller.
    #[arg(long, env = "GLINT_HOTPLUG_EVERY")]
    hotplug_every: Option<u64>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => load_config().context("failed to load config")?,
        };

        if let Some(path) = &self.state_file {
            config.daemon.state_file = Some(path.clone());
        }
        if let Some(kind) = &self.state_kind {
            config.daemon.state_kind = kind.clone();
        }
        if let Some(fps) = self.fps {
            config.daemon.fps = fps;
        }
        if let Some(controllers) = self.controllers {
            config.daemon.simulated_controllers = controllers;
        }
        Ok(config)
    }
}

fn tick_period(fps: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(fps.max(1)))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config();

    // Level is overridden by `RUST_LOG`, else taken from the config.
    let fallback_level = config
        .as_ref()
        .map(|c| c.daemon.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_level)),
        )
        .init();

    let config = config?;

    if cli.write_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => glint_daemon::infrastructure::storage::config::config_file_path()?,
        };
        save_config_to(&path, &config)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        info!("configuration written to {}", path.display());
        return Ok(());
    }

    info!(
        fps = config.daemon.fps,
        layers = config.layers.len(),
        "glint daemon starting"
    );

    // Shutdown flag shared across all background services.
    let running = Arc::new(AtomicBool::new(true));

    // ── Device families ───────────────────────────────────────────────────────
    let (hotplug_tx, mut hotplug_rx) = mpsc::channel(8);
    let discovery = Arc::new(
        SimulatedDiscovery::new(config.daemon.simulated_controllers).with_notifier(hotplug_tx),
    );
    let reports = discovery
        .start_reports(SIMULATED_REPORT_INTERVAL, Arc::clone(&running))
        .context("failed to start simulated report thread")?;

    if let Some(secs) = cli.hotplug_every.filter(|secs| *secs > 0) {
        info!("simulating a hot-plug every {secs}s");
        tokio::spawn(
            Arc::clone(&discovery).cycle_hotplug(Duration::from_secs(secs), Arc::clone(&running)),
        );
    }

    let dualshock = DeviceManager::new("DualShock", config.dualshock.clone(), discovery.clone());

    let mut render = RenderLoop::new(build_stack(&config.layers, &config.templates))
        .with_device(Box::new(dualshock));
    if render.initialize() == 0 {
        info!("no active device families; rendering continues until a controller appears");
    }
    for line in render.status_lines() {
        info!("{line}");
    }

    // ── Game state feed ───────────────────────────────────────────────────────
    let feed: Box<dyn StateFeed> = match &config.daemon.state_file {
        Some(path) => {
            info!("reading {} state from {}", config.daemon.state_kind, path.display());
            Box::new(JsonFileStateFeed::new(path, config.daemon.state_kind.clone()))
        }
        None => {
            info!("no state file configured; rendering an empty {} state", config.daemon.state_kind);
            Box::new(StaticStateFeed::new(GameState::empty(
                config.daemon.state_kind.clone(),
            )))
        }
    };

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl-C signal: {e}"),
        }
    });

    info!("glint daemon ready.  Press Ctrl-C to exit.");

    render
        .run(
            feed.as_ref(),
            tick_period(config.daemon.fps),
            &mut hotplug_rx,
            Arc::clone(&running),
        )
        .await;

    for line in render.status_lines() {
        info!("{line}");
    }
    render.shutdown();
    running.store(false, Ordering::Relaxed);
    if reports.join().is_err() {
        error!("simulated report thread panicked");
    }

    info!("glint daemon stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
