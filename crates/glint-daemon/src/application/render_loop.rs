//! The visual tick and the loop that drives it.
//!
//! ```text
//! every 1/fps:  StateFeed ──► GameState ──► composite(stack) ──► ColorMap
//!                                                                  │
//!                              ┌───────────────────────────────────┘
//!                              ▼
//!               LightingDevice::update_devices  (each family)
//!
//! on hot-plug:  LightingDevice::on_device_list_changed  (each family)
//! ```
//!
//! A failed state read does not stop the loop: the last good snapshot is
//! rendered again so the lights hold steady while the game restarts or the
//! telemetry file is rewritten.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use glint_core::{composite, GameState, LayerStack};
use glint_devices::{DeviceListChanged, LightingDevice};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use crate::application::state_feed::StateFeed;

/// Outcome of one visual tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Keys present in the composited map.
    pub keys: usize,
    /// Device families that accepted the update.
    pub updated: usize,
    /// Device families that were skipped or reset.
    pub failed: usize,
}

pub struct RenderLoop {
    stack: LayerStack,
    devices: Vec<Box<dyn LightingDevice>>,
    last_state: Option<GameState>,
    feed_failing: bool,
    ticks: u64,
}

impl RenderLoop {
    pub fn new(stack: LayerStack) -> Self {
        Self {
            stack,
            devices: Vec::new(),
            last_state: None,
            feed_failing: false,
            ticks: 0,
        }
    }

    pub fn with_device(mut self, device: Box<dyn LightingDevice>) -> Self {
        self.devices.push(device);
        self
    }

    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    pub fn devices(&self) -> &[Box<dyn LightingDevice>] {
        &self.devices
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Initialises every family.  Returns the number that are active.
    pub fn initialize(&mut self) -> usize {
        let mut active = 0;
        for device in &mut self.devices {
            if device.initialize() {
                active += 1;
            } else {
                info!(family = device.name(), "device family not active");
            }
        }
        active
    }

    pub fn shutdown(&mut self) {
        for device in &mut self.devices {
            device.shutdown();
        }
    }

    /// Composites `state` once and hands the result to every family.
    pub fn tick(&mut self, state: &GameState) -> TickReport {
        let colors = composite(&self.stack, state);
        let mut report = TickReport {
            keys: colors.len(),
            ..TickReport::default()
        };

        for device in &mut self.devices {
            if device.update_devices(&colors) {
                report.updated += 1;
            } else {
                report.failed += 1;
            }
        }

        self.ticks += 1;
        trace!(tick = self.ticks, ?report, "tick rendered");
        report
    }

    /// Forwards a hot-plug notification to every family.  Returns how many
    /// families reset.
    pub fn on_device_list_changed(&mut self) -> usize {
        let mut resets = 0;
        for device in &mut self.devices {
            if device.on_device_list_changed() {
                resets += 1;
            }
        }
        resets
    }

    /// `"<family>: <details>"` for each family.
    pub fn status_lines(&self) -> Vec<String> {
        self.devices
            .iter()
            .map(|d| format!("{}: {}", d.name(), d.device_details()))
            .collect()
    }

    async fn next_state(&mut self, feed: &dyn StateFeed) -> Option<GameState> {
        match feed.next_state().await {
            Ok(state) => {
                if self.feed_failing {
                    info!("game state feed recovered");
                    self.feed_failing = false;
                }
                self.last_state = Some(state.clone());
                Some(state)
            }
            Err(e) => {
                if !self.feed_failing {
                    warn!("game state unavailable, holding last snapshot: {e}");
                    self.feed_failing = true;
                }
                self.last_state.clone()
            }
        }
    }

    /// Ticks every `period` until `running` is cleared, handling hot-plug
    /// notifications in between.
    pub async fn run(
        &mut self,
        feed: &dyn StateFeed,
        period: Duration,
        hotplug: &mut mpsc::Receiver<DeviceListChanged>,
        running: Arc<AtomicBool>,
    ) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while running.load(Ordering::Relaxed) {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(state) = self.next_state(feed).await {
                        self.tick(&state);
                    }
                }
                Some(DeviceListChanged) = hotplug.recv() => {
                    let resets = self.on_device_list_changed();
                    debug!(resets, "device list change handled");
                }
            }
        }

        info!(ticks = self.ticks, "render loop stopped");
    }
}

impl std::fmt::Debug for RenderLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderLoop")
            .field("layers", &self.stack.len())
            .field("devices", &self.devices.len())
            .field("ticks", &self.ticks)
            .finish()
    }
}
