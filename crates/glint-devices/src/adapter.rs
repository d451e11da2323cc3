//! DeviceAdapter: one physical controller, its report loop and its colour diff.
//!
//! # Lifecycle
//!
//! ```text
//! connect()  ──►  report loop running  ──►  disconnect()
//!   │  capture restore colour                 │  push restore colour
//!   │  subscribe to reports                   │  unsubscribe
//!   │  start_update                           │  [sever BT + dongle]
//!   └  spawn report thread                    │  stop_update
//!                                             └  join report thread
//! ```
//!
//! # Staging and pushing
//!
//! The render path calls [`DeviceAdapter::set_desired`], which only stores
//! the colour.  The report thread compares the staged colour with the last
//! applied one each time the controller delivers a report, and pushes only
//! when they differ.  A stable input therefore costs no hardware writes.
//!
//! Pushes are serialized by a push lock that is separate from the light
//! slots.  The report thread and `disconnect` can never write to the same
//! controller concurrently, and nothing can be pushed after the restore
//! colour.  The light slots are only locked for reads and bookkeeping, never
//! across hardware I/O, so `set_desired` does not wait on a slow transport.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use glint_core::Color;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::transport::{
    ConnectionMedium, HardwareReport, LightState, LightingTransport, TransportError,
};

/// Identifies one adapter instance for the lifetime of its connection.
pub type DeviceId = Uuid;

/// How long the report thread waits before re-checking for cancellation.
///
/// Reports normally arrive every few milliseconds; the timeout only matters
/// for transports that stop reporting without closing the channel.
const REPORT_POLL_INTERVAL: Duration = Duration::from_millis(250);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct LightSlots {
    /// Staged by the render path; `None` until the first tick.
    desired: Option<Color>,
    /// What the controller is known to display.
    applied: Color,
}

/// State shared between the adapter handle and its report thread.
struct Shared {
    lights: Mutex<LightSlots>,
    /// Held for the duration of every hardware write.
    push_lock: Mutex<()>,
    status: Mutex<HardwareReport>,
    alive: AtomicBool,
    cancelled: AtomicBool,
    reports_seen: AtomicU64,
    pushes_issued: AtomicU64,
}

impl Shared {
    /// Pushes the staged colour if it differs from the applied one.
    ///
    /// Returns `Ok(true)` when a write was issued.
    fn flush(&self, transport: &dyn LightingTransport) -> Result<bool, TransportError> {
        let _push = lock(&self.push_lock);
        if self.cancelled.load(Ordering::Acquire) {
            return Ok(false);
        }
        let desired = {
            let lights = lock(&self.lights);
            match lights.desired {
                Some(desired) if desired != lights.applied => desired,
                _ => return Ok(false),
            }
        };

        transport.push_light_state(LightState::new(desired))?;
        self.record_applied(desired);
        Ok(true)
    }

    fn record_applied(&self, color: Color) {
        lock(&self.lights).applied = color;
        self.pushes_issued.fetch_add(1, Ordering::Relaxed);
    }
}

/// Owner of one controller connection.
pub struct DeviceAdapter {
    id: DeviceId,
    identity: String,
    medium: ConnectionMedium,
    restore_color: Color,
    transport: Arc<dyn LightingTransport>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl DeviceAdapter {
    /// Takes ownership of `transport` and starts its report loop.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the report stream cannot be opened or
    /// updates cannot be started, and [`TransportError::Spawn`] if the report
    /// thread cannot be created.  On error the transport is left unsubscribed
    /// and stopped.
    pub fn connect(transport: Arc<dyn LightingTransport>) -> Result<Self, TransportError> {
        let id = Uuid::new_v4();
        let identity = transport.identity();
        let medium = transport.medium();
        let restore_color = transport.current_color();

        let shared = Arc::new(Shared {
            lights: Mutex::new(LightSlots {
                desired: None,
                applied: restore_color,
            }),
            push_lock: Mutex::new(()),
            status: Mutex::new(HardwareReport::default()),
            alive: AtomicBool::new(true),
            cancelled: AtomicBool::new(false),
            reports_seen: AtomicU64::new(0),
            pushes_issued: AtomicU64::new(0),
        });

        let reports = transport.subscribe_reports()?;
        if let Err(e) = transport.start_update() {
            transport.unsubscribe_reports();
            return Err(e);
        }

        let worker = {
            let shared = Arc::clone(&shared);
            let transport = Arc::clone(&transport);
            std::thread::Builder::new()
                .name(format!("glint-device-{}", &id.simple().to_string()[..8]))
                .spawn(move || report_loop(id, shared, transport, reports))
        };
        let worker = match worker {
            Ok(handle) => handle,
            Err(source) => {
                transport.unsubscribe_reports();
                transport.stop_update();
                return Err(TransportError::Spawn { source });
            }
        };

        info!(device = %id, %identity, %medium, restore = %restore_color, "device connected");
        Ok(Self {
            id,
            identity,
            medium,
            restore_color,
            transport,
            shared,
            worker: Some(worker),
        })
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn medium(&self) -> ConnectionMedium {
        self.medium
    }

    /// The colour the controller showed before we connected.
    pub fn restore_color(&self) -> Color {
        self.restore_color
    }

    /// Stages `color` for the next report tick.  Never touches hardware.
    pub fn set_desired(&self, color: Color) {
        lock(&self.shared.lights).desired = Some(color);
        trace!(device = %self.id, %color, "colour staged");
    }

    pub fn desired_color(&self) -> Option<Color> {
        lock(&self.shared.lights).desired
    }

    /// The last colour successfully written to the controller.
    pub fn applied_color(&self) -> Color {
        lock(&self.shared.lights).applied
    }

    /// `false` once a push has failed, the adapter was disconnected, or the
    /// transport reports it is tearing its link down.
    pub fn is_connected(&self) -> bool {
        self.shared.alive.load(Ordering::Acquire)
            && !self.shared.cancelled.load(Ordering::Acquire)
            && !self.transport.is_disconnecting()
    }

    /// Capability snapshot from the most recent report.
    pub fn status(&self) -> HardwareReport {
        *lock(&self.shared.status)
    }

    /// Reports fully processed by the report loop.
    pub fn reports_seen(&self) -> u64 {
        self.shared.reports_seen.load(Ordering::Acquire)
    }

    /// Hardware writes issued, including the restore push.
    pub fn pushes_issued(&self) -> u64 {
        self.shared.pushes_issued.load(Ordering::Relaxed)
    }

    /// One-line description such as `over Bluetooth ⚡ 🔋80% Latency: 4.25ms`.
    ///
    /// Unknown battery or latency render as `--`.
    pub fn status_summary(&self) -> String {
        let status = self.status();
        let charging = if status.charging { " ⚡" } else { "" };
        let battery = status
            .battery
            .map_or_else(|| "--".to_string(), |b| b.to_string());
        let latency = status
            .latency_ms
            .map_or_else(|| "--".to_string(), |l| format!("{l:.2}"));
        format!(
            "over {}{charging} 🔋{battery}% Latency: {latency}ms",
            self.medium
        )
    }

    /// Restores the controller's original colour and releases the connection.
    ///
    /// With `stop_hardware`, both the Bluetooth and the dongle links are
    /// severed as well, since the same controller may be reachable by either.
    /// Calling this more than once has no further effect.
    pub fn disconnect(&mut self, stop_hardware: bool) {
        if self.shared.cancelled.swap(true, Ordering::AcqRel) {
            debug!(device = %self.id, "disconnect called on an already disconnected device");
            return;
        }

        {
            // Waits out an in-flight push; later flushes see `cancelled`.
            let _push = lock(&self.shared.push_lock);
            match self
                .transport
                .push_light_state(LightState::new(self.restore_color))
            {
                Ok(()) => self.shared.record_applied(self.restore_color),
                Err(e) => warn!(device = %self.id, "failed to push restore colour: {e}"),
            }
        }

        self.transport.unsubscribe_reports();
        if stop_hardware {
            self.transport.disconnect_bluetooth();
            self.transport.disconnect_dongle();
        }
        self.transport.stop_update();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(device = %self.id, "report loop panicked");
            }
        }
        self.shared.alive.store(false, Ordering::Release);

        info!(device = %self.id, identity = %self.identity, stop_hardware, "device disconnected");
    }
}

impl Drop for DeviceAdapter {
    fn drop(&mut self) {
        self.disconnect(false);
    }
}

impl std::fmt::Debug for DeviceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceAdapter")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("medium", &self.medium)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

/// Body of the per-device report thread.
fn report_loop(
    id: DeviceId,
    shared: Arc<Shared>,
    transport: Arc<dyn LightingTransport>,
    reports: Receiver<HardwareReport>,
) {
    debug!(device = %id, "report loop started");

    while !shared.cancelled.load(Ordering::Acquire) {
        let report = match reports.recv_timeout(REPORT_POLL_INTERVAL) {
            Ok(report) => report,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        *lock(&shared.status) = report;
        let outcome = shared.flush(transport.as_ref());
        shared.reports_seen.fetch_add(1, Ordering::Release);

        match outcome {
            Ok(true) => trace!(device = %id, "lighting state pushed"),
            Ok(false) => {}
            Err(e) => {
                warn!(device = %id, "push failed, marking device dead: {e}");
                shared.alive.store(false, Ordering::Release);
                break;
            }
        }
    }

    debug!(device = %id, "report loop stopped");
}
