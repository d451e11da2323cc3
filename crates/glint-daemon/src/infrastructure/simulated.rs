//! Simulated DualShock family for running the daemon without hardware.
//!
//! [`SimulatedDiscovery`] owns a set of [`MockTransport`] controllers and a
//! background thread that emits hardware reports for each attached
//! controller at a fixed interval, the way a real controller streams input
//! reports.  Controllers alternate between USB and Bluetooth so the status
//! output shows both shapes.
//!
//! Hot-plug is simulated with [`SimulatedDiscovery::set_attached`], which
//! changes the attached count and posts a [`DeviceListChanged`] notification
//! on the channel the daemon's pump listens to.
//! [`SimulatedDiscovery::cycle_hotplug`] drives it on a timer (the daemon's
//! `--hotplug-every` flag), alternately unplugging and replugging the last
//! controller.
//!
//! # Report thread
//!
//! The thread sleeps for the report interval between rounds and checks the
//! `running` flag on each wake-up; clearing the flag stops it within one
//! interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use glint_core::Color;
use glint_devices::transport::mock::MockTransport;
use glint_devices::{
    ConnectionMedium, ControllerDiscovery, DeviceListChanged, DiscoveryError, HardwareReport,
    LightingTransport,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Colour every simulated controller shows before the daemon touches it.
pub const SIMULATED_INITIAL_COLOR: Color = Color::rgb(0, 0, 64);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn simulated_controller(index: usize) -> Arc<MockTransport> {
    let medium = if index % 2 == 0 {
        ConnectionMedium::Usb
    } else {
        ConnectionMedium::Bluetooth
    };
    Arc::new(MockTransport::new(
        format!("sim-ds4-{index}"),
        medium,
        SIMULATED_INITIAL_COLOR,
    ))
}

/// Deterministic report for controller `index` on round `round`.
fn simulated_report(index: usize, medium: ConnectionMedium, round: u64) -> HardwareReport {
    let drained = u8::try_from((round / 100) % 100).unwrap_or(0);
    match medium {
        ConnectionMedium::Usb => HardwareReport {
            battery: Some(100 - drained),
            charging: true,
            latency_ms: None,
        },
        _ => HardwareReport {
            battery: Some(100 - drained),
            charging: false,
            latency_ms: Some(4.0 + index as f64),
        },
    }
}

/// Controller discovery backed by simulated controllers.
pub struct SimulatedDiscovery {
    pool: Mutex<Vec<Arc<MockTransport>>>,
    attached: Mutex<usize>,
    notifier: Option<mpsc::Sender<DeviceListChanged>>,
}

impl SimulatedDiscovery {
    /// Creates `count` attached controllers.
    pub fn new(count: usize) -> Self {
        Self {
            pool: Mutex::new((0..count).map(simulated_controller).collect()),
            attached: Mutex::new(count),
            notifier: None,
        }
    }

    /// Posts hot-plug notifications on `notifier`.
    pub fn with_notifier(mut self, notifier: mpsc::Sender<DeviceListChanged>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The controllers currently attached.
    pub fn attached(&self) -> Vec<Arc<MockTransport>> {
        let count = *lock(&self.attached);
        lock(&self.pool).iter().take(count).cloned().collect()
    }

    /// Plugs or unplugs controllers until `count` are attached, then notifies.
    ///
    /// Returns `false` if the notification could not be queued.
    pub fn set_attached(&self, count: usize) -> bool {
        {
            let mut pool = lock(&self.pool);
            while pool.len() < count {
                let index = pool.len();
                pool.push(simulated_controller(index));
            }
        }
        *lock(&self.attached) = count;
        info!(count, "simulated controllers attached");

        match &self.notifier {
            Some(tx) => tx.try_send(DeviceListChanged).is_ok(),
            None => false,
        }
    }

    /// Every `period`, unplugs the last controller or plugs it back in,
    /// until `running` is cleared.
    pub async fn cycle_hotplug(self: Arc<Self>, period: Duration, running: Arc<AtomicBool>) {
        let full = *lock(&self.attached);
        while running.load(Ordering::Relaxed) {
            tokio::time::sleep(period).await;
            let next = if *lock(&self.attached) == full {
                full.saturating_sub(1)
            } else {
                full
            };
            if !self.set_attached(next) {
                debug!("hot-plug notification dropped");
            }
        }
    }

    /// Spawns the report thread.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the thread cannot be spawned.
    pub fn start_reports(
        self: &Arc<Self>,
        interval: Duration,
        running: Arc<AtomicBool>,
    ) -> std::io::Result<JoinHandle<()>> {
        let discovery = Arc::clone(self);
        std::thread::Builder::new()
            .name("glint-sim-reports".to_string())
            .spawn(move || {
                let mut round = 0u64;
                while running.load(Ordering::Relaxed) {
                    for (index, controller) in discovery.attached().iter().enumerate() {
                        // Unsubscribed controllers simply drop the report.
                        controller.emit_report(simulated_report(
                            index,
                            controller.medium(),
                            round,
                        ));
                    }
                    round = round.wrapping_add(1);
                    std::thread::sleep(interval);
                }
                debug!("simulated report thread stopped");
            })
    }
}

impl ControllerDiscovery for SimulatedDiscovery {
    fn find_controllers(&self) -> Result<Vec<Arc<dyn LightingTransport>>, DiscoveryError> {
        Ok(self
            .attached()
            .into_iter()
            .map(|t| t as Arc<dyn LightingTransport>)
            .collect())
    }

    fn count_controllers(&self) -> Result<usize, DiscoveryError> {
        Ok(*lock(&self.attached))
    }

    fn stop_controllers(&self) {
        debug!("simulated controllers released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_devices::{DeviceFamilySettings, DeviceManager, LightingDevice};

    #[test]
    fn test_discovers_configured_count() {
        let discovery = SimulatedDiscovery::new(2);

        let found = discovery.find_controllers().expect("simulated discovery");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].medium(), ConnectionMedium::Usb);
        assert_eq!(found[1].medium(), ConnectionMedium::Bluetooth);
        assert_eq!(found[0].current_color(), SIMULATED_INITIAL_COLOR);
    }

    #[test]
    fn test_set_attached_notifies_and_changes_count() {
        // Arrange
        let (tx, mut rx) = mpsc::channel(4);
        let discovery = SimulatedDiscovery::new(2).with_notifier(tx);

        // Act
        assert!(discovery.set_attached(1));

        // Assert
        assert_eq!(discovery.count_controllers().expect("count"), 1);
        assert_eq!(rx.try_recv().ok(), Some(DeviceListChanged));
    }

    #[tokio::test]
    async fn test_hotplug_cycle_alternates_unplug_and_replug() {
        // Arrange
        let (tx, mut rx) = mpsc::channel(4);
        let discovery = Arc::new(SimulatedDiscovery::new(2).with_notifier(tx));
        let running = Arc::new(AtomicBool::new(true));
        let cycle = tokio::spawn(
            Arc::clone(&discovery).cycle_hotplug(Duration::from_millis(20), Arc::clone(&running)),
        );

        // Act / Assert
        rx.recv().await.expect("unplug notification");
        assert_eq!(discovery.count_controllers().expect("count"), 1);
        rx.recv().await.expect("replug notification");
        assert_eq!(discovery.count_controllers().expect("count"), 2);

        running.store(false, Ordering::Relaxed);
        cycle.await.expect("cycle task");
    }

    #[test]
    fn test_replugging_reuses_the_same_controller() {
        let discovery = SimulatedDiscovery::new(2);
        let first = Arc::clone(&discovery.attached()[1]);

        discovery.set_attached(1);
        discovery.set_attached(2);

        assert!(Arc::ptr_eq(&first, &discovery.attached()[1]));
    }

    #[test]
    fn test_report_thread_feeds_connected_adapters() {
        // Arrange
        let discovery = Arc::new(SimulatedDiscovery::new(2));
        let running = Arc::new(AtomicBool::new(true));
        let mut manager = DeviceManager::new(
            "DualShock",
            DeviceFamilySettings::default(),
            discovery.clone(),
        );
        assert!(manager.initialize());

        // Act
        let handle = discovery
            .start_reports(Duration::from_millis(1), Arc::clone(&running))
            .expect("spawn report thread");
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while manager.adapters().iter().any(|a| a.reports_seen() == 0) {
            assert!(std::time::Instant::now() < deadline, "no reports arrived");
            std::thread::sleep(Duration::from_millis(1));
        }
        running.store(false, Ordering::Relaxed);
        handle.join().expect("report thread");

        // Assert
        assert!(manager.charging(), "first controller is on USB power");
        assert_eq!(manager.adapters()[1].status().latency_ms, Some(5.0));
    }
}
