//! DeviceManager: one device family's fleet of adapters.
//!
//! The manager owns discovery, the per-tick fan-out of the family's colour to
//! every adapter, and recovery.  Recovery is always a full reset: a hot-plug
//! notification that changes the controller count, or an adapter found dead
//! mid-update, tears the whole fleet down and rediscovers it.  Fleet changes
//! are rare compared to the tick rate, so the simple path wins.

use std::sync::Arc;

use glint_core::{correct_with_alpha, ColorMap};
use tracing::{debug, info, warn};

use crate::adapter::DeviceAdapter;
use crate::device::LightingDevice;
use crate::settings::DeviceFamilySettings;
use crate::transport::ControllerDiscovery;

/// Host notification that the set of attached devices changed.
///
/// Carries no payload; the manager recounts for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceListChanged;

pub struct DeviceManager {
    name: String,
    settings: DeviceFamilySettings,
    discovery: Arc<dyn ControllerDiscovery>,
    adapters: Vec<DeviceAdapter>,
    initialized: bool,
    resets: u64,
}

impl DeviceManager {
    pub fn new(
        name: impl Into<String>,
        settings: DeviceFamilySettings,
        discovery: Arc<dyn ControllerDiscovery>,
    ) -> Self {
        Self {
            name: name.into(),
            settings,
            discovery,
            adapters: Vec::new(),
            initialized: false,
            resets: 0,
        }
    }

    pub fn settings(&self) -> &DeviceFamilySettings {
        &self.settings
    }

    pub fn adapters(&self) -> &[DeviceAdapter] {
        &self.adapters
    }

    pub fn device_count(&self) -> usize {
        self.adapters.len()
    }

    /// Number of resets performed since construction.
    pub fn reset_count(&self) -> u64 {
        self.resets
    }

    /// Battery percentage of the first controller, if known.
    pub fn battery(&self) -> Option<u8> {
        self.adapters.first().and_then(|a| a.status().battery)
    }

    /// Link latency of the first controller, if known.
    pub fn latency(&self) -> Option<f64> {
        self.adapters.first().and_then(|a| a.status().latency_ms)
    }

    pub fn charging(&self) -> bool {
        self.adapters.first().is_some_and(|a| a.status().charging)
    }

    fn connect_all(&mut self) {
        let transports = match self.discovery.find_controllers() {
            Ok(found) => found,
            Err(e) => {
                warn!(family = %self.name, "controller discovery failed: {e}");
                return;
            }
        };

        for transport in transports {
            let identity = transport.identity();
            match DeviceAdapter::connect(transport) {
                Ok(adapter) => self.adapters.push(adapter),
                Err(e) => warn!(family = %self.name, %identity, "failed to connect controller: {e}"),
            }
        }
    }
}

impl LightingDevice for DeviceManager {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) -> bool {
        if self.initialized {
            return !self.adapters.is_empty();
        }

        self.connect_all();
        self.initialized = !self.adapters.is_empty();

        if self.initialized {
            info!(family = %self.name, devices = self.adapters.len(), "device family initialized");
        } else {
            // Not active: release discovery now, since shutdown will not run.
            self.discovery.stop_controllers();
            info!(family = %self.name, "no controllers found");
        }
        self.initialized
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        let stop = self.settings.disconnect_when_stop;
        for adapter in &mut self.adapters {
            adapter.disconnect(stop);
        }
        self.adapters.clear();
        self.discovery.stop_controllers();
        self.initialized = false;

        info!(family = %self.name, "device family shut down");
    }

    fn reset(&mut self) -> bool {
        self.resets += 1;
        debug!(family = %self.name, resets = self.resets, "resetting device family");
        self.shutdown();
        self.initialize()
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn update_devices(&mut self, colors: &ColorMap) -> bool {
        if !self.initialized {
            return false;
        }
        let Some(key) = self.settings.device_key.as_ref() else {
            return false;
        };
        let Some(&color) = colors.get(key) else {
            return false;
        };

        let color = correct_with_alpha(color);
        let dead = self.adapters.iter().position(|adapter| {
            adapter.set_desired(color);
            !adapter.is_connected()
        });

        match dead {
            None => true,
            Some(index) => {
                warn!(
                    family = %self.name,
                    device = index + 1,
                    "controller lost during update, resetting"
                );
                self.reset();
                false
            }
        }
    }

    fn on_device_list_changed(&mut self) -> bool {
        let found = match self.discovery.count_controllers() {
            Ok(count) => count,
            Err(e) => {
                warn!(family = %self.name, "controller recount failed: {e}");
                return false;
            }
        };

        if found == self.adapters.len() {
            debug!(family = %self.name, found, "device list changed, count unchanged");
            return false;
        }

        info!(
            family = %self.name,
            tracked = self.adapters.len(),
            found,
            "controller count changed, resetting"
        );
        self.reset();
        true
    }

    fn device_details(&self) -> String {
        self.adapters
            .iter()
            .enumerate()
            .map(|(i, adapter)| format!("#{} {}", i + 1, adapter.status_summary()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Drop for DeviceManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for DeviceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceManager")
            .field("name", &self.name)
            .field("settings", &self.settings)
            .field("adapters", &self.adapters)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
