//! Hardware transport contracts.
//!
//! A [`LightingTransport`] is one physical controller reachable over USB,
//! Bluetooth or a wireless dongle.  The controller emits hardware reports
//! (battery, charge, link latency) on its own schedule; the adapter treats
//! each report as the moment to push pending lighting changes.
//!
//! # Report subscription
//!
//! `subscribe_reports` hands out the receiving end of a channel, in the same
//! way an input source hands out its event receiver.  `unsubscribe_reports`
//! must drop the sending end so the receiver observes disconnection.
//!
//! # Testability
//!
//! [`mock::MockTransport`] records every call and lets tests inject reports
//! without hardware.

use std::fmt;
use std::sync::mpsc;
use std::sync::Arc;

use glint_core::Color;
use thiserror::Error;

pub mod mock;

/// How a controller is attached to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionMedium {
    Usb,
    Bluetooth,
    /// Vendor wireless adapter (USB dongle paired to the controller).
    WirelessDongle,
}

impl fmt::Display for ConnectionMedium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionMedium::Usb => "USB",
            ConnectionMedium::Bluetooth => "Bluetooth",
            ConnectionMedium::WirelessDongle => "Wireless adapter",
        };
        f.write_str(label)
    }
}

/// Capability snapshot carried by one hardware report.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HardwareReport {
    /// Battery percentage, when the controller reports one.
    pub battery: Option<u8>,
    pub charging: bool,
    /// Round-trip link latency, wireless media only.
    pub latency_ms: Option<f64>,
}

/// The complete lighting state sent in a single push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightState {
    pub color: Color,
    /// Set when every colour channel is zero.  Some transports switch the
    /// light off as a distinct hardware mode instead of displaying black.
    pub explicitly_off: bool,
}

impl LightState {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            explicitly_off: color.is_black(),
        }
    }
}

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The controller is gone (unplugged, out of range, powered off).
    #[error("controller disconnected")]
    Disconnected,
    /// The write reached the OS but failed.
    #[error("write failed: {0}")]
    Write(String),
    /// The report stream could not be opened.
    #[error("failed to subscribe to hardware reports: {0}")]
    Subscribe(String),
    /// The per-device report thread could not be spawned.
    #[error("failed to spawn report loop: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },
}

/// One physical lighting controller.
///
/// Implementations must be safe to call from the adapter's report thread and
/// from the render thread; the adapter guarantees pushes are never issued
/// concurrently.
pub trait LightingTransport: Send + Sync {
    /// Stable, human-readable identity (serial number, MAC) used in logs.
    fn identity(&self) -> String;

    fn medium(&self) -> ConnectionMedium;

    /// The colour the controller shows right now, before we touch it.
    fn current_color(&self) -> Color;

    /// Starts the controller's report production.
    fn start_update(&self) -> Result<(), TransportError>;

    fn stop_update(&self);

    /// Opens the report stream.
    fn subscribe_reports(&self) -> Result<mpsc::Receiver<HardwareReport>, TransportError>;

    /// Closes the report stream by dropping its sender.
    fn unsubscribe_reports(&self);

    /// Writes one complete lighting state.
    fn push_light_state(&self, state: LightState) -> Result<(), TransportError>;

    /// Drops the Bluetooth link, if any.
    fn disconnect_bluetooth(&self);

    /// Drops the wireless-dongle link, if any.
    fn disconnect_dongle(&self);

    /// `true` once the controller has started tearing its link down.
    fn is_disconnecting(&self) -> bool;
}

/// Error type for controller discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The OS device enumeration API failed.
    #[error("device enumeration failed: {0}")]
    Enumeration(String),
}

/// Enumerates the controllers of one device family.
#[cfg_attr(test, mockall::automock)]
pub trait ControllerDiscovery: Send + Sync {
    /// Returns one transport per controller currently attached.
    fn find_controllers(&self) -> Result<Vec<Arc<dyn LightingTransport>>, DiscoveryError>;

    /// Number of matching controllers, without opening them.
    fn count_controllers(&self) -> Result<usize, DiscoveryError> {
        self.find_controllers().map(|found| found.len())
    }

    /// Releases any family-wide resources acquired by discovery.
    fn stop_controllers(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_state_marks_black_as_off() {
        assert!(LightState::new(Color::BLACK).explicitly_off);
        assert!(LightState::new(Color::rgba(0, 0, 0, 10)).explicitly_off);
        assert!(!LightState::new(Color::rgb(0, 0, 1)).explicitly_off);
    }

    #[test]
    fn test_medium_labels() {
        assert_eq!(ConnectionMedium::Usb.to_string(), "USB");
        assert_eq!(ConnectionMedium::Bluetooth.to_string(), "Bluetooth");
        assert_eq!(ConnectionMedium::WirelessDongle.to_string(), "Wireless adapter");
    }
}
