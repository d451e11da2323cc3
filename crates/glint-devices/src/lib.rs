//! # glint-devices
//!
//! The device side of glint: everything between a composited
//! [`ColorMap`](glint_core::ColorMap) and the hardware.
//!
//! ```text
//! ColorMap ──► DeviceManager (one per device family)
//!                 ├─ DeviceAdapter ──► LightingTransport ──► controller #1
//!                 └─ DeviceAdapter ──► LightingTransport ──► controller #2
//! ```
//!
//! - **`transport`** – The hardware contract ([`LightingTransport`]) and the
//!   discovery contract ([`ControllerDiscovery`]).  Real HID/Bluetooth stacks
//!   implement these; [`transport::mock`] provides recording doubles.
//!
//! - **`adapter`** – [`DeviceAdapter`] owns one connection, its report loop
//!   thread, and the staged/applied colour diff that suppresses redundant
//!   writes.
//!
//! - **`manager`** – [`DeviceManager`] owns every adapter of a family,
//!   handles discovery, hot-plug resets and the per-tick fan-out.
//!
//! - **`settings`** – Per-family configuration (bound key, stop policy).

pub mod adapter;
pub mod device;
pub mod manager;
pub mod settings;
pub mod transport;

pub use adapter::{DeviceAdapter, DeviceId};
pub use device::LightingDevice;
pub use manager::{DeviceListChanged, DeviceManager};
pub use settings::DeviceFamilySettings;
pub use transport::{
    ConnectionMedium, ControllerDiscovery, DiscoveryError, HardwareReport, LightState,
    LightingTransport, TransportError,
};
