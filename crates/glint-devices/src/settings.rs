//! Per-family device settings.
//!
//! Every field has a default so a config file only needs to name what it
//! changes:
//!
//! ```toml
//! [dualshock]
//! device_key = "Peripheral"
//! disconnect_when_stop = true
//! ```

use glint_core::LogicalKey;
use serde::{Deserialize, Serialize};

fn default_device_key() -> Option<LogicalKey> {
    Some(LogicalKey::PERIPHERAL)
}

/// Settings shared by every adapter of one device family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceFamilySettings {
    /// Logical key whose composited colour drives the controllers' light.
    /// `None` leaves the family unbound: it connects but never updates.
    #[serde(default = "default_device_key")]
    pub device_key: Option<LogicalKey>,

    /// Sever the Bluetooth and dongle links on shutdown, powering wireless
    /// controllers off.
    #[serde(default)]
    pub disconnect_when_stop: bool,
}

impl Default for DeviceFamilySettings {
    fn default() -> Self {
        Self {
            device_key: default_device_key(),
            disconnect_when_stop: false,
        }
    }
}

impl DeviceFamilySettings {
    /// Unbound settings: the family never receives colour updates.
    pub fn unbound() -> Self {
        Self {
            device_key: None,
            ..Self::default()
        }
    }

    pub fn with_device_key(mut self, key: LogicalKey) -> Self {
        self.device_key = Some(key);
        self
    }

    pub fn with_disconnect_when_stop(mut self, stop: bool) -> Self {
        self.disconnect_when_stop = stop;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binds_peripheral_key() {
        let settings = DeviceFamilySettings::default();
        assert_eq!(settings.device_key, Some(LogicalKey::PERIPHERAL));
        assert!(!settings.disconnect_when_stop);
    }

    #[test]
    fn test_empty_toml_table_uses_defaults() {
        let settings: DeviceFamilySettings = toml::from_str("").expect("empty table parses");
        assert_eq!(settings, DeviceFamilySettings::default());
    }

    #[test]
    fn test_toml_overrides_key_and_stop_policy() {
        // Arrange
        let text = r#"
            device_key = "Peripheral_Logo"
            disconnect_when_stop = true
        "#;

        // Act
        let settings: DeviceFamilySettings = toml::from_str(text).expect("valid settings");

        // Assert
        assert_eq!(settings.device_key, Some(LogicalKey::PERIPHERAL_LOGO));
        assert!(settings.disconnect_when_stop);
    }

    #[test]
    fn test_builders() {
        let settings = DeviceFamilySettings::unbound()
            .with_device_key(LogicalKey::from_static("Escape"))
            .with_disconnect_when_stop(true);
        assert_eq!(settings.device_key, Some(LogicalKey::from_static("Escape")));
        assert!(settings.disconnect_when_stop);
    }
}
