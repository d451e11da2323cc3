//! TOML-based configuration persistence for the daemon.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Glint\config.toml`
//! - Linux:    `~/.config/glint/config.toml`
//! - macOS:    `~/Library/Application Support/Glint/config.toml`
//!
//! An explicit path (`--config`) bypasses the platform lookup.
//!
//! ```toml
//! [daemon]
//! log_level = "info"
//! fps = 30
//! state_kind = "dota2"
//!
//! [dualshock]
//! device_key = "Peripheral"
//! disconnect_when_stop = false
//!
//! [templates.abilities]
//! blocked_color = "#FF0000"
//!
//! [[layers]]
//! type = "abilities"
//! ```
//!
//! Every section and field is optional; absent ones take the defaults below,
//! so a first run without any file behaves like an empty file.

use std::path::{Path, PathBuf};

use glint_devices::DeviceFamilySettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::build_stack::{default_layers, LayerConfig, TemplateConfig};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level daemon configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub daemon: DaemonConfig,
    /// Settings for the DualShock controller family.
    #[serde(default)]
    pub dualshock: DeviceFamilySettings,
    #[serde(default)]
    pub templates: TemplateConfig,
    /// Layers, bottom to top.
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerConfig>,
}

/// General daemon behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonConfig {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Visual ticks per second.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Game kind assumed for the state file (`"dota2"`, `"rocket_league"`).
    #[serde(default = "default_state_kind")]
    pub state_kind: String,
    /// JSON snapshot file re-read every tick.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state_file: Option<PathBuf>,
    /// Number of simulated controllers to attach.
    #[serde(default = "default_simulated_controllers")]
    pub simulated_controllers: usize,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_fps() -> u32 {
    30
}
fn default_state_kind() -> String {
    "dota2".to_string()
}
fn default_simulated_controllers() -> usize {
    1
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            daemon: DaemonConfig::default(),
            dualshock: DeviceFamilySettings::default(),
            templates: TemplateConfig::default(),
            layers: default_layers(),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            fps: default_fps(),
            state_kind: default_state_kind(),
            state_file: None,
            simulated_controllers: default_simulated_controllers(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the platform config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let dir = platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(dir.join("config.toml"))
}

/// Loads `AppConfig` from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to the platform config file.
///
/// # Errors
///
/// See [`save_config_to`].
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(&config_file_path()?, config)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the `Glint` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Glint"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("glint"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Glint")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::build_stack::LayerKind;
    use glint_core::{BlendMode, Color, LogicalKey};
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("glint_test_{}", Uuid::new_v4()))
    }

    #[test]
    fn test_app_config_default_values() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.daemon.fps, 30);
        assert_eq!(cfg.daemon.log_level, "info");
        assert_eq!(cfg.daemon.state_kind, "dota2");
        assert_eq!(cfg.dualshock.device_key, Some(LogicalKey::PERIPHERAL));
        assert_eq!(cfg.layers.len(), 3);
    }

    #[test]
    fn test_empty_toml_equals_default() {
        let cfg: AppConfig = toml::from_str("").expect("empty config parses");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_app_config_round_trips_through_toml() {
        // Arrange
        let mut cfg = AppConfig::default();
        cfg.daemon.fps = 60;
        cfg.daemon.state_file = Some(PathBuf::from("/tmp/state.json"));
        cfg.dualshock.disconnect_when_stop = true;
        cfg.templates.abilities.blocked_color = Some(Color::rgb(128, 0, 0));
        cfg.layers[2].blend = BlendMode::AlphaOver;

        // Act
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: AppConfig = toml::from_str(&text).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        // Arrange
        let text = r#"
[daemon]
fps = 10

[dualshock]
disconnect_when_stop = true
"#;

        // Act
        let cfg: AppConfig = toml::from_str(text).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.daemon.fps, 10);
        assert_eq!(cfg.daemon.log_level, "info");
        assert!(cfg.dualshock.disconnect_when_stop);
        assert_eq!(cfg.dualshock.device_key, Some(LogicalKey::PERIPHERAL));
    }

    #[test]
    fn test_explicit_layers_replace_default_stack() {
        let text = r##"
[[layers]]
type = "solid"
color = "#FF0000"
keys = ["Peripheral"]
"##;

        let cfg: AppConfig = toml::from_str(text).expect("deserialize layers");

        assert_eq!(cfg.layers.len(), 1);
        assert!(matches!(cfg.layers[0].kind, LayerKind::Solid { .. }));
    }

    #[test]
    fn test_invalid_color_is_a_parse_error() {
        let text = r##"
[templates.abilities]
ready_color = "#GG0000"
"##;
        assert!(toml::from_str::<AppConfig>(text).is_err());
    }

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let path = temp_dir().join("config.toml");

        let cfg = load_config_from(&path).expect("missing file is not an error");

        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_load_config_reports_malformed_toml() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("config.toml");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        // Act
        let result = load_config_from(&path);

        // Assert
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_creates_directory_and_loads_back() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.daemon.simulated_controllers = 3;

        // Act
        save_config_to(&path, &cfg).expect("save");
        let loaded = load_config_from(&path).expect("load");

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
    }
}
