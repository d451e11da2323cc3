//! The capability every device family exposes to the render loop.

use glint_core::ColorMap;

/// A family of lighting devices driven from the composited colour map.
///
/// The render loop only talks to this trait, so new families (keyboards,
/// mice, light strips) plug in without touching it.
pub trait LightingDevice: Send {
    /// Family name used in logs and status output.
    fn name(&self) -> &str;

    /// Discovers and connects controllers.  Returns `true` when at least one
    /// controller is connected.  Calling it again while initialised is a
    /// no-op that reports the current state.
    fn initialize(&mut self) -> bool;

    /// Restores and releases every controller.  No-op when not initialised.
    fn shutdown(&mut self);

    /// `shutdown` followed by `initialize`.
    fn reset(&mut self) -> bool;

    fn is_initialized(&self) -> bool;

    /// Stages the family's colour from `colors`.  Returns `false` when
    /// nothing was staged or a controller turned out to be gone.
    fn update_devices(&mut self, colors: &ColorMap) -> bool;

    /// Reacts to a host hot-plug notification.  Returns `true` when the
    /// family was reset.
    fn on_device_list_changed(&mut self) -> bool;

    /// Human-readable status of every connected controller.
    fn device_details(&self) -> String;
}
