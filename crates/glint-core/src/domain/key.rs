//! Logical lighting keys.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for one addressable light, independent of wiring.
///
/// A key may name a keyboard key (`"Q"`), an LED zone or a device-specific
/// light (`"Peripheral"`).  It is the join key between effect layers, the
/// compositor output and device families.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalKey(Cow<'static, str>);

impl LogicalKey {
    /// The generic peripheral light (controller light bars, mouse logos).
    pub const PERIPHERAL: LogicalKey = LogicalKey::from_static("Peripheral");
    pub const PERIPHERAL_LOGO: LogicalKey = LogicalKey::from_static("Peripheral_Logo");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for LogicalKey {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}
