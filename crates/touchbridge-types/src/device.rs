//! Device descriptor types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What a discovered input device is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceRole {
    /// The touch panel. Required; the bridge cannot start without it.
    Touch,
    /// Virtual mouse, driven through its companion node.
    Mouse,
    /// Virtual keyboard, driven through its companion node.
    Keyboard,
    /// Auxiliary key device carrying the back and power keys.
    AuxKey,
    /// Kept open for hot-plug bookkeeping only.
    Unclassified,
}

impl std::fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Touch => write!(f, "touch"),
            Self::Mouse => write!(f, "mouse"),
            Self::Keyboard => write!(f, "keyboard"),
            Self::AuxKey => write!(f, "aux-key"),
            Self::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// Identity reported by an input device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Human-readable name (e.g. "TSC2004 Touchscreen").
    pub name: String,
    /// Physical location string.
    pub location: String,
    /// Unique identifier string, often empty.
    pub unique_id: String,
    /// Driver version as (major, minor, patch).
    pub driver_version: (u8, u8, u8),
    pub bus: u16,
    pub vendor: u16,
    pub product: u16,
}

/// Name substrings used to assign a [`DeviceRole`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMarkers {
    #[serde(default = "default_touch_marker")]
    pub touch: String,
    #[serde(default = "default_mouse_marker")]
    pub mouse: String,
    #[serde(default = "default_keyboard_marker")]
    pub keyboard: String,
    #[serde(default = "default_aux_key_marker")]
    pub aux_key: String,
}

impl Default for DeviceMarkers {
    fn default() -> Self {
        Self {
            touch: default_touch_marker(),
            mouse: default_mouse_marker(),
            keyboard: default_keyboard_marker(),
            aux_key: default_aux_key_marker(),
        }
    }
}

impl DeviceMarkers {
    /// Classify a device by its declared name.
    ///
    /// Markers are tried in the order touch, mouse, keyboard, aux key; the
    /// first one contained in `name` wins. Empty markers never match.
    pub fn classify(&self, name: &str) -> DeviceRole {
        [
            (&self.touch, DeviceRole::Touch),
            (&self.mouse, DeviceRole::Mouse),
            (&self.keyboard, DeviceRole::Keyboard),
            (&self.aux_key, DeviceRole::AuxKey),
        ]
        .into_iter()
        .find(|(marker, _)| !marker.is_empty() && name.contains(marker.as_str()))
        .map_or(DeviceRole::Unclassified, |(_, role)| role)
    }
}

/// A character device node written with compact binary records.
///
/// Created with the given device number when it does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialNode {
    pub path: PathBuf,
    pub major: u64,
    pub minor: u64,
}

fn default_touch_marker() -> String {
    "TSC2004 Touchscreen".to_string()
}

fn default_mouse_marker() -> String {
    "vmouse".to_string()
}

fn default_keyboard_marker() -> String {
    "vkeyboard".to_string()
}

fn default_aux_key_marker() -> String {
    "gpio-keys".to_string()
}
