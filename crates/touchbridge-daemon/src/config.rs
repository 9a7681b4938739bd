//! Daemon configuration loaded from TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use touchbridge_input::RegistryConfig;
use touchbridge_types::{DeviceMarkers, FallbackResolution, SpecialNode};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub devices: DevicesConfig,
    #[serde(default)]
    pub touch: TouchConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

/// Listener and runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_backlog")]
    pub backlog: u32,
    /// Bytes requested per socket read. The line buffer holds twice this.
    #[serde(default = "default_read_chunk")]
    pub read_chunk: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            backlog: default_backlog(),
            read_chunk: default_read_chunk(),
            log_level: default_log_level(),
        }
    }
}

/// Device discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default)]
    pub markers: DeviceMarkers,
    #[serde(default = "default_mouse_node")]
    pub mouse_node: SpecialNode,
    #[serde(default = "default_keyboard_node")]
    pub keyboard_node: SpecialNode,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            markers: DeviceMarkers::default(),
            mouse_node: default_mouse_node(),
            keyboard_node: default_keyboard_node(),
        }
    }
}

/// Touch panel settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TouchConfig {
    /// Used when the panel reports a zero resolution.
    #[serde(default)]
    pub fallback: FallbackResolution,
}

/// Host integration used by the system commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Key code sent by `O` without an argument.
    #[serde(default = "default_keyevent")]
    pub default_keyevent: u32,
    #[serde(default = "default_backlight")]
    pub backlight: PathBuf,
    #[serde(default = "default_battery_dir")]
    pub battery_dir: PathBuf,
    #[serde(default = "default_mock_location_action")]
    pub mock_location_action: String,
    #[serde(default = "default_activity_manager")]
    pub activity_manager: String,
    #[serde(default = "default_input_tool")]
    pub input_tool: String,
    #[serde(default = "default_settings_tool")]
    pub settings_tool: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            default_keyevent: default_keyevent(),
            backlight: default_backlight(),
            battery_dir: default_battery_dir(),
            mock_location_action: default_mock_location_action(),
            activity_manager: default_activity_manager(),
            input_tool: default_input_tool(),
            settings_tool: default_settings_tool(),
        }
    }
}

impl Config {
    /// Device registry settings derived from this config.
    pub fn registry(&self) -> RegistryConfig {
        RegistryConfig {
            dir: self.devices.input_dir.clone(),
            markers: self.devices.markers.clone(),
            mouse_node: self.devices.mouse_node.clone(),
            keyboard_node: self.devices.keyboard_node.clone(),
            fallback: self.touch.fallback,
        }
    }
}

fn default_port() -> u16 {
    2301
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_backlog() -> u32 {
    5
}

fn default_read_chunk() -> usize {
    touchbridge_protocol::DEFAULT_READ_CHUNK
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("/dev/input")
}

fn default_mouse_node() -> SpecialNode {
    SpecialNode {
        path: PathBuf::from("/dev/vmouse"),
        major: 10,
        minor: 240,
    }
}

fn default_keyboard_node() -> SpecialNode {
    SpecialNode {
        path: PathBuf::from("/dev/vkeyboard"),
        major: 10,
        minor: 241,
    }
}

fn default_keyevent() -> u32 {
    82
}

fn default_backlight() -> PathBuf {
    PathBuf::from("/sys/class/leds/lcd-backlight/brightness")
}

fn default_battery_dir() -> PathBuf {
    PathBuf::from("/sys/class/power_supply/battery")
}

fn default_mock_location_action() -> String {
    "com.touchbridge.MOCK_LOCATION".to_string()
}

fn default_activity_manager() -> String {
    "am".to_string()
}

fn default_input_tool() -> String {
    "input".to_string()
}

fn default_settings_tool() -> String {
    "settings".to_string()
}
