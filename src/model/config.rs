use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::column::Column;
use super::dataset::default_columns;

/// Configuration from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_columns")]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            columns: default_columns(),
            input: InputConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

/// How mouse presses turn into drags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerMode {
    /// Drag starts after the pointer travels `drag_distance` cells
    #[default]
    Distance,
    /// Drag starts after holding still for `hold_delay_ms`
    Hold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub pointer: PointerMode,
    /// Cells the pointer must travel before a press becomes a drag
    #[serde(default = "default_drag_distance")]
    pub drag_distance: u16,
    /// Hold time before a press becomes a drag in hold mode
    #[serde(default = "default_hold_delay_ms")]
    pub hold_delay_ms: u64,
    /// Movement allowed during the hold before it counts as a scroll
    #[serde(default = "default_hold_tolerance")]
    pub hold_tolerance: u16,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            pointer: PointerMode::Distance,
            drag_distance: default_drag_distance(),
            hold_delay_ms: default_hold_delay_ms(),
            hold_tolerance: default_hold_tolerance(),
        }
    }
}

fn default_drag_distance() -> u16 {
    1
}

fn default_hold_delay_ms() -> u64 {
    300
}

fn default_hold_tolerance() -> u16 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme overrides, e.g. `primary = "#539190"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
