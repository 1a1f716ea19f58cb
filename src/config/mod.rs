//! Reactive configuration
//!
//! Named, typed attributes with change-notification fan-out, plus the
//! typed configuration objects built on top of them.

pub mod attributes;
pub mod icon_config;
pub mod tray_config;

pub use attributes::{AttrValue, AttributeChange, AttributeStore, Configurable};
pub use icon_config::IconConfig;
pub use tray_config::{TrayConfig, MENUS_LEFT, MENUS_RIGHT};

use serde::{Deserialize, Serialize};

/// Screen edge a tray is docked against.
///
/// Affects the layout axis (vertical trays elongate along y) and where
/// the directional arrow overlay is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Not docked; behaves like a horizontal tray for layout purposes.
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// True for trays laid out along the y axis.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }

    /// Parse from a CLI-style name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "none" => Some(Edge::None),
            "top" => Some(Edge::Top),
            "bottom" => Some(Edge::Bottom),
            "left" => Some(Edge::Left),
            "right" => Some(Edge::Right),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Edge::None => "none",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
