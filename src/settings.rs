//! Settings management for traymotion
//!
//! Handles persistent configuration: icon size, docked edge, animation
//! effects, and the tray-level options. The settings file is the
//! loading layer in front of the attribute stores: `apply` pushes
//! values through `set` so every registered observer sees them, and
//! `capture` reads them back for saving.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{Edge, IconConfig, TrayConfig};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Icon size in pixels
    pub icon_size: u32,

    /// Edge of the screen the tray is docked against
    pub edge: Edge,

    /// Whether to animate size/alpha changes
    pub effects: bool,

    /// Whether all icons start hidden
    pub hidden: bool,

    /// Display name of the tray
    pub tray_name: String,

    /// Where to show main-menu boxes (MENUS_LEFT | MENUS_RIGHT bitmask)
    pub menus: i64,

    /// Where to show separators (MENUS_LEFT | MENUS_RIGHT bitmask)
    pub separators: i64,

    /// When the settings were last saved
    pub saved_at: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            icon_size: 32,
            edge: Edge::Bottom,
            effects: true,
            hidden: false,
            tray_name: "traymotion".to_string(),
            menus: 0,
            separators: 0,
            saved_at: String::new(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("traymotion").join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults on any error
    pub fn load() -> Self {
        Self::load_from(Self::settings_path())
    }

    fn load_from(path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    if let Ok(settings) = serde_json::from_str(&content) {
                        return settings;
                    }
                }
            }
        }
        Self::default()
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::settings_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine settings path"))?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut stamped = self.clone();
        stamped.saved_at = chrono::Utc::now().format("%Y-%m-%d %H:%M").to_string();
        let json = serde_json::to_string_pretty(&stamped)?;
        std::fs::write(path, json)?;

        Ok(())
    }

    /// Build the configuration stores these settings describe.
    pub fn build_configs(&self) -> (IconConfig, TrayConfig) {
        (
            IconConfig::new(self.icon_size.max(1), self.edge, self.effects, self.hidden),
            TrayConfig::new(&self.tray_name, self.menus, self.separators),
        )
    }

    /// Push the settings through the attribute stores. Observers fan
    /// out synchronously; unchanged values notify nobody.
    pub fn apply(&self, icon_config: &mut IconConfig, tray_config: &mut TrayConfig) {
        icon_config.set_size(self.icon_size.max(1));
        icon_config.set_edge(self.edge);
        icon_config.set_effects(self.effects);
        icon_config.set_hidden(self.hidden);
        tray_config.set_name(&self.tray_name);
        tray_config.set_menus(self.menus);
        tray_config.set_separators(self.separators);
    }

    /// Read the current configuration back for saving.
    pub fn capture(icon_config: &IconConfig, tray_config: &TrayConfig) -> Self {
        Self {
            icon_size: icon_config.size(),
            edge: icon_config.edge(),
            effects: icon_config.effects(),
            hidden: icon_config.hidden(),
            tray_name: tray_config.name().to_string(),
            menus: tray_config.menus(),
            separators: tray_config.separators(),
            saved_at: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.icon_size, 32);
        assert_eq!(settings.edge, Edge::Bottom);
        assert!(settings.effects);
        assert!(!settings.hidden);
    }

    #[test]
    fn test_settings_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings {
            icon_size: 48,
            edge: Edge::Left,
            effects: false,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(path));
        assert_eq!(loaded.icon_size, 48);
        assert_eq!(loaded.edge, Edge::Left);
        assert!(!loaded.effects);
        assert!(!loaded.saved_at.is_empty());
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = Settings::load_from(Some(path));
        assert_eq!(loaded.icon_size, Settings::default().icon_size);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(Some(dir.path().join("missing.json")));
        assert_eq!(loaded.icon_size, 32);
    }

    #[test]
    fn test_apply_and_capture() {
        let settings = Settings {
            icon_size: 24,
            edge: Edge::Top,
            ..Settings::default()
        };
        let (mut icon_config, mut tray_config) = Settings::default().build_configs();

        settings.apply(&mut icon_config, &mut tray_config);
        assert_eq!(icon_config.size(), 24);
        assert_eq!(icon_config.edge(), Edge::Top);

        let captured = Settings::capture(&icon_config, &tray_config);
        assert_eq!(captured.icon_size, 24);
        assert_eq!(captured.edge, Edge::Top);
    }

    #[test]
    fn test_partial_settings_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"icon_size": 64}"#).unwrap();

        let loaded = Settings::load_from(Some(path));
        assert_eq!(loaded.icon_size, 64);
        assert_eq!(loaded.edge, Edge::Bottom);
        assert!(loaded.effects);
    }
}
