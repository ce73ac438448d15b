//! Editor configuration, loaded from an optional JSON file.
//!
//! Every field has a default so a missing file (the common case) just
//! runs the stock editor; a file that exists but fails to parse is a
//! startup error rather than a silent fallback.

use std::path::Path;

use serde::Deserialize;

use tf_core::grid::GridConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Tick-rate cap, frames per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    #[serde(default = "default_minimized_delay_ms")]
    pub minimized_delay_ms: u64,
    /// Pitch placement clicks snap to, in screen pixels.
    #[serde(default = "default_pitch")]
    pub placement_pitch: f32,
    /// Pitch the hover cursor snaps to. Independent of the placement
    /// pitch; set it coarser for a chunkier indicator.
    #[serde(default = "default_pitch")]
    pub cursor_pitch: f32,
    #[serde(default = "default_atlas_path")]
    pub atlas_path: String,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    /// Player spawn in world coordinates.
    #[serde(default = "default_player_spawn")]
    pub player_spawn: [f32; 2],
    /// Where the enemy preview puppet is pinned, in world coordinates.
    #[serde(default = "default_enemy_preview")]
    pub enemy_preview: [f32; 2],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            tick_rate: default_tick_rate(),
            minimized_delay_ms: default_minimized_delay_ms(),
            placement_pitch: default_pitch(),
            cursor_pitch: default_pitch(),
            atlas_path: default_atlas_path(),
            catalog_path: default_catalog_path(),
            player_spawn: default_player_spawn(),
            enemy_preview: default_enemy_preview(),
        }
    }
}

impl EditorConfig {
    pub fn grid(&self) -> GridConfig {
        GridConfig {
            placement_pitch: self.placement_pitch,
            cursor_pitch: self.cursor_pitch,
        }
    }
}

pub fn load_config(path: &Path) -> Result<EditorConfig, String> {
    if !path.exists() {
        log::info!(
            "No editor config at {}; using built-in defaults",
            path.display()
        );
        return Ok(EditorConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&raw).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn default_title() -> String {
    "Tileforge".to_string()
}

const fn default_width() -> u32 {
    1280
}

const fn default_height() -> u32 {
    720
}

const fn default_tick_rate() -> u32 {
    30
}

const fn default_minimized_delay_ms() -> u64 {
    10
}

const fn default_pitch() -> f32 {
    32.0
}

fn default_atlas_path() -> String {
    "assets/atlas/dungeon_tiles.png".to_string()
}

fn default_catalog_path() -> String {
    "assets/atlas/dungeon_tiles.list".to_string()
}

const fn default_player_spawn() -> [f32; 2] {
    [100.0, 100.0]
}

const fn default_enemy_preview() -> [f32; 2] {
    [300.0, 100.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "tf_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = temp_file_path("missing");
        let config = load_config(&path).expect("missing config falls back to defaults");
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.placement_pitch, 32.0);
        assert_eq!(config.cursor_pitch, 32.0);
        assert_eq!(config.player_spawn, [100.0, 100.0]);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_file_path("partial");
        std::fs::write(&path, r#"{ "cursor_pitch": 64.0, "tick_rate": 60 }"#)
            .expect("write temp config");
        let config = load_config(&path).expect("partial config should load");
        assert_eq!(config.cursor_pitch, 64.0);
        assert_eq!(config.tick_rate, 60);
        // Untouched fields keep their defaults.
        assert_eq!(config.placement_pitch, 32.0);
        assert_eq!(config.width, 1280);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_file_path("malformed");
        std::fs::write(&path, "{ not json").expect("write temp config");
        let err = load_config(&path).expect_err("malformed config should fail");
        assert!(err.contains("Failed to parse config"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn grid_exposes_both_pitches() {
        let config = EditorConfig {
            placement_pitch: 16.0,
            cursor_pitch: 32.0,
            ..EditorConfig::default()
        };
        let grid = config.grid();
        assert_eq!(grid.placement_pitch, 16.0);
        assert_eq!(grid.cursor_pitch, 32.0);
    }
}
