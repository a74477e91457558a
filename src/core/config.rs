//! Engine Configuration
//!
//! Every field has a default so a config file only needs the values it
//! overrides.

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::geometry::{GridPos, Size};
use crate::game::design::MapDesign;

/// Configuration for the engine and the bundled scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logical screen size in world pixels
    pub screen: Size,
    /// Sprite scale applied to every texture
    pub sprite_scale: f64,
    /// Source texture tile width before scaling
    pub base_tile: f64,
    /// Pointer displacement below which no direction is classified
    pub deadzone: f64,
    /// Pointer displacement required before a direction triggers movement
    pub swipe_play: f64,
    /// Duration of one eased step between cells (ms)
    pub move_duration_ms: f64,
    /// Flash interval of the title prompt (ms)
    pub flash_interval_ms: f64,
    /// Background music volume (0.0 - 1.0)
    pub bgm_volume: f32,
    /// Hero start cell in the dungeon
    pub hero_start: GridPos,
    /// Monster start cells in the dungeon
    pub monsters: Vec<GridPos>,
    /// Dungeon layout
    pub map: MapDesign,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen: Size::new(375.0, 667.0),
            sprite_scale: 2.0,
            base_tile: 16.0,
            deadzone: 10.0,
            swipe_play: 32.0,
            move_duration_ms: 200.0,
            flash_interval_ms: 600.0,
            bgm_volume: 0.3,
            hero_start: GridPos::new(1, 1),
            monsters: vec![GridPos::new(8, 4)],
            map: MapDesign::default(),
        }
    }
}

impl EngineConfig {
    /// Side of one grid cell in world pixels.
    #[inline]
    pub fn tile_size(&self) -> f64 {
        self.base_tile * self.sprite_scale
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
