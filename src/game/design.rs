//! Map Designs
//!
//! A legend of single-character symbols plus equal-length rows. Row 0 is the
//! northmost row, column 0 the westmost. Height is the number of rows, width
//! the length of the first row.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{DesignError, EngineError};
use crate::core::geometry::GridPos;
use crate::game::stage::Stage;
use crate::game::terrain::TerrainRegistry;
use crate::scene::render::Renderer;

/// Declarative stage layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDesign {
    /// Symbol to terrain id
    pub legend: BTreeMap<char, String>,
    /// Rows of symbols, north to south
    pub rows: Vec<String>,
}

impl Default for MapDesign {
    fn default() -> Self {
        Self::new(
            [('#', "wall"), ('.', "floor"), ('+', "door"), ('~', "water")],
            &[
                "##########",
                "#........#",
                "#..~~....#",
                "#..~~..#+#",
                "#......#.#",
                "##########",
            ],
        )
    }
}

impl MapDesign {
    /// Build from a legend and rows.
    pub fn new<'a>(
        legend: impl IntoIterator<Item = (char, &'a str)>,
        rows: &[&str],
    ) -> Self {
        Self {
            legend: legend.into_iter().map(|(c, id)| (c, id.to_string())).collect(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the first row.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.chars().count())
    }

    /// Terrain id at a position, if the position and its symbol are known.
    pub fn terrain_at(&self, pos: GridPos) -> Option<&str> {
        let row = self.rows.get(usize::try_from(pos.y).ok()?)?;
        let symbol = row.chars().nth(usize::try_from(pos.x).ok()?)?;
        self.legend.get(&symbol).map(String::as_str)
    }

    /// Check shape, symbols and terrain ids.
    pub fn validate(&self, registry: &TerrainRegistry) -> Result<(), DesignError> {
        let width = self.width();
        if width == 0 {
            return Err(DesignError::Empty);
        }

        for (symbol, terrain) in &self.legend {
            if !registry.contains(terrain) {
                return Err(DesignError::UnregisteredTerrain {
                    symbol: *symbol,
                    terrain: terrain.clone(),
                });
            }
        }

        for (y, row) in self.rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(DesignError::RaggedRow { row: y, expected: width, found });
            }
            let unknown = row.chars().enumerate().find(|(_, c)| !self.legend.contains_key(c));
            if let Some((x, symbol)) = unknown {
                return Err(DesignError::UnknownSymbol {
                    symbol,
                    pos: GridPos::new(x as i32, y as i32),
                });
            }
        }
        Ok(())
    }

    /// Validate and build a stage.
    pub fn build(
        &self,
        registry: &TerrainRegistry,
        renderer: &mut dyn Renderer,
        tile_size: f64,
    ) -> Result<Stage, EngineError> {
        self.validate(registry)?;
        // validate() guarantees every position resolves
        let terrain_at = |pos: GridPos| self.terrain_at(pos).unwrap_or_default();
        let (width, height) = (self.width(), self.height());
        let stage = Stage::from_layout(width, height, tile_size, registry, renderer, terrain_at)?;
        Ok(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::headless::HeadlessRenderer;

    fn design(rows: &[&str]) -> MapDesign {
        MapDesign::new([('#', "wall"), ('.', "floor"), ('+', "door")], rows)
    }

    #[test]
    fn test_default_design_builds() {
        let mut renderer = HeadlessRenderer::default();
        let stage = MapDesign::default()
            .build(&TerrainRegistry::standard(), &mut renderer, 32.0)
            .unwrap();
        assert_eq!(stage.width(), 10);
        assert_eq!(stage.height(), 6);
        assert!(stage.cell(GridPos::new(8, 3)).unwrap().is_door());
        assert!(stage.cell(GridPos::new(1, 1)).unwrap().is_passable());
        assert_eq!(renderer.live_sprite_count(), 60);
    }

    #[test]
    fn test_row_zero_is_north() {
        let mut renderer = HeadlessRenderer::default();
        let stage = design(&["#.", ".."])
            .build(&TerrainRegistry::standard(), &mut renderer, 16.0)
            .unwrap();
        assert!(stage.cell(GridPos::new(0, 0)).unwrap().is_wall());
        assert!(!stage.cell(GridPos::new(1, 0)).unwrap().is_wall());
        assert!(!stage.cell(GridPos::new(0, 1)).unwrap().is_wall());
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = design(&["###", "#.", "###"]).validate(&TerrainRegistry::standard()).unwrap_err();
        assert_eq!(err, DesignError::RaggedRow { row: 1, expected: 3, found: 2 });
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let err = design(&["###", "#?#"]).validate(&TerrainRegistry::standard()).unwrap_err();
        assert_eq!(err, DesignError::UnknownSymbol { symbol: '?', pos: GridPos::new(1, 1) });
    }

    #[test]
    fn test_unregistered_terrain_rejected() {
        let bad = MapDesign::new([('#', "wall"), ('*', "lava")], &["#*"]);
        let err = bad.validate(&TerrainRegistry::standard()).unwrap_err();
        assert_eq!(err, DesignError::UnregisteredTerrain { symbol: '*', terrain: "lava".into() });
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(design(&[]).validate(&TerrainRegistry::standard()), Err(DesignError::Empty));
        assert_eq!(design(&[""]).validate(&TerrainRegistry::standard()), Err(DesignError::Empty));
    }

    #[test]
    fn test_build_reports_design_error() {
        let mut renderer = HeadlessRenderer::default();
        let result = design(&["#", "##"]).build(&TerrainRegistry::standard(), &mut renderer, 16.0);
        assert!(matches!(result, Err(EngineError::Design(DesignError::RaggedRow { .. }))));
        assert_eq!(renderer.live_sprite_count(), 0);
    }

    #[test]
    fn test_json_round_trip() {
        let json = serde_json::to_string(&MapDesign::default()).unwrap();
        let parsed: MapDesign = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MapDesign::default());
    }
}
