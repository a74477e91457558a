//! Tile-Grid World Model
//!
//! ## Module Structure
//!
//! - `terrain`: terrain kinds, prototypes and the registry
//! - `character`: hero and monster occupants
//! - `stage`: cells, placement and move resolution
//! - `design`: declarative map designs

pub mod character;
pub mod design;
pub mod stage;
pub mod terrain;

// Re-export key types
pub use character::{Character, CharacterId, CharacterKind};
pub use design::MapDesign;
pub use stage::{Cell, CellInfo, MoveResult, Stage};
pub use terrain::{Terrain, TerrainKind, TerrainPrototype, TerrainRegistry};
