//! Terrain
//!
//! Each cell holds one [`Terrain`], instantiated from a registered
//! [`TerrainPrototype`]. Walls and doors have a two-frame open/closed visual
//! state; only doors change passability when toggled.

use std::collections::BTreeMap;

use crate::core::error::StageError;
use crate::core::geometry::Coord;
use crate::scene::render::{Renderer, SpriteHandle};

/// Visual frame shown while closed.
pub const FRAME_CLOSED: usize = 0;
/// Visual frame shown while open.
pub const FRAME_OPEN: usize = 1;

/// Terrain variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TerrainKind {
    /// Walkable ground
    Floor,
    /// Solid wall; "open" only shows the wall face
    Wall,
    /// Door; passable while open
    Door,
    /// Water
    Water,
}

impl TerrainKind {
    /// Whether this kind has an open/closed state.
    #[inline]
    pub fn is_toggleable(self) -> bool {
        matches!(self, TerrainKind::Wall | TerrainKind::Door)
    }
}

/// Registered template for a terrain id.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainPrototype {
    /// Terrain id, also the texture id
    pub id: String,
    /// Variant
    pub kind: TerrainKind,
    /// Tint applied to the sprite
    pub tint: u32,
    /// Passability of a fresh instance
    pub passable: bool,
}

impl TerrainPrototype {
    /// Create a prototype.
    pub fn new(id: impl Into<String>, kind: TerrainKind, tint: u32, passable: bool) -> Self {
        Self {
            id: id.into(),
            kind,
            tint,
            passable,
        }
    }

    /// Clone into a new terrain with its own sprite.
    pub fn instantiate(&self, renderer: &mut dyn Renderer) -> Terrain {
        let sprite = renderer.spawn_sprite(&self.id);
        {
            let mut s = sprite.borrow_mut();
            s.set_tint(self.tint);
            s.set_frame(FRAME_CLOSED);
        }
        Terrain {
            id: self.id.clone(),
            kind: self.kind,
            tint: self.tint,
            passable: self.passable,
            open: false,
            sprite: Some(sprite),
        }
    }
}

/// Terrain installed in a cell.
pub struct Terrain {
    id: String,
    kind: TerrainKind,
    tint: u32,
    passable: bool,
    open: bool,
    sprite: Option<SpriteHandle>,
}

impl Terrain {
    /// Terrain id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Variant.
    pub fn kind(&self) -> TerrainKind {
        self.kind
    }

    /// Sprite tint.
    pub fn tint(&self) -> u32 {
        self.tint
    }

    /// Whether characters may enter.
    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// Wall variant.
    pub fn is_wall(&self) -> bool {
        self.kind == TerrainKind::Wall
    }

    /// Door variant.
    pub fn is_door(&self) -> bool {
        self.kind == TerrainKind::Door
    }

    /// Open visual state (always false for floor and water).
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Presentation handle, `None` once released.
    pub fn sprite(&self) -> Option<&SpriteHandle> {
        self.sprite.as_ref()
    }

    /// Open a wall face or a door. Returns whether the state changed.
    pub fn open(&mut self) -> bool {
        self.set_open(true)
    }

    /// Close a wall face or a door. Returns whether the state changed.
    pub fn close(&mut self) -> bool {
        self.set_open(false)
    }

    /// Flip the open state. Returns whether the state changed.
    pub fn toggle(&mut self) -> bool {
        self.set_open(!self.open)
    }

    fn set_open(&mut self, open: bool) -> bool {
        if !self.kind.is_toggleable() || self.open == open {
            return false;
        }
        self.open = open;
        if self.kind == TerrainKind::Door {
            self.passable = open;
        }
        if let Some(sprite) = &self.sprite {
            sprite
                .borrow_mut()
                .set_frame(if open { FRAME_OPEN } else { FRAME_CLOSED });
        }
        true
    }

    /// Move the sprite to a pixel position.
    pub fn place(&self, pixel: Coord) {
        if let Some(sprite) = &self.sprite {
            sprite.borrow_mut().set_position(pixel);
        }
    }

    /// Remove the sprite from the display list.
    pub fn release(&mut self) {
        if let Some(sprite) = self.sprite.take() {
            sprite.borrow_mut().remove();
        }
    }
}

impl std::fmt::Debug for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terrain")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("passable", &self.passable)
            .field("open", &self.open)
            .field("attached", &self.sprite.is_some())
            .finish()
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Terrain prototypes keyed by id.
#[derive(Clone, Debug, Default)]
pub struct TerrainRegistry {
    prototypes: BTreeMap<String, TerrainPrototype>,
}

impl TerrainRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `floor`, `wall`, `door` and `water`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(TerrainPrototype::new("floor", TerrainKind::Floor, 0x404040, true));
        registry.register(TerrainPrototype::new("wall", TerrainKind::Wall, 0xc0c0c0, false));
        registry.register(TerrainPrototype::new("door", TerrainKind::Door, 0x8b5a2b, false));
        registry.register(TerrainPrototype::new("water", TerrainKind::Water, 0x3060c0, false));
        registry
    }

    /// Add or replace a prototype.
    pub fn register(&mut self, prototype: TerrainPrototype) {
        self.prototypes.insert(prototype.id.clone(), prototype);
    }

    /// Whether an id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.prototypes.contains_key(id)
    }

    /// Look up a prototype.
    pub fn get(&self, id: &str) -> Result<&TerrainPrototype, StageError> {
        self.prototypes
            .get(id)
            .ok_or_else(|| StageError::UnknownTerrain(id.to_string()))
    }

    /// Instantiate a registered prototype.
    pub fn instantiate(
        &self,
        id: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<Terrain, StageError> {
        Ok(self.get(id)?.instantiate(renderer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::headless::HeadlessRenderer;

    #[test]
    fn test_door_toggle_flips_passability() {
        let mut renderer = HeadlessRenderer::default();
        let registry = TerrainRegistry::standard();
        let mut door = registry.instantiate("door", &mut renderer).unwrap();

        assert!(!door.is_passable());
        assert!(door.open());
        assert!(door.is_passable());
        assert!(!door.open(), "already open");
        assert!(door.close());
        assert!(!door.is_passable());
    }

    #[test]
    fn test_wall_face_keeps_wall_solid() {
        let mut renderer = HeadlessRenderer::default();
        let registry = TerrainRegistry::standard();
        let mut wall = registry.instantiate("wall", &mut renderer).unwrap();

        assert!(wall.toggle());
        assert!(wall.is_open());
        assert!(!wall.is_passable());
        assert_eq!(renderer.sprites()[0].frame, FRAME_OPEN);
    }

    #[test]
    fn test_floor_has_no_toggle_state() {
        let mut renderer = HeadlessRenderer::default();
        let mut floor = TerrainRegistry::standard().instantiate("floor", &mut renderer).unwrap();
        assert!(!floor.open());
        assert!(!floor.is_open());
        assert!(floor.is_passable());
    }

    #[test]
    fn test_instances_are_independent() {
        let mut renderer = HeadlessRenderer::default();
        let registry = TerrainRegistry::standard();
        let mut a = registry.instantiate("door", &mut renderer).unwrap();
        let b = registry.instantiate("door", &mut renderer).unwrap();
        a.open();
        assert!(!b.is_open());
        assert!(!registry.get("door").unwrap().passable);
        assert_eq!(renderer.sprites().len(), 2);
    }

    #[test]
    fn test_unknown_terrain() {
        let mut renderer = HeadlessRenderer::default();
        let err = TerrainRegistry::new().instantiate("lava", &mut renderer).unwrap_err();
        assert_eq!(err, StageError::UnknownTerrain("lava".into()));
    }

    #[test]
    fn test_release_removes_sprite() {
        let mut renderer = HeadlessRenderer::default();
        let mut floor = TerrainRegistry::standard().instantiate("floor", &mut renderer).unwrap();
        floor.release();
        assert!(floor.sprite().is_none());
        assert!(renderer.sprites()[0].removed);
        assert_eq!(renderer.live_sprite_count(), 0);
    }
}
