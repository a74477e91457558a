//! Characters
//!
//! Occupants of stage cells. The pixel position is shared (`Rc<Cell<_>>`) so
//! an eased movement task can drive it while the stage keeps the
//! authoritative grid position.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::core::geometry::{Coord, GridPos};
use crate::scene::render::{Renderer, SpriteHandle};

/// Stage-assigned character identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Character variant.
#[derive(Clone, Debug)]
pub enum CharacterKind {
    /// Player character. `moving` is set while a step animation runs.
    Hero {
        /// Shared so a task's finish callback can clear it
        moving: Rc<Cell<bool>>,
    },
    /// Non-player occupant
    Monster,
}

/// A stage occupant.
pub struct Character {
    kind: CharacterKind,
    texture: String,
    position: Rc<Cell<Coord>>,
    sprite: Option<SpriteHandle>,
}

impl Character {
    /// Hero with its own sprite.
    pub fn hero(texture: &str, renderer: &mut dyn Renderer) -> Self {
        Self::with_sprite(
            CharacterKind::Hero { moving: Rc::new(Cell::new(false)) },
            texture,
            renderer,
        )
    }

    /// Monster with its own sprite.
    pub fn monster(texture: &str, renderer: &mut dyn Renderer) -> Self {
        Self::with_sprite(CharacterKind::Monster, texture, renderer)
    }

    fn with_sprite(kind: CharacterKind, texture: &str, renderer: &mut dyn Renderer) -> Self {
        Self {
            kind,
            texture: texture.to_string(),
            position: Rc::new(Cell::new(Coord::ZERO)),
            sprite: Some(renderer.spawn_sprite(texture)),
        }
    }

    /// Variant.
    pub fn kind(&self) -> &CharacterKind {
        &self.kind
    }

    /// Texture id.
    pub fn texture(&self) -> &str {
        &self.texture
    }

    /// Hero variant.
    pub fn is_hero(&self) -> bool {
        matches!(self.kind, CharacterKind::Hero { .. })
    }

    /// Monster variant.
    pub fn is_monster(&self) -> bool {
        matches!(self.kind, CharacterKind::Monster)
    }

    /// Whether a step animation is running. Always false for monsters.
    pub fn is_moving(&self) -> bool {
        match &self.kind {
            CharacterKind::Hero { moving } => moving.get(),
            CharacterKind::Monster => false,
        }
    }

    /// Shared moving flag of a hero.
    pub fn moving_flag(&self) -> Option<Rc<Cell<bool>>> {
        match &self.kind {
            CharacterKind::Hero { moving } => Some(Rc::clone(moving)),
            CharacterKind::Monster => None,
        }
    }

    /// Current pixel position.
    pub fn position(&self) -> Coord {
        self.position.get()
    }

    /// Shared pixel position for tweens.
    pub fn position_handle(&self) -> Rc<Cell<Coord>> {
        Rc::clone(&self.position)
    }

    /// Jump to a pixel position.
    pub fn set_position(&self, position: Coord) {
        self.position.set(position);
        self.sync_sprite();
    }

    /// Grid cell derived from the pixel position.
    pub fn grid_pos(&self, tile_size: f64) -> GridPos {
        GridPos::from_pixel(self.position(), tile_size)
    }

    /// Presentation handle, `None` once released.
    pub fn sprite(&self) -> Option<&SpriteHandle> {
        self.sprite.as_ref()
    }

    /// Set the sprite tint.
    pub fn set_tint(&self, tint: u32) {
        if let Some(sprite) = &self.sprite {
            sprite.borrow_mut().set_tint(tint);
        }
    }

    /// Current sprite tint (0 once released).
    pub fn tint(&self) -> u32 {
        self.sprite.as_ref().map_or(0, |s| s.borrow().tint())
    }

    /// Push the pixel position to the sprite.
    pub fn sync_sprite(&self) {
        if let Some(sprite) = &self.sprite {
            sprite.borrow_mut().set_position(self.position());
        }
    }

    /// Remove the sprite from the display list.
    pub fn release(&mut self) {
        if let Some(sprite) = self.sprite.take() {
            sprite.borrow_mut().remove();
        }
    }
}

impl fmt::Debug for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Character")
            .field("kind", &self.kind)
            .field("texture", &self.texture)
            .field("position", &self.position.get())
            .finish()
    }
}
