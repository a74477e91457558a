//! Presentation and audio collaborators.
//!
//! The engine never draws or mixes anything itself. It talks to these traits;
//! a platform layer implements them (see [`crate::scene::headless`] for the
//! recording implementation used by the demo and the tests).

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::geometry::{Coord, Size};

/// A displayable object owned by the renderer.
pub trait Sprite {
    /// Move to a world pixel position.
    fn set_position(&mut self, position: Coord);
    /// Show or hide.
    fn set_visible(&mut self, visible: bool);
    /// Current visibility.
    fn is_visible(&self) -> bool;
    /// Multiply color (0xRRGGBB).
    fn set_tint(&mut self, tint: u32);
    /// Current tint.
    fn tint(&self) -> u32;
    /// Rotation in degrees, clockwise.
    fn set_angle(&mut self, degrees: f64);
    /// Select a frame of a multi-frame texture.
    fn set_frame(&mut self, frame: usize);
    /// Detach from the display list. The handle is dead afterwards.
    fn remove(&mut self);
}

/// Shared presentation handle. Tasks and scene objects both hold these.
pub type SpriteHandle = Rc<RefCell<dyn Sprite>>;

/// Factory and camera for sprites.
pub trait Renderer {
    /// Create a sprite from a registered texture id.
    fn spawn_sprite(&mut self, texture: &str) -> SpriteHandle;
    /// Create a text sprite.
    fn spawn_text(&mut self, text: &str, font_size: f64, color: u32) -> SpriteHandle;
    /// Logical screen size in world pixels.
    fn screen_size(&self) -> Size;
    /// Ratio converting screen pointer samples to world pixels.
    fn scale_ratio(&self) -> f64;
    /// Offset applied to everything on screen.
    fn set_camera(&mut self, offset: Coord);
    /// Replace the display list with an empty one.
    fn clear(&mut self);
}

/// A playing sound.
pub trait Playback {
    /// Loop until stopped.
    fn set_looping(&mut self, looping: bool);
    /// Gain, 0.0 - 1.0.
    fn set_volume(&mut self, volume: f32);
    /// Stop playing.
    fn stop(&mut self);
}

/// Sound trigger.
pub trait AudioPlayer {
    /// Start a registered sound.
    fn play(&mut self, id: &str) -> Box<dyn Playback>;
}
