//! Headless collaborators.
//!
//! Record every sprite and sound so a session can run without a display and
//! be inspected afterwards. Handles are cheap clones sharing one state, so a
//! caller can keep a clone after boxing one into a [`crate::Director`].

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

use crate::core::geometry::{Coord, Size};
use crate::scene::render::{AudioPlayer, Playback, Renderer, Sprite, SpriteHandle};

/// Recorded state of one sprite.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteRecord {
    /// Texture id (`"text"` for text sprites)
    pub texture: String,
    /// Text content of text sprites
    pub text: Option<String>,
    /// World pixel position
    pub position: Coord,
    /// Visibility
    pub visible: bool,
    /// Tint
    pub tint: u32,
    /// Rotation in degrees
    pub angle: f64,
    /// Texture frame
    pub frame: usize,
    /// Detached from the display list
    pub removed: bool,
}

impl SpriteRecord {
    fn new(texture: &str) -> Self {
        Self {
            texture: texture.to_string(),
            text: None,
            position: Coord::ZERO,
            visible: true,
            tint: 0xffffff,
            angle: 0.0,
            frame: 0,
            removed: false,
        }
    }
}

struct HeadlessSprite {
    record: Rc<RefCell<SpriteRecord>>,
}

impl Sprite for HeadlessSprite {
    fn set_position(&mut self, position: Coord) {
        self.record.borrow_mut().position = position;
    }

    fn set_visible(&mut self, visible: bool) {
        self.record.borrow_mut().visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.record.borrow().visible
    }

    fn set_tint(&mut self, tint: u32) {
        self.record.borrow_mut().tint = tint;
    }

    fn tint(&self) -> u32 {
        self.record.borrow().tint
    }

    fn set_angle(&mut self, degrees: f64) {
        self.record.borrow_mut().angle = degrees;
    }

    fn set_frame(&mut self, frame: usize) {
        self.record.borrow_mut().frame = frame;
    }

    fn remove(&mut self) {
        self.record.borrow_mut().removed = true;
    }
}

#[derive(Debug)]
struct RenderState {
    screen: Size,
    scale_ratio: f64,
    camera: Coord,
    sprites: Vec<Rc<RefCell<SpriteRecord>>>,
}

/// Renderer that records sprites instead of drawing them.
#[derive(Clone, Debug)]
pub struct HeadlessRenderer {
    state: Rc<RefCell<RenderState>>,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new(Size::new(375.0, 667.0), 1.0)
    }
}

impl HeadlessRenderer {
    /// Renderer with a logical screen size and pointer scale ratio.
    pub fn new(screen: Size, scale_ratio: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(RenderState {
                screen,
                scale_ratio,
                camera: Coord::ZERO,
                sprites: Vec::new(),
            })),
        }
    }

    /// Snapshot of every sprite on the current display list, in spawn order.
    pub fn sprites(&self) -> Vec<SpriteRecord> {
        self.state.borrow().sprites.iter().map(|s| s.borrow().clone()).collect()
    }

    /// Sprites not yet removed.
    pub fn live_sprite_count(&self) -> usize {
        self.state.borrow().sprites.iter().filter(|s| !s.borrow().removed).count()
    }

    /// Live sprites with a texture id.
    pub fn live_with_texture(&self, texture: &str) -> Vec<SpriteRecord> {
        self.sprites()
            .into_iter()
            .filter(|s| !s.removed && s.texture == texture)
            .collect()
    }

    /// Current camera offset.
    pub fn camera(&self) -> Coord {
        self.state.borrow().camera
    }

    fn spawn(&self, record: SpriteRecord) -> SpriteHandle {
        let record = Rc::new(RefCell::new(record));
        self.state.borrow_mut().sprites.push(Rc::clone(&record));
        Rc::new(RefCell::new(HeadlessSprite { record }))
    }
}

impl Renderer for HeadlessRenderer {
    fn spawn_sprite(&mut self, texture: &str) -> SpriteHandle {
        trace!(texture, "sprite spawned");
        self.spawn(SpriteRecord::new(texture))
    }

    fn spawn_text(&mut self, text: &str, font_size: f64, color: u32) -> SpriteHandle {
        trace!(text, font_size, "text spawned");
        let mut record = SpriteRecord::new("text");
        record.text = Some(text.to_string());
        record.tint = color;
        self.spawn(record)
    }

    fn screen_size(&self) -> Size {
        self.state.borrow().screen
    }

    fn scale_ratio(&self) -> f64 {
        self.state.borrow().scale_ratio
    }

    fn set_camera(&mut self, offset: Coord) {
        self.state.borrow_mut().camera = offset;
    }

    fn clear(&mut self) {
        let mut state = self.state.borrow_mut();
        for sprite in state.sprites.drain(..) {
            sprite.borrow_mut().removed = true;
        }
        debug!("display list cleared");
    }
}

// =============================================================================
// AUDIO
// =============================================================================

/// One recorded sound.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundRecord {
    /// Sound id
    pub id: String,
    /// Looping
    pub looping: bool,
    /// Gain
    pub volume: f32,
    /// Stopped
    pub stopped: bool,
}

struct HeadlessPlayback {
    record: Rc<RefCell<SoundRecord>>,
}

impl Playback for HeadlessPlayback {
    fn set_looping(&mut self, looping: bool) {
        self.record.borrow_mut().looping = looping;
    }

    fn set_volume(&mut self, volume: f32) {
        self.record.borrow_mut().volume = volume;
    }

    fn stop(&mut self) {
        self.record.borrow_mut().stopped = true;
    }
}

/// Audio player that records what was played.
#[derive(Clone, Debug, Default)]
pub struct HeadlessAudio {
    played: Rc<RefCell<Vec<Rc<RefCell<SoundRecord>>>>>,
}

impl HeadlessAudio {
    /// Snapshot of every sound played, in order.
    pub fn played(&self) -> Vec<SoundRecord> {
        self.played.borrow().iter().map(|s| s.borrow().clone()).collect()
    }

    /// Ids of every sound played, in order.
    pub fn played_ids(&self) -> Vec<String> {
        self.played.borrow().iter().map(|s| s.borrow().id.clone()).collect()
    }

    /// How often a sound was played.
    pub fn count(&self, id: &str) -> usize {
        self.played.borrow().iter().filter(|s| s.borrow().id == id).count()
    }
}

impl AudioPlayer for HeadlessAudio {
    fn play(&mut self, id: &str) -> Box<dyn Playback> {
        debug!(id, "sound played");
        let record = Rc::new(RefCell::new(SoundRecord {
            id: id.to_string(),
            looping: false,
            volume: 1.0,
            stopped: false,
        }));
        self.played.borrow_mut().push(Rc::clone(&record));
        Box::new(HeadlessPlayback { record })
    }
}
