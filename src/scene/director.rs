//! Scene Director
//!
//! Owns the scene registry, the active-scene slot, the pointer and the
//! collaborators. The external frame driver calls [`Director::tick`] once per
//! frame; pointer samples may arrive at any time in between and are queued.
//!
//! Per tick:
//!
//! 1. deliver queued pointer events to the active scene
//! 2. advance the scene's task tree
//! 3. run the scene's own update
//!
//! A [`SceneCommand::SwitchTo`] returned from any callback is applied right
//! away; later events of the same tick go to the new scene.

use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info, warn};

use crate::core::config::EngineConfig;
use crate::core::error::{Result, SceneError};
use crate::core::geometry::Coord;
use crate::game::terrain::TerrainRegistry;
use crate::scene::dungeon::DungeonScene;
use crate::scene::input::{Pointer, PointerEvent, PointerGesture, PointerState};
use crate::scene::render::{AudioPlayer, Renderer};
use crate::scene::title::TitleScene;
use crate::scene::{Scene, SceneCommand, SceneContext};
use crate::{DUNGEON_SCENE, TITLE_SCENE};

/// Top-level application object.
pub struct Director {
    config: EngineConfig,
    scenes: BTreeMap<String, Box<dyn Scene>>,
    current: Option<String>,
    pointer: Pointer,
    latest: Option<PointerState>,
    pending: VecDeque<PointerEvent>,
    terrain: TerrainRegistry,
    renderer: Box<dyn Renderer>,
    audio: Box<dyn AudioPlayer>,
    frame: u64,
}

impl Director {
    /// Create a director with the standard terrain registry and no scenes.
    pub fn new(
        config: EngineConfig,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioPlayer>,
    ) -> Self {
        let pointer = Pointer::new(config.deadzone, renderer.scale_ratio());
        Self {
            config,
            scenes: BTreeMap::new(),
            current: None,
            pointer,
            latest: None,
            pending: VecDeque::new(),
            terrain: TerrainRegistry::standard(),
            renderer,
            audio,
            frame: 0,
        }
    }

    /// Register the title and dungeon scenes under their standard ids.
    pub fn with_standard_scenes(mut self) -> Self {
        self.register(TITLE_SCENE, Box::new(TitleScene::new(DUNGEON_SCENE)));
        self.register(DUNGEON_SCENE, Box::new(DungeonScene::new()));
        self
    }

    /// Add or replace a scene.
    pub fn register(&mut self, id: impl Into<String>, scene: Box<dyn Scene>) -> &mut Self {
        let id = id.into();
        debug!(scene = %id, "scene registered");
        self.scenes.insert(id, scene);
        self
    }

    /// Activate the first scene.
    pub fn start(&mut self, id: &str) -> Result<()> {
        info!(scene = id, "director starting");
        self.change(id)
    }

    /// Switch the active scene and run its setup.
    ///
    /// The slot only moves once setup succeeds; on failure the previous scene
    /// stays active with an empty display list.
    pub fn change(&mut self, id: &str) -> Result<()> {
        if !self.scenes.contains_key(id) {
            return Err(SceneError::UnknownScene(id.to_string()).into());
        }
        info!(from = ?self.current, to = id, frame = self.frame, "scene change");

        self.renderer.clear();
        self.renderer.set_camera(Coord::ZERO);

        let setup = self.with_scene_at(id, |scene, ctx| {
            scene.tasks().clear();
            scene.setup(ctx)
        });
        match setup {
            Ok(()) => {
                self.current = Some(id.to_string());
                Ok(())
            }
            Err(err) => {
                warn!(scene = id, error = %err, "scene setup failed");
                Err(err)
            }
        }
    }

    /// Id of the active scene.
    pub fn current_scene(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Terrain prototypes.
    pub fn terrain_mut(&mut self) -> &mut TerrainRegistry {
        &mut self.terrain
    }

    /// Ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Events waiting for the next tick.
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    // -------------------------------------------------------------------------
    // Input (screen pixels)
    // -------------------------------------------------------------------------

    /// Pointer pressed at a screen position.
    pub fn pointer_down(&mut self, screen: Coord) {
        let state = self.pointer.down(screen);
        self.latest = Some(state);
        self.pending.push_back(PointerEvent::Down(state));
    }

    /// Pointer moved. Ignored unless pressed.
    pub fn pointer_move(&mut self, screen: Coord) {
        if let Some(state) = self.pointer.moved(screen) {
            self.latest = Some(state);
            self.pending.push_back(PointerEvent::Move(state));
        }
    }

    /// Pointer released. Ignored unless pressed.
    pub fn pointer_up(&mut self, screen: Coord) {
        if let Some(gesture) = self.pointer.up(screen) {
            self.latest = None;
            self.pending.push_back(PointerEvent::Up(gesture));
        }
    }

    // -------------------------------------------------------------------------
    // Frame
    // -------------------------------------------------------------------------

    /// Advance one frame.
    pub fn tick(&mut self, elapsed_ms: f64) -> Result<()> {
        if self.current.is_none() {
            return Err(SceneError::NotStarted.into());
        }
        self.frame += 1;

        while let Some(event) = self.pending.pop_front() {
            let command = self.with_scene(|scene, ctx| match event {
                PointerEvent::Down(state) => scene.pointer_down(&state, ctx),
                PointerEvent::Move(state) => scene.pointer_move(&state, ctx),
                PointerEvent::Up(PointerGesture::Tap(state)) => scene.tap(&state, ctx),
                PointerEvent::Up(PointerGesture::Swipe(direction, state)) => {
                    scene.swipe(direction, &state, ctx)
                }
            })?;
            self.apply(command)?;
        }

        self.with_scene(|scene, _| {
            scene.tasks().update(elapsed_ms);
            Ok(())
        })?;

        let command = self.with_scene(|scene, ctx| scene.update(elapsed_ms, ctx))?;
        self.apply(command)
    }

    fn apply(&mut self, command: SceneCommand) -> Result<()> {
        match command {
            SceneCommand::None => Ok(()),
            SceneCommand::SwitchTo(id) => self.change(&id),
        }
    }

    fn with_scene<R>(
        &mut self,
        f: impl FnOnce(&mut dyn Scene, &mut SceneContext<'_>) -> Result<R>,
    ) -> Result<R> {
        let id = self.current.clone().ok_or(SceneError::NotStarted)?;
        self.with_scene_at(&id, f)
    }

    fn with_scene_at<R>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut dyn Scene, &mut SceneContext<'_>) -> Result<R>,
    ) -> Result<R> {
        let Self {
            config,
            scenes,
            latest,
            terrain,
            renderer,
            audio,
            ..
        } = self;

        let scene = scenes
            .get_mut(id)
            .ok_or_else(|| SceneError::UnknownScene(id.to_string()))?;

        let mut ctx = SceneContext {
            renderer: renderer.as_mut(),
            audio: audio.as_mut(),
            terrain,
            config,
            pointer: *latest,
        };
        f(scene.as_mut(), &mut ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::error::{DesignError, EngineError};
    use crate::game::design::MapDesign;
    use crate::game::terrain::{TerrainKind, TerrainPrototype};
    use crate::core::geometry::Direction;
    use crate::scene::headless::{HeadlessAudio, HeadlessRenderer};
    use crate::task::{Repeat, Task, TaskRunner};

    /// Records every callback it receives.
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        tasks: TaskRunner,
        switch_on_tap: Option<String>,
        fail_setup: bool,
    }

    impl Recorder {
        fn new(log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                log: Rc::clone(log),
                tasks: TaskRunner::new(),
                switch_on_tap: None,
                fail_setup: false,
            }
        }
    }

    impl Scene for Recorder {
        fn setup(&mut self, _ctx: &mut SceneContext<'_>) -> Result<()> {
            self.log.borrow_mut().push("setup".into());
            if self.fail_setup {
                return Err(DesignError::Empty.into());
            }
            let log = Rc::clone(&self.log);
            let tick = move || log.borrow_mut().push("task".into());
            self.tasks.spawn(Task::new(Repeat::every(0.0, tick)));
            Ok(())
        }

        fn tasks(&mut self) -> &mut TaskRunner {
            &mut self.tasks
        }

        fn update(
            &mut self,
            _elapsed_ms: f64,
            ctx: &mut SceneContext<'_>,
        ) -> Result<SceneCommand> {
            let held = if ctx.pointer.is_some() { "update(held)" } else { "update" };
            self.log.borrow_mut().push(held.into());
            Ok(SceneCommand::None)
        }

        fn pointer_down(
            &mut self,
            _state: &PointerState,
            _ctx: &mut SceneContext<'_>,
        ) -> Result<SceneCommand> {
            self.log.borrow_mut().push("down".into());
            Ok(SceneCommand::None)
        }

        fn tap(
            &mut self,
            _state: &PointerState,
            _ctx: &mut SceneContext<'_>,
        ) -> Result<SceneCommand> {
            self.log.borrow_mut().push("tap".into());
            Ok(self.switch_on_tap.clone().map_or(SceneCommand::None, SceneCommand::SwitchTo))
        }

        fn swipe(
            &mut self,
            direction: Direction,
            _state: &PointerState,
            _ctx: &mut SceneContext<'_>,
        ) -> Result<SceneCommand> {
            self.log.borrow_mut().push(format!("swipe {:?}", direction));
            Ok(SceneCommand::None)
        }
    }

    fn director() -> Director {
        Director::new(
            EngineConfig::default(),
            Box::new(HeadlessRenderer::default()),
            Box::new(HeadlessAudio::default()),
        )
    }

    #[test]
    fn test_unknown_scene() {
        let mut director = director();
        let err = director.start("nowhere").unwrap_err();
        assert!(matches!(err, EngineError::Scene(SceneError::UnknownScene(_))));
        assert!(matches!(
            director.tick(16.0),
            Err(EngineError::Scene(SceneError::NotStarted))
        ));
    }

    #[test]
    fn test_failed_setup_keeps_previous_scene() {
        let log_a = Rc::new(RefCell::new(Vec::new()));
        let log_b = Rc::new(RefCell::new(Vec::new()));
        let mut broken = Recorder::new(&log_b);
        broken.fail_setup = true;

        let mut director = director();
        director.register("a", Box::new(Recorder::new(&log_a)));
        director.register("b", Box::new(broken));
        director.start("a").unwrap();

        let err = director.change("b").unwrap_err();
        assert!(matches!(err, EngineError::Design(DesignError::Empty)));
        assert_eq!(director.current_scene(), Some("a"));
        assert_eq!(*log_b.borrow(), vec!["setup"]);

        // Ticks keep going to the scene that was active.
        director.tick(16.0).unwrap();
        assert_eq!(log_a.borrow().last().map(String::as_str), Some("update"));
        assert_eq!(log_b.borrow().len(), 1);
    }

    #[test]
    fn test_custom_terrain_registered_through_director() {
        let config = EngineConfig {
            map: MapDesign::new(
                [('#', "wall"), ('.', "floor"), ('*', "lava")],
                &["#####", "#.*.#", "#####"],
            ),
            monsters: Vec::new(),
            ..EngineConfig::default()
        };
        let renderer = HeadlessRenderer::default();
        let mut director = Director::new(
            config,
            Box::new(renderer.clone()),
            Box::new(HeadlessAudio::default()),
        )
        .with_standard_scenes();

        // Unknown until registered.
        assert!(director.start(DUNGEON_SCENE).is_err());
        director
            .terrain_mut()
            .register(TerrainPrototype::new("lava", TerrainKind::Water, 0xff4000, false));
        director.start(DUNGEON_SCENE).unwrap();
        assert_eq!(renderer.live_with_texture("lava").len(), 1);
    }

    #[test]
    fn test_input_is_buffered_until_tick() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut director = director();
        director.register("recorder", Box::new(Recorder::new(&log)));
        director.start("recorder").unwrap();

        director.pointer_down(Coord::new(100.0, 100.0));
        director.pointer_move(Coord::new(100.0, 50.0));
        director.pointer_up(Coord::new(100.0, 50.0));
        assert_eq!(director.pending_events(), 3);
        assert_eq!(*log.borrow(), vec!["setup"]);

        director.tick(16.0).unwrap();
        assert_eq!(director.pending_events(), 0);
        assert_eq!(*log.borrow(), vec!["setup", "down", "swipe Up", "task", "update"]);
    }

    #[test]
    fn test_latest_pointer_visible_while_held() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut director = director();
        director.register("recorder", Box::new(Recorder::new(&log)));
        director.start("recorder").unwrap();

        director.pointer_down(Coord::new(10.0, 10.0));
        director.tick(16.0).unwrap();
        director.pointer_up(Coord::new(12.0, 10.0));
        director.tick(16.0).unwrap();

        let log = log.borrow();
        assert_eq!(log[3], "update(held)");
        assert_eq!(log[4], "tap");
        assert_eq!(log[6], "update");
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut director = director();
        director.pointer_move(Coord::new(1.0, 1.0));
        director.pointer_up(Coord::new(1.0, 1.0));
        assert_eq!(director.pending_events(), 0);
    }

    #[test]
    fn test_switch_reruns_setup_and_clears_tasks() {
        let log_a = Rc::new(RefCell::new(Vec::new()));
        let log_b = Rc::new(RefCell::new(Vec::new()));
        let mut a = Recorder::new(&log_a);
        a.switch_on_tap = Some("b".into());
        let mut b = Recorder::new(&log_b);
        b.switch_on_tap = Some("a".into());

        let mut director = director();
        director.register("a", Box::new(a)).register("b", Box::new(b));
        director.start("a").unwrap();

        director.pointer_down(Coord::new(5.0, 5.0));
        director.pointer_up(Coord::new(5.0, 5.0));
        director.tick(16.0).unwrap();
        assert_eq!(director.current_scene(), Some("b"));
        assert_eq!(*log_b.borrow(), vec!["setup", "task", "update"]);

        director.pointer_down(Coord::new(5.0, 5.0));
        director.pointer_up(Coord::new(5.0, 5.0));
        director.tick(16.0).unwrap();
        assert_eq!(director.current_scene(), Some("a"));

        // Second activation of "a" starts with a fresh task tree: one task line per tick.
        director.tick(16.0).unwrap();
        let tail: Vec<_> = log_a.borrow().iter().rev().take(4).cloned().collect();
        assert_eq!(tail, vec!["update", "task", "update", "task"]);
        assert_eq!(log_a.borrow().iter().filter(|l| *l == "setup").count(), 2);
    }
}
