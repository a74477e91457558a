//! Dungeon scene.
//!
//! Builds the stage from the configured map design and walks the hero around
//! it with swipes. A swipe (or a held drag) past the swipe-play threshold
//! requests one step; the stage resolves it and the scene reacts:
//!
//! - moved: ease the hero sprite to the new cell and play `footstep`
//! - blocked by a closed door: open it and play `door`; walking through is a
//!   separate input
//! - blocked otherwise: nothing
//!
//! While a step animation runs the hero ignores further requests.

use tracing::{debug, info, warn};

use crate::core::error::{Result, StageError};
use crate::core::geometry::{Coord, Direction};
use crate::game::character::{Character, CharacterId};
use crate::game::stage::Stage;
use crate::scene::render::{Playback, SpriteHandle};
use crate::scene::{PointerState, Scene, SceneCommand, SceneContext};
use crate::task::{EasingMove, Task, TaskRunner};

const HERO_TEXTURE: &str = "hero";
const MONSTER_TEXTURE: &str = "monster";
const ARROW_TEXTURE: &str = "arrow";

/// Default hero tint.
pub const HERO_TINT: u32 = 0x33cccc;
/// Hero tint after a tap toggles it.
pub const HERO_ALT_TINT: u32 = 0xcc3333;

/// Sound played on a successful step.
pub const SOUND_FOOTSTEP: &str = "footstep";
/// Sound played when a door opens.
pub const SOUND_DOOR: &str = "door";
/// Looping background music.
pub const SOUND_BGM: &str = "bgm";

/// What a step request ended in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepOutcome {
    Moved,
    DoorOpened,
    Blocked,
}

/// The playable scene.
#[derive(Default)]
pub struct DungeonScene {
    tasks: TaskRunner,
    stage: Option<Stage>,
    hero: Option<CharacterId>,
    arrow: Option<SpriteHandle>,
    bgm: Option<Box<dyn Playback>>,
    gesture_moved: bool,
    /// Set when the held gesture opened a door; auto-stepping pauses until release.
    gesture_opened_door: bool,
}

impl DungeonScene {
    /// Scene with nothing built; `setup` builds everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stage, once set up.
    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    /// The hero's id, once set up.
    pub fn hero(&self) -> Option<CharacterId> {
        self.hero
    }

    fn hero_character(&self) -> Option<&Character> {
        self.stage.as_ref()?.character(self.hero?)
    }

    fn hero_is_moving(&self) -> bool {
        self.hero_character().is_some_and(Character::is_moving)
    }

    fn hide_arrow(&self) {
        if let Some(arrow) = &self.arrow {
            arrow.borrow_mut().set_visible(false);
        }
    }

    fn point_arrow(&self, direction: Direction, tile_size: f64) {
        let (Some(arrow), Some(hero)) = (&self.arrow, self.hero_character()) else {
            return;
        };
        let mut arrow = arrow.borrow_mut();
        if !direction.is_some() {
            arrow.set_visible(false);
            return;
        }
        let (dx, dy) = direction.step();
        let offset = Coord::new(f64::from(dx), f64::from(dy)).times(tile_size);
        arrow.set_position(hero.position() + offset);
        arrow.set_angle(direction.angle());
        arrow.set_visible(true);
    }

    fn reset_gesture(&mut self) {
        self.gesture_moved = false;
        self.gesture_opened_door = false;
    }

    /// Request one hero step and react to the result.
    fn step(&mut self, direction: Direction, ctx: &mut SceneContext<'_>) -> Result<StepOutcome> {
        let (Some(stage), Some(hero)) = (self.stage.as_mut(), self.hero) else {
            return Ok(StepOutcome::Blocked);
        };
        if stage.character(hero).is_some_and(Character::is_moving) {
            return Ok(StepOutcome::Blocked);
        }

        let result = match stage.move_character(hero, direction) {
            Ok(result) => result,
            Err(StageError::OutOfBounds { pos, .. }) => {
                warn!(%pos, ?direction, "step leaves the map");
                return Ok(StepOutcome::Blocked);
            }
            Err(err) => return Err(err.into()),
        };

        if result.moved {
            let character = stage.character(hero).ok_or(StageError::UnknownCharacter(hero))?;
            let destination = result.coord.to_pixel(stage.tile_size());
            let mut task = Task::new(EasingMove::new(
                character.position_handle(),
                destination,
                ctx.config.move_duration_ms,
            ));
            if let Some(moving) = character.moving_flag() {
                moving.set(true);
                task.on_finish(move || moving.set(false));
            }
            self.tasks.spawn(task);
            ctx.audio.play(SOUND_FOOTSTEP);
            Ok(StepOutcome::Moved)
        } else if result.cell.is_door() && !result.cell.open {
            stage.open_terrain(result.coord)?;
            ctx.audio.play(SOUND_DOOR);
            info!(pos = %result.coord, "door opened");
            Ok(StepOutcome::DoorOpened)
        } else {
            debug!(pos = %result.coord, terrain = %result.cell.terrain_id, "hero blocked");
            Ok(StepOutcome::Blocked)
        }
    }

    fn follow_camera(&self, ctx: &mut SceneContext<'_>) {
        if let Some(hero) = self.hero_character() {
            let half_tile = ctx.config.tile_size() / 2.0;
            let focus = hero.position() + Coord::new(half_tile, half_tile);
            ctx.renderer.set_camera(ctx.renderer.screen_size().center() - focus);
        }
    }
}

impl Scene for DungeonScene {
    fn setup(&mut self, ctx: &mut SceneContext<'_>) -> Result<()> {
        if let Some(mut bgm) = self.bgm.take() {
            bgm.stop();
        }
        // The display list was cleared; nothing from a previous activation survives.
        self.stage = None;
        self.hero = None;
        self.arrow = None;
        self.reset_gesture();

        let config = ctx.config;
        let mut stage = config.map.build(ctx.terrain, ctx.renderer, config.tile_size())?;
        stage.set_wall_face();

        let hero = Character::hero(HERO_TEXTURE, ctx.renderer);
        hero.set_tint(HERO_TINT);
        let hero = stage.put_character(hero, config.hero_start)?;
        for pos in &config.monsters {
            stage.put_character(Character::monster(MONSTER_TEXTURE, ctx.renderer), *pos)?;
        }

        let arrow = ctx.renderer.spawn_sprite(ARROW_TEXTURE);
        arrow.borrow_mut().set_visible(false);

        let mut bgm = ctx.audio.play(SOUND_BGM);
        bgm.set_looping(true);
        bgm.set_volume(config.bgm_volume);

        info!(
            width = stage.width(),
            height = stage.height(),
            monsters = stage.monsters().count(),
            hero = %config.hero_start,
            "dungeon ready"
        );

        self.stage = Some(stage);
        self.hero = Some(hero);
        self.arrow = Some(arrow);
        self.bgm = Some(bgm);
        self.follow_camera(ctx);
        Ok(())
    }

    fn tasks(&mut self) -> &mut TaskRunner {
        &mut self.tasks
    }

    fn update(&mut self, _elapsed_ms: f64, ctx: &mut SceneContext<'_>) -> Result<SceneCommand> {
        if let Some(state) = ctx.pointer {
            let direction = state.swipe_direction();
            let held_step = direction.is_some()
                && state.reaches(ctx.config.swipe_play)
                && !self.gesture_opened_door
                && !self.hero_is_moving();
            if held_step {
                if self.step(direction, ctx)? == StepOutcome::DoorOpened {
                    self.gesture_opened_door = true;
                }
                self.gesture_moved = true;
            }
            self.point_arrow(direction, ctx.config.tile_size());
        }

        if let Some(stage) = &self.stage {
            stage.sync_sprites();
        }
        self.follow_camera(ctx);
        Ok(SceneCommand::None)
    }

    fn pointer_down(
        &mut self,
        _state: &PointerState,
        _ctx: &mut SceneContext<'_>,
    ) -> Result<SceneCommand> {
        self.reset_gesture();
        Ok(SceneCommand::None)
    }

    fn pointer_move(
        &mut self,
        state: &PointerState,
        ctx: &mut SceneContext<'_>,
    ) -> Result<SceneCommand> {
        self.point_arrow(state.swipe_direction(), ctx.config.tile_size());
        Ok(SceneCommand::None)
    }

    fn tap(&mut self, _state: &PointerState, _ctx: &mut SceneContext<'_>) -> Result<SceneCommand> {
        self.hide_arrow();
        self.reset_gesture();
        if let Some(hero) = self.hero_character() {
            let tint = if hero.tint() == HERO_TINT { HERO_ALT_TINT } else { HERO_TINT };
            hero.set_tint(tint);
        }
        Ok(SceneCommand::None)
    }

    fn swipe(
        &mut self,
        direction: Direction,
        state: &PointerState,
        ctx: &mut SceneContext<'_>,
    ) -> Result<SceneCommand> {
        self.hide_arrow();
        let already_moved = self.gesture_moved;
        self.reset_gesture();
        if !already_moved && state.reaches(ctx.config.swipe_play) {
            self.step(direction, ctx)?;
        }
        Ok(SceneCommand::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::geometry::GridPos;
    use crate::game::design::MapDesign;
    use crate::game::terrain::TerrainRegistry;
    use crate::scene::headless::{HeadlessAudio, HeadlessRenderer};

    struct Harness {
        renderer: HeadlessRenderer,
        audio: HeadlessAudio,
        terrain: TerrainRegistry,
        config: EngineConfig,
    }

    impl Harness {
        fn new() -> Self {
            let config = EngineConfig {
                map: MapDesign::new(
                    [('#', "wall"), ('.', "floor"), ('+', "door")],
                    &["######", "#...+.", "#....#", "######"],
                ),
                hero_start: GridPos::new(1, 1),
                monsters: vec![GridPos::new(3, 2)],
                ..EngineConfig::default()
            };
            Self {
                renderer: HeadlessRenderer::default(),
                audio: HeadlessAudio::default(),
                terrain: TerrainRegistry::standard(),
                config,
            }
        }

        fn ctx(&mut self, pointer: Option<PointerState>) -> SceneContext<'_> {
            SceneContext {
                renderer: &mut self.renderer,
                audio: &mut self.audio,
                terrain: &mut self.terrain,
                config: &self.config,
                pointer,
            }
        }

        fn scene(&mut self) -> DungeonScene {
            let mut scene = DungeonScene::new();
            scene.setup(&mut self.ctx(None)).unwrap();
            scene
        }
    }

    fn swipe_state(dx: f64, dy: f64) -> PointerState {
        PointerState::new(Coord::new(100.0 + dx, 100.0 + dy), Some(Coord::new(100.0, 100.0)), 10.0)
    }

    fn hero_pos(scene: &DungeonScene) -> GridPos {
        scene.stage().unwrap().position_of(scene.hero().unwrap()).unwrap()
    }

    fn run(scene: &mut DungeonScene, harness: &mut Harness, ms: f64) {
        scene.tasks().update(ms);
        scene.update(ms, &mut harness.ctx(None)).unwrap();
    }

    #[test]
    fn test_setup_places_everything() {
        let mut h = Harness::new();
        let scene = h.scene();
        let stage = scene.stage().unwrap();
        assert_eq!(stage.monsters().count(), 1);
        assert_eq!(hero_pos(&scene), GridPos::new(1, 1));
        assert_eq!(h.renderer.live_with_texture("hero")[0].tint, HERO_TINT);
        assert!(!h.renderer.live_with_texture("arrow")[0].visible);

        let bgm = h.audio.played().remove(0);
        assert_eq!(bgm.id, SOUND_BGM);
        assert!(bgm.looping);
        assert_eq!(bgm.volume, h.config.bgm_volume);

        // Top wall row sits above floor (except the corners) and shows its face.
        assert!(stage.cell(GridPos::new(1, 0)).unwrap().terrain().is_open());
        assert!(!stage.cell(GridPos::new(0, 0)).unwrap().terrain().is_open());
    }

    #[test]
    fn test_swipe_moves_and_eases() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        let state = swipe_state(40.0, 0.0);

        scene.swipe(Direction::Right, &state, &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(2, 1));
        assert_eq!(h.audio.count(SOUND_FOOTSTEP), 1);
        assert!(scene.hero_is_moving());

        // A second swipe during the animation is ignored.
        scene.swipe(Direction::Right, &state, &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(2, 1));

        run(&mut scene, &mut h, 100.0);
        run(&mut scene, &mut h, 100.0);
        assert!(!scene.hero_is_moving());
        let hero = h.renderer.live_with_texture("hero").remove(0);
        assert_eq!(hero.position, Coord::new(64.0, 32.0));
    }

    #[test]
    fn test_short_swipe_is_ignored() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        // Past the deadzone but short of swipe play.
        let state = swipe_state(20.0, 0.0);
        assert_eq!(state.swipe_direction(), Direction::Right);
        scene.swipe(Direction::Right, &state, &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(1, 1));
        assert_eq!(h.audio.count(SOUND_FOOTSTEP), 0);
    }

    #[test]
    fn test_door_opens_then_walks_through() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        let right = swipe_state(40.0, 0.0);

        for _ in 0..2 {
            scene.swipe(Direction::Right, &right, &mut h.ctx(None)).unwrap();
            run(&mut scene, &mut h, 200.0);
        }
        assert_eq!(hero_pos(&scene), GridPos::new(3, 1));

        // Blocked by the closed door: it opens, the hero stays.
        scene.swipe(Direction::Right, &right, &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(3, 1));
        assert_eq!(h.audio.count(SOUND_DOOR), 1);
        assert!(scene.stage().unwrap().cell(GridPos::new(4, 1)).unwrap().is_passable());

        // Next input walks through.
        scene.swipe(Direction::Right, &right, &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(4, 1));
        assert_eq!(h.audio.count(SOUND_DOOR), 1);
    }

    #[test]
    fn test_blocked_by_monster_and_wall() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        scene.swipe(Direction::Up, &swipe_state(0.0, -40.0), &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(1, 1));

        scene.swipe(Direction::DownRight, &swipe_state(40.0, 40.0), &mut h.ctx(None)).unwrap();
        run(&mut scene, &mut h, 200.0);
        assert_eq!(hero_pos(&scene), GridPos::new(2, 2));

        // Monster at (3, 2).
        scene.swipe(Direction::Right, &swipe_state(40.0, 0.0), &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(2, 2));
        assert_eq!(h.audio.count(SOUND_FOOTSTEP), 1);
    }

    #[test]
    fn test_held_drag_walks_once_per_step() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        let held = swipe_state(0.0, 40.0);
        scene.pointer_down(&held, &mut h.ctx(Some(held))).unwrap();

        scene.tasks().update(16.0);
        scene.update(16.0, &mut h.ctx(Some(held))).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(1, 2));

        // Still animating: no second step yet.
        scene.tasks().update(16.0);
        scene.update(16.0, &mut h.ctx(Some(held))).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(1, 2));
        assert!(h.renderer.live_with_texture("arrow")[0].visible);

        // Release: the gesture already moved, so the swipe does not step again.
        scene.tasks().update(200.0);
        scene.swipe(Direction::Down, &held, &mut h.ctx(None)).unwrap();
        assert_eq!(h.audio.count(SOUND_FOOTSTEP), 1);
        assert!(!h.renderer.live_with_texture("arrow")[0].visible);
    }

    #[test]
    fn test_held_drag_stops_at_opened_door() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        let right = swipe_state(40.0, 0.0);
        for _ in 0..2 {
            scene.swipe(Direction::Right, &right, &mut h.ctx(None)).unwrap();
            run(&mut scene, &mut h, 200.0);
        }
        assert_eq!(hero_pos(&scene), GridPos::new(3, 1));

        // Holding toward the closed door opens it, then keeps the hero put.
        scene.pointer_down(&right, &mut h.ctx(Some(right))).unwrap();
        for _ in 0..30 {
            scene.tasks().update(16.0);
            scene.update(16.0, &mut h.ctx(Some(right))).unwrap();
        }
        assert_eq!(hero_pos(&scene), GridPos::new(3, 1));
        assert_eq!(h.audio.count(SOUND_DOOR), 1);
        assert_eq!(h.audio.count(SOUND_FOOTSTEP), 2);

        // Releasing adds nothing either.
        scene.swipe(Direction::Right, &right, &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(3, 1));

        // A fresh hold walks through.
        scene.pointer_down(&right, &mut h.ctx(Some(right))).unwrap();
        scene.tasks().update(16.0);
        scene.update(16.0, &mut h.ctx(Some(right))).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(4, 1));
        assert_eq!(h.audio.count(SOUND_DOOR), 1);
    }

    #[test]
    fn test_swipe_must_exceed_swipe_play() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        let exact = swipe_state(h.config.swipe_play, 0.0);
        scene.swipe(Direction::Right, &exact, &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(1, 1));

        let past = swipe_state(h.config.swipe_play + 1.0, 0.0);
        scene.swipe(Direction::Right, &past, &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(2, 1));
    }

    #[test]
    fn test_failed_setup_leaves_nothing_behind() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        assert!(scene.stage().is_some());

        h.config.map = MapDesign::new([('#', "wall")], &["###", "#.#"]);
        assert!(scene.setup(&mut h.ctx(None)).is_err());
        assert!(scene.stage().is_none());
        assert!(scene.hero().is_none());
        assert!(h.audio.played()[0].stopped);

        // Input against the empty scene is a no-op.
        let right = swipe_state(40.0, 0.0);
        scene.swipe(Direction::Right, &right, &mut h.ctx(None)).unwrap();
        scene.update(16.0, &mut h.ctx(Some(right))).unwrap();
    }

    #[test]
    fn test_tap_toggles_tint() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        let tap = swipe_state(0.0, 0.0);
        scene.tap(&tap, &mut h.ctx(None)).unwrap();
        assert_eq!(h.renderer.live_with_texture("hero")[0].tint, HERO_ALT_TINT);
        scene.tap(&tap, &mut h.ctx(None)).unwrap();
        assert_eq!(h.renderer.live_with_texture("hero")[0].tint, HERO_TINT);
    }

    #[test]
    fn test_arrow_points_at_neighbor() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        scene.pointer_move(&swipe_state(15.0, 15.0), &mut h.ctx(None)).unwrap();
        let arrow = h.renderer.live_with_texture("arrow").remove(0);
        assert!(arrow.visible);
        assert_eq!(arrow.angle, 45.0);
        assert_eq!(arrow.position, Coord::new(64.0, 64.0));

        scene.pointer_move(&swipe_state(2.0, 2.0), &mut h.ctx(None)).unwrap();
        assert!(!h.renderer.live_with_texture("arrow")[0].visible);
    }

    #[test]
    fn test_camera_follows_hero() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        // hero at (32, 32), focus on its center (48, 48)
        let center = h.config.screen.center();
        assert_eq!(h.renderer.camera(), center - Coord::new(48.0, 48.0));

        scene.swipe(Direction::Right, &swipe_state(40.0, 0.0), &mut h.ctx(None)).unwrap();
        run(&mut scene, &mut h, 200.0);
        assert_eq!(h.renderer.camera(), center - Coord::new(80.0, 48.0));
    }

    #[test]
    fn test_step_off_map_is_ignored() {
        let mut h = Harness::new();
        let mut scene = h.scene();
        let right = swipe_state(40.0, 0.0);
        // Walk to (4,1), open the door first.
        for _ in 0..3 {
            scene.swipe(Direction::Right, &right, &mut h.ctx(None)).unwrap();
            run(&mut scene, &mut h, 200.0);
        }
        scene.swipe(Direction::Right, &right, &mut h.ctx(None)).unwrap();
        run(&mut scene, &mut h, 200.0);
        scene.swipe(Direction::Right, &right, &mut h.ctx(None)).unwrap();
        run(&mut scene, &mut h, 200.0);
        assert_eq!(hero_pos(&scene), GridPos::new(5, 1));

        // Column 5 is the east edge; the next step leaves the grid.
        scene.swipe(Direction::Right, &right, &mut h.ctx(None)).unwrap();
        assert_eq!(hero_pos(&scene), GridPos::new(5, 1));
    }
}
