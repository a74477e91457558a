//! Stage
//!
//! Fixed-size grid of cells, indexed `[row][col]`. Each cell holds exactly
//! one terrain and at most one character. Placement and movement are the only
//! mutations after construction.
//!
//! Movement updates the grid position immediately. The pixel position is left
//! to the caller, which usually eases it toward `pos.to_pixel(tile_size)`.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

use crate::core::error::StageError;
use crate::core::geometry::{Direction, GridPos};
use crate::game::character::{Character, CharacterId};
use crate::game::terrain::{Terrain, TerrainKind, TerrainRegistry};
use crate::scene::render::Renderer;

// =============================================================================
// CELL
// =============================================================================

/// One grid slot.
#[derive(Debug)]
pub struct Cell {
    occupant: Option<CharacterId>,
    terrain: Terrain,
}

impl Cell {
    /// Installed terrain.
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Character standing here.
    pub fn occupant(&self) -> Option<CharacterId> {
        self.occupant
    }

    /// Whether a character stands here.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Terrain passability.
    pub fn is_passable(&self) -> bool {
        self.terrain.is_passable()
    }

    /// Terrain is a wall.
    pub fn is_wall(&self) -> bool {
        self.terrain.is_wall()
    }

    /// Terrain is a door.
    pub fn is_door(&self) -> bool {
        self.terrain.is_door()
    }

    /// Detached snapshot for a [`MoveResult`].
    pub fn info(&self) -> CellInfo {
        CellInfo {
            terrain_id: self.terrain.id().to_string(),
            kind: self.terrain.kind(),
            passable: self.terrain.is_passable(),
            open: self.terrain.is_open(),
            occupant: self.occupant,
        }
    }
}

/// Snapshot of a cell at the time a move was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellInfo {
    /// Terrain id
    pub terrain_id: String,
    /// Terrain variant
    pub kind: TerrainKind,
    /// Passability
    pub passable: bool,
    /// Open visual state
    pub open: bool,
    /// Occupant
    pub occupant: Option<CharacterId>,
}

impl CellInfo {
    /// Whether characters may enter.
    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// Door variant.
    pub fn is_door(&self) -> bool {
        self.kind == TerrainKind::Door
    }

    /// Wall variant.
    pub fn is_wall(&self) -> bool {
        self.kind == TerrainKind::Wall
    }

    /// Whether a character stands there.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Outcome of [`Stage::move_character`]. Blocked moves are ordinary results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveResult {
    /// Whether the character moved
    pub moved: bool,
    /// Destination cell coordinate
    pub coord: GridPos,
    /// Destination cell as resolved
    pub cell: CellInfo,
}

// =============================================================================
// STAGE
// =============================================================================

/// The tile grid.
#[derive(Debug)]
pub struct Stage {
    width: usize,
    height: usize,
    tile_size: f64,
    cells: Vec<Vec<Cell>>,
    characters: BTreeMap<CharacterId, Character>,
    positions: BTreeMap<CharacterId, GridPos>,
    monsters: BTreeSet<CharacterId>,
    next_id: u32,
}

impl Stage {
    /// Create a `width` x `height` stage filled with one terrain.
    pub fn new(
        width: usize,
        height: usize,
        tile_size: f64,
        fill: &str,
        registry: &TerrainRegistry,
        renderer: &mut dyn Renderer,
    ) -> Result<Self, StageError> {
        Self::from_layout(width, height, tile_size, registry, renderer, |_| fill)
    }

    /// Create a stage whose terrain at each position is chosen by `layout`.
    pub fn from_layout<'a>(
        width: usize,
        height: usize,
        tile_size: f64,
        registry: &TerrainRegistry,
        renderer: &mut dyn Renderer,
        layout: impl Fn(GridPos) -> &'a str,
    ) -> Result<Self, StageError> {
        let mut cells = Vec::with_capacity(height);
        for y in 0..height {
            let mut row = Vec::with_capacity(width);
            for x in 0..width {
                let pos = GridPos::new(x as i32, y as i32);
                let terrain = registry.instantiate(layout(pos), renderer)?;
                terrain.place(pos.to_pixel(tile_size));
                row.push(Cell { occupant: None, terrain });
            }
            cells.push(row);
        }
        debug!(width, height, "stage created");
        Ok(Self {
            width,
            height,
            tile_size,
            cells,
            characters: BTreeMap::new(),
            positions: BTreeMap::new(),
            monsters: BTreeSet::new(),
            next_id: 0,
        })
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Side of a cell in pixels.
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Whether a position lies on the grid.
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn check(&self, pos: GridPos) -> Result<(usize, usize), StageError> {
        if self.contains(pos) {
            Ok((pos.y as usize, pos.x as usize))
        } else {
            Err(StageError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Cell at a position.
    pub fn cell(&self, pos: GridPos) -> Result<&Cell, StageError> {
        let (row, col) = self.check(pos)?;
        Ok(&self.cells[row][col])
    }

    fn cell_mut(&mut self, pos: GridPos) -> Result<&mut Cell, StageError> {
        let (row, col) = self.check(pos)?;
        Ok(&mut self.cells[row][col])
    }

    // -------------------------------------------------------------------------
    // Terrain
    // -------------------------------------------------------------------------

    /// Install a fresh instance of `id` at `pos`, releasing the previous one.
    pub fn put_terrain(
        &mut self,
        id: &str,
        pos: GridPos,
        registry: &TerrainRegistry,
        renderer: &mut dyn Renderer,
    ) -> Result<(), StageError> {
        self.check(pos)?;
        let terrain = registry.instantiate(id, renderer)?;
        terrain.place(pos.to_pixel(self.tile_size));

        let cell = self.cell_mut(pos)?;
        let mut evicted = std::mem::replace(&mut cell.terrain, terrain);
        evicted.release();
        trace!(%pos, id, evicted = evicted.id(), "terrain placed");
        Ok(())
    }

    /// Install `id` on every cell.
    pub fn fill_terrain(
        &mut self,
        id: &str,
        registry: &TerrainRegistry,
        renderer: &mut dyn Renderer,
    ) -> Result<(), StageError> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.put_terrain(id, GridPos::new(x as i32, y as i32), registry, renderer)?;
            }
        }
        Ok(())
    }

    /// Show a wall face on every wall whose southern neighbor is not a wall.
    ///
    /// Walls on the bottom row have no southern neighbor and stay closed.
    pub fn set_wall_face(&mut self) {
        let mut faces = 0;
        for y in 0..self.height.saturating_sub(1) {
            for x in 0..self.width {
                if self.cells[y][x].is_wall() && !self.cells[y + 1][x].is_wall() {
                    self.cells[y][x].terrain.open();
                    faces += 1;
                }
            }
        }
        debug!(faces, "wall faces set");
    }

    /// Open the terrain at `pos`. Returns whether its state changed.
    pub fn open_terrain(&mut self, pos: GridPos) -> Result<bool, StageError> {
        let changed = self.cell_mut(pos)?.terrain.open();
        debug!(%pos, changed, "terrain opened");
        Ok(changed)
    }

    /// Close the terrain at `pos`. Returns whether its state changed.
    pub fn close_terrain(&mut self, pos: GridPos) -> Result<bool, StageError> {
        let changed = self.cell_mut(pos)?.terrain.close();
        debug!(%pos, changed, "terrain closed");
        Ok(changed)
    }

    // -------------------------------------------------------------------------
    // Characters
    // -------------------------------------------------------------------------

    /// Place a character on an empty cell and snap its pixel position there.
    pub fn put_character(
        &mut self,
        character: Character,
        pos: GridPos,
    ) -> Result<CharacterId, StageError> {
        if self.cell(pos)?.is_occupied() {
            return Err(StageError::Occupied(pos));
        }

        let id = CharacterId(self.next_id);
        self.next_id += 1;
        self.cell_mut(pos)?.occupant = Some(id);

        let pixel = pos.to_pixel(self.tile_size);

        character.set_position(pixel);
        if character.is_monster() {
            self.monsters.insert(id);
        }
        debug!(%id, %pos, texture = character.texture(), "character placed");
        self.characters.insert(id, character);
        self.positions.insert(id, pos);
        Ok(id)
    }

    /// Try to step a character one cell in `direction`.
    ///
    /// Blocked when the destination is impassable or occupied; nothing changes
    /// in that case. A destination off the grid is an error.
    pub fn move_character(
        &mut self,
        id: CharacterId,
        direction: Direction,
    ) -> Result<MoveResult, StageError> {
        let from = self.position_of(id)?;
        let to = from.plus(direction);
        let cell = self.cell(to)?;
        let info = cell.info();

        if !cell.is_passable() || cell.is_occupied() {
            debug!(
                %id,
                %from,
                %to,
                terrain = %info.terrain_id,
                occupied = info.is_occupied(),
                "move blocked"
            );
            return Ok(MoveResult { moved: false, coord: to, cell: info });
        }

        self.cell_mut(from)?.occupant = None;
        self.cell_mut(to)?.occupant = Some(id);
        self.positions.insert(id, to);
        debug!(%id, %from, %to, "character moved");

        let cell = self.cell(to)?.info();
        Ok(MoveResult { moved: true, coord: to, cell })
    }

    /// Detach a character and release its sprite.
    pub fn remove_character(&mut self, id: CharacterId) -> Result<(), StageError> {
        let pos = self.position_of(id)?;
        self.cell_mut(pos)?.occupant = None;
        self.positions.remove(&id);
        self.monsters.remove(&id);
        if let Some(mut character) = self.characters.remove(&id) {
            character.release();
        }
        debug!(%id, %pos, "character removed");
        Ok(())
    }

    /// Grid position tracked for a character.
    pub fn position_of(&self, id: CharacterId) -> Result<GridPos, StageError> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(StageError::UnknownCharacter(id))
    }

    /// Character by id.
    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// All placed characters in id order.
    pub fn characters(&self) -> impl Iterator<Item = (CharacterId, &Character)> {
        self.characters.iter().map(|(id, ch)| (*id, ch))
    }

    /// Placed monsters in id order.
    pub fn monsters(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.monsters.iter().copied()
    }

    /// Push every character's pixel position to its sprite.
    pub fn sync_sprites(&self) {
        for character in self.characters.values() {
            character.sync_sprite();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
