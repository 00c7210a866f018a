//! Digger agent.
//!
//! A single cursor walks the grid, alternately digging a room around its
//! position and a corridor leading away from the newest room or from the end
//! of the previous corridor. Corridors that have not yet reached a room are
//! kept in a pending list. When the digger gets stuck at the end of such a
//! chain it can roll the whole chain back and retry from the newest room.

use rand::Rng;
use smallvec::SmallVec;

use crate::common::{CellSize, Direction, GridGeometry, Position, WorldPosition};
use crate::dungeon::{CorridorIdentifier, Dungeon, RoomIdentifier};
use crate::errors::LayoutError;

use super::{CorridorBounds, LayoutGenerator, RoomBounds};

// =============================================================================
// DiggerConfiguration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiggerConfiguration {
    width: usize,
    height: usize,
    room_bounds: RoomBounds,
    corridor_bounds: CorridorBounds,
    remove_dirty_corridors: bool,
    geometry: GridGeometry,
}

impl DiggerConfiguration {
    #[must_use]
    pub const fn new(
        width: usize,
        height: usize,
        room_bounds: RoomBounds,
        corridor_bounds: CorridorBounds,
    ) -> Self {
        Self {
            width,
            height,
            room_bounds,
            corridor_bounds,
            remove_dirty_corridors: true,
            geometry: GridGeometry::new(
                WorldPosition::new(0.0, 0.0, 0.0),
                CellSize::new(1.0, 0.5, 1.0),
                2.0,
            ),
        }
    }

    #[must_use]
    pub const fn with_dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub const fn with_room_bounds(mut self, room_bounds: RoomBounds) -> Self {
        self.room_bounds = room_bounds;
        self
    }

    #[must_use]
    pub const fn with_corridor_bounds(mut self, corridor_bounds: CorridorBounds) -> Self {
        self.corridor_bounds = corridor_bounds;
        self
    }

    /// Whether corridor chains that never reach a room are removed again.
    #[must_use]
    pub const fn with_remove_dirty_corridors(mut self, remove: bool) -> Self {
        self.remove_dirty_corridors = remove;
        self
    }

    #[must_use]
    pub const fn with_geometry(mut self, geometry: GridGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn room_bounds(&self) -> RoomBounds {
        self.room_bounds
    }

    #[must_use]
    pub const fn corridor_bounds(&self) -> CorridorBounds {
        self.corridor_bounds
    }

    #[must_use]
    pub const fn remove_dirty_corridors(&self) -> bool {
        self.remove_dirty_corridors
    }

    #[must_use]
    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Clamps room and corridor bounds and enlarges the grid to at least four
    /// minimum rooms per side.
    pub fn normalized(self) -> Result<Self, LayoutError> {
        let room_bounds = self.room_bounds.normalized();
        let corridor_bounds = self.corridor_bounds.normalized();
        let width = self.width.max(4 * room_bounds.min_width());
        let height = self.height.max(4 * room_bounds.min_height());

        if (width, height) != (self.width, self.height) {
            tracing::warn!(
                requested_width = self.width,
                requested_height = self.height,
                width,
                height,
                "enlarged digger grid"
            );
        }

        Ok(Self {
            width,
            height,
            room_bounds,
            corridor_bounds,
            remove_dirty_corridors: self.remove_dirty_corridors,
            geometry: self.geometry.normalized(),
        })
    }
}

impl Default for DiggerConfiguration {
    fn default() -> Self {
        Self::new(50, 50, RoomBounds::default(), CorridorBounds::default())
    }
}

// =============================================================================
// DiggerState
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiggerState {
    /// Dig a room around the cursor, first stepping past the end of the
    /// previous corridor when `advance` is set.
    PlacingRoom { advance: bool },
    PlacingCorridorFromRoom,
    PlacingCorridorFromCorridor,
    Halted,
}

/// Boundary tiles of the newest room still worth trying, per side.
type Candidates = SmallVec<[(Direction, Vec<Position>); 4]>;

// =============================================================================
// Digger
// =============================================================================

struct Digger<'a, R: Rng + ?Sized> {
    configuration: &'a DiggerConfiguration,
    rng: &'a mut R,
    dungeon: Dungeon,
    cursor: Position,
    facing: Direction,
    candidates: Candidates,
    /// Corridors carved since the newest room, oldest first.
    pending: SmallVec<[CorridorIdentifier; 8]>,
    /// Room tile and side opened for the first pending corridor.
    attachment: Option<(Position, Direction)>,
}

impl<'a, R: Rng + ?Sized> Digger<'a, R> {
    fn new(configuration: &'a DiggerConfiguration, rng: &'a mut R) -> Result<Self, LayoutError> {
        let dungeon = Dungeon::new(
            configuration.width,
            configuration.height,
            configuration.geometry,
        )?;
        let bounds = configuration.room_bounds;
        let cursor = Position::new(
            rng.random_range(0..configuration.height - 1 - bounds.min_height()),
            rng.random_range(0..configuration.width - 1 - bounds.min_width()),
        );

        Ok(Self {
            configuration,
            rng,
            dungeon,
            cursor,
            facing: Direction::Right,
            candidates: Candidates::new(),
            pending: SmallVec::new(),
            attachment: None,
        })
    }

    fn run(mut self) -> Result<Dungeon, LayoutError> {
        let mut state = DiggerState::PlacingRoom { advance: false };
        while state != DiggerState::Halted {
            state = self.step(state)?;
            tracing::trace!(?state, cursor = %self.cursor, facing = %self.facing, "digger transition");
        }
        Ok(self.dungeon)
    }

    fn step(&mut self, state: DiggerState) -> Result<DiggerState, LayoutError> {
        let next = match state {
            DiggerState::PlacingRoom { advance } => {
                if self.place_room(advance)? {
                    DiggerState::PlacingCorridorFromRoom
                } else if self.pending.is_empty() {
                    DiggerState::Halted
                } else {
                    DiggerState::PlacingCorridorFromCorridor
                }
            }
            DiggerState::PlacingCorridorFromRoom => {
                if self.corridor_from_room()? {
                    DiggerState::PlacingRoom { advance: true }
                } else {
                    DiggerState::Halted
                }
            }
            DiggerState::PlacingCorridorFromCorridor => {
                if self.corridor_from_corridor()? {
                    DiggerState::PlacingRoom { advance: true }
                } else {
                    self.discard_pending()?;
                    DiggerState::PlacingCorridorFromRoom
                }
            }
            DiggerState::Halted => DiggerState::Halted,
        };
        Ok(next)
    }

    /// Digs a room containing the cursor cell. The cursor is restored when no
    /// room fits.
    fn place_room(&mut self, advance: bool) -> Result<bool, LayoutError> {
        let previous = self.cursor;
        if advance {
            match self.dungeon.grid().neighbor(self.cursor, self.facing) {
                Some(next) if self.dungeon.is_empty(next) => self.cursor = next,
                _ => return Ok(false),
            }
        }

        match self.try_room_around_cursor()? {
            Some(room) => {
                if advance {
                    self.dungeon.open_between(previous, self.facing);
                }
                self.remember_candidates(room)?;
                Ok(true)
            }
            None => {
                self.cursor = previous;
                Ok(false)
            }
        }
    }

    fn try_room_around_cursor(&mut self) -> Result<Option<RoomIdentifier>, LayoutError> {
        let grid = self.dungeon.grid();
        if !grid.is_empty(self.cursor) {
            return Ok(None);
        }
        let up = grid.empty_run(self.cursor, Direction::Up);
        let down = grid.empty_run(self.cursor, Direction::Down);
        let left = grid.empty_run(self.cursor, Direction::Left);
        let right = grid.empty_run(self.cursor, Direction::Right);

        let bounds = self.configuration.room_bounds;
        let span_width = left + right + 1;
        let span_height = up + down + 1;
        if span_width < bounds.min_width() || span_height < bounds.min_height() {
            return Ok(None);
        }

        let width = self
            .rng
            .random_range(bounds.min_width()..=bounds.max_width().min(span_width));
        let height = self
            .rng
            .random_range(bounds.min_height()..=bounds.max_height().min(span_height));
        let column = Self::first_index(self.rng, self.cursor.column(), left, right, width);
        let row = Self::first_index(self.rng, self.cursor.row(), up, down, height);

        match self
            .dungeon
            .place_room(Position::new(row, column), width, height)
        {
            Ok(room) => Ok(Some(room)),
            Err(error) if error.is_placement_error() => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Random first row or column of a `size`-long span that covers `center`
    /// and stays within `before` cells before and `after` cells after it.
    fn first_index(rng: &mut R, center: usize, before: usize, after: usize, size: usize) -> usize {
        let lowest = (center + 1).saturating_sub(size).max(center - before);
        let highest = center.min(center + after + 1 - size);
        rng.random_range(lowest..=highest)
    }

    fn remember_candidates(&mut self, room: RoomIdentifier) -> Result<(), LayoutError> {
        let room = self
            .dungeon
            .room(room)
            .ok_or_else(|| LayoutError::unknown_room(room))?;
        self.candidates = Direction::all()
            .into_iter()
            .map(|side| (side, room.boundary(side)))
            .collect();
        Ok(())
    }

    /// Starts a new corridor chain from a boundary tile of the newest room.
    /// Tiles that were tried are dropped, so repeated calls eventually run
    /// out of candidates.
    fn corridor_from_room(&mut self) -> Result<bool, LayoutError> {
        self.pending.clear();
        self.attachment = None;

        while !self.candidates.is_empty() {
            let slot = self.rng.random_range(0..self.candidates.len());
            let side = self.candidates[slot].0;
            while !self.candidates[slot].1.is_empty() {
                let pick = self.rng.random_range(0..self.candidates[slot].1.len());
                let tile = self.candidates[slot].1.swap_remove(pick);
                if self.dig_corridor(tile, side)? {
                    self.attachment = Some((tile, side));
                    return Ok(true);
                }
            }
            self.candidates.swap_remove(slot);
        }
        Ok(false)
    }

    /// Continues the current chain with a turn onto the other axis.
    fn corridor_from_corridor(&mut self) -> Result<bool, LayoutError> {
        let minimum = self.configuration.corridor_bounds.min_length();
        let viable: SmallVec<[Direction; 2]> = self
            .facing
            .perpendicular()
            .into_iter()
            .filter(|side| self.dungeon.grid().empty_run(self.cursor, *side) > minimum)
            .collect();

        let side = match viable.as_slice() {
            [] => return Ok(false),
            [only] => *only,
            choices => choices[self.rng.random_range(0..choices.len())],
        };
        self.dig_corridor(self.cursor, side)
    }

    /// Carves a sealed corridor from `start` toward `side` when the empty run
    /// beyond `start` is longer than the minimum length. At least one empty
    /// cell is always left past the new corridor's end.
    fn dig_corridor(&mut self, start: Position, side: Direction) -> Result<bool, LayoutError> {
        let bounds = self.configuration.corridor_bounds;
        let free = self.dungeon.grid().empty_run(start, side);
        if free <= bounds.min_length() {
            return Ok(false);
        }

        let length = self
            .rng
            .random_range(bounds.min_length()..=bounds.max_length().min(free - 1));
        let end = start
            .translate(side, length)
            .ok_or_else(|| LayoutError::generation("corridor end left the grid"))?;
        let corridor = self.dungeon.carve_path(start, end, true)?;

        self.pending.push(corridor);
        self.cursor = end;
        self.facing = side;
        Ok(true)
    }

    /// Destroys the pending chain and closes the room wall it was attached
    /// through, when dirty corridors are being removed.
    fn discard_pending(&mut self) -> Result<(), LayoutError> {
        if !self.configuration.remove_dirty_corridors {
            return Ok(());
        }
        for corridor in self.pending.drain(..).rev() {
            self.dungeon.destroy_corridor(corridor)?;
        }
        if let Some((tile, side)) = self.attachment.take() {
            self.dungeon.place_wall(tile, side);
        }
        Ok(())
    }
}

// =============================================================================
// DiggerGenerator
// =============================================================================

/// Agent-based generator.
///
/// The first room dug is the entrance and the last one the exit.
///
/// # Examples
///
/// ```
/// use dungeon_layout::prelude::*;
///
/// let configuration = DiggerConfiguration::default()
///     .with_corridor_bounds(CorridorBounds::new(2, 4))
///     .with_remove_dirty_corridors(true);
/// let dungeon = DiggerGenerator::new(configuration)
///     .unwrap()
///     .generate_seeded(9)
///     .unwrap();
///
/// assert!(dungeon.is_fully_connected());
/// assert!(dungeon.dead_ends().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DiggerGenerator {
    configuration: DiggerConfiguration,
}

impl DiggerGenerator {
    pub fn new(configuration: DiggerConfiguration) -> Result<Self, LayoutError> {
        Ok(Self {
            configuration: configuration.normalized()?,
        })
    }

    #[must_use]
    pub const fn configuration(&self) -> &DiggerConfiguration {
        &self.configuration
    }
}

impl LayoutGenerator for DiggerGenerator {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Dungeon, LayoutError> {
        let configuration = &self.configuration;
        tracing::debug!(?configuration, "generating digger dungeon");

        let mut dungeon = Digger::new(configuration, rng)?.run()?;

        let room_count = dungeon.room_count();
        if room_count == 0 {
            return Err(LayoutError::generation("digger could not place any room"));
        }
        dungeon.set_entrance_and_exit(RoomIdentifier::new(0), RoomIdentifier::new(room_count - 1))?;

        tracing::debug!(
            rooms = room_count,
            corridors = dungeon.corridor_count(),
            "generated digger dungeon"
        );
        Ok(dungeon)
    }
}

// =============================================================================
// Tests
// =============================================================================
