//! The dungeon aggregate: grid plus the rooms and corridors placed on it.

use std::fmt;

use static_assertions::assert_impl_all;

use crate::common::{Direction, GridGeometry, Position};
use crate::errors::LayoutError;

use super::corridor::manhattan_path;
use super::{
    Corridor, CorridorIdentifier, Grid, Room, RoomIdentifier, Tile, TileKind, TileOwner, Walls,
};

// =============================================================================
// Dungeon
// =============================================================================

/// A grid together with the rooms and corridors placed on it and the
/// designated entrance and exit rooms.
///
/// All placement goes through [`Dungeon::place_room`] and
/// [`Dungeon::carve_path`], which keep tile ownership and walls consistent.
///
/// # Examples
///
/// ```
/// use dungeon_layout::{Dungeon, GridGeometry, Position};
///
/// let mut dungeon = Dungeon::new(20, 10, GridGeometry::default()).unwrap();
/// let left = dungeon.place_room(Position::new(2, 1), 4, 4).unwrap();
/// let right = dungeon.place_room(Position::new(2, 12), 5, 4).unwrap();
/// dungeon
///     .carve_path(Position::new(3, 4), Position::new(3, 12), false)
///     .unwrap();
/// dungeon.set_entrance_and_exit(left, right).unwrap();
///
/// assert!(dungeon.is_fully_connected());
/// assert_eq!(dungeon.corridor_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dungeon {
    grid: Grid,
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
    next_corridor: CorridorIdentifier,
    entrance: Option<RoomIdentifier>,
    exit: Option<RoomIdentifier>,
}

assert_impl_all!(Dungeon: Send, Sync, Clone);

impl Dungeon {
    /// Creates an empty dungeon over a freshly allocated grid.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Configuration`] when either dimension is zero.
    pub fn new(width: usize, height: usize, geometry: GridGeometry) -> Result<Self, LayoutError> {
        Ok(Self {
            grid: Grid::new(width, height, geometry)?,
            rooms: Vec::new(),
            corridors: Vec::new(),
            next_corridor: CorridorIdentifier::new(0),
            entrance: None,
            exit: None,
        })
    }

    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.grid.width()
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.grid.height()
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub fn room(&self, identifier: RoomIdentifier) -> Option<&Room> {
        self.rooms.get(identifier.value())
    }

    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// The room owning the tile at `position`, if any.
    #[must_use]
    pub fn room_at(&self, position: Position) -> Option<&Room> {
        match self.grid.tile(position)?.owner() {
            TileOwner::Room(identifier) => self.room(identifier),
            TileOwner::Corridor(_) => None,
        }
    }

    /// Corridors in creation order.
    #[must_use]
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    #[must_use]
    pub fn corridor(&self, identifier: CorridorIdentifier) -> Option<&Corridor> {
        self.corridor_index(identifier)
            .map(|index| &self.corridors[index])
    }

    #[must_use]
    pub fn corridor_count(&self) -> usize {
        self.corridors.len()
    }

    #[must_use]
    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.grid.tile(position)
    }

    #[must_use]
    pub fn is_empty(&self, position: Position) -> bool {
        self.grid.is_empty(position)
    }

    #[must_use]
    pub const fn entrance(&self) -> Option<RoomIdentifier> {
        self.entrance
    }

    #[must_use]
    pub const fn exit(&self) -> Option<RoomIdentifier> {
        self.exit
    }

    #[must_use]
    pub fn entrance_room(&self) -> Option<&Room> {
        self.entrance.and_then(|identifier| self.room(identifier))
    }

    #[must_use]
    pub fn exit_room(&self) -> Option<&Room> {
        self.exit.and_then(|identifier| self.room(identifier))
    }

    /// Places a `width` x `height` room with its top-left tile at `top_left`.
    ///
    /// Boundary tiles become [`TileKind::RoomOuter`] with walls on the sides
    /// facing out of the room; interior tiles are wall-free
    /// [`TileKind::RoomInner`]. Every target cell is checked before any tile
    /// is created.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::Configuration`] for a zero dimension
    /// - [`LayoutError::OutOfBounds`] when the rectangle leaves the grid
    /// - [`LayoutError::Overlap`] when a target cell is already occupied
    pub fn place_room(
        &mut self,
        top_left: Position,
        width: usize,
        height: usize,
    ) -> Result<RoomIdentifier, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::configuration(format!(
                "room dimensions must be positive, got {width}x{height}"
            )));
        }

        let identifier = RoomIdentifier::new(self.rooms.len());
        let room = Room::new(identifier, top_left, width, height);
        let bottom_right = Position::new(
            top_left.row().saturating_add(height - 1),
            top_left.column().saturating_add(width - 1),
        );
        self.grid.ensure_contains(bottom_right)?;

        if let Some(occupied) = room.positions().find(|position| !self.grid.is_empty(*position)) {
            return Err(LayoutError::overlap(occupied));
        }

        let owner = TileOwner::Room(identifier);
        for position in room.positions() {
            let mut tile = Tile::new(position, TileKind::RoomInner, Walls::NONE, owner);
            let outward = room.outward_walls(position);
            if !outward.is_empty() {
                tile.promote_to_outer(outward);
            }
            self.grid.set_tile(tile);
        }

        tracing::trace!(room = %room, "placed room");
        self.rooms.push(room);
        Ok(identifier)
    }

    /// Carves the single-bend path from `start` to `end`.
    ///
    /// Empty cells along the path receive new corridor tiles walled on every
    /// side that does not lead to a path neighbour. Occupied cells are kept
    /// as they are. Every step then opens the shared wall on both tiles, so
    /// the path connects to whatever it runs into.
    ///
    /// A created end tile with `close_end` unset stays open on its far side
    /// unless that side borders an occupied cell.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::OutOfBounds`] when either endpoint is outside
    /// the grid. No cell is modified in that case.
    pub fn carve_path(
        &mut self,
        start: Position,
        end: Position,
        close_end: bool,
    ) -> Result<CorridorIdentifier, LayoutError> {
        self.grid.ensure_contains(start)?;
        self.grid.ensure_contains(end)?;

        let identifier = self.next_corridor;
        let owner = TileOwner::Corridor(identifier);
        let path = manhattan_path(start, end);
        let last = path.len() - 1;
        let mut created = Vec::new();

        for (index, position) in path.iter().copied().enumerate() {
            if !self.grid.is_empty(position) {
                continue;
            }

            let previous = index.checked_sub(1).map(|before| path[before]);
            let next = path.get(index + 1).copied();
            let mut walls = [previous, next]
                .into_iter()
                .flatten()
                .filter_map(|neighbor| position.direction_to(&neighbor))
                .fold(Walls::ALL, Walls::without);

            if index == last && !close_end {
                if let Some(arrival) = previous.and_then(|before| before.direction_to(&position)) {
                    let far_side_free = self
                        .grid
                        .neighbor(position, arrival)
                        .is_none_or(|beyond| self.grid.is_empty(beyond));
                    if far_side_free {
                        walls.remove(arrival);
                    }
                }
            }

            self.grid
                .set_tile(Tile::new(position, TileKind::Corridor, walls, owner));
            created.push(position);
        }

        for pair in path.windows(2) {
            if let Some(direction) = pair[0].direction_to(&pair[1]) {
                self.open_between(pair[0], direction);
            }
        }

        let corridor = Corridor::new(identifier, start, end, created);
        tracing::trace!(corridor = %corridor, close_end, "carved corridor");
        self.corridors.push(corridor);
        self.next_corridor = identifier.next();
        Ok(identifier)
    }

    /// Removes a corridor and every tile it created.
    ///
    /// Walls opened on neighbouring structures are left as they are;
    /// restoring them is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownCorridor`] for an identifier that is not
    /// (or no longer) part of this dungeon.
    pub fn destroy_corridor(
        &mut self,
        identifier: CorridorIdentifier,
    ) -> Result<Corridor, LayoutError> {
        let index = self
            .corridor_index(identifier)
            .ok_or_else(|| LayoutError::unknown_corridor(identifier))?;
        let corridor = self.corridors.remove(index);

        let owner = TileOwner::Corridor(identifier);
        for position in corridor.tiles() {
            if self
                .grid
                .tile(*position)
                .is_some_and(|tile| tile.owner() == owner)
            {
                self.grid.take_tile(*position);
            }
        }

        tracing::trace!(corridor = %corridor, "destroyed corridor");
        Ok(corridor)
    }

    /// Closes one side of the tile at `position`. Returns `false` when the
    /// cell holds no tile.
    pub fn place_wall(&mut self, position: Position, direction: Direction) -> bool {
        self.grid.tile_mut(position).is_some_and(|tile| {
            tile.place_wall(direction);
            true
        })
    }

    /// Opens one side of the tile at `position`. Returns `false` when the
    /// cell holds no tile.
    pub fn remove_wall(&mut self, position: Position, direction: Direction) -> bool {
        self.grid.tile_mut(position).is_some_and(|tile| {
            tile.remove_wall(direction);
            true
        })
    }

    /// Opens the shared face between `position` and its neighbour in
    /// `direction` on both tiles. Returns `false` unless both cells hold a
    /// tile.
    pub fn open_between(&mut self, position: Position, direction: Direction) -> bool {
        let Some(neighbor) = self.grid.neighbor(position, direction) else {
            return false;
        };
        let own = self.remove_wall(position, direction);
        let theirs = self.remove_wall(neighbor, direction.opposite());
        own && theirs
    }

    /// Designates the entrance and exit rooms.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownRoom`] when either room does not exist.
    pub fn set_entrance_and_exit(
        &mut self,
        entrance: RoomIdentifier,
        exit: RoomIdentifier,
    ) -> Result<(), LayoutError> {
        for identifier in [entrance, exit] {
            if self.room(identifier).is_none() {
                return Err(LayoutError::unknown_room(identifier));
            }
        }
        self.entrance = Some(entrance);
        self.exit = Some(exit);
        Ok(())
    }

    /// Tears the layout down: every tile, room and corridor is removed and
    /// the entrance and exit are reset. The grid keeps its dimensions.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.rooms.clear();
        self.corridors.clear();
        self.entrance = None;
        self.exit = None;
        tracing::debug!(
            width = self.width(),
            height = self.height(),
            "cleared dungeon"
        );
    }

    fn corridor_index(&self, identifier: CorridorIdentifier) -> Option<usize> {
        self.corridors
            .binary_search_by_key(&identifier, Corridor::identifier)
            .ok()
    }
}

impl fmt::Display for Dungeon {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height() {
            let line: String = (0..self.width())
                .map(|column| {
                    self.tile(Position::new(row, column))
                        .map_or(' ', |tile| tile.kind().symbol())
                })
                .collect();
            writeln!(formatter, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dungeon() -> Dungeon {
        Dungeon::new(20, 12, GridGeometry::default()).unwrap()
    }

    mod place_room {
        use super::*;

        #[rstest]
        fn marks_boundary_and_interior(mut dungeon: Dungeon) {
            let identifier = dungeon.place_room(Position::new(1, 1), 4, 3).unwrap();

            assert_eq!(identifier, RoomIdentifier::new(0));
            let corner = dungeon.tile(Position::new(1, 1)).unwrap();
            assert_eq!(corner.kind(), TileKind::RoomOuter);
            assert!(corner.has_wall(Direction::Up));
            assert!(corner.has_wall(Direction::Left));
            assert!(!corner.has_wall(Direction::Right));

            let inner = dungeon.tile(Position::new(2, 2)).unwrap();
            assert_eq!(inner.kind(), TileKind::RoomInner);
            assert!(inner.walls().is_empty());
            assert_eq!(dungeon.room_at(Position::new(3, 4)).map(Room::identifier), Some(identifier));
        }

        #[rstest]
        fn overlap_leaves_dungeon_untouched(mut dungeon: Dungeon) {
            dungeon.place_room(Position::new(2, 2), 4, 4).unwrap();
            let before = dungeon.clone();

            let error = dungeon.place_room(Position::new(4, 0), 4, 4).unwrap_err();

            assert_eq!(error, LayoutError::overlap(Position::new(4, 2)));
            assert_eq!(dungeon, before);
        }

        #[rstest]
        fn out_of_bounds_is_rejected(mut dungeon: Dungeon) {
            let error = dungeon.place_room(Position::new(10, 18), 4, 4).unwrap_err();
            assert!(matches!(error, LayoutError::OutOfBounds { .. }));
            assert_eq!(dungeon.room_count(), 0);
            assert_eq!(dungeon.grid().tiles().count(), 0);
        }

        #[rstest]
        fn zero_dimension_is_rejected(mut dungeon: Dungeon) {
            assert!(dungeon.place_room(Position::new(0, 0), 0, 4).unwrap_err().is_configuration());
        }
    }

    mod carve_path {
        use super::*;

        #[rstest]
        fn straight_corridor_between_rooms(mut dungeon: Dungeon) {
            dungeon.place_room(Position::new(2, 0), 4, 4).unwrap();
            dungeon.place_room(Position::new(2, 10), 4, 4).unwrap();

            let identifier = dungeon
                .carve_path(Position::new(3, 3), Position::new(3, 10), false)
                .unwrap();

            let corridor = dungeon.corridor(identifier).unwrap();
            assert_eq!(corridor.len(), 6);
            for position in corridor.tiles() {
                let tile = dungeon.tile(*position).unwrap();
                assert_eq!(tile.kind(), TileKind::Corridor);
                assert!(tile.has_wall(Direction::Up));
                assert!(tile.has_wall(Direction::Down));
                assert!(!tile.has_wall(Direction::Left));
                assert!(!tile.has_wall(Direction::Right));
            }
            assert!(!dungeon.tile(Position::new(3, 3)).unwrap().has_wall(Direction::Right));
            assert!(!dungeon.tile(Position::new(3, 10)).unwrap().has_wall(Direction::Left));
            assert!(dungeon.is_fully_connected());
        }

        #[rstest]
        fn corner_tile_keeps_off_path_walls(mut dungeon: Dungeon) {
            dungeon.place_room(Position::new(0, 0), 4, 4).unwrap();
            dungeon
                .carve_path(Position::new(1, 3), Position::new(8, 7), true)
                .unwrap();

            let corner = dungeon.tile(Position::new(1, 7)).unwrap();
            assert!(corner.has_wall(Direction::Up));
            assert!(corner.has_wall(Direction::Right));
            assert!(!corner.has_wall(Direction::Left));
            assert!(!corner.has_wall(Direction::Down));
        }

        #[rstest]
        #[case(true, 3)]
        #[case(false, 2)]
        fn end_tile_closing(mut dungeon: Dungeon, #[case] close_end: bool, #[case] walls: u32) {
            dungeon.place_room(Position::new(0, 0), 4, 4).unwrap();
            dungeon
                .carve_path(Position::new(1, 3), Position::new(1, 8), close_end)
                .unwrap();

            let end = dungeon.tile(Position::new(1, 8)).unwrap();
            assert_eq!(end.walls().count(), walls);
            assert!(end.has_wall(Direction::Up));
            assert!(end.has_wall(Direction::Down));
        }

        #[rstest]
        fn open_end_against_occupied_cell_is_walled(mut dungeon: Dungeon) {
            dungeon.place_room(Position::new(0, 0), 4, 4).unwrap();
            dungeon.place_room(Position::new(0, 9), 4, 4).unwrap();
            dungeon
                .carve_path(Position::new(1, 3), Position::new(1, 8), false)
                .unwrap();

            assert!(dungeon.tile(Position::new(1, 8)).unwrap().has_wall(Direction::Right));
            assert!(dungeon.wall_asymmetries().is_empty());
        }

        #[rstest]
        fn endpoint_outside_grid_is_rejected(mut dungeon: Dungeon) {
            let error = dungeon
                .carve_path(Position::new(1, 1), Position::new(1, 40), false)
                .unwrap_err();
            assert!(error.is_placement_error());
            assert_eq!(dungeon.corridor_count(), 0);
        }

        #[rstest]
        fn path_through_room_creates_no_tiles_inside(mut dungeon: Dungeon) {
            dungeon.place_room(Position::new(4, 4), 4, 4).unwrap();
            let identifier = dungeon
                .carve_path(Position::new(5, 0), Position::new(5, 12), true)
                .unwrap();

            let corridor = dungeon.corridor(identifier).unwrap();
            assert_eq!(corridor.len(), 9);
            assert!(corridor.tiles().iter().all(|position| dungeon.room_at(*position).is_none()));
            assert!(dungeon.is_fully_connected());
        }
    }

    mod destroy_corridor {
        use super::*;

        #[rstest]
        fn removes_created_tiles_only(mut dungeon: Dungeon) {
            dungeon.place_room(Position::new(0, 0), 4, 4).unwrap();
            let identifier = dungeon
                .carve_path(Position::new(1, 3), Position::new(1, 9), true)
                .unwrap();

            let corridor = dungeon.destroy_corridor(identifier).unwrap();

            assert_eq!(corridor.identifier(), identifier);
            assert!(corridor.tiles().iter().all(|position| dungeon.is_empty(*position)));
            assert!(!dungeon.is_empty(Position::new(1, 3)));
            assert_eq!(dungeon.corridor_count(), 0);
            assert!(!dungeon.tile(Position::new(1, 3)).unwrap().has_wall(Direction::Right));
        }

        #[rstest]
        fn unknown_identifier(mut dungeon: Dungeon) {
            let error = dungeon
                .destroy_corridor(CorridorIdentifier::new(7))
                .unwrap_err();
            assert!(error.is_lookup_error());
        }

        #[rstest]
        fn identifiers_are_not_reused(mut dungeon: Dungeon) {
            let first = dungeon
                .carve_path(Position::new(0, 0), Position::new(0, 5), true)
                .unwrap();
            dungeon.destroy_corridor(first).unwrap();
            let second = dungeon
                .carve_path(Position::new(0, 0), Position::new(0, 5), true)
                .unwrap();

            assert_ne!(first, second);
            assert!(dungeon.corridor(first).is_none());
            assert!(dungeon.corridor(second).is_some());
        }
    }

    #[rstest]
    fn entrance_and_exit_must_exist(mut dungeon: Dungeon) {
        let room = dungeon.place_room(Position::new(0, 0), 4, 4).unwrap();
        let error = dungeon
            .set_entrance_and_exit(room, RoomIdentifier::new(3))
            .unwrap_err();

        assert_eq!(error, LayoutError::unknown_room(RoomIdentifier::new(3)));
        assert_eq!(dungeon.entrance(), None);

        dungeon.set_entrance_and_exit(room, room).unwrap();
        assert_eq!(dungeon.entrance_room(), dungeon.exit_room());
    }

    #[rstest]
    fn clear_tears_everything_down(mut dungeon: Dungeon) {
        let room = dungeon.place_room(Position::new(0, 0), 4, 4).unwrap();
        dungeon
            .carve_path(Position::new(1, 3), Position::new(1, 9), true)
            .unwrap();
        dungeon.set_entrance_and_exit(room, room).unwrap();

        dungeon.clear();

        assert_eq!(dungeon.room_count(), 0);
        assert_eq!(dungeon.corridor_count(), 0);
        assert_eq!(dungeon.entrance(), None);
        assert_eq!(dungeon.grid().tiles().count(), 0);
        assert_eq!(dungeon.width(), 20);
    }

    #[rstest]
    fn display_renders_tile_kinds() {
        let mut dungeon = Dungeon::new(8, 4, GridGeometry::default()).unwrap();
        dungeon.place_room(Position::new(0, 0), 3, 3).unwrap();
        dungeon
            .carve_path(Position::new(1, 2), Position::new(1, 6), true)
            .unwrap();

        let rendered = dungeon.to_string();
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines[0], "ooo");
        assert_eq!(lines[1], "o.o####");
        assert_eq!(lines[2], "ooo");
        assert_eq!(lines[3], "");
    }
}
