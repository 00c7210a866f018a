//! Floor tiles and their walls.
//!
//! - `Tile`: the floor unit held by an occupied cell
//! - `TileKind`: room interior, room boundary or corridor
//! - `Walls`: which of the four sides are still closed
//! - `TileOwner`: the room or corridor that created the tile

use std::fmt;

use crate::common::{Direction, Position};

use super::{CorridorIdentifier, RoomIdentifier};

// =============================================================================
// TileKind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    /// A room tile with no wall on any side.
    RoomInner,
    /// A room tile on the room's boundary.
    RoomOuter,
    Corridor,
}

impl TileKind {
    #[must_use]
    pub const fn is_room(&self) -> bool {
        matches!(self, Self::RoomInner | Self::RoomOuter)
    }

    #[must_use]
    pub const fn symbol(&self) -> char {
        match self {
            Self::RoomInner => '.',
            Self::RoomOuter => 'o',
            Self::Corridor => '#',
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RoomInner => "RoomInner",
            Self::RoomOuter => "RoomOuter",
            Self::Corridor => "Corridor",
        };
        write!(formatter, "{name}")
    }
}

// =============================================================================
// Walls
// =============================================================================

/// The set of closed sides of a tile.
///
/// # Examples
///
/// ```
/// use dungeon_layout::{Direction, Walls};
///
/// let walls = Walls::ALL.without(Direction::Left);
/// assert!(walls.contains(Direction::Up));
/// assert!(!walls.contains(Direction::Left));
/// assert_eq!(walls.count(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Walls(u8);

impl Walls {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    #[must_use]
    pub const fn contains(&self, direction: Direction) -> bool {
        self.0 & Self::bit(direction) != 0
    }

    #[must_use]
    pub const fn with(self, direction: Direction) -> Self {
        Self(self.0 | Self::bit(direction))
    }

    #[must_use]
    pub const fn without(self, direction: Direction) -> Self {
        Self(self.0 & !Self::bit(direction))
    }

    pub fn insert(&mut self, direction: Direction) {
        *self = self.with(direction);
    }

    pub fn remove(&mut self, direction: Direction) {
        *self = self.without(direction);
    }

    #[must_use]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The closed sides in `Direction::all()` order.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::all()
            .into_iter()
            .filter(|direction| self.contains(*direction))
    }

    const fn bit(direction: Direction) -> u8 {
        1 << direction.index()
    }
}

impl FromIterator<Direction> for Walls {
    fn from_iter<I: IntoIterator<Item = Direction>>(iterator: I) -> Self {
        iterator
            .into_iter()
            .fold(Self::NONE, |walls, direction| walls.with(direction))
    }
}

// =============================================================================
// TileOwner
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileOwner {
    Room(RoomIdentifier),
    Corridor(CorridorIdentifier),
}

// =============================================================================
// Tile
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    position: Position,
    kind: TileKind,
    walls: Walls,
    owner: TileOwner,
}

impl Tile {
    #[must_use]
    pub const fn new(position: Position, kind: TileKind, walls: Walls, owner: TileOwner) -> Self {
        Self {
            position,
            kind,
            walls,
            owner,
        }
    }

    /// The cell this tile sits on.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    #[must_use]
    pub const fn owner(&self) -> TileOwner {
        self.owner
    }

    #[must_use]
    pub const fn has_wall(&self, direction: Direction) -> bool {
        self.walls.contains(direction)
    }

    pub fn place_wall(&mut self, direction: Direction) {
        self.walls.insert(direction);
    }

    pub fn remove_wall(&mut self, direction: Direction) {
        self.walls.remove(direction);
    }

    /// Marks an interior room tile as lying on the room's boundary.
    pub fn promote_to_outer(&mut self, walls: Walls) {
        if self.kind == TileKind::RoomInner {
            self.kind = TileKind::RoomOuter;
            self.walls = walls;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
