//! One-tile-wide corridors with at most one bend.

use std::fmt;

use crate::common::{Direction, Position};

use super::CorridorIdentifier;

// =============================================================================
// Corridor
// =============================================================================

/// A carved path between two cells.
///
/// Only the tiles the corridor created are recorded in [`Corridor::tiles`];
/// cells along the path that were already occupied keep their owner and
/// merely had the facing walls opened.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Corridor {
    identifier: CorridorIdentifier,
    start: Position,
    end: Position,
    tiles: Vec<Position>,
}

impl Corridor {
    #[must_use]
    pub const fn new(
        identifier: CorridorIdentifier,
        start: Position,
        end: Position,
        tiles: Vec<Position>,
    ) -> Self {
        Self {
            identifier,
            start,
            end,
            tiles,
        }
    }

    #[must_use]
    pub const fn identifier(&self) -> CorridorIdentifier {
        self.identifier
    }

    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Position {
        self.end
    }

    /// Created tiles in path order.
    #[must_use]
    pub fn tiles(&self) -> &[Position] {
        &self.tiles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.tiles.contains(&position)
    }

    #[must_use]
    pub const fn is_straight(&self) -> bool {
        self.start.row() == self.end.row() || self.start.column() == self.end.column()
    }

    /// The middle created tile, where the host parents the corridor's scene
    /// object. Falls back to the start cell for a corridor that created no
    /// tile.
    #[must_use]
    pub fn anchor(&self) -> Position {
        self.tiles
            .get(self.tiles.len() / 2)
            .copied()
            .unwrap_or(self.start)
    }

    /// The full cell sequence from `start` to `end`.
    #[must_use]
    pub fn path(&self) -> Vec<Position> {
        manhattan_path(self.start, self.end)
    }
}

impl fmt::Display for Corridor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} -> {} ({} tiles)",
            self.identifier,
            self.start,
            self.end,
            self.tiles.len()
        )
    }
}

// =============================================================================
// Path
// =============================================================================

/// The single-bend path from `start` to `end`, both included: along the
/// start row to the end column, then along the end column to the end row.
///
/// # Examples
///
/// ```
/// use dungeon_layout::Position;
/// use dungeon_layout::dungeon::manhattan_path;
///
/// let path = manhattan_path(Position::new(0, 0), Position::new(2, 1));
/// assert_eq!(
///     path,
///     vec![
///         Position::new(0, 0),
///         Position::new(0, 1),
///         Position::new(1, 1),
///         Position::new(2, 1),
///     ]
/// );
/// ```
#[must_use]
pub fn manhattan_path(start: Position, end: Position) -> Vec<Position> {
    let mut path = Vec::with_capacity(start.manhattan_distance(&end) + 1);
    let mut current = start;
    path.push(current);

    let horizontal = if end.column() >= start.column() {
        Direction::Right
    } else {
        Direction::Left
    };
    while current.column() != end.column() {
        let Some(next) = current.step(horizontal) else {
            break;
        };
        current = next;
        path.push(current);
    }

    let vertical = if end.row() >= start.row() {
        Direction::Down
    } else {
        Direction::Up
    };
    while current.row() != end.row() {
        let Some(next) = current.step(vertical) else {
            break;
        };
        current = next;
        path.push(current);
    }

    path
}

// =============================================================================
// Tests
// =============================================================================
