//! Rectangular rooms.

use std::fmt;

use crate::common::{Direction, Position};

use super::{RoomIdentifier, Walls};

// =============================================================================
// Room
// =============================================================================

/// An axis-aligned rectangle of room tiles.
///
/// # Examples
///
/// ```
/// use dungeon_layout::{Direction, Position, Room, RoomIdentifier};
///
/// let room = Room::new(RoomIdentifier::new(0), Position::new(2, 3), 4, 5);
/// assert_eq!(room.bottom_right(), Position::new(6, 6));
/// assert_eq!(room.boundary(Direction::Up).len(), 4);
/// assert_eq!(room.boundary(Direction::Left).len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    identifier: RoomIdentifier,
    top_left: Position,
    width: usize,
    height: usize,
}

impl Room {
    #[must_use]
    pub const fn new(
        identifier: RoomIdentifier,
        top_left: Position,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            identifier,
            top_left,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn identifier(&self) -> RoomIdentifier {
        self.identifier
    }

    #[must_use]
    pub const fn top_left(&self) -> Position {
        self.top_left
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
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    #[must_use]
    pub const fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.row() + self.height - 1,
            self.top_left.column() + self.width - 1,
        )
    }

    /// The tile the host anchors the room's scene object on.
    #[must_use]
    pub const fn center(&self) -> Position {
        Position::new(
            self.top_left.row() + self.height / 2,
            self.top_left.column() + self.width / 2,
        )
    }

    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        let bottom_right = self.bottom_right();
        position.row() >= self.top_left.row()
            && position.row() <= bottom_right.row()
            && position.column() >= self.top_left.column()
            && position.column() <= bottom_right.column()
    }

    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        let own = self.bottom_right();
        let theirs = other.bottom_right();
        self.top_left.row() <= theirs.row()
            && other.top_left.row() <= own.row()
            && self.top_left.column() <= theirs.column()
            && other.top_left.column() <= own.column()
    }

    /// Every covered position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let top = self.top_left.row();
        let left = self.top_left.column();
        (top..top + self.height)
            .flat_map(move |row| (left..left + self.width).map(move |column| Position::new(row, column)))
    }

    /// The tiles along one side: top row for `Up`, bottom row for `Down`,
    /// left column for `Left`, right column for `Right`.
    #[must_use]
    pub fn boundary(&self, direction: Direction) -> Vec<Position> {
        let top_left = self.top_left;
        let bottom_right = self.bottom_right();
        match direction {
            Direction::Up | Direction::Down => {
                let row = if direction == Direction::Up {
                    top_left.row()
                } else {
                    bottom_right.row()
                };
                (top_left.column()..=bottom_right.column())
                    .map(|column| Position::new(row, column))
                    .collect()
            }
            Direction::Left | Direction::Right => {
                let column = if direction == Direction::Left {
                    top_left.column()
                } else {
                    bottom_right.column()
                };
                (top_left.row()..=bottom_right.row())
                    .map(|row| Position::new(row, column))
                    .collect()
            }
        }
    }

    /// The middle tile of one side.
    #[must_use]
    pub fn boundary_middle(&self, direction: Direction) -> Position {
        let top_left = self.top_left;
        let bottom_right = self.bottom_right();
        match direction {
            Direction::Up => Position::new(top_left.row(), top_left.column() + self.width / 2),
            Direction::Down => Position::new(bottom_right.row(), top_left.column() + self.width / 2),
            Direction::Left => Position::new(top_left.row() + self.height / 2, top_left.column()),
            Direction::Right => Position::new(top_left.row() + self.height / 2, bottom_right.column()),
        }
    }

    /// The sides of `position` that face out of the room. Empty for interior
    /// tiles and for positions outside the room.
    #[must_use]
    pub fn outward_walls(&self, position: Position) -> Walls {
        if !self.contains(position) {
            return Walls::NONE;
        }
        let bottom_right = self.bottom_right();
        Direction::all()
            .into_iter()
            .filter(|direction| match direction {
                Direction::Up => position.row() == self.top_left.row(),
                Direction::Down => position.row() == bottom_right.row(),
                Direction::Left => position.column() == self.top_left.column(),
                Direction::Right => position.column() == bottom_right.column(),
            })
            .collect()
    }

    #[must_use]
    pub fn is_boundary(&self, position: Position) -> bool {
        !self.outward_walls(position).is_empty()
    }
}

impl fmt::Display for Room {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} at {} ({}x{})",
            self.identifier, self.top_left, self.width, self.height
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn room(row: usize, column: usize, width: usize, height: usize) -> Room {
        Room::new(RoomIdentifier::new(0), Position::new(row, column), width, height)
    }

    #[rstest]
    #[case(Position::new(2, 3), true)]
    #[case(Position::new(6, 6), true)]
    #[case(Position::new(7, 6), false)]
    #[case(Position::new(2, 2), false)]
    fn contains(#[case] position: Position, #[case] expected: bool) {
        assert_eq!(room(2, 3, 4, 5).contains(position), expected);
    }

    #[rstest]
    #[case(room(0, 0, 4, 4), room(3, 3, 4, 4), true)]
    #[case(room(0, 0, 4, 4), room(0, 4, 4, 4), false)]
    #[case(room(0, 0, 4, 4), room(4, 0, 4, 4), false)]
    #[case(room(1, 1, 6, 6), room(2, 2, 2, 2), true)]
    fn intersects(#[case] first: Room, #[case] second: Room, #[case] expected: bool) {
        assert_eq!(first.intersects(&second), expected);
        assert_eq!(second.intersects(&first), expected);
    }

    #[rstest]
    fn positions_cover_area() {
        let room = room(1, 2, 3, 2);
        let positions: Vec<_> = room.positions().collect();
        assert_eq!(positions.len(), room.area());
        assert!(positions.iter().all(|position| room.contains(*position)));
    }

    #[rstest]
    #[case(Direction::Up, Position::new(2, 3), Position::new(2, 6))]
    #[case(Direction::Down, Position::new(6, 3), Position::new(6, 6))]
    #[case(Direction::Left, Position::new(2, 3), Position::new(6, 3))]
    #[case(Direction::Right, Position::new(2, 6), Position::new(6, 6))]
    fn boundary_endpoints(
        #[case] direction: Direction,
        #[case] first: Position,
        #[case] last: Position,
    ) {
        let boundary = room(2, 3, 4, 5).boundary(direction);
        assert_eq!(boundary.first(), Some(&first));
        assert_eq!(boundary.last(), Some(&last));
    }

    #[rstest]
    fn boundary_middle_lies_on_boundary() {
        let room = room(2, 3, 4, 5);
        for direction in Direction::all() {
            let middle = room.boundary_middle(direction);
            assert!(room.boundary(direction).contains(&middle));
        }
    }

    #[rstest]
    fn outward_walls_of_corner_and_interior() {
        let room = room(0, 0, 4, 4);

        let corner = room.outward_walls(Position::new(0, 0));
        assert!(corner.contains(Direction::Up));
        assert!(corner.contains(Direction::Left));
        assert_eq!(corner.count(), 2);

        assert!(room.outward_walls(Position::new(1, 2)).is_empty());
        assert!(!room.is_boundary(Position::new(2, 1)));
        assert!(room.is_boundary(Position::new(3, 1)));
    }
}
