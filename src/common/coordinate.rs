use std::fmt;

// =============================================================================
// Position
// =============================================================================

/// A cell coordinate. Row 0 is the top edge of the grid, column 0 the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    row: usize,
    column: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// The neighbouring position in `direction`, or `None` when that would
    /// step above row 0 or left of column 0.
    ///
    /// The grid's far edges are not known here; use
    /// [`Grid::neighbor`](crate::dungeon::Grid::neighbor) for a fully bounded
    /// step.
    #[must_use]
    pub const fn step(&self, direction: Direction) -> Option<Self> {
        self.translate(direction, 1)
    }

    /// Moves `distance` cells in `direction`.
    #[must_use]
    pub const fn translate(&self, direction: Direction, distance: usize) -> Option<Self> {
        match direction {
            Direction::Up => match self.row.checked_sub(distance) {
                Some(row) => Some(Self::new(row, self.column)),
                None => None,
            },
            Direction::Down => match self.row.checked_add(distance) {
                Some(row) => Some(Self::new(row, self.column)),
                None => None,
            },
            Direction::Left => match self.column.checked_sub(distance) {
                Some(column) => Some(Self::new(self.row, column)),
                None => None,
            },
            Direction::Right => match self.column.checked_add(distance) {
                Some(column) => Some(Self::new(self.row, column)),
                None => None,
            },
        }
    }

    #[must_use]
    pub const fn manhattan_distance(&self, other: &Self) -> usize {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// The direction of a single step from `self` to an orthogonally adjacent
    /// `other`, or `None` when the two are not neighbours.
    #[must_use]
    pub fn direction_to(&self, other: &Self) -> Option<Direction> {
        Direction::all()
            .into_iter()
            .find(|direction| self.step(*direction) == Some(*other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.row, self.column)
    }
}

// =============================================================================
// Direction
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The two directions on the other axis.
    #[must_use]
    pub const fn perpendicular(&self) -> [Self; 2] {
        match self {
            Self::Up | Self::Down => [Self::Left, Self::Right],
            Self::Left | Self::Right => [Self::Up, Self::Down],
        }
    }

    #[must_use]
    pub const fn is_horizontal(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    #[must_use]
    pub const fn is_vertical(&self) -> bool {
        !self.is_horizontal()
    }

    /// `(row, column)` delta of a single step.
    #[must_use]
    pub const fn to_offset(&self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Up, Self::Down, Self::Left, Self::Right]
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
        };
        write!(formatter, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    mod position {
        use super::*;

        #[rstest]
        #[case(Direction::Up, Some(Position::new(4, 7)))]
        #[case(Direction::Down, Some(Position::new(6, 7)))]
        #[case(Direction::Left, Some(Position::new(5, 6)))]
        #[case(Direction::Right, Some(Position::new(5, 8)))]
        fn step(#[case] direction: Direction, #[case] expected: Option<Position>) {
            assert_eq!(Position::new(5, 7).step(direction), expected);
        }

        #[rstest]
        #[case(Direction::Up)]
        #[case(Direction::Left)]
        fn step_from_origin_toward_edge_is_none(#[case] direction: Direction) {
            assert_eq!(Position::new(0, 0).step(direction), None);
        }

        #[rstest]
        fn translate_several_cells() {
            let origin = Position::new(3, 3);
            assert_eq!(
                origin.translate(Direction::Right, 4),
                Some(Position::new(3, 7))
            );
            assert_eq!(origin.translate(Direction::Up, 4), None);
        }

        #[rstest]
        fn manhattan_distance() {
            let a = Position::new(1, 2);
            let b = Position::new(4, 0);
            assert_eq!(a.manhattan_distance(&b), 5);
            assert_eq!(b.manhattan_distance(&a), 5);
        }

        #[rstest]
        fn direction_to_neighbours() {
            let center = Position::new(2, 2);
            assert_eq!(
                center.direction_to(&Position::new(1, 2)),
                Some(Direction::Up)
            );
            assert_eq!(
                center.direction_to(&Position::new(2, 3)),
                Some(Direction::Right)
            );
            assert_eq!(center.direction_to(&Position::new(3, 3)), None);
            assert_eq!(center.direction_to(&center), None);
        }

        #[rstest]
        fn display() {
            assert_eq!(Position::new(3, 9).to_string(), "(3, 9)");
        }
    }

    mod direction {
        use super::*;

        #[rstest]
        #[case(Direction::Up, Direction::Down)]
        #[case(Direction::Down, Direction::Up)]
        #[case(Direction::Left, Direction::Right)]
        #[case(Direction::Right, Direction::Left)]
        fn opposite(#[case] direction: Direction, #[case] expected: Direction) {
            assert_eq!(direction.opposite(), expected);
            assert_eq!(direction.opposite().opposite(), direction);
        }

        #[rstest]
        #[case(Direction::Up, [Direction::Left, Direction::Right])]
        #[case(Direction::Right, [Direction::Up, Direction::Down])]
        fn perpendicular(#[case] direction: Direction, #[case] expected: [Direction; 2]) {
            assert_eq!(direction.perpendicular(), expected);
            for other in direction.perpendicular() {
                assert_ne!(other.is_horizontal(), direction.is_horizontal());
            }
        }

        #[rstest]
        fn indices_are_distinct() {
            let mut seen = [false; 4];
            for direction in Direction::all() {
                assert!(!seen[direction.index()]);
                seen[direction.index()] = true;
            }
        }
    }
}
