//! The fixed-size cell grid underlying every dungeon.

use crate::common::{Direction, GridGeometry, Position, WorldPosition};
use crate::errors::LayoutError;

use super::Tile;

// =============================================================================
// Cell
// =============================================================================

/// One addressable grid position. A cell without a tile is empty and
/// impassable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    position: Position,
    tile: Option<Tile>,
}

impl Cell {
    const fn empty(position: Position) -> Self {
        Self {
            position,
            tile: None,
        }
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn tile(&self) -> Option<&Tile> {
        self.tile.as_ref()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tile.is_none()
    }
}

// =============================================================================
// Grid
// =============================================================================

/// A `width` x `height` array of cells stored row by row.
///
/// Cells are allocated once; only the tiles they hold change afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    width: usize,
    height: usize,
    geometry: GridGeometry,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Configuration`] when either dimension is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_layout::{Grid, GridGeometry, Position};
    ///
    /// let grid = Grid::new(4, 3, GridGeometry::default()).unwrap();
    /// assert_eq!(grid.cells().count(), 12);
    /// assert!(grid.is_empty(Position::new(2, 3)));
    /// assert!(Grid::new(0, 3, GridGeometry::default()).is_err());
    /// ```
    pub fn new(width: usize, height: usize, geometry: GridGeometry) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::configuration(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }

        let cells = (0..height)
            .flat_map(|row| (0..width).map(move |column| Cell::empty(Position::new(row, column))))
            .collect();

        Ok(Self {
            width,
            height,
            geometry: geometry.normalized(),
            cells,
        })
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
    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row() < self.height && position.column() < self.width
    }

    /// Converts signed coordinates into a position inside the grid.
    #[must_use]
    pub fn checked_position(&self, row: isize, column: isize) -> Option<Position> {
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        let position = Position::new(row, column);
        self.contains(position).then_some(position)
    }

    pub(crate) fn ensure_contains(&self, position: Position) -> Result<(), LayoutError> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(self.out_of_bounds(position))
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    pub(crate) const fn out_of_bounds(&self, position: Position) -> LayoutError {
        LayoutError::out_of_bounds(
            position.row() as isize,
            position.column() as isize,
            self.width,
            self.height,
        )
    }

    /// The neighbour of `position` in `direction`, if it lies inside the grid.
    #[must_use]
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        position
            .step(direction)
            .filter(|neighbor| self.contains(*neighbor))
    }

    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).map(|index| &self.cells[index])
    }

    #[must_use]
    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.cell(position).and_then(Cell::tile)
    }

    pub(crate) fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        let index = self.index(position)?;
        self.cells[index].tile.as_mut()
    }

    /// `true` when `position` is inside the grid and holds no tile.
    #[must_use]
    pub fn is_empty(&self, position: Position) -> bool {
        self.cell(position).is_some_and(Cell::is_empty)
    }

    /// Counts the consecutive empty cells strictly beyond `position` in
    /// `direction`, stopping at the first occupied cell or the grid edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_layout::{Direction, Grid, GridGeometry, Position};
    ///
    /// let grid = Grid::new(10, 10, GridGeometry::default()).unwrap();
    /// assert_eq!(grid.empty_run(Position::new(4, 2), Direction::Left), 2);
    /// assert_eq!(grid.empty_run(Position::new(4, 2), Direction::Right), 7);
    /// ```
    #[must_use]
    pub fn empty_run(&self, position: Position, direction: Direction) -> usize {
        std::iter::successors(self.neighbor(position, direction), |current| {
            self.neighbor(*current, direction)
        })
        .take_while(|current| self.is_empty(*current))
        .count()
    }

    #[must_use]
    pub fn world_position(&self, position: Position) -> WorldPosition {
        self.geometry.world_position(position)
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Every placed tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().filter_map(Cell::tile)
    }

    pub(crate) fn set_tile(&mut self, tile: Tile) {
        if let Some(index) = self.index(tile.position()) {
            self.cells[index].tile = Some(tile);
        }
    }

    pub(crate) fn take_tile(&mut self, position: Position) -> Option<Tile> {
        let index = self.index(position)?;
        self.cells[index].tile.take()
    }

    pub(crate) fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.tile = None;
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.row() * self.width + position.column())
    }
}

// =============================================================================
// Tests
// =============================================================================
