use std::fmt;

use super::Position;

// =============================================================================
// WorldPosition
// =============================================================================

/// A point in the host's world space, used to anchor cells for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPosition {
    x: f32,
    y: f32,
    z: f32,
}

impl WorldPosition {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }
}

impl fmt::Display for WorldPosition {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// =============================================================================
// CellSize
// =============================================================================

/// Extent of one floor tile in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellSize {
    x: f32,
    y: f32,
    z: f32,
}

impl CellSize {
    pub const MINIMUM: Self = Self::new(1.0, 0.5, 1.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Raises every axis to at least [`CellSize::MINIMUM`]. `NaN` components
    /// are replaced by the minimum.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(
            self.x.max(Self::MINIMUM.x),
            self.y.max(Self::MINIMUM.y),
            self.z.max(Self::MINIMUM.z),
        )
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self::new(1.0, 0.5, 1.0)
    }
}

// =============================================================================
// GridGeometry
// =============================================================================

/// How grid cells map into world space.
///
/// Layout generation never reads these values; they only determine
/// [`GridGeometry::world_position`] for the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridGeometry {
    origin: WorldPosition,
    cell_size: CellSize,
    wall_height: f32,
}

impl GridGeometry {
    pub const MINIMUM_WALL_HEIGHT: f32 = 1.0;

    #[must_use]
    pub const fn new(origin: WorldPosition, cell_size: CellSize, wall_height: f32) -> Self {
        Self {
            origin,
            cell_size,
            wall_height,
        }
    }

    #[must_use]
    pub const fn with_origin(mut self, origin: WorldPosition) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub const fn with_cell_size(mut self, cell_size: CellSize) -> Self {
        self.cell_size = cell_size;
        self
    }

    #[must_use]
    pub const fn with_wall_height(mut self, wall_height: f32) -> Self {
        self.wall_height = wall_height;
        self
    }

    #[must_use]
    pub const fn origin(&self) -> WorldPosition {
        self.origin
    }

    #[must_use]
    pub const fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    #[must_use]
    pub const fn wall_height(&self) -> f32 {
        self.wall_height
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            origin: self.origin,
            cell_size: self.cell_size.clamped(),
            wall_height: self.wall_height.max(Self::MINIMUM_WALL_HEIGHT),
        }
    }

    /// World anchor of the cell at `position`: columns advance along +x and
    /// rows along -z, lifted by the tile height.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn world_position(&self, position: Position) -> WorldPosition {
        WorldPosition::new(
            self.origin.x + self.cell_size.x * position.column() as f32,
            self.origin.y + self.cell_size.y,
            self.origin.z - self.cell_size.z * position.row() as f32,
        )
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::new(WorldPosition::default(), CellSize::default(), 2.0)
    }
}
