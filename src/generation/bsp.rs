//! Binary space partitioning.
//!
//! The grid is split recursively into rectangular partitions until no
//! partition can hold two minimum-size children. Every leaf receives one
//! room inset by the configured margin, and every internal node then
//! contributes exactly one corridor linking a room from each of its two
//! subtrees, so the rooms form a spanning tree.

use rand::Rng;

use crate::common::{CellSize, Direction, GridGeometry, Position, WorldPosition};
use crate::dungeon::{Dungeon, RoomIdentifier};
use crate::errors::LayoutError;

use super::{LayoutGenerator, RoomBounds};

/// Smallest gap kept between a room and the edge of its partition.
pub const MINIMUM_PARTITION_MARGIN: usize = 2;

// =============================================================================
// BspConfiguration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BspConfiguration {
    width: usize,
    height: usize,
    room_bounds: RoomBounds,
    margin: usize,
    geometry: GridGeometry,
}

impl BspConfiguration {
    #[must_use]
    pub const fn new(width: usize, height: usize, room_bounds: RoomBounds, margin: usize) -> Self {
        Self {
            width,
            height,
            room_bounds,
            margin,
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
    pub const fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
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

    /// Gap between a room and the edge of its partition, split between the
    /// two sides of each axis.
    #[must_use]
    pub const fn margin(&self) -> usize {
        self.margin
    }

    #[must_use]
    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    #[must_use]
    pub const fn min_partition_width(&self) -> usize {
        self.room_bounds.min_width() + self.margin
    }

    #[must_use]
    pub const fn min_partition_height(&self) -> usize {
        self.room_bounds.min_height() + self.margin
    }

    /// Clamps every setting so that the grid can always be split at least
    /// once and every leaf partition can hold a minimum-size room.
    pub fn normalized(self) -> Result<Self, LayoutError> {
        let room_bounds = self.room_bounds.normalized();
        let margin = self.margin.max(MINIMUM_PARTITION_MARGIN);
        let width = self.width.max(2 * (room_bounds.min_width() + margin));
        let height = self.height.max(2 * (room_bounds.min_height() + margin));

        if (width, height) != (self.width, self.height) {
            tracing::warn!(
                requested_width = self.width,
                requested_height = self.height,
                width,
                height,
                "enlarged grid to fit two partitions"
            );
        }

        Ok(Self {
            width,
            height,
            room_bounds,
            margin,
            geometry: self.geometry.normalized(),
        })
    }
}

impl Default for BspConfiguration {
    fn default() -> Self {
        Self::new(40, 40, RoomBounds::default(), MINIMUM_PARTITION_MARGIN)
    }
}

// =============================================================================
// Partition tree
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitAxis {
    /// Children side by side, split along a column.
    Vertical,
    /// Children stacked, split along a row.
    Horizontal,
}

#[derive(Debug, Clone, Copy)]
struct Partition {
    top_left: Position,
    width: usize,
    height: usize,
    room: Option<RoomIdentifier>,
    split: Option<(SplitAxis, usize, usize)>,
}

impl Partition {
    const fn new(top_left: Position, width: usize, height: usize) -> Self {
        Self {
            top_left,
            width,
            height,
            room: None,
            split: None,
        }
    }
}

/// Partitions stored in an arena; children refer to their slots by index.
#[derive(Debug, Default)]
struct PartitionTree {
    partitions: Vec<Partition>,
}

impl PartitionTree {
    fn push(&mut self, partition: Partition) -> usize {
        self.partitions.push(partition);
        self.partitions.len() - 1
    }

    fn leaf_count(&self) -> usize {
        self.partitions
            .iter()
            .filter(|partition| partition.split.is_none())
            .count()
    }
}

// =============================================================================
// BspGenerator
// =============================================================================

/// Partitioning generator.
///
/// # Examples
///
/// ```
/// use dungeon_layout::prelude::*;
///
/// let generator = BspGenerator::new(BspConfiguration::default()).unwrap();
/// let dungeon = generator.generate_seeded(3).unwrap();
///
/// assert_eq!(dungeon.corridor_count(), dungeon.room_count() - 1);
/// assert_ne!(dungeon.entrance(), dungeon.exit());
/// ```
#[derive(Debug, Clone)]
pub struct BspGenerator {
    configuration: BspConfiguration,
}

impl BspGenerator {
    /// Creates a generator with a normalised copy of `configuration`.
    pub fn new(configuration: BspConfiguration) -> Result<Self, LayoutError> {
        Ok(Self {
            configuration: configuration.normalized()?,
        })
    }

    #[must_use]
    pub const fn configuration(&self) -> &BspConfiguration {
        &self.configuration
    }

    fn subdivide<R: Rng + ?Sized>(
        &self,
        tree: &mut PartitionTree,
        index: usize,
        dungeon: &mut Dungeon,
        rng: &mut R,
    ) -> Result<(), LayoutError> {
        let Partition {
            top_left,
            width,
            height,
            ..
        } = tree.partitions[index];
        let min_width = self.configuration.min_partition_width();
        let min_height = self.configuration.min_partition_height();

        let (axis, first, second) = if rng.random_bool(0.5) {
            let offset = rng.random_range(min_width..=width - min_width);
            let first = Partition::new(top_left, offset, height);
            let second = Partition::new(
                Position::new(top_left.row(), top_left.column() + offset),
                width - offset,
                height,
            );
            (SplitAxis::Vertical, first, second)
        } else {
            let offset = rng.random_range(min_height..=height - min_height);
            let first = Partition::new(top_left, width, offset);
            let second = Partition::new(
                Position::new(top_left.row() + offset, top_left.column()),
                width,
                height - offset,
            );
            (SplitAxis::Horizontal, first, second)
        };

        let first = tree.push(first);
        let second = tree.push(second);
        tree.partitions[index].split = Some((axis, first, second));
        tracing::trace!(?axis, ?top_left, width, height, "split partition");

        for child in [first, second] {
            let partition = &tree.partitions[child];
            if partition.width > 2 * min_width && partition.height > 2 * min_height {
                self.subdivide(tree, child, dungeon, rng)?;
            } else {
                let room = self.place_leaf_room(partition, dungeon, rng)?;
                tree.partitions[child].room = Some(room);
            }
        }
        Ok(())
    }

    fn place_leaf_room<R: Rng + ?Sized>(
        &self,
        partition: &Partition,
        dungeon: &mut Dungeon,
        rng: &mut R,
    ) -> Result<RoomIdentifier, LayoutError> {
        let bounds = self.configuration.room_bounds;
        let margin = self.configuration.margin;
        let leading = margin / 2;
        let available_width = partition.width - margin;
        let available_height = partition.height - margin;

        let width = rng.random_range(bounds.min_width()..=bounds.max_width().min(available_width));
        let height =
            rng.random_range(bounds.min_height()..=bounds.max_height().min(available_height));

        let first_row = partition.top_left.row() + leading;
        let first_column = partition.top_left.column() + leading;
        let row = rng.random_range(first_row..=first_row + available_height - height);
        let column = rng.random_range(first_column..=first_column + available_width - width);

        dungeon.place_room(Position::new(row, column), width, height)
    }

    /// Links the two subtrees of every internal node, deepest first.
    fn connect<R: Rng + ?Sized>(
        tree: &PartitionTree,
        index: usize,
        dungeon: &mut Dungeon,
        rng: &mut R,
    ) -> Result<(), LayoutError> {
        let Some((axis, first, second)) = tree.partitions[index].split else {
            return Ok(());
        };
        Self::connect(tree, first, dungeon, rng)?;
        Self::connect(tree, second, dungeon, rng)?;

        let first_room = Self::descend_to_room(tree, first, rng)?;
        let second_room = Self::descend_to_room(tree, second, rng)?;
        let (leaving, entering) = match axis {
            SplitAxis::Vertical => (Direction::Right, Direction::Left),
            SplitAxis::Horizontal => (Direction::Down, Direction::Up),
        };
        let start = Self::random_boundary_tile(dungeon, first_room, leaving, rng)?;
        let end = Self::random_boundary_tile(dungeon, second_room, entering, rng)?;

        dungeon.carve_path(start, end, false)?;
        Ok(())
    }

    /// Picks a room from a uniformly random leaf below `index`.
    fn descend_to_room<R: Rng + ?Sized>(
        tree: &PartitionTree,
        mut index: usize,
        rng: &mut R,
    ) -> Result<RoomIdentifier, LayoutError> {
        while let Some((_, first, second)) = tree.partitions[index].split {
            index = if rng.random_bool(0.5) { first } else { second };
        }
        tree.partitions[index]
            .room
            .ok_or_else(|| LayoutError::generation("leaf partition without a room"))
    }

    fn random_boundary_tile<R: Rng + ?Sized>(
        dungeon: &Dungeon,
        room: RoomIdentifier,
        side: Direction,
        rng: &mut R,
    ) -> Result<Position, LayoutError> {
        let boundary = dungeon
            .room(room)
            .ok_or_else(|| LayoutError::unknown_room(room))?
            .boundary(side);
        Ok(boundary[rng.random_range(0..boundary.len())])
    }
}

impl LayoutGenerator for BspGenerator {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Dungeon, LayoutError> {
        let configuration = &self.configuration;
        tracing::debug!(?configuration, "generating bsp dungeon");

        let mut dungeon = Dungeon::new(
            configuration.width,
            configuration.height,
            configuration.geometry,
        )?;
        let mut tree = PartitionTree::default();
        let root = tree.push(Partition::new(
            Position::new(0, 0),
            configuration.width,
            configuration.height,
        ));

        self.subdivide(&mut tree, root, &mut dungeon, rng)?;
        Self::connect(&tree, root, &mut dungeon, rng)?;

        let room_count = dungeon.room_count();
        let entrance = rng.random_range(0..room_count);
        let mut exit = rng.random_range(0..room_count);
        while exit == entrance {
            exit = rng.random_range(0..room_count);
        }
        dungeon.set_entrance_and_exit(RoomIdentifier::new(entrance), RoomIdentifier::new(exit))?;

        tracing::debug!(
            partitions = tree.partitions.len(),
            leaves = tree.leaf_count(),
            rooms = room_count,
            corridors = dungeon.corridor_count(),
            entrance,
            exit,
            "generated bsp dungeon"
        );
        Ok(dungeon)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use rstest::rstest;

    mod configuration {
        use super::*;

        #[rstest]
        fn default_is_already_normalized() {
            let configuration = BspConfiguration::default();
            assert_eq!(configuration.normalized().unwrap(), configuration);
        }

        #[rstest]
        fn clamps_small_values() {
            let configuration = BspConfiguration::new(3, 5, RoomBounds::square(1, 2), 0)
                .normalized()
                .unwrap();

            assert_eq!(configuration.margin(), 2);
            assert_eq!(configuration.room_bounds(), RoomBounds::square(4, 4));
            assert_eq!(configuration.width(), 12);
            assert_eq!(configuration.height(), 12);
            assert_eq!(configuration.min_partition_width(), 6);
        }

        #[rstest]
        fn keeps_large_grid() {
            let configuration = BspConfiguration::default()
                .with_dimensions(120, 64)
                .with_margin(5)
                .normalized()
                .unwrap();

            assert_eq!(configuration.width(), 120);
            assert_eq!(configuration.height(), 64);
            assert_eq!(configuration.margin(), 5);
        }
    }

    mod generate {
        use super::*;

        fn generate(configuration: BspConfiguration, seed: u64) -> Dungeon {
            BspGenerator::new(configuration)
                .unwrap()
                .generate_seeded(seed)
                .unwrap()
        }

        #[rstest]
        #[case(0)]
        #[case(11)]
        #[case(2024)]
        fn minimum_grid_splits_once(#[case] seed: u64) {
            let dungeon = generate(BspConfiguration::new(12, 12, RoomBounds::square(4, 4), 2), seed);

            assert_eq!(dungeon.room_count(), 2);
            assert_eq!(dungeon.corridor_count(), 1);
            assert!(dungeon.is_fully_connected());
        }

        #[rstest]
        #[case(1)]
        #[case(5)]
        #[case(99)]
        fn rooms_keep_margin_apart(#[case] seed: u64) {
            let dungeon = generate(BspConfiguration::default().with_margin(4), seed);
            let rooms = dungeon.rooms();

            for (index, first) in rooms.iter().enumerate() {
                for second in &rooms[index + 1..] {
                    let row_gap = second.top_left().row().saturating_sub(first.bottom_right().row())
                        .max(first.top_left().row().saturating_sub(second.bottom_right().row()));
                    let column_gap = second
                        .top_left()
                        .column()
                        .saturating_sub(first.bottom_right().column())
                        .max(first.top_left().column().saturating_sub(second.bottom_right().column()));
                    assert!(row_gap > 4 || column_gap > 4, "{first} too close to {second}");
                }
            }
        }

        #[rstest]
        fn rooms_respect_bounds() {
            let bounds = RoomBounds::new(5, 7, 4, 6);
            let dungeon = generate(
                BspConfiguration::default().with_dimensions(60, 50).with_room_bounds(bounds),
                8,
            );

            for room in dungeon.rooms() {
                assert!((5..=7).contains(&room.width()), "{room}");
                assert!((4..=6).contains(&room.height()), "{room}");
            }
        }

        #[rstest]
        fn same_random_stream_gives_same_dungeon() {
            let generator = BspGenerator::new(BspConfiguration::default()).unwrap();
            let mut first = Xoshiro256PlusPlus::seed_from_u64(77);
            let mut second = Xoshiro256PlusPlus::seed_from_u64(77);

            assert_eq!(
                generator.generate(&mut first).unwrap(),
                generator.generate(&mut second).unwrap()
            );
        }
    }
}
