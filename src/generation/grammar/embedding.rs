//! Lays a mission graph out on a grid.
//!
//! Rooms are placed breadth-first from the entrance. Every child room sits
//! a straight corridor away from its parent, centred on the middle of the
//! parent's facing side.

use std::collections::VecDeque;

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::common::{Direction, GridGeometry, Position};
use crate::dungeon::{Dungeon, Room, RoomIdentifier};
use crate::errors::LayoutError;
use crate::generation::{CorridorBounds, RoomBounds};

use super::mission::{MissionGraph, NodeIndex, NodeKind};

/// Draws per direction before the next direction is tried.
pub const PLACEMENT_ATTEMPTS: usize = 32;

const EXPANSION_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Up,
    Direction::Down,
];

const FALLBACK_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Up,
    Direction::Left,
];

// =============================================================================
// EmbeddingSettings
// =============================================================================

/// Room and corridor ranges used while embedding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EmbeddingSettings {
    room_bounds: RoomBounds,
    horizontal: CorridorBounds,
    vertical: CorridorBounds,
    geometry: GridGeometry,
}

impl EmbeddingSettings {
    /// Corridor ranges follow the room maxima: half to full width for
    /// horizontal corridors and half to full height for vertical ones.
    pub(crate) const fn new(room_bounds: RoomBounds, geometry: GridGeometry) -> Self {
        Self {
            room_bounds,
            horizontal: CorridorBounds::new(room_bounds.max_width() / 2, room_bounds.max_width()),
            vertical: CorridorBounds::new(room_bounds.max_height() / 2, room_bounds.max_height()),
            geometry,
        }
    }

    const fn corridor_bounds(&self, direction: Direction) -> CorridorBounds {
        if direction.is_horizontal() {
            self.horizontal
        } else {
            self.vertical
        }
    }

    const fn slot_width(&self) -> usize {
        self.room_bounds.max_width() + self.horizontal.max_length() + 1
    }

    const fn slot_height(&self) -> usize {
        self.room_bounds.max_height() + self.vertical.max_length() + 1
    }

    /// Grid dimensions large enough for `nodes` rooms laid end to end in
    /// any direction from a centred entrance.
    pub(crate) const fn grid_dimensions(&self, nodes: usize) -> (usize, usize) {
        (
            (nodes + 2) * self.slot_width(),
            (nodes + 2) * self.slot_height(),
        )
    }
}

// =============================================================================
// Embedder
// =============================================================================

/// Embeds `mission` into a fresh dungeon. The entrance is the root's room
/// and the exit the goal's.
pub(crate) fn embed<R: Rng + ?Sized>(
    mission: &MissionGraph,
    settings: &EmbeddingSettings,
    rng: &mut R,
) -> Result<Dungeon, LayoutError> {
    Embedder::new(mission, settings, rng)?.run()
}

struct Embedder<'a, R: ?Sized> {
    mission: &'a MissionGraph,
    settings: &'a EmbeddingSettings,
    rng: &'a mut R,
    dungeon: Dungeon,
    rooms: Vec<Option<RoomIdentifier>>,
    joined: FxHashSet<(NodeIndex, NodeIndex)>,
}

impl<'a, R: Rng + ?Sized> Embedder<'a, R> {
    fn new(
        mission: &'a MissionGraph,
        settings: &'a EmbeddingSettings,
        rng: &'a mut R,
    ) -> Result<Self, LayoutError> {
        let (width, height) = settings.grid_dimensions(mission.len());
        Ok(Self {
            mission,
            settings,
            rng,
            dungeon: Dungeon::new(width, height, settings.geometry)?,
            rooms: vec![None; mission.len()],
            joined: FxHashSet::default(),
        })
    }

    fn run(mut self) -> Result<Dungeon, LayoutError> {
        let mission = self.mission;
        let root = mission.root();
        let entrance = self.place_entrance()?;
        self.rooms[root.value()] = Some(entrance);

        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            let parent = self.room_of(node)?;
            for direction in EXPANSION_ORDER {
                let Some(child) = mission.node(node).link(direction) else {
                    continue;
                };
                if self.rooms[child.value()].is_some() || self.is_far_link(node, child) {
                    continue;
                }
                let room = self.place_child(parent, direction)?;
                self.rooms[child.value()] = Some(room);
                queue.push_back(child);
            }
            self.join_far_partners(node)?;
        }

        let exit = self.room_of(mission.goal())?;
        self.dungeon.set_entrance_and_exit(entrance, exit)?;
        Ok(self.dungeon)
    }

    fn room_of(&self, node: NodeIndex) -> Result<RoomIdentifier, LayoutError> {
        self.rooms[node.value()].ok_or_else(|| {
            LayoutError::generation(format!("mission node {} was never embedded", node.value()))
        })
    }

    fn is_far_link(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.mission.node(from).kind() == NodeKind::FarTask
            && self.mission.node(to).kind() == NodeKind::FarTask
    }

    fn random_size(&mut self) -> (usize, usize) {
        let bounds = self.settings.room_bounds;
        (
            self.rng.random_range(bounds.min_width()..=bounds.max_width()),
            self.rng.random_range(bounds.min_height()..=bounds.max_height()),
        )
    }

    fn place_entrance(&mut self) -> Result<RoomIdentifier, LayoutError> {
        let (width, height) = self.random_size();
        let top = (self.dungeon.height() / 2).saturating_sub(height / 2);
        let left = self.settings.slot_width();
        self.dungeon.place_room(Position::new(top, left), width, height)
    }

    fn place_child(
        &mut self,
        parent: RoomIdentifier,
        preferred: Direction,
    ) -> Result<RoomIdentifier, LayoutError> {
        let parent = self
            .dungeon
            .room(parent)
            .cloned()
            .ok_or_else(|| LayoutError::unknown_room(parent))?;

        let directions = std::iter::once(preferred)
            .chain(FALLBACK_ORDER.into_iter().filter(|direction| *direction != preferred));
        for direction in directions {
            for _ in 0..PLACEMENT_ATTEMPTS {
                if let Some(room) = self.try_place(&parent, direction)? {
                    if direction != preferred {
                        tracing::debug!(
                            parent = %parent,
                            %preferred,
                            placed = %direction,
                            "placed mission room off its link direction"
                        );
                    }
                    return Ok(room);
                }
            }
        }

        Err(LayoutError::generation(format!(
            "no free space for a room next to {parent}"
        )))
    }

    /// One random draw of a room beyond `parent` in `direction`. Nothing is
    /// modified unless the room and its corridor both fit.
    fn try_place(
        &mut self,
        parent: &Room,
        direction: Direction,
    ) -> Result<Option<RoomIdentifier>, LayoutError> {
        let (width, height) = self.random_size();
        let bounds = self.settings.corridor_bounds(direction);
        let length = self
            .rng
            .random_range(bounds.min_length()..=bounds.max_length());

        let anchor = parent.boundary_middle(direction);
        let gap_is_free = (1..=length).all(|distance| {
            anchor
                .translate(direction, distance)
                .is_some_and(|position| self.dungeon.is_empty(position))
        });
        if !gap_is_free {
            return Ok(None);
        }

        let Some(door) = anchor.translate(direction, length + 1) else {
            return Ok(None);
        };
        let Some(top_left) = Self::child_top_left(door, direction, width, height) else {
            return Ok(None);
        };

        let room = match self.dungeon.place_room(top_left, width, height) {
            Ok(room) => room,
            Err(error) if error.is_placement_error() => return Ok(None),
            Err(error) => return Err(error),
        };
        self.dungeon.carve_path(anchor, door, false)?;
        Ok(Some(room))
    }

    /// Top-left corner of a `width` x `height` room whose near side passes
    /// through `door`, centred on it.
    fn child_top_left(
        door: Position,
        direction: Direction,
        width: usize,
        height: usize,
    ) -> Option<Position> {
        let (row, column) = match direction {
            Direction::Right => (door.row().checked_sub(height / 2)?, door.column()),
            Direction::Left => (
                door.row().checked_sub(height / 2)?,
                door.column().checked_sub(width - 1)?,
            ),
            Direction::Down => (door.row(), door.column().checked_sub(width / 2)?),
            Direction::Up => (
                door.row().checked_sub(height - 1)?,
                door.column().checked_sub(width / 2)?,
            ),
        };
        Some(Position::new(row, column))
    }

    fn join_far_partners(&mut self, node: NodeIndex) -> Result<(), LayoutError> {
        let mission = self.mission;
        if mission.node(node).kind() != NodeKind::FarTask {
            return Ok(());
        }

        for (_, partner) in mission.node(node).neighbors() {
            if mission.node(partner).kind() != NodeKind::FarTask {
                continue;
            }
            let (Some(own), Some(theirs)) = (self.rooms[node.value()], self.rooms[partner.value()])
            else {
                continue;
            };
            if self.joined.insert((node.min(partner), node.max(partner))) {
                self.join_far_rooms(own, theirs)?;
            }
        }
        Ok(())
    }

    /// Links two far-task rooms from the bottom of the upper one to the top
    /// of the lower one.
    fn join_far_rooms(
        &mut self,
        first: RoomIdentifier,
        second: RoomIdentifier,
    ) -> Result<(), LayoutError> {
        let first = self
            .dungeon
            .room(first)
            .cloned()
            .ok_or_else(|| LayoutError::unknown_room(first))?;
        let second = self
            .dungeon
            .room(second)
            .cloned()
            .ok_or_else(|| LayoutError::unknown_room(second))?;
        let (upper, lower) = if first.top_left().row() <= second.top_left().row() {
            (first, second)
        } else {
            (second, first)
        };

        let from = self.random_tile(&upper, Direction::Down);
        let to = self.random_tile(&lower, Direction::Up);

        if from.column() == to.column() {
            self.dungeon.carve_path(from, to, false)?;
        } else {
            let midpoint = Position::new(
                (from.row() + to.row()) / 2,
                (from.column() + to.column()) / 2,
            );
            self.dungeon.carve_path(midpoint, from, false)?;
            self.dungeon.carve_path(midpoint, to, false)?;
        }

        tracing::trace!(upper = %upper, lower = %lower, "joined far task rooms");
        Ok(())
    }

    fn random_tile(&mut self, room: &Room, side: Direction) -> Position {
        let boundary = room.boundary(side);
        boundary[self.rng.random_range(0..boundary.len())]
    }
}

// =============================================================================
// Tests
// =============================================================================
