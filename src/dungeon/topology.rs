//! Connectivity queries over the wall state of a dungeon.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::common::{Direction, Position};

use super::{Dungeon, TileKind};

impl Dungeon {
    /// `true` when both `position` and its neighbour in `direction` hold a
    /// tile and neither has a wall on the shared face.
    #[must_use]
    pub fn is_open(&self, position: Position, direction: Direction) -> bool {
        let Some(tile) = self.tile(position) else {
            return false;
        };
        let Some(neighbor) = self
            .grid()
            .neighbor(position, direction)
            .and_then(|neighbor| self.tile(neighbor))
        else {
            return false;
        };
        !tile.has_wall(direction) && !neighbor.has_wall(direction.opposite())
    }

    /// Every tile position reachable from `start` through open faces.
    /// Empty when `start` holds no tile.
    #[must_use]
    pub fn reachable_from(&self, start: Position) -> FxHashSet<Position> {
        let mut visited = FxHashSet::default();
        if self.tile(start).is_none() {
            return visited;
        }

        let mut queue = VecDeque::from([start]);
        visited.insert(start);
        while let Some(current) = queue.pop_front() {
            for direction in Direction::all() {
                if !self.is_open(current, direction) {
                    continue;
                }
                if let Some(neighbor) = self.grid().neighbor(current, direction) {
                    if visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        visited
    }

    /// `true` when every placed tile can be reached from every other one.
    /// Trivially `true` for an empty dungeon.
    #[must_use]
    pub fn is_fully_connected(&self) -> bool {
        let start = self
            .entrance_room()
            .map(super::Room::top_left)
            .or_else(|| self.grid().tiles().next().map(super::Tile::position));
        start.is_none_or(|start| self.reachable_from(start).len() == self.grid().tiles().count())
    }

    /// Adjacent tile pairs whose shared face is walled on one side only,
    /// reported as the upper or left tile and the direction toward the other.
    #[must_use]
    pub fn wall_asymmetries(&self) -> Vec<(Position, Direction)> {
        self.grid()
            .tiles()
            .flat_map(|tile| {
                [Direction::Down, Direction::Right]
                    .into_iter()
                    .filter_map(move |direction| {
                        let neighbor = self
                            .grid()
                            .neighbor(tile.position(), direction)
                            .and_then(|neighbor| self.tile(neighbor))?;
                        (tile.has_wall(direction) != neighbor.has_wall(direction.opposite()))
                            .then_some((tile.position(), direction))
                    })
            })
            .collect()
    }

    /// Corridor tiles with at most one open face.
    #[must_use]
    pub fn dead_ends(&self) -> Vec<Position> {
        self.grid()
            .tiles()
            .filter(|tile| tile.kind() == TileKind::Corridor)
            .map(|tile| tile.position())
            .filter(|position| {
                Direction::all()
                    .into_iter()
                    .filter(|direction| self.is_open(*position, *direction))
                    .count()
                    <= 1
            })
            .collect()
    }
}
