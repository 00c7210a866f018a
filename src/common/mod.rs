//! Grid coordinates, directions and world anchoring shared by every module.

mod coordinate;
mod world;

pub use coordinate::{Direction, Position};
pub use world::{CellSize, GridGeometry, WorldPosition};
