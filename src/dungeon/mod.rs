//! The layout data model: grid, tiles, rooms, corridors and the dungeon
//! aggregate that ties them together.

mod aggregate;
mod corridor;
mod grid;
mod identifier;
mod room;
mod tile;
mod topology;

pub use aggregate::Dungeon;
pub use corridor::{Corridor, manhattan_path};
pub use grid::{Cell, Grid};
pub use identifier::{CorridorIdentifier, RoomIdentifier};
pub use room::Room;
pub use tile::{Tile, TileKind, TileOwner, Walls};
