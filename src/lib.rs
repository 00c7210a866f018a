//! # dungeon-layout
//!
//! Procedural generation of dungeon level layouts on a fixed-size grid.
//!
//! ## Overview
//!
//! A layout is a [`Dungeon`]: a grid of cells, some of which hold floor
//! tiles grouped into rectangular rooms and one-tile-wide corridors, plus
//! a designated entrance and exit room. Every tile records which of its
//! four walls are still standing, so two adjacent tiles are connected only
//! when the wall between them has been opened.
//!
//! Three interchangeable generators populate a dungeon:
//!
//! - [`BspGenerator`]: recursive binary space partitioning with one room per
//!   leaf partition, stitched together bottom-up by corridors.
//! - [`DiggerGenerator`]: a single cursor that alternately digs rooms and
//!   corridors, rolling back corridors that lead nowhere.
//! - [`GraphGrammarGenerator`]: a mission graph grown by production rules,
//!   embedded breadth-first into grid space.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for configurations and finished
//!   dungeons.
//!
//! ## Example
//!
//! ```rust
//! use dungeon_layout::prelude::*;
//!
//! let generator = BspGenerator::new(BspConfiguration::default()).unwrap();
//! let dungeon = generator.generate_seeded(7).unwrap();
//!
//! assert!(dungeon.room_count() >= 2);
//! assert_ne!(dungeon.entrance(), dungeon.exit());
//! assert!(dungeon.is_fully_connected());
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod common;
pub mod dungeon;
pub mod errors;
pub mod generation;

pub use common::{CellSize, Direction, GridGeometry, Position, WorldPosition};
pub use dungeon::{
    Cell, Corridor, CorridorIdentifier, Dungeon, Grid, Room, RoomIdentifier, Tile, TileKind,
    TileOwner, Walls,
};
pub use errors::LayoutError;
pub use generation::bsp::{BspConfiguration, BspGenerator};
pub use generation::digger::{DiggerConfiguration, DiggerGenerator};
pub use generation::grammar::{GraphGrammarConfiguration, GraphGrammarGenerator};
pub use generation::{CorridorBounds, LayoutGenerator, RoomBounds};

/// Commonly used types and traits.
///
/// ```rust
/// use dungeon_layout::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::{Direction, GridGeometry, Position};
    pub use crate::dungeon::{Corridor, Dungeon, Room, RoomIdentifier, Tile, TileKind};
    pub use crate::errors::LayoutError;
    pub use crate::generation::bsp::{BspConfiguration, BspGenerator};
    pub use crate::generation::digger::{DiggerConfiguration, DiggerGenerator};
    pub use crate::generation::grammar::{GraphGrammarConfiguration, GraphGrammarGenerator};
    pub use crate::generation::{CorridorBounds, LayoutGenerator, RoomBounds};
}
