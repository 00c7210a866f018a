//! Layout generators.
//!
//! Each generator owns a normalised configuration and builds a fresh
//! [`Dungeon`] per call. Generation is single-threaded and fully determined
//! by the random stream it is given.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::dungeon::Dungeon;
use crate::errors::LayoutError;

pub mod bsp;
mod configuration;
pub mod digger;
pub mod grammar;

pub use configuration::{CorridorBounds, MINIMUM_CORRIDOR_LENGTH, MINIMUM_ROOM_SIZE, RoomBounds};

// =============================================================================
// LayoutGenerator
// =============================================================================

/// A dungeon layout algorithm.
///
/// # Examples
///
/// ```
/// use dungeon_layout::prelude::*;
///
/// let generator = DiggerGenerator::new(DiggerConfiguration::default()).unwrap();
/// let first = generator.generate_seeded(42).unwrap();
/// let second = generator.generate_seeded(42).unwrap();
/// assert_eq!(first, second);
/// ```
pub trait LayoutGenerator {
    /// Builds a complete dungeon, drawing every random decision from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Generation`] when no usable layout could be
    /// produced.
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Dungeon, LayoutError>;

    /// Builds a dungeon from a fixed seed. Equal seeds and configurations
    /// give identical dungeons.
    fn generate_seeded(&self, seed: u64) -> Result<Dungeon, LayoutError> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        self.generate(&mut rng)
    }
}
