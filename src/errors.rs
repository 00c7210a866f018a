//! Error type shared by the grid primitives and the generators.

use thiserror::Error;

use crate::common::Position;
use crate::dungeon::{CorridorIdentifier, RoomIdentifier};

// =============================================================================
// LayoutError
// =============================================================================

/// Failure raised while building or querying a dungeon layout.
///
/// Placement errors are always raised before any cell is touched, so a
/// dungeon that returned an error from `place_room` or `carve_path` is left
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Dimensions or generator settings that cannot describe any layout.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A room would cover a cell that already holds a tile.
    #[error("Placement overlaps the occupied cell at {position}")]
    Overlap { position: Position },

    /// A placement or path would leave the grid.
    #[error("Cell ({row}, {column}) is outside the {width}x{height} grid")]
    OutOfBounds {
        row: isize,
        column: isize,
        width: usize,
        height: usize,
    },

    #[error("Room not found: {identifier}")]
    UnknownRoom { identifier: RoomIdentifier },

    #[error("Corridor not found: {identifier}")]
    UnknownCorridor { identifier: CorridorIdentifier },

    /// A generator could not produce a usable layout.
    #[error("Generation failed: {reason}")]
    Generation { reason: String },
}

impl LayoutError {
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn overlap(position: Position) -> Self {
        Self::Overlap { position }
    }

    #[must_use]
    pub const fn out_of_bounds(row: isize, column: isize, width: usize, height: usize) -> Self {
        Self::OutOfBounds {
            row,
            column,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn unknown_room(identifier: RoomIdentifier) -> Self {
        Self::UnknownRoom { identifier }
    }

    #[must_use]
    pub const fn unknown_corridor(identifier: CorridorIdentifier) -> Self {
        Self::UnknownCorridor { identifier }
    }

    #[must_use]
    pub fn generation(reason: impl Into<String>) -> Self {
        Self::Generation {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns `true` for errors caused by a rejected placement rather than
    /// by the configuration or a stale identifier.
    #[must_use]
    pub const fn is_placement_error(&self) -> bool {
        matches!(self, Self::Overlap { .. } | Self::OutOfBounds { .. })
    }

    #[must_use]
    pub const fn is_lookup_error(&self) -> bool {
        matches!(self, Self::UnknownRoom { .. } | Self::UnknownCorridor { .. })
    }

    #[must_use]
    pub const fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn configuration_message_is_displayed() {
        let error = LayoutError::configuration("grid width must be positive");
        assert_eq!(
            error.to_string(),
            "Configuration error: grid width must be positive"
        );
        assert!(error.is_configuration());
    }

    #[rstest]
    fn out_of_bounds_reports_signed_coordinates() {
        let error = LayoutError::out_of_bounds(-1, 3, 10, 8);
        assert_eq!(error.to_string(), "Cell (-1, 3) is outside the 10x8 grid");
    }

    #[rstest]
    #[case(LayoutError::overlap(Position::new(1, 1)), true)]
    #[case(LayoutError::out_of_bounds(0, 20, 10, 10), true)]
    #[case(LayoutError::generation("stuck"), false)]
    #[case(LayoutError::configuration("bad"), false)]
    #[case(LayoutError::unknown_room(RoomIdentifier::new(4)), false)]
    fn is_placement_error(#[case] error: LayoutError, #[case] expected: bool) {
        assert_eq!(error.is_placement_error(), expected);
    }

    #[rstest]
    fn lookup_errors() {
        assert!(LayoutError::unknown_room(RoomIdentifier::new(0)).is_lookup_error());
        assert!(LayoutError::unknown_corridor(CorridorIdentifier::new(2)).is_lookup_error());
        assert!(!LayoutError::generation("no room").is_lookup_error());
    }
}
