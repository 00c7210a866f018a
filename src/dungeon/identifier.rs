//! Identifiers for rooms and corridors.
//!
//! Rooms are never removed once placed, so a [`RoomIdentifier`] is also the
//! room's index in creation order. Corridors can be destroyed, so their
//! identifiers are handed out monotonically and never reused.

use std::fmt;

// =============================================================================
// RoomIdentifier
// =============================================================================

/// Identifies a room within one [`Dungeon`](super::Dungeon).
///
/// # Examples
///
/// ```
/// use dungeon_layout::RoomIdentifier;
///
/// let identifier = RoomIdentifier::new(3);
/// assert_eq!(identifier.value(), 3);
/// assert_eq!(identifier.to_string(), "Room#3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomIdentifier(usize);

impl RoomIdentifier {
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RoomIdentifier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Room#{}", self.0)
    }
}

// =============================================================================
// CorridorIdentifier
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorridorIdentifier(usize);

impl CorridorIdentifier {
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> usize {
        self.0
    }

    #[must_use]
    pub(crate) const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for CorridorIdentifier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Corridor#{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
