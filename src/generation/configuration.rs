//! Size bounds shared by the generator configurations.

use crate::errors::LayoutError;

/// Smallest room side any generator will produce.
pub const MINIMUM_ROOM_SIZE: usize = 4;

/// Shortest corridor the digger will carve.
pub const MINIMUM_CORRIDOR_LENGTH: usize = 2;

// =============================================================================
// RoomBounds
// =============================================================================

/// Inclusive width and height ranges for generated rooms.
///
/// # Examples
///
/// ```
/// use dungeon_layout::RoomBounds;
///
/// let bounds = RoomBounds::new(2, 3, 10, 6).normalized();
/// assert_eq!(bounds.min_width(), 4);
/// assert_eq!(bounds.max_width(), 4);
/// assert_eq!(bounds.min_height(), 10);
/// assert_eq!(bounds.max_height(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomBounds {
    min_width: usize,
    max_width: usize,
    min_height: usize,
    max_height: usize,
}

impl RoomBounds {
    #[must_use]
    pub const fn new(min_width: usize, max_width: usize, min_height: usize, max_height: usize) -> Self {
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    /// Square rooms between `min` and `max` on both axes.
    #[must_use]
    pub const fn square(min: usize, max: usize) -> Self {
        Self::new(min, max, min, max)
    }

    #[must_use]
    pub const fn min_width(&self) -> usize {
        self.min_width
    }

    #[must_use]
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    #[must_use]
    pub const fn min_height(&self) -> usize {
        self.min_height
    }

    #[must_use]
    pub const fn max_height(&self) -> usize {
        self.max_height
    }

    /// Raises each minimum to [`MINIMUM_ROOM_SIZE`] and each maximum to its
    /// minimum.
    #[must_use]
    pub fn normalized(self) -> Self {
        let min_width = self.min_width.max(MINIMUM_ROOM_SIZE);
        let min_height = self.min_height.max(MINIMUM_ROOM_SIZE);
        let normalized = Self {
            min_width,
            max_width: self.max_width.max(min_width),
            min_height,
            max_height: self.max_height.max(min_height),
        };
        if normalized != self {
            tracing::warn!(requested = ?self, normalized = ?normalized, "clamped room bounds");
        }
        normalized
    }

    /// Raises each minimum to at least half of its maximum.
    #[must_use]
    pub fn with_minimum_at_half_maximum(self) -> Self {
        Self {
            min_width: self.min_width.max(self.max_width / 2),
            min_height: self.min_height.max(self.max_height / 2),
            ..self
        }
    }
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self::square(4, 8)
    }
}

// =============================================================================
// CorridorBounds
// =============================================================================

/// Inclusive corridor length range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorridorBounds {
    min_length: usize,
    max_length: usize,
}

impl CorridorBounds {
    #[must_use]
    pub const fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Raises the minimum to [`MINIMUM_CORRIDOR_LENGTH`] and the maximum to
    /// the minimum.
    #[must_use]
    pub fn normalized(self) -> Self {
        let min_length = self.min_length.max(MINIMUM_CORRIDOR_LENGTH);
        let normalized = Self {
            min_length,
            max_length: self.max_length.max(min_length),
        };
        if normalized != self {
            tracing::warn!(requested = ?self, normalized = ?normalized, "clamped corridor bounds");
        }
        normalized
    }
}

impl Default for CorridorBounds {
    fn default() -> Self {
        Self::new(2, 6)
    }
}

/// Rejects a probability that cannot be compared, clamping the rest into
/// `[0, 1]`.
pub(crate) fn normalized_probability(name: &str, value: f64) -> Result<f64, LayoutError> {
    if value.is_nan() {
        return Err(LayoutError::configuration(format!("{name} must be a number")));
    }
    let clamped = value.clamp(0.0, 1.0);
    if (clamped - value).abs() > f64::EPSILON {
        tracing::warn!(name, requested = value, normalized = clamped, "clamped probability");
    }
    Ok(clamped)
}
