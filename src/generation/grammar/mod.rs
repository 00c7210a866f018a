//! Graph-grammar generator.
//!
//! Generation runs in two stages. A mission graph is synthesised by
//! production rules that know nothing about coordinates, then every mission
//! node is given a room on the grid, breadth-first from the entrance.

use rand::Rng;

use crate::common::{CellSize, GridGeometry, WorldPosition};
use crate::dungeon::Dungeon;
use crate::errors::LayoutError;

use super::configuration::normalized_probability;
use super::{LayoutGenerator, RoomBounds};

mod embedding;
mod mission;

pub use embedding::PLACEMENT_ATTEMPTS;
pub use mission::{MAXIMUM_RULE_ARITY, MissionGraph, MissionNode, NodeIndex, NodeKind};

use embedding::EmbeddingSettings;

// =============================================================================
// GraphGrammarConfiguration
// =============================================================================

/// Settings for [`GraphGrammarGenerator`].
///
/// The grid size is not configurable; it is derived from the mission size
/// and the room maxima.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphGrammarConfiguration {
    room_bounds: RoomBounds,
    min_tasks: usize,
    max_tasks: usize,
    min_reorganizations: usize,
    max_reorganizations: usize,
    reorganization_probability: f64,
    geometry: GridGeometry,
}

impl GraphGrammarConfiguration {
    #[must_use]
    pub const fn new(room_bounds: RoomBounds) -> Self {
        Self {
            room_bounds,
            min_tasks: 4,
            max_tasks: 10,
            min_reorganizations: 5,
            max_reorganizations: 20,
            reorganization_probability: 0.5,
            geometry: GridGeometry::new(
                WorldPosition::new(0.0, 0.0, 0.0),
                CellSize::new(1.0, 0.5, 1.0),
                2.0,
            ),
        }
    }

    #[must_use]
    pub const fn with_room_bounds(mut self, room_bounds: RoomBounds) -> Self {
        self.room_bounds = room_bounds;
        self
    }

    /// Inclusive range the number of tasks is drawn from.
    #[must_use]
    pub const fn with_task_count(mut self, min: usize, max: usize) -> Self {
        self.min_tasks = min;
        self.max_tasks = max;
        self
    }

    /// Inclusive range the number of reorganisation scan steps is drawn
    /// from.
    #[must_use]
    pub const fn with_reorganization_tries(mut self, min: usize, max: usize) -> Self {
        self.min_reorganizations = min;
        self.max_reorganizations = max;
        self
    }

    /// Chance that an eligible task is rewritten when the scan reaches it.
    #[must_use]
    pub const fn with_reorganization_probability(mut self, probability: f64) -> Self {
        self.reorganization_probability = probability;
        self
    }

    #[must_use]
    pub const fn with_geometry(mut self, geometry: GridGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    #[must_use]
    pub const fn room_bounds(&self) -> RoomBounds {
        self.room_bounds
    }

    #[must_use]
    pub const fn min_tasks(&self) -> usize {
        self.min_tasks
    }

    #[must_use]
    pub const fn max_tasks(&self) -> usize {
        self.max_tasks
    }

    #[must_use]
    pub const fn min_reorganizations(&self) -> usize {
        self.min_reorganizations
    }

    #[must_use]
    pub const fn max_reorganizations(&self) -> usize {
        self.max_reorganizations
    }

    #[must_use]
    pub const fn reorganization_probability(&self) -> f64 {
        self.reorganization_probability
    }

    #[must_use]
    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Clamps every range and raises each room minimum to half its maximum.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Configuration`] when the reorganisation
    /// probability is NaN.
    pub fn normalized(self) -> Result<Self, LayoutError> {
        let reorganization_probability =
            normalized_probability("reorganization probability", self.reorganization_probability)?;
        let room_bounds = self.room_bounds.normalized().with_minimum_at_half_maximum();
        let min_tasks = self.min_tasks.max(1);

        let normalized = Self {
            room_bounds,
            min_tasks,
            max_tasks: self.max_tasks.max(min_tasks),
            min_reorganizations: self.min_reorganizations,
            max_reorganizations: self.max_reorganizations.max(self.min_reorganizations),
            reorganization_probability,
            geometry: self.geometry.normalized(),
        };
        if (normalized.min_tasks, normalized.max_tasks) != (self.min_tasks, self.max_tasks) {
            tracing::warn!(
                requested_min = self.min_tasks,
                requested_max = self.max_tasks,
                min = normalized.min_tasks,
                max = normalized.max_tasks,
                "clamped task count"
            );
        }
        Ok(normalized)
    }
}

impl Default for GraphGrammarConfiguration {
    fn default() -> Self {
        Self::new(RoomBounds::default())
    }
}

// =============================================================================
// GraphGrammarGenerator
// =============================================================================

/// Builds a mission graph and embeds it room by room.
///
/// # Examples
///
/// ```
/// use dungeon_layout::prelude::*;
///
/// let configuration = GraphGrammarConfiguration::default().with_task_count(6, 6);
/// let dungeon = GraphGrammarGenerator::new(configuration)
///     .unwrap()
///     .generate_seeded(3)
///     .unwrap();
///
/// assert_eq!(dungeon.room_count(), 8);
/// assert!(dungeon.is_fully_connected());
/// ```
#[derive(Debug, Clone)]
pub struct GraphGrammarGenerator {
    configuration: GraphGrammarConfiguration,
}

impl GraphGrammarGenerator {
    pub fn new(configuration: GraphGrammarConfiguration) -> Result<Self, LayoutError> {
        Ok(Self {
            configuration: configuration.normalized()?,
        })
    }

    #[must_use]
    pub const fn configuration(&self) -> &GraphGrammarConfiguration {
        &self.configuration
    }

    /// Draws a task count and a reorganisation budget, then grows and
    /// rewrites the mission graph.
    pub fn synthesize_mission<R: Rng + ?Sized>(&self, rng: &mut R) -> MissionGraph {
        let configuration = &self.configuration;
        let tasks = rng.random_range(configuration.min_tasks..=configuration.max_tasks);
        let tries = rng
            .random_range(configuration.min_reorganizations..=configuration.max_reorganizations);
        MissionGraph::synthesize(tasks, tries, configuration.reorganization_probability, rng)
    }

    /// Lays `mission` out on a grid sized for it.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Generation`] when some mission node finds no
    /// free space for its room.
    pub fn embed<R: Rng + ?Sized>(
        &self,
        mission: &MissionGraph,
        rng: &mut R,
    ) -> Result<Dungeon, LayoutError> {
        let settings = EmbeddingSettings::new(self.configuration.room_bounds, self.configuration.geometry);
        embedding::embed(mission, &settings, rng)
    }
}

impl LayoutGenerator for GraphGrammarGenerator {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Dungeon, LayoutError> {
        let configuration = &self.configuration;
        tracing::debug!(?configuration, "generating graph grammar dungeon");

        let mission = self.synthesize_mission(rng);
        tracing::debug!(
            nodes = mission.len(),
            far_tasks = mission.count(NodeKind::FarTask),
            "synthesized mission"
        );

        let dungeon = self.embed(&mission, rng)?;
        tracing::debug!(
            rooms = dungeon.room_count(),
            corridors = dungeon.corridor_count(),
            "generated graph grammar dungeon"
        );
        Ok(dungeon)
    }
}

// =============================================================================
// Tests
// =============================================================================
