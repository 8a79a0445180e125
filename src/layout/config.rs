//! Configuration for the layout engine

use serde::{Deserialize, Serialize};

/// Canvas size used when the caller passes a non-positive or non-finite size
pub const DEFAULT_CANVAS: (f64, f64) = (1200.0, 800.0);

/// Tuning knobs for layout computation
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Minimum clearance between two buildings
    pub min_gap: f64,

    /// Distance kept free along every canvas edge
    pub margin: f64,

    /// Padding around nodes inside an automation-zone boundary
    pub zone_padding: f64,

    /// Maximum number of collision-resolution passes
    pub collision_iterations: usize,

    /// Size bounds for buildings of a known type (width and height)
    pub building_min: f64,
    pub building_max: f64,

    /// Size bounds for the base size of unclassified buildings
    pub unclassified_min: f64,
    pub unclassified_max: f64,

    /// Minimum number of columns in the unclassified auto-grid
    pub auto_grid_columns: usize,

    /// Weakest network/naming relationship that still gets a routed connection
    pub min_connection_strength: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_gap: 20.0,
            margin: 40.0,
            zone_padding: 8.0,
            collision_iterations: 50,
            building_min: 40.0,
            building_max: 200.0,
            unclassified_min: 40.0,
            unclassified_max: 110.0,
            auto_grid_columns: 4,
            min_connection_strength: 0.3,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum gap between buildings
    pub fn with_min_gap(mut self, gap: f64) -> Self {
        self.min_gap = gap;
        self
    }

    /// Set the canvas margin
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the zone boundary padding
    pub fn with_zone_padding(mut self, padding: f64) -> Self {
        self.zone_padding = padding;
        self
    }

    /// Set the collision-resolution pass budget
    pub fn with_collision_iterations(mut self, iterations: usize) -> Self {
        self.collision_iterations = iterations;
        self
    }

    /// Set the size bounds for classified buildings
    pub fn with_building_bounds(mut self, min: f64, max: f64) -> Self {
        self.building_min = min;
        self.building_max = max;
        self
    }

    /// Set the minimum auto-grid column count
    pub fn with_auto_grid_columns(mut self, columns: usize) -> Self {
        self.auto_grid_columns = columns;
        self
    }

    /// Set the routing threshold for network/naming relationships
    pub fn with_min_connection_strength(mut self, strength: f64) -> Self {
        self.min_connection_strength = strength;
        self
    }
}

/// Per-call inputs besides the asset list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Industry id or alias used to pick the knowledge-base catalog
    pub industry: String,
    pub width: f64,
    pub height: f64,
    /// Overrides the key the deterministic seed is derived from
    #[serde(default)]
    pub seed_key: Option<String>,
}

impl LayoutOptions {
    pub fn new(industry: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            industry: industry.into(),
            width,
            height,
            seed_key: None,
        }
    }

    pub fn with_seed_key(mut self, key: impl Into<String>) -> Self {
        self.seed_key = Some(key.into());
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::new("", DEFAULT_CANVAS.0, DEFAULT_CANVAS.1)
    }
}
