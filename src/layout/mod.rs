//! Layout engine for facility diagrams
//!
//! This module takes unit aggregates and their inferred relationships and
//! computes the spatial layout, producing a `LayoutResult` with placed
//! buildings, automation-zone boundaries and routed connections.

pub mod collision;
pub mod config;
pub mod dimensions;
pub mod engine;
pub mod enrich;
pub mod lint;
pub mod placement;
pub mod routing;
pub mod types;
pub mod zones;

pub use collision::{resolve_collisions, CollisionReport, Footprint};
pub use config::{LayoutConfig, LayoutOptions};
pub use dimensions::{compute_building_dimensions, BuildingSize};
pub use engine::compute;
pub use lint::{LintCategory, LintWarning};
pub use routing::{compute_orthogonal_path, route_connections};
pub use types::*;
pub use zones::zone_boundaries;
