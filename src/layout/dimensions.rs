//! Building footprint sizing
//!
//! Known types are sized from the real floor area of that kind of building,
//! scaled to the canvas and nudged by how many assets the unit actually has.
//! Unknown types get a generic footprint that grows with the asset count.

use crate::knowledge::ZoneTemplate;

use super::config::LayoutConfig;

/// Canvas side length (pixels) at which one scale unit maps to one pixel
const REFERENCE_CANVAS: f64 = 900.0;
/// Pixels per sqrt(m2) at the reference canvas size
const AREA_SCALE: f64 = 0.25;
const DENSITY_MIN: f64 = 0.7;
const DENSITY_MAX: f64 = 1.4;

/// Base size of an unclassified building before the aspect is applied
const UNCLASSIFIED_BASE: f64 = 20.0;
const UNCLASSIFIED_PER_SQRT_ASSET: f64 = 5.0;
/// Fixed width and height multipliers for unclassified buildings
const UNCLASSIFIED_ASPECT: (f64, f64) = (1.3, 0.8);

/// Width and height of a building in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingSize {
    pub width: f64,
    pub height: f64,
}

/// Size a building for a unit of type `zone` holding `asset_count` assets
pub fn compute_building_dimensions(
    zone: Option<&ZoneTemplate>,
    asset_count: usize,
    canvas_width: f64,
    canvas_height: f64,
    config: &LayoutConfig,
) -> BuildingSize {
    match zone {
        Some(zone) => known_dimensions(zone, asset_count, canvas_width, canvas_height, config),
        None => unclassified_dimensions(asset_count, config),
    }
}

fn known_dimensions(
    zone: &ZoneTemplate,
    asset_count: usize,
    canvas_width: f64,
    canvas_height: f64,
    config: &LayoutConfig,
) -> BuildingSize {
    let scale_factor = canvas_width.min(canvas_height).max(0.0) / REFERENCE_CANVAS;
    let base = zone.typical_floor_area_m2.max(0.0).sqrt() * scale_factor * AREA_SCALE;

    let typical = zone.typical_asset_count.typical_or_default() as f64;
    let density = (asset_count as f64 / typical)
        .sqrt()
        .clamp(DENSITY_MIN, DENSITY_MAX);

    let aspect = if zone.building_aspect.is_finite() && zone.building_aspect > 0.0 {
        zone.building_aspect.sqrt()
    } else {
        1.0
    };

    BuildingSize {
        width: bounded(base * aspect * density, config.building_min, config.building_max),
        height: bounded(base / aspect * density, config.building_min, config.building_max),
    }
}

fn unclassified_dimensions(asset_count: usize, config: &LayoutConfig) -> BuildingSize {
    let base = bounded(
        UNCLASSIFIED_BASE + (asset_count as f64).sqrt() * UNCLASSIFIED_PER_SQRT_ASSET,
        config.unclassified_min,
        config.unclassified_max,
    );
    BuildingSize {
        width: base * UNCLASSIFIED_ASPECT.0,
        height: base * UNCLASSIFIED_ASPECT.1,
    }
}

/// Clamp that tolerates inverted bounds and NaN input
fn bounded(value: f64, min: f64, max: f64) -> f64 {
    let max = max.max(min);
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
