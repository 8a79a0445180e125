//! Core types for the layout engine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::inference::{Relationship, RelationshipType};
use crate::knowledge::{AutomationLevel, BuildingShape, DisplayStyle, RoofProfile};

use super::config::DEFAULT_CANVAS;

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box stored as its extremes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Box of the given size centered on `(x, y)`
    pub fn from_center(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            x - width / 2.0,
            x + width / 2.0,
            y - height / 2.0,
            y + height / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Grow every side by `amount`
    pub fn expand(&self, amount: f64) -> BoundingBox {
        BoundingBox::new(
            self.min_x - amount,
            self.max_x + amount,
            self.min_y - amount,
            self.max_y + amount,
        )
    }

    /// Check if this bounding box contains a point (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Check if `other` lies completely inside this box, with a tolerance
    pub fn contains_box(&self, other: &BoundingBox, tolerance: f64) -> bool {
        other.min_x >= self.min_x - tolerance
            && other.max_x <= self.max_x + tolerance
            && other.min_y >= self.min_y - tolerance
            && other.max_y <= self.max_y + tolerance
    }

    /// Check if this bounding box intersects another (touching edges do not count)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Compute the union of two bounding boxes (smallest box containing both)
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.max_x.max(other.max_x),
            self.min_y.min(other.min_y),
            self.max_y.max(other.max_y),
        )
    }
}

/// Drawing area the layout is computed for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    /// Canvas from caller-supplied sizes; unusable sizes fall back to the default
    pub fn new(width: f64, height: f64) -> Self {
        let sane = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            width: sane(width, DEFAULT_CANVAS.0),
            height: sane(height, DEFAULT_CANVAS.1),
        }
    }

    /// Area left after removing `margin` from every edge
    pub fn interior(&self, margin: f64) -> BoundingBox {
        let margin = margin.max(0.0);
        let (min_x, max_x) = shrink(0.0, self.width, margin);
        let (min_y, max_y) = shrink(0.0, self.height, margin);
        BoundingBox::new(min_x, max_x, min_y, max_y)
    }
}

fn shrink(low: f64, high: f64, amount: f64) -> (f64, f64) {
    if high - low >= 2.0 * amount {
        (low + amount, high - amount)
    } else {
        let mid = (low + high) / 2.0;
        (mid, mid)
    }
}

/// A placed building for one process unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    /// Normalized unit name
    pub name: String,
    /// Human-readable name: the zone template name, or the unit name
    pub label: String,
    pub detected_type: Option<String>,
    /// Center of the building
    pub x: f64,
    pub y: f64,
    pub building_width: f64,
    pub building_height: f64,
    pub automation_level: AutomationLevel,
    pub roof_profile: RoofProfile,
    pub asset_count: usize,
    pub device_types: Vec<String>,
    pub subnets: Vec<String>,
    pub color: String,
    pub icon: String,
    pub shape: BuildingShape,
    pub coverage_ratio: Option<f64>,
    pub is_overstaffed: bool,
    pub is_understaffed: bool,
    pub regulations: Vec<String>,
    pub safety_notes: String,
}

impl LayoutNode {
    /// Unclassified node with the given geometry and no enrichment
    pub fn new(name: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        let name = name.into();
        let style = DisplayStyle::unclassified();
        Self {
            label: name.clone(),
            name,
            detected_type: None,
            x,
            y,
            building_width: width,
            building_height: height,
            automation_level: AutomationLevel::Process,
            roof_profile: RoofProfile::Flat,
            asset_count: 0,
            device_types: vec![],
            subnets: vec![],
            color: style.color,
            icon: style.icon,
            shape: style.shape,
            coverage_ratio: None,
            is_overstaffed: false,
            is_understaffed: false,
            regulations: vec![],
            safety_notes: String::new(),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Footprint of the building
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_center(self.x, self.y, self.building_width, self.building_height)
    }
}

/// Union of all buildings at one automation level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBoundary {
    pub level: AutomationLevel,
    pub label: String,
    pub color: String,
    pub description: String,
    pub bounds: BoundingBox,
    pub node_count: usize,
}

/// A relationship with a routed right-angle path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedConnection {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub strength: f64,
    pub material: Option<String>,
    pub critical: bool,
    pub is_production_flow: bool,
    pub path: Vec<Point>,
}

/// How a unit's asset count compares with what its type usually holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageStatus {
    Normal,
    UnderCovered,
    OverCovered,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageStat {
    pub name: String,
    pub status: CoverageStatus,
    pub ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    pub total_units: usize,
    pub total_assets: usize,
    pub production_flow_connections: usize,
    pub network_connections: usize,
    /// Sorted, without duplicates
    pub detected_types: Vec<String>,
    /// Assets in units with a detected type
    pub recognized_assets: usize,
    pub unrecognized_assets: usize,
}

/// The complete result of layout computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub nodes: Vec<LayoutNode>,
    pub connections: Vec<RoutedConnection>,
    pub relationships: Vec<Relationship>,
    pub zone_boundaries: Vec<ZoneBoundary>,
    pub coverage_stats: Vec<CoverageStat>,
    /// Asset count per automation level; every level 0..=4 is present
    pub automation_level_distribution: BTreeMap<u8, usize>,
    pub summary: LayoutSummary,
}

impl LayoutResult {
    /// Create an empty layout result
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            connections: vec![],
            relationships: vec![],
            zone_boundaries: vec![],
            coverage_stats: vec![],
            automation_level_distribution: AutomationLevel::ALL
                .iter()
                .map(|level| (level.index(), 0))
                .collect(),
            summary: LayoutSummary::default(),
        }
    }

    /// Get a node by unit name
    pub fn node(&self, name: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.name == name)
    }
}

impl Default for LayoutResult {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);
    }

    #[test]
    fn test_bounding_box_from_center() {
        let bb = BoundingBox::from_center(100.0, 50.0, 40.0, 20.0);
        assert_eq!(bb, BoundingBox::new(80.0, 120.0, 40.0, 60.0));
        assert_eq!(bb.width(), 40.0);
        assert_eq!(bb.height(), 20.0);
        assert_eq!(bb.center(), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_bounding_box_contains() {
        let bb = BoundingBox::new(0.0, 100.0, 0.0, 100.0);
        assert!(bb.contains(Point::new(50.0, 50.0)));
        assert!(bb.contains(Point::new(0.0, 0.0)));
        assert!(bb.contains(Point::new(100.0, 100.0)));
        assert!(!bb.contains(Point::new(-1.0, 50.0)));
        assert!(!bb.contains(Point::new(101.0, 50.0)));
    }

    #[test]
    fn test_bounding_box_intersects() {
        let a = BoundingBox::new(0.0, 100.0, 0.0, 100.0);
        let b = BoundingBox::new(50.0, 150.0, 50.0, 150.0);
        let c = BoundingBox::new(200.0, 250.0, 200.0, 250.0);
        let touching = BoundingBox::new(100.0, 150.0, 0.0, 100.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn test_bounding_box_union_and_expand() {
        let a = BoundingBox::new(0.0, 50.0, 0.0, 50.0);
        let b = BoundingBox::new(100.0, 150.0, 100.0, 150.0);
        assert_eq!(a.union(&b), BoundingBox::new(0.0, 150.0, 0.0, 150.0));
        assert_eq!(a.expand(5.0), BoundingBox::new(-5.0, 55.0, -5.0, 55.0));
        assert!(a.expand(5.0).contains_box(&a, 0.0));
    }

    #[test]
    fn test_canvas_fallbacks() {
        assert_eq!(Canvas::new(0.0, f64::NAN), Canvas::new(1200.0, 800.0));
        let canvas = Canvas::new(1000.0, 600.0);
        assert_eq!(canvas.interior(40.0), BoundingBox::new(40.0, 960.0, 40.0, 560.0));
        let tiny = Canvas::new(50.0, 50.0);
        assert_eq!(tiny.interior(40.0), BoundingBox::new(25.0, 25.0, 25.0, 25.0));
    }

    #[test]
    fn test_empty_result_has_full_distribution() {
        let result = LayoutResult::new();
        assert!(result.nodes.is_empty());
        assert_eq!(result.automation_level_distribution.len(), 5);
        assert!(result.automation_level_distribution.values().all(|v| *v == 0));
    }
}
