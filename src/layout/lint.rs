//! Lint engine for detecting defects in a computed layout.
//!
//! Runs after placement, enrichment and routing to re-check the guarantees a
//! layout is supposed to give: buildings keep their clearance, stay on the
//! canvas, sit inside their automation zone, relationship strengths are in
//! range and every connection path is right-angled.

use std::fmt;

use super::config::LayoutConfig;
use super::routing::is_orthogonal;
use super::types::{Canvas, LayoutResult};
use super::zones::uncontained;

/// Slack allowed on every floating-point comparison
const TOLERANCE: f64 = 1e-6;

/// A lint warning about a layout defect
#[derive(Debug, Clone, PartialEq)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Overlap,
    Bounds,
    Containment,
    Strength,
    Connection,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Overlap => write!(f, "overlap"),
            LintCategory::Bounds => write!(f, "bounds"),
            LintCategory::Containment => write!(f, "containment"),
            LintCategory::Strength => write!(f, "strength"),
            LintCategory::Connection => write!(f, "connection"),
        }
    }
}

/// Run all lint checks on a completed layout.
pub fn check(result: &LayoutResult, canvas: Canvas, config: &LayoutConfig) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_overlaps(result, config, &mut warnings);
    check_bounds(result, canvas, config, &mut warnings);
    check_zones(result, &mut warnings);
    check_strengths(result, &mut warnings);
    check_connections(result, &mut warnings);
    warnings
}

fn warn(warnings: &mut Vec<LintWarning>, category: LintCategory, message: String) {
    warnings.push(LintWarning { category, message });
}

// ── Overlap ───────────────────────────────────────────────────────

fn check_overlaps(result: &LayoutResult, config: &LayoutConfig, warnings: &mut Vec<LintWarning>) {
    let gap = config.min_gap.max(0.0);
    for (i, a) in result.nodes.iter().enumerate() {
        for b in &result.nodes[i + 1..] {
            let over_x = (a.building_width + b.building_width) / 2.0 + gap - (a.x - b.x).abs();
            let over_y =
                (a.building_height + b.building_height) / 2.0 + gap - (a.y - b.y).abs();
            if over_x > TOLERANCE && over_y > TOLERANCE {
                warn(
                    warnings,
                    LintCategory::Overlap,
                    format!(
                        "\"{}\" and \"{}\" are closer than {} ({:.1} x {:.1} overlap)",
                        a.name, b.name, gap, over_x, over_y
                    ),
                );
            }
        }
    }
}

// ── Bounds ────────────────────────────────────────────────────────

fn check_bounds(
    result: &LayoutResult,
    canvas: Canvas,
    config: &LayoutConfig,
    warnings: &mut Vec<LintWarning>,
) {
    let area = canvas.interior(config.margin);
    for node in &result.nodes {
        let inside = node.x >= area.min_x - TOLERANCE
            && node.x <= area.max_x + TOLERANCE
            && node.y >= area.min_y - TOLERANCE
            && node.y <= area.max_y + TOLERANCE;
        if !inside {
            warn(
                warnings,
                LintCategory::Bounds,
                format!(
                    "\"{}\" center ({:.1}, {:.1}) is outside the canvas margin",
                    node.name, node.x, node.y
                ),
            );
        }
    }
}

// ── Zone containment ──────────────────────────────────────────────

fn check_zones(result: &LayoutResult, warnings: &mut Vec<LintWarning>) {
    for zone in &result.zone_boundaries {
        for node in uncontained(zone, &result.nodes, TOLERANCE) {
            warn(
                warnings,
                LintCategory::Containment,
                format!("\"{}\" is not inside the {} boundary", node.name, zone.label),
            );
        }
    }
}

// ── Strength range ────────────────────────────────────────────────

fn check_strengths(result: &LayoutResult, warnings: &mut Vec<LintWarning>) {
    for rel in &result.relationships {
        if !(0.0..=1.0).contains(&rel.strength) {
            warn(
                warnings,
                LintCategory::Strength,
                format!(
                    "{} relationship {} -> {} has strength {}",
                    rel.kind, rel.from, rel.to, rel.strength
                ),
            );
        }
    }
}

// ── Connection paths ──────────────────────────────────────────────

fn check_connections(result: &LayoutResult, warnings: &mut Vec<LintWarning>) {
    for conn in &result.connections {
        if conn.path.len() < 4 {
            warn(
                warnings,
                LintCategory::Connection,
                format!(
                    "path {} -> {} has {} waypoints",
                    conn.from,
                    conn.to,
                    conn.path.len()
                ),
            );
        } else if !is_orthogonal(&conn.path) {
            warn(
                warnings,
                LintCategory::Connection,
                format!("path {} -> {} has a diagonal segment", conn.from, conn.to),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{Relationship, RelationshipType};
    use crate::layout::types::{LayoutNode, Point, RoutedConnection};
    use crate::layout::zones::zone_boundaries;

    fn result_with(nodes: Vec<LayoutNode>) -> LayoutResult {
        let mut result = LayoutResult::new();
        result.zone_boundaries = zone_boundaries(&nodes, 8.0);
        result.nodes = nodes;
        result
    }

    fn canvas() -> Canvas {
        Canvas::new(1000.0, 800.0)
    }

    #[test]
    fn test_clean_layout_has_no_warnings() {
        let result = result_with(vec![
            LayoutNode::new("a", 200.0, 200.0, 100.0, 60.0),
            LayoutNode::new("b", 400.0, 200.0, 100.0, 60.0),
        ]);
        assert!(check(&result, canvas(), &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn test_overlap_detected() {
        let result = result_with(vec![
            LayoutNode::new("a", 200.0, 200.0, 100.0, 60.0),
            LayoutNode::new("b", 310.0, 200.0, 100.0, 60.0),
        ]);
        let warnings = check(&result, canvas(), &LayoutConfig::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, LintCategory::Overlap);
        insta::assert_snapshot!(
            warnings[0].to_string(),
            @r#"[overlap] "a" and "b" are closer than 20 (10.0 x 80.0 overlap)"#
        );
    }

    #[test]
    fn test_out_of_bounds_detected() {
        let result = result_with(vec![LayoutNode::new("a", 10.0, 200.0, 100.0, 60.0)]);
        let warnings = check(&result, canvas(), &LayoutConfig::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, LintCategory::Bounds);
    }

    #[test]
    fn test_escaped_node_detected() {
        let mut result = result_with(vec![LayoutNode::new("a", 200.0, 200.0, 100.0, 60.0)]);
        result.nodes[0].y += 100.0;
        let warnings = check(&result, canvas(), &LayoutConfig::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, LintCategory::Containment);
    }

    #[test]
    fn test_bad_strength_and_diagonal_path() {
        let mut result = result_with(vec![]);
        result.relationships.push(Relationship {
            from: "a".to_string(),
            to: "b".to_string(),
            kind: RelationshipType::Network,
            strength: 1.5,
            material: None,
            critical: None,
            evidence: String::new(),
        });
        result.connections.push(RoutedConnection {
            from: "a".to_string(),
            to: "b".to_string(),
            kind: RelationshipType::Network,
            strength: 1.0,
            material: None,
            critical: false,
            is_production_flow: false,
            path: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(20.0, 20.0),
                Point::new(30.0, 20.0),
            ],
        });
        let categories: Vec<_> = check(&result, canvas(), &LayoutConfig::default())
            .into_iter()
            .map(|w| w.category)
            .collect();
        assert_eq!(
            categories,
            vec![LintCategory::Strength, LintCategory::Connection]
        );
    }
}
