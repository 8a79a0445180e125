//! Automation-zone boundaries
//!
//! Nodes are grouped by automation level and each group gets the padded union
//! of its building footprints. Levels without nodes produce no boundary.

use crate::knowledge::AutomationLevel;

use super::types::{BoundingBox, LayoutNode, ZoneBoundary};

/// One boundary per populated automation level, in level order
pub fn zone_boundaries(nodes: &[LayoutNode], padding: f64) -> Vec<ZoneBoundary> {
    let padding = padding.max(0.0);
    let boundaries: Vec<ZoneBoundary> = AutomationLevel::ALL
        .iter()
        .filter_map(|&level| {
            let mut members = nodes.iter().filter(|node| node.automation_level == level);
            let first = members.next()?;
            let (bounds, node_count) = members.fold((first.bounds(), 1), |(acc, n), node| {
                (acc.union(&node.bounds()), n + 1)
            });
            Some(ZoneBoundary {
                level,
                label: level.label().to_string(),
                color: level.color().to_string(),
                description: level.description().to_string(),
                bounds: bounds.expand(padding),
                node_count,
            })
        })
        .collect();

    tracing::debug!(zones = boundaries.len(), "computed zone boundaries");
    boundaries
}

/// Nodes at `boundary`'s level that stick out of it by more than `tolerance`
pub fn uncontained<'a>(
    boundary: &ZoneBoundary,
    nodes: &'a [LayoutNode],
    tolerance: f64,
) -> impl Iterator<Item = &'a LayoutNode> {
    let bounds: BoundingBox = boundary.bounds;
    let level = boundary.level;
    nodes.iter().filter(move |node| {
        node.automation_level == level && !bounds.contains_box(&node.bounds(), tolerance)
    })
}
