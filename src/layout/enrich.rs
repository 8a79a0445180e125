//! Display and coverage annotation of placed nodes
//!
//! Enrichment never moves or resizes a node.

use crate::knowledge::{DisplayStyle, ZoneTemplate};

use super::types::{CoverageStat, CoverageStatus, LayoutNode};

/// Coverage ratios above this are reported as this value
const MAX_COVERAGE_RATIO: f64 = 2.0;

/// Attach template display data, regulatory text and staffing flags.
///
/// Nodes without a template get the unclassified style and no coverage data.
pub fn enrich_node(node: &mut LayoutNode, zone: Option<&ZoneTemplate>) {
    let Some(zone) = zone else {
        let style = DisplayStyle::unclassified();
        node.color = style.color;
        node.icon = style.icon;
        node.shape = style.shape;
        node.coverage_ratio = None;
        node.is_overstaffed = false;
        node.is_understaffed = false;
        return;
    };

    node.label = zone.name.clone();
    node.color = zone.display.color.clone();
    node.icon = zone.display.icon.clone();
    node.shape = zone.display.shape;
    node.roof_profile = zone.roof_profile;
    node.regulations = zone.regulations.clone();
    node.safety_notes = zone.safety_notes.clone();

    let range = zone.typical_asset_count;
    let count = node.asset_count as f64;
    node.coverage_ratio = range
        .typical
        .filter(|typical| *typical > 0)
        .map(|typical| (count / typical as f64).min(MAX_COVERAGE_RATIO));
    node.is_understaffed = range.min.is_some_and(|min| count < min as f64);
    node.is_overstaffed = range.max.is_some_and(|max| count > max as f64);
}

/// Summarize an enriched node's staffing flags
pub fn coverage_stat(node: &LayoutNode) -> CoverageStat {
    let status = match node.coverage_ratio {
        None => CoverageStatus::Unknown,
        Some(_) if node.is_understaffed => CoverageStatus::UnderCovered,
        Some(_) if node.is_overstaffed => CoverageStatus::OverCovered,
        Some(_) => CoverageStatus::Normal,
    };
    CoverageStat {
        name: node.name.clone(),
        status,
        ratio: node.coverage_ratio,
    }
}
