//! Layout computation engine
//!
//! Turns asset records into a `LayoutResult` in fixed stages:
//!
//! 1. **Inference**: aggregate assets per unit and infer relationships
//! 2. **Classification**: match each unit against the industry's zone templates
//! 3. **Sizing**: compute building footprints
//! 4. **Placement**: deterministic initial positions in flow order, with the
//!    unclassified grid sized to the footprints
//! 5. **Collision resolution**: separate overlapping buildings, clamp to canvas
//! 6. **Enrichment, zones and routing**: annotate nodes, union automation
//!    zones, route retained relationships
//!
//! The only randomness is a PRNG seeded from the unit set (or an explicit
//! seed key), so identical input always gives an identical layout.

use crate::asset::AssetRecord;
use crate::classify::detect_zone;
use crate::inference::{infer_relationships, InferredGraph, RelationshipType, UnitAggregate};
use crate::knowledge::{KnowledgeBase, ZoneTemplate};
use crate::names::normalize_name;
use crate::seed::SeededRng;

use super::collision::{resolve_collisions, Footprint};
use super::config::{LayoutConfig, LayoutOptions};
use super::dimensions::{compute_building_dimensions, BuildingSize};
use super::enrich::{coverage_stat, enrich_node};
use super::placement::{flow_order, initial_positions, PlacementItem};
use super::routing::route_connections;
use super::types::{Canvas, LayoutNode, LayoutResult, LayoutSummary};
use super::zones::zone_boundaries;

/// Compute a complete layout for `assets`.
///
/// Never fails: an unknown industry leaves every unit unclassified, and an
/// empty asset list gives an empty result.
pub fn compute(
    assets: &[AssetRecord],
    options: &LayoutOptions,
    kb: &KnowledgeBase,
    config: &LayoutConfig,
) -> LayoutResult {
    let canvas = Canvas::new(options.width, options.height);
    let industry = kb.industry(&options.industry);
    if industry.is_none() && !assets.is_empty() {
        tracing::warn!(
            industry = %options.industry,
            "industry not in knowledge base, all units unclassified"
        );
    }

    let graph = infer_relationships(assets, industry);
    if graph.units.is_empty() {
        return LayoutResult::new();
    }

    let mut items: Vec<PlacementItem<'_>> = graph
        .units
        .iter()
        .map(|unit| PlacementItem::new(&unit.name, industry.and_then(|i| detect_zone(&unit.name, i))))
        .collect();
    items.sort_by(flow_order);

    let units: Vec<&UnitAggregate> = items
        .iter()
        .filter_map(|item| graph.unit(item.name))
        .collect();

    let sizes: Vec<BuildingSize> = items
        .iter()
        .zip(&units)
        .map(|(item, unit)| {
            compute_building_dimensions(
                item.zone,
                unit.asset_count,
                canvas.width,
                canvas.height,
                config,
            )
        })
        .collect();
    let positions = initial_positions(&items, &sizes, canvas, config);
    let mut footprints: Vec<Footprint> = positions
        .iter()
        .zip(&sizes)
        .map(|(position, size)| Footprint::new(position.x, position.y, size.width, size.height))
        .collect();

    let seed_key = options
        .seed_key
        .clone()
        .unwrap_or_else(|| default_seed_key(&options.industry, &graph));
    let mut rng = SeededRng::from_key(&seed_key);
    let report = resolve_collisions(&mut footprints, canvas, config, &mut rng);
    tracing::debug!(
        units = units.len(),
        passes = report.passes,
        converged = report.converged,
        seed_key = %seed_key,
        "placed buildings"
    );

    let nodes: Vec<LayoutNode> = items
        .iter()
        .zip(&units)
        .zip(&footprints)
        .map(|((item, unit), footprint)| build_node(unit, item.zone, footprint))
        .collect();

    let mut result = LayoutResult::new();
    result.zone_boundaries = zone_boundaries(&nodes, config.zone_padding);
    result.connections = route_connections(&graph.relationships, &nodes, config);
    result.coverage_stats = nodes.iter().map(coverage_stat).collect();
    for unit in &graph.units {
        for (level, count) in unit.purdue_device_histogram.iter().enumerate() {
            *result
                .automation_level_distribution
                .entry(level as u8)
                .or_insert(0) += count;
        }
    }
    result.summary = summarize(assets.len(), &nodes, &result);
    result.nodes = nodes;
    result.relationships = graph.relationships;
    result
}

fn build_node(unit: &UnitAggregate, zone: Option<&ZoneTemplate>, footprint: &Footprint) -> LayoutNode {
    let mut node = LayoutNode::new(
        unit.name.clone(),
        footprint.x,
        footprint.y,
        footprint.width,
        footprint.height,
    );
    node.detected_type = zone.map(|z| z.id.clone());
    node.automation_level = zone.map_or(unit.dominant_purdue_level, |z| z.automation_level);
    node.asset_count = unit.asset_count;
    node.device_types = unit.device_types.iter().cloned().collect();
    node.subnets = unit.subnets.iter().cloned().collect();
    enrich_node(&mut node, zone);
    node
}

fn summarize(total_assets: usize, nodes: &[LayoutNode], result: &LayoutResult) -> LayoutSummary {
    let mut detected_types: Vec<String> = nodes
        .iter()
        .filter_map(|node| node.detected_type.clone())
        .collect();
    detected_types.sort();
    detected_types.dedup();

    let recognized_assets: usize = nodes
        .iter()
        .filter(|node| node.detected_type.is_some())
        .map(|node| node.asset_count)
        .sum();

    LayoutSummary {
        total_units: nodes.len(),
        total_assets,
        production_flow_connections: result
            .connections
            .iter()
            .filter(|c| c.is_production_flow)
            .count(),
        network_connections: result
            .connections
            .iter()
            .filter(|c| c.kind == RelationshipType::Network)
            .count(),
        detected_types,
        recognized_assets,
        unrecognized_assets: total_assets.saturating_sub(recognized_assets),
    }
}

/// `<industry>:<unit names>` with the unit names sorted and comma-joined
fn default_seed_key(industry: &str, graph: &InferredGraph) -> String {
    let names: Vec<&str> = graph.units.iter().map(|unit| unit.name.as_str()).collect();
    format!("{}:{}", normalize_name(industry), names.join(","))
}
