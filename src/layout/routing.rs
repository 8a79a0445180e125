//! Connection routing between buildings
//!
//! Every path is a polyline of horizontal and vertical segments. Consecutive
//! waypoints of a path between two distinct points differ in exactly one
//! coordinate.

use std::cmp::Ordering;

use crate::inference::{Relationship, RelationshipType};

use super::config::LayoutConfig;
use super::types::{BoundingBox, LayoutNode, Point, RoutedConnection};

/// Edge of a bounding box for connection attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Midpoint of the given edge
pub fn attachment_point(bounds: &BoundingBox, edge: Edge) -> Point {
    let center = bounds.center();
    match edge {
        Edge::Top => Point::new(center.x, bounds.min_y),
        Edge::Bottom => Point::new(center.x, bounds.max_y),
        Edge::Left => Point::new(bounds.min_x, center.y),
        Edge::Right => Point::new(bounds.max_x, center.y),
    }
}

/// Facing edges of two boxes: left/right when they are further apart
/// horizontally than vertically, top/bottom otherwise
pub fn best_edges(from: &BoundingBox, to: &BoundingBox) -> (Edge, Edge) {
    let dx = to.center().x - from.center().x;
    let dy = to.center().y - from.center().y;

    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            (Edge::Right, Edge::Left)
        } else {
            (Edge::Left, Edge::Right)
        }
    } else if dy > 0.0 {
        (Edge::Bottom, Edge::Top)
    } else {
        (Edge::Top, Edge::Bottom)
    }
}

/// Right-angle path from `(x1, y1)` to `(x2, y2)`, always four waypoints.
///
/// Mostly-horizontal spans go horizontal, vertical, horizontal through the
/// x midpoint; the rest go vertical, horizontal, vertical through the y
/// midpoint. Aligned endpoints give a straight line split into thirds.
pub fn compute_orthogonal_path(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<Point> {
    let dx = x2 - x1;
    let dy = y2 - y1;

    if dx.abs() > dy.abs() {
        if dy == 0.0 {
            return thirds(x1, y1, x2, y2);
        }
        let mid_x = x1 + dx / 2.0;
        vec![
            Point::new(x1, y1),
            Point::new(mid_x, y1),
            Point::new(mid_x, y2),
            Point::new(x2, y2),
        ]
    } else {
        if dx == 0.0 {
            return thirds(x1, y1, x2, y2);
        }
        let mid_y = y1 + dy / 2.0;
        vec![
            Point::new(x1, y1),
            Point::new(x1, mid_y),
            Point::new(x2, mid_y),
            Point::new(x2, y2),
        ]
    }
}

fn thirds(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<Point> {
    let at = |t: f64| Point::new(x1 + (x2 - x1) * t, y1 + (y2 - y1) * t);
    vec![Point::new(x1, y1), at(1.0 / 3.0), at(2.0 / 3.0), Point::new(x2, y2)]
}

/// True when no segment of `path` is diagonal
pub fn is_orthogonal(path: &[Point]) -> bool {
    path.windows(2)
        .all(|pair| pair[0].x == pair[1].x || pair[0].y == pair[1].y)
}

/// Route the relationships worth drawing between placed nodes.
///
/// Production-flow edges are always kept; other edges need at least
/// `min_connection_strength`. Edges whose endpoints are not both placed are
/// dropped.
pub fn route_connections(
    relationships: &[Relationship],
    nodes: &[LayoutNode],
    config: &LayoutConfig,
) -> Vec<RoutedConnection> {
    let find = |name: &str| nodes.iter().find(|node| node.name == name);

    let mut connections: Vec<RoutedConnection> = relationships
        .iter()
        .filter(|rel| {
            rel.kind == RelationshipType::ProductionFlow
                || rel.strength >= config.min_connection_strength
        })
        .filter_map(|rel| {
            let from = find(&rel.from)?;
            let to = find(&rel.to)?;
            let (from_bounds, to_bounds) = (from.bounds(), to.bounds());
            let (from_edge, to_edge) = best_edges(&from_bounds, &to_bounds);
            let start = attachment_point(&from_bounds, from_edge);
            let end = attachment_point(&to_bounds, to_edge);

            Some(RoutedConnection {
                from: rel.from.clone(),
                to: rel.to.clone(),
                kind: rel.kind,
                strength: rel.strength,
                material: rel.material.clone(),
                critical: rel.critical.unwrap_or(false),
                is_production_flow: rel.kind == RelationshipType::ProductionFlow,
                path: compute_orthogonal_path(start.x, start.y, end.x, end.y),
            })
        })
        .collect();

    connections.sort_by(connection_order);
    tracing::debug!(
        connections = connections.len(),
        relationships = relationships.len(),
        "routed connections"
    );
    connections
}

/// Production flow first, then strongest first, then by endpoint names
fn connection_order(a: &RoutedConnection, b: &RoutedConnection) -> Ordering {
    b.is_production_flow
        .cmp(&a.is_production_flow)
        .then_with(|| b.strength.total_cmp(&a.strength))
        .then_with(|| a.from.cmp(&b.from))
        .then_with(|| a.to.cmp(&b.to))
        .then_with(|| a.kind.cmp(&b.kind))
}
