//! Output guarantees that must hold for any input

use facility_layout::layout::{lint, zone_boundaries, Canvas};
use facility_layout::seed::SeededRng;
use facility_layout::{
    compute_orthogonal_path, generate_layout, AssetRecord, KnowledgeBase, LayoutConfig,
    LayoutOptions, LayoutResult,
};
use pretty_assertions::assert_eq;

/// Synthetic plant: one unit per zone template plus a few unknown units, with
/// seeded asset counts, subnets and tags
fn synthetic_plant(industry: &str, kb: &KnowledgeBase, seed: &str) -> Vec<AssetRecord> {
    let mut rng = SeededRng::from_key(seed);
    let mut units: Vec<String> = kb
        .industry(industry)
        .map(|i| i.zones.iter().map(|z| z.name.clone()).collect())
        .unwrap_or_default();
    units.extend(["Canteen", "Visitor Center", "Parking"].map(String::from));

    let devices = ["PLC", "HMI", "Level Sensor", "Historian", "ERP Client", "Camera"];
    let mut assets = Vec::new();
    for unit in &units {
        let count = rng.range_inclusive(1, 80);
        for _ in 0..count {
            let subnet = rng.range_inclusive(1, 6);
            let host = rng.range_inclusive(2, 250);
            let device = devices[rng.range_inclusive(0, devices.len() as u32 - 1) as usize];
            assets.push(
                AssetRecord::in_unit(unit.as_str())
                    .with_ip(format!("10.0.{}.{}", subnet, host))
                    .with_tag(format!("{}-{}", &device[..2], host))
                    .with_device_type(device),
            );
        }
    }
    assets
}

fn layout(assets: &[AssetRecord], industry: &str, kb: &KnowledgeBase) -> LayoutResult {
    generate_layout(assets, &LayoutOptions::new(industry, 1200.0, 800.0), kb)
}

#[test]
fn test_every_builtin_industry_lays_out_cleanly() {
    let kb = KnowledgeBase::builtin();
    let config = LayoutConfig::default();
    for id in kb.industry_ids() {
        let assets = synthetic_plant(id, &kb, id);
        let result = layout(&assets, id, &kb);

        assert!(!result.nodes.is_empty());
        let warnings = lint::check(&result, Canvas::new(1200.0, 800.0), &config);
        assert!(
            warnings.is_empty(),
            "industry {}: {:?}",
            id,
            warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>()
        );
        assert!(result.summary.production_flow_connections > 0, "industry {}", id);
    }
}

#[test]
fn test_unclassified_sweep_on_default_canvas() {
    let kb = KnowledgeBase::builtin();
    let config = LayoutConfig::default();
    for count in (5..=40).step_by(5) {
        let mut rng = SeededRng::from_key(&format!("sweep-{}", count));
        let mut assets = Vec::new();
        for i in 0..count {
            let assets_in_unit = rng.range_inclusive(1, 150);
            for _ in 0..assets_in_unit {
                assets.push(AssetRecord::in_unit(format!("Area {}", i)));
            }
        }

        let result = layout(&assets, "aerospace", &kb);
        assert_eq!(result.nodes.len(), count);
        let warnings = lint::check(&result, Canvas::new(1200.0, 800.0), &config);
        assert!(
            warnings.is_empty(),
            "{} units: {:?}",
            count,
            warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_mixed_sweep_on_default_canvas() {
    let kb = KnowledgeBase::builtin();
    let config = LayoutConfig::default();
    for industry in &kb.industries {
        for extra in (0..=40).step_by(5) {
            let mut rng = SeededRng::from_key(&format!("{}-{}", industry.id, extra));
            let mut units: Vec<(String, u32)> = industry
                .zones
                .iter()
                .map(|zone| (zone.name.clone(), rng.range_inclusive(1, 150)))
                .collect();
            for i in 0..extra {
                units.push((format!("Annex {}", i), rng.range_inclusive(1, 60)));
            }
            let assets: Vec<AssetRecord> = units
                .iter()
                .flat_map(|(unit, count)| (0..*count).map(move |_| AssetRecord::in_unit(unit.as_str())))
                .collect();

            let result = layout(&assets, &industry.id, &kb);
            let warnings = lint::check(&result, Canvas::new(1200.0, 800.0), &config);
            assert!(
                warnings.is_empty(),
                "{} + {} extra units: {:?}",
                industry.id,
                extra,
                warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>()
            );
        }
    }
}

#[test]
fn test_identical_calls_identical_results() {
    let kb = KnowledgeBase::builtin();
    for id in kb.industry_ids() {
        let assets = synthetic_plant(id, &kb, "determinism");
        let first = layout(&assets, id, &kb);
        let second = layout(&assets, id, &kb);
        assert_eq!(first, second);
    }
}

#[test]
fn test_input_order_does_not_matter() {
    let kb = KnowledgeBase::builtin();
    let assets = synthetic_plant("food_beverage", &kb, "order");
    let mut reversed = assets.clone();
    reversed.reverse();
    assert_eq!(
        layout(&assets, "food_beverage", &kb),
        layout(&reversed, "food_beverage", &kb)
    );
}

#[test]
fn test_strengths_within_unit_interval() {
    let kb = KnowledgeBase::builtin();
    for id in kb.industry_ids() {
        let result = layout(&synthetic_plant(id, &kb, "strength"), id, &kb);
        for rel in &result.relationships {
            assert!((0.0..=1.0).contains(&rel.strength), "{:?}", rel);
        }
        for conn in &result.connections {
            assert!((0.0..=1.0).contains(&conn.strength), "{:?}", conn);
        }
    }
}

#[test]
fn test_zone_boundaries_contain_their_nodes() {
    let kb = KnowledgeBase::builtin();
    let result = layout(&synthetic_plant("pharmaceutical", &kb, "zones"), "pharmaceutical", &kb);
    assert_eq!(
        result.zone_boundaries,
        zone_boundaries(&result.nodes, LayoutConfig::default().zone_padding)
    );
    for zone in &result.zone_boundaries {
        let members: Vec<_> = result
            .nodes
            .iter()
            .filter(|n| n.automation_level == zone.level)
            .collect();
        assert_eq!(members.len(), zone.node_count);
        for node in members {
            assert!(zone.bounds.contains_box(&node.bounds(), 1e-9), "{}", node.name);
        }
    }
}

#[test]
fn test_orthogonal_paths() {
    let mut rng = SeededRng::from_key("paths");
    for _ in 0..500 {
        let mut coord = || rng.range_inclusive(0, 2000) as f64 - 1000.0;
        let (x1, y1, x2, y2) = (coord(), coord(), coord(), coord());
        let path = compute_orthogonal_path(x1, y1, x2, y2);
        assert!(path.len() >= 4);
        if (x1, y1) == (x2, y2) {
            continue;
        }
        for pair in path.windows(2) {
            let horizontal = pair[0].y == pair[1].y && pair[0].x != pair[1].x;
            let vertical = pair[0].x == pair[1].x && pair[0].y != pair[1].y;
            assert!(horizontal || vertical, "({}, {}) -> ({}, {}): {:?}", x1, y1, x2, y2, path);
        }
    }
}

#[test]
fn test_connection_paths_start_and_end_on_buildings() {
    let kb = KnowledgeBase::builtin();
    let result = layout(&synthetic_plant("automotive", &kb, "edges"), "automotive", &kb);
    for conn in &result.connections {
        let from = result.node(&conn.from).expect("from node").bounds();
        let to = result.node(&conn.to).expect("to node").bounds();
        let first = conn.path[0];
        let last = conn.path[conn.path.len() - 1];
        assert!(from.contains(first), "{} -> {}", conn.from, conn.to);
        assert!(to.contains(last), "{} -> {}", conn.from, conn.to);
    }
}
