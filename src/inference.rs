//! Relationship inference
//!
//! Aggregates raw asset records into per-unit summaries and infers weighted
//! edges between units from three independent signals:
//!
//! - **network**: units whose assets share a /24 subnet
//! - **naming**: units whose tag ids share an alphanumeric prefix
//! - **production_flow**: the industry's static flow table, matched against
//!   the detected type of the units that are actually present
//!
//! All signals are emitted as separate relationship records; nothing is merged.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::asset::{AssetRecord, UNASSIGNED_UNIT};
use crate::classify::detect_zone;
use crate::knowledge::{AutomationLevel, Industry};
use crate::names::normalize_name;

/// Strength contributed per shared subnet
const NETWORK_STRENGTH_PER_SUBNET: f64 = 0.3;
/// Strength contributed per shared tag prefix
const NAMING_STRENGTH_PER_PREFIX: f64 = 0.2;
/// Naming is a weak signal and never exceeds this
const NAMING_STRENGTH_CAP: f64 = 0.6;

/// Per-unit summary of the asset records assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAggregate {
    /// Normalized unit name
    pub name: String,
    pub asset_count: usize,
    /// Distinct first-three-octet prefixes, e.g. `10.0.1`
    pub subnets: BTreeSet<String>,
    pub tag_prefixes: BTreeSet<String>,
    pub device_types: BTreeSet<String>,
    /// Asset counts per automation level 0..=4
    pub purdue_device_histogram: [usize; 5],
    pub dominant_purdue_level: AutomationLevel,
}

impl UnitAggregate {
    fn new(name: String) -> Self {
        Self {
            name,
            asset_count: 0,
            subnets: BTreeSet::new(),
            tag_prefixes: BTreeSet::new(),
            device_types: BTreeSet::new(),
            purdue_device_histogram: [0; 5],
            dominant_purdue_level: AutomationLevel::Process,
        }
    }

    fn add(&mut self, asset: &AssetRecord) {
        self.asset_count += 1;
        if let Some(subnet) = subnet_prefix(asset.ip()) {
            self.subnets.insert(subnet);
        }
        if let Some(prefix) = tag_prefix(asset.tag()) {
            self.tag_prefixes.insert(prefix);
        }
        let device = asset.device();
        if !device.is_empty() {
            self.device_types.insert(device.to_string());
        }
        let level = AutomationLevel::classify_device(device);
        self.purdue_device_histogram[level.index() as usize] += 1;
    }

    /// Level with the highest count; ties go to the lower level
    fn settle_dominant_level(&mut self) {
        let mut best = 0;
        for (index, count) in self.purdue_device_histogram.iter().enumerate() {
            if *count > self.purdue_device_histogram[best] {
                best = index;
            }
        }
        self.dominant_purdue_level =
            AutomationLevel::from_index(best as u8).unwrap_or(AutomationLevel::Process);
    }
}

/// Kind of evidence behind a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Network,
    Naming,
    ProductionFlow,
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipType::Network => write!(f, "network"),
            RelationshipType::Naming => write!(f, "naming"),
            RelationshipType::ProductionFlow => write!(f, "production_flow"),
        }
    }
}

/// Inferred edge between two units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    /// Always within 0..=1
    pub strength: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<bool>,
    pub evidence: String,
}

impl Relationship {
    fn new(
        from: &str,
        to: &str,
        kind: RelationshipType,
        strength: f64,
        evidence: String,
    ) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            kind,
            strength: clamp_strength(strength),
            material: None,
            critical: None,
            evidence,
        }
    }
}

/// Output of relationship inference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferredGraph {
    /// Units sorted by name
    pub units: Vec<UnitAggregate>,
    pub relationships: Vec<Relationship>,
}

impl InferredGraph {
    pub fn unit(&self, name: &str) -> Option<&UnitAggregate> {
        self.units.iter().find(|unit| unit.name == name)
    }
}

fn clamp_strength(strength: f64) -> f64 {
    if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    }
}

/// Normalized unit key for an asset; blank names fall back to `unassigned`
pub fn unit_key(asset: &AssetRecord) -> String {
    let key = normalize_name(asset.unit_label());
    if key.is_empty() {
        UNASSIGNED_UNIT.to_string()
    } else {
        key
    }
}

/// First three octets of a dotted IPv4 address, e.g. `10.0.1.17` -> `10.0.1`
pub fn subnet_prefix(ip: &str) -> Option<String> {
    let mut octets = ip.trim().split('.');
    let mut parts = Vec::with_capacity(3);
    for _ in 0..3 {
        let octet: u8 = octets.next()?.trim().parse().ok()?;
        parts.push(octet.to_string());
    }
    octets.next()?;
    Some(parts.join("."))
}

fn tag_prefix_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z]{2,6}[0-9]{0,2})").expect("tag prefix pattern"))
}

/// Leading 2-6 letters plus up to two digits of a tag id, uppercased
pub fn tag_prefix(tag: &str) -> Option<String> {
    tag_prefix_regex()
        .captures(tag.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_uppercase())
}

/// Group assets into unit aggregates, sorted by unit name
pub fn aggregate_units(assets: &[AssetRecord]) -> Vec<UnitAggregate> {
    let mut by_name: BTreeMap<String, UnitAggregate> = BTreeMap::new();
    for asset in assets {
        let key = unit_key(asset);
        by_name
            .entry(key.clone())
            .or_insert_with(|| UnitAggregate::new(key))
            .add(asset);
    }

    by_name
        .into_values()
        .map(|mut unit| {
            unit.settle_dominant_level();
            unit
        })
        .collect()
}

/// Aggregate assets and infer all relationships between the resulting units.
///
/// `industry` is `None` when the requested industry is not in the knowledge
/// base; only the network and naming signals apply then.
pub fn infer_relationships(assets: &[AssetRecord], industry: Option<&Industry>) -> InferredGraph {
    let units = aggregate_units(assets);
    let mut relationships = Vec::new();

    shared_attribute_edges(&units, &mut relationships);
    if let Some(industry) = industry {
        production_flow_edges(&units, industry, &mut relationships);
    }

    tracing::debug!(
        units = units.len(),
        relationships = relationships.len(),
        "inferred unit relationships"
    );

    InferredGraph {
        units,
        relationships,
    }
}

fn shared_attribute_edges(units: &[UnitAggregate], out: &mut Vec<Relationship>) {
    for (i, a) in units.iter().enumerate() {
        for b in &units[i + 1..] {
            let shared_subnets: Vec<&str> =
                a.subnets.intersection(&b.subnets).map(String::as_str).collect();
            if !shared_subnets.is_empty() {
                let strength =
                    (NETWORK_STRENGTH_PER_SUBNET * shared_subnets.len() as f64).min(1.0);
                out.push(Relationship::new(
                    &a.name,
                    &b.name,
                    RelationshipType::Network,
                    strength,
                    format!("shared subnets: {}", shared_subnets.join(", ")),
                ));
            }

            let shared_prefixes: Vec<&str> = a
                .tag_prefixes
                .intersection(&b.tag_prefixes)
                .map(String::as_str)
                .collect();
            if !shared_prefixes.is_empty() {
                let strength = (NAMING_STRENGTH_PER_PREFIX * shared_prefixes.len() as f64)
                    .min(NAMING_STRENGTH_CAP);
                out.push(Relationship::new(
                    &a.name,
                    &b.name,
                    RelationshipType::Naming,
                    strength,
                    format!("shared tag prefixes: {}", shared_prefixes.join(", ")),
                ));
            }
        }
    }
}

fn production_flow_edges(units: &[UnitAggregate], industry: &Industry, out: &mut Vec<Relationship>) {
    let detected: Vec<Option<&str>> = units
        .iter()
        .map(|unit| detect_zone(&unit.name, industry).map(|zone| zone.id.as_str()))
        .collect();
    // first unit, by name, classified as the zone
    let find_unit = |zone_id: &str| {
        units
            .iter()
            .zip(&detected)
            .find(|(_, detected)| **detected == Some(zone_id))
            .map(|(unit, _)| unit)
    };

    for flow in &industry.flows {
        let (Some(from), Some(to)) = (find_unit(&flow.from), find_unit(&flow.to)) else {
            continue;
        };
        if from.name == to.name {
            continue;
        }

        let mut relationship = Relationship::new(
            &from.name,
            &to.name,
            RelationshipType::ProductionFlow,
            flow.strength,
            format!("{} flow: {} -> {}", industry.name, flow.from, flow.to),
        );
        if !flow.material.is_empty() {
            relationship.material = Some(flow.material.clone());
        }
        relationship.critical = Some(flow.critical);
        out.push(relationship);
    }
}
