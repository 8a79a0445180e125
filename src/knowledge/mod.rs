//! Industry knowledge base
//!
//! Per-industry catalogs of known process areas (zone templates) and the
//! static production-flow tables between them. The catalog is plain TOML; a
//! built-in copy is embedded in the crate and further industries can be loaded
//! from files and merged in. Once built, a `KnowledgeBase` is never mutated by
//! the layout pipeline; it is passed by reference into every call.

pub mod automation;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::names::normalize_name;

pub use automation::AutomationLevel;

/// Typical asset count used for sizing when a template does not specify one
pub const DEFAULT_TYPICAL_ASSET_COUNT: u32 = 200;

const BUILTIN_CATALOG: &str = include_str!("catalog.toml");

/// Errors that can occur when loading or validating a knowledge base
#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("Failed to read knowledge base file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse knowledge base TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("duplicate industry '{industry}'")]
    DuplicateIndustry { industry: String },
    #[error("duplicate zone '{zone}' in industry '{industry}'")]
    DuplicateZone { industry: String, zone: String },
    #[error("flow {from} -> {to} in industry '{industry}' references unknown zone '{missing}'")]
    UnknownFlowZone {
        industry: String,
        from: String,
        to: String,
        missing: String,
    },
    #[error("flow {from} -> {to} in industry '{industry}' has strength {strength} outside 0..=1")]
    InvalidFlowStrength {
        industry: String,
        from: String,
        to: String,
        strength: f64,
    },
    #[error("zone '{zone}' in industry '{industry}': {reason}")]
    InvalidZone {
        industry: String,
        zone: String,
        reason: String,
    },
}

/// Roof silhouette hint for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofProfile {
    #[default]
    Flat,
    Sawtooth,
    Gable,
    Dome,
    /// Open-air process structure (pipe racks, columns)
    Open,
}

/// Footprint shape hint for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingShape {
    #[default]
    Rectangle,
    LShape,
    Circle,
    Hexagon,
}

/// Color, icon and shape attached to nodes during enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayStyle {
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub shape: BuildingShape,
}

impl DisplayStyle {
    /// Style for units that match no zone template
    pub fn unclassified() -> Self {
        Self {
            color: "#9e9e9e".to_string(),
            icon: "❔".to_string(),
            shape: BuildingShape::Rectangle,
        }
    }
}

impl Default for DisplayStyle {
    fn default() -> Self {
        Self::unclassified()
    }
}

/// Expected number of assets in a zone of this type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetCountRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub typical: Option<u32>,
}

impl AssetCountRange {
    /// Typical count for sizing, never below 1
    pub fn typical_or_default(&self) -> u32 {
        self.typical.unwrap_or(DEFAULT_TYPICAL_ASSET_COUNT).max(1)
    }
}

/// A known area/unit type within one industry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// 0 = perimeter, 1 = main production row, 2+ = feeder rows
    pub row: u32,
    pub col: u32,
    pub automation_level: AutomationLevel,
    /// Width:depth ratio of the building footprint
    pub building_aspect: f64,
    pub typical_floor_area_m2: f64,
    #[serde(default)]
    pub roof_profile: RoofProfile,
    #[serde(default)]
    pub typical_asset_count: AssetCountRange,
    #[serde(default)]
    pub regulations: Vec<String>,
    #[serde(default)]
    pub safety_notes: String,
    #[serde(default)]
    pub display: DisplayStyle,
}

impl ZoneTemplate {
    /// True when the zone id or one of its aliases occurs in an already
    /// normalized unit name.
    pub fn matches(&self, normalized_unit: &str) -> bool {
        if normalized_unit.is_empty() {
            return false;
        }
        std::iter::once(&self.id)
            .chain(self.aliases.iter())
            .map(|key| normalize_name(key))
            .any(|key| !key.is_empty() && normalized_unit.contains(&key))
    }
}

/// One directed entry in an industry's production-flow table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    pub strength: f64,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub critical: bool,
}

/// Catalog for one industry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Industry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, rename = "zone")]
    pub zones: Vec<ZoneTemplate>,
    #[serde(default, rename = "flow")]
    pub flows: Vec<FlowEdge>,
}

impl Industry {
    pub fn zone(&self, id: &str) -> Option<&ZoneTemplate> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    /// True when `identifier` names this industry by id or alias
    pub fn answers_to(&self, identifier: &str) -> bool {
        let wanted = normalize_name(identifier);
        !wanted.is_empty()
            && std::iter::once(&self.id)
                .chain(self.aliases.iter())
                .any(|name| normalize_name(name) == wanted)
    }

    fn validate(&self) -> Result<(), KnowledgeBaseError> {
        let mut seen = HashSet::new();
        for zone in &self.zones {
            if !seen.insert(zone.id.as_str()) {
                return Err(KnowledgeBaseError::DuplicateZone {
                    industry: self.id.clone(),
                    zone: zone.id.clone(),
                });
            }
            if !(zone.building_aspect.is_finite() && zone.building_aspect > 0.0) {
                return Err(self.invalid_zone(zone, "building_aspect must be positive"));
            }
            if !(zone.typical_floor_area_m2.is_finite() && zone.typical_floor_area_m2 > 0.0) {
                return Err(self.invalid_zone(zone, "typical_floor_area_m2 must be positive"));
            }
        }

        for flow in &self.flows {
            for endpoint in [&flow.from, &flow.to] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(KnowledgeBaseError::UnknownFlowZone {
                        industry: self.id.clone(),
                        from: flow.from.clone(),
                        to: flow.to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            if !(0.0..=1.0).contains(&flow.strength) {
                return Err(KnowledgeBaseError::InvalidFlowStrength {
                    industry: self.id.clone(),
                    from: flow.from.clone(),
                    to: flow.to.clone(),
                    strength: flow.strength,
                });
            }
        }
        Ok(())
    }

    fn invalid_zone(&self, zone: &ZoneTemplate, reason: &str) -> KnowledgeBaseError {
        KnowledgeBaseError::InvalidZone {
            industry: self.id.clone(),
            zone: zone.id.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Immutable set of industry catalogs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default, rename = "industry")]
    pub industries: Vec<Industry>,
}

impl KnowledgeBase {
    /// The catalog embedded in the crate
    pub fn builtin() -> Self {
        Self::from_str(BUILTIN_CATALOG).expect("Built-in catalog should be valid")
    }

    /// Load a knowledge base from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a knowledge base from a TOML string and validate it
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, KnowledgeBaseError> {
        let parsed: KnowledgeBase = toml::from_str(content)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Check cross-references and numeric ranges
    pub fn validate(&self) -> Result<(), KnowledgeBaseError> {
        let mut seen = HashSet::new();
        for industry in &self.industries {
            if !seen.insert(industry.id.as_str()) {
                return Err(KnowledgeBaseError::DuplicateIndustry {
                    industry: industry.id.clone(),
                });
            }
            industry.validate()?;
        }
        Ok(())
    }

    /// Combine two knowledge bases; industries in `other` replace same-id
    /// industries here, new ones are appended in their file order.
    pub fn merge(mut self, other: KnowledgeBase) -> Self {
        for industry in other.industries {
            match self.industries.iter_mut().find(|i| i.id == industry.id) {
                Some(existing) => *existing = industry,
                None => self.industries.push(industry),
            }
        }
        self
    }

    /// Look up an industry by id or alias (case and punctuation insensitive)
    pub fn industry(&self, identifier: &str) -> Option<&Industry> {
        self.industries.iter().find(|i| i.answers_to(identifier))
    }

    pub fn industry_ids(&self) -> Vec<&str> {
        self.industries.iter().map(|i| i.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let kb = KnowledgeBase::builtin();
        insta::assert_snapshot!(
            kb.industry_ids().join(", "),
            @"automotive, oil_gas, pharmaceutical, food_beverage, water_wastewater"
        );
    }

    #[test]
    fn test_builtin_every_industry_has_main_row() {
        let kb = KnowledgeBase::builtin();
        for industry in &kb.industries {
            assert!(
                industry.zones.iter().any(|z| z.row == 1),
                "industry {} has no main production row",
                industry.id
            );
            assert!(!industry.flows.is_empty());
        }
    }

    #[test]
    fn test_industry_lookup_by_alias() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.industry("Automotive").map(|i| i.id.as_str()), Some("automotive"));
        assert_eq!(kb.industry("auto").map(|i| i.id.as_str()), Some("automotive"));
        assert_eq!(kb.industry("Oil & Gas").map(|i| i.id.as_str()), Some("oil_gas"));
        assert_eq!(kb.industry("pharma").map(|i| i.id.as_str()), Some("pharmaceutical"));
        assert!(kb.industry("aerospace").is_none());
        assert!(kb.industry("").is_none());
    }

    #[test]
    fn test_zone_matches_id_and_alias() {
        let kb = KnowledgeBase::builtin();
        let auto = kb.industry("automotive").unwrap();
        let paint = auto.zone("paint_shop").unwrap();
        assert!(paint.matches("paint_shop"));
        assert!(paint.matches("ecoat_line_2"));
        assert!(!paint.matches("body_shop"));
        assert!(!paint.matches(""));
    }

    #[test]
    fn test_typical_count_defaults() {
        let range = AssetCountRange::default();
        assert_eq!(range.typical_or_default(), DEFAULT_TYPICAL_ASSET_COUNT);
        let zero = AssetCountRange {
            typical: Some(0),
            ..AssetCountRange::default()
        };
        assert_eq!(zero.typical_or_default(), 1);
    }

    const MINIMAL: &str = r##"
[[industry]]
id = "mining"
name = "Mining"

[[industry.zone]]
id = "crusher"
name = "Primary Crusher"
row = 1
col = 0
automation_level = 1
building_aspect = 1.5
typical_floor_area_m2 = 2000

[[industry.zone]]
id = "mill"
name = "Mill"
row = 1
col = 1
automation_level = 1
building_aspect = 2.0
typical_floor_area_m2 = 5000

[[industry.flow]]
from = "crusher"
to = "mill"
strength = 0.8
"##;

    #[test]
    fn test_parse_minimal_with_defaults() {
        let kb = KnowledgeBase::from_str(MINIMAL).expect("Should parse");
        let mining = kb.industry("mining").unwrap();
        let crusher = mining.zone("crusher").unwrap();
        assert_eq!(crusher.roof_profile, RoofProfile::Flat);
        assert_eq!(crusher.display, DisplayStyle::unclassified());
        assert!(crusher.regulations.is_empty());
        assert_eq!(mining.flows[0].material, "");
        assert!(!mining.flows[0].critical);
    }

    #[test]
    fn test_merge_appends_and_replaces() {
        let extra = KnowledgeBase::from_str(MINIMAL).unwrap();
        let merged = KnowledgeBase::builtin().merge(extra.clone());
        assert_eq!(merged.industries.len(), 6);
        assert_eq!(merged.industry_ids().last(), Some(&"mining"));

        let again = merged.merge(extra);
        assert_eq!(again.industries.len(), 6);
    }

    #[test]
    fn test_flow_with_unknown_zone_rejected() {
        let bad = MINIMAL.replace("to = \"mill\"", "to = \"smelter\"");
        let err = KnowledgeBase::from_str(&bad).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::UnknownFlowZone { .. }));
        assert!(err.to_string().contains("smelter"));
    }

    #[test]
    fn test_out_of_range_level_rejected() {
        let bad = MINIMAL.replacen("automation_level = 1", "automation_level = 9", 1);
        let err = KnowledgeBase::from_str(&bad).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::ParseError(_)));
    }

    #[test]
    fn test_flow_strength_out_of_range_rejected() {
        let bad = MINIMAL.replace("strength = 0.8", "strength = 1.5");
        let err = KnowledgeBase::from_str(&bad).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::InvalidFlowStrength { .. }));
    }

    #[test]
    fn test_duplicate_zone_rejected() {
        let bad = MINIMAL.replace("id = \"mill\"", "id = \"crusher\"");
        let err = KnowledgeBase::from_str(&bad).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::DuplicateZone { .. }));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = KnowledgeBase::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(KnowledgeBaseError::ParseError(_))));
    }
}
