//! Unit type classification against the industry catalog

use crate::knowledge::{Industry, KnowledgeBase, ZoneTemplate};
use crate::names::normalize_name;

/// Map a free-text unit name to the id of the first matching zone template,
/// in catalog order. Returns `None` for unknown industries and unmatched units.
pub fn detect_unit_type(unit_name: &str, industry: &str, kb: &KnowledgeBase) -> Option<String> {
    let industry = kb.industry(industry)?;
    detect_zone(unit_name, industry).map(|zone| zone.id.clone())
}

/// Same as [`detect_unit_type`] but against an already resolved industry
pub fn detect_zone<'a>(unit_name: &str, industry: &'a Industry) -> Option<&'a ZoneTemplate> {
    let normalized = normalize_name(unit_name);
    industry.zones.iter().find(|zone| zone.matches(&normalized))
}
