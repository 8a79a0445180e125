//! Facility Layout - deterministic plant diagrams from asset inventories
//!
//! This library groups industrial asset records into process units, infers
//! how the units relate (shared subnets, shared tag prefixes, the industry's
//! production flow) and lays them out as non-overlapping buildings with
//! automation-zone boundaries and right-angle connection paths.
//!
//! # Example
//!
//! ```rust
//! use facility_layout::{generate_layout, AssetRecord, KnowledgeBase, LayoutOptions};
//!
//! let assets = vec![
//!     AssetRecord::in_unit("Stamping"),
//!     AssetRecord::in_unit("Body Shop"),
//! ];
//! let kb = KnowledgeBase::builtin();
//! let result = generate_layout(&assets, &LayoutOptions::new("automotive", 1200.0, 800.0), &kb);
//!
//! assert_eq!(result.nodes.len(), 2);
//! assert_eq!(result.summary.production_flow_connections, 1);
//! ```

pub mod asset;
pub mod classify;
pub mod error;
pub mod inference;
pub mod knowledge;
pub mod layout;
pub mod names;
pub mod seed;

pub use asset::{parse_assets, AssetInputError, AssetRecord};
pub use classify::detect_unit_type;
pub use error::Error;
pub use inference::{infer_relationships, Relationship, RelationshipType};
pub use knowledge::{AutomationLevel, KnowledgeBase, KnowledgeBaseError};
pub use layout::{compute_orthogonal_path, LayoutConfig, LayoutOptions, LayoutResult};

/// Compute a layout with the default configuration
///
/// This is the main entry point for the library. The same assets, options and
/// knowledge base always give the same result.
pub fn generate_layout(
    assets: &[AssetRecord],
    options: &LayoutOptions,
    kb: &KnowledgeBase,
) -> LayoutResult {
    generate_layout_with_config(assets, options, kb, &LayoutConfig::default())
}

/// Compute a layout with a custom configuration
///
/// # Example
///
/// ```rust
/// use facility_layout::{generate_layout_with_config, KnowledgeBase, LayoutConfig, LayoutOptions};
///
/// let config = LayoutConfig::new().with_min_gap(40.0).with_margin(60.0);
/// let result = generate_layout_with_config(
///     &[],
///     &LayoutOptions::default(),
///     &KnowledgeBase::builtin(),
///     &config,
/// );
/// assert!(result.nodes.is_empty());
/// ```
pub fn generate_layout_with_config(
    assets: &[AssetRecord],
    options: &LayoutOptions,
    kb: &KnowledgeBase,
    config: &LayoutConfig,
) -> LayoutResult {
    layout::compute(assets, options, kb, config)
}

/// Parse a JSON asset list and lay it out with the default configuration
pub fn generate_layout_from_json(
    source: &str,
    options: &LayoutOptions,
    kb: &KnowledgeBase,
) -> Result<LayoutResult, Error> {
    let assets = parse_assets(source)?;
    Ok(generate_layout(&assets, options, kb))
}
