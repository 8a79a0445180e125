//! Asset records as handed over by the canonization stage
//!
//! Every field is optional. Accessors apply the defaulting rules so the rest of
//! the pipeline never has to look at `None`.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unit name used when a record carries no unit, area or location.
pub const UNASSIGNED_UNIT: &str = "unassigned";

/// Errors that can occur when reading an asset list
#[derive(Error, Debug)]
pub enum AssetInputError {
    #[error("Failed to read asset input: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse asset JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One industrial asset (PLC, sensor, HMI, server, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRecord {
    #[serde(alias = "Unit", alias = "process_unit")]
    pub unit: Option<String>,
    #[serde(alias = "Area")]
    pub area: Option<String>,
    #[serde(alias = "Location", alias = "site")]
    pub location: Option<String>,
    #[serde(alias = "ipAddress", alias = "ip", alias = "IP")]
    pub ip_address: Option<String>,
    #[serde(alias = "tagId", alias = "tag", alias = "Tag")]
    pub tag_id: Option<String>,
    #[serde(alias = "deviceType", alias = "type", alias = "asset_type")]
    pub device_type: Option<String>,
}

impl AssetRecord {
    /// Start a record for the given unit
    pub fn in_unit(unit: impl Into<String>) -> Self {
        Self {
            unit: Some(unit.into()),
            ..Self::default()
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag_id = Some(tag.into());
        self
    }

    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    /// Raw unit label: unit, then area, then location, skipping blanks
    pub fn unit_label(&self) -> &str {
        [&self.unit, &self.area, &self.location]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(UNASSIGNED_UNIT)
    }

    pub fn ip(&self) -> &str {
        self.ip_address.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn tag(&self) -> &str {
        self.tag_id.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn device(&self) -> &str {
        self.device_type.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Read a JSON array of asset records from a file
pub fn read_assets_file(path: &Path) -> Result<Vec<AssetRecord>, AssetInputError> {
    let content = std::fs::read_to_string(path)?;
    parse_assets(&content)
}

/// Read a JSON array of asset records from any reader (e.g. stdin)
pub fn read_assets<R: Read>(mut reader: R) -> Result<Vec<AssetRecord>, AssetInputError> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    parse_assets(&buffer)
}

/// Parse a JSON array of asset records
pub fn parse_assets(content: &str) -> Result<Vec<AssetRecord>, AssetInputError> {
    Ok(serde_json::from_str(content)?)
}
