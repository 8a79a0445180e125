//! Automation hierarchy levels (process/field through enterprise)

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five automation-hierarchy levels, 0 (field) to 4 (enterprise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AutomationLevel {
    /// Level 0: sensors, actuators, drives
    #[default]
    Process,
    /// Level 1: PLCs, DCS controllers, RTUs
    Control,
    /// Level 2: HMIs, SCADA, engineering workstations
    Supervisory,
    /// Level 3: historians, MES, site servers
    Operations,
    /// Level 4: ERP, email, business network
    Enterprise,
}

/// Device-type keywords per level, checked in level order; first hit wins.
const DEVICE_KEYWORDS: [(AutomationLevel, &[&str]); 5] = [
    (
        AutomationLevel::Process,
        &["sensor", "actuator", "valve", "drive"],
    ),
    (
        AutomationLevel::Control,
        &["plc", "dcs", "controller", "rtu"],
    ),
    (
        AutomationLevel::Supervisory,
        &["hmi", "scada", "workstation", "camera"],
    ),
    (
        AutomationLevel::Operations,
        &["historian", "mes", "server"],
    ),
    (AutomationLevel::Enterprise, &["erp", "email"]),
];

impl AutomationLevel {
    /// All levels in ascending order
    pub const ALL: [AutomationLevel; 5] = [
        AutomationLevel::Process,
        AutomationLevel::Control,
        AutomationLevel::Supervisory,
        AutomationLevel::Operations,
        AutomationLevel::Enterprise,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        match self {
            AutomationLevel::Process => 0,
            AutomationLevel::Control => 1,
            AutomationLevel::Supervisory => 2,
            AutomationLevel::Operations => 3,
            AutomationLevel::Enterprise => 4,
        }
    }

    /// Zone label shown on boundaries
    pub fn label(self) -> &'static str {
        match self {
            AutomationLevel::Process => "Level 0 - Process",
            AutomationLevel::Control => "Level 1 - Basic Control",
            AutomationLevel::Supervisory => "Level 2 - Supervisory Control",
            AutomationLevel::Operations => "Level 3 - Site Operations",
            AutomationLevel::Enterprise => "Level 4 - Enterprise",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AutomationLevel::Process => "#4caf50",
            AutomationLevel::Control => "#2196f3",
            AutomationLevel::Supervisory => "#ff9800",
            AutomationLevel::Operations => "#9c27b0",
            AutomationLevel::Enterprise => "#f44336",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AutomationLevel::Process => "Field devices: sensors, actuators, valves and drives",
            AutomationLevel::Control => "Controllers: PLCs, DCS and RTUs",
            AutomationLevel::Supervisory => "Operator supervision: HMIs, SCADA and workstations",
            AutomationLevel::Operations => "Site operations: historians, MES and servers",
            AutomationLevel::Enterprise => "Business systems: ERP and email",
        }
    }

    /// Classify a free-text device type by keyword; unknown devices are level 0
    pub fn classify_device(device_type: &str) -> Self {
        let lowered = device_type.to_lowercase();
        DEVICE_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|(level, _)| *level)
            .unwrap_or(AutomationLevel::Process)
    }
}

impl TryFrom<u8> for AutomationLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value)
            .ok_or_else(|| format!("automation level {} out of range 0..=4", value))
    }
}

impl From<AutomationLevel> for u8 {
    fn from(level: AutomationLevel) -> Self {
        level.index()
    }
}

impl fmt::Display for AutomationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for level in AutomationLevel::ALL {
            assert_eq!(AutomationLevel::from_index(level.index()), Some(level));
        }
        assert_eq!(AutomationLevel::from_index(5), None);
    }

    #[test]
    fn test_classify_device_keywords() {
        assert_eq!(
            AutomationLevel::classify_device("Pressure Sensor"),
            AutomationLevel::Process
        );
        assert_eq!(
            AutomationLevel::classify_device("Siemens PLC"),
            AutomationLevel::Control
        );
        assert_eq!(
            AutomationLevel::classify_device("Operator HMI"),
            AutomationLevel::Supervisory
        );
        assert_eq!(
            AutomationLevel::classify_device("OSIsoft Historian"),
            AutomationLevel::Operations
        );
        assert_eq!(
            AutomationLevel::classify_device("ERP gateway"),
            AutomationLevel::Enterprise
        );
    }

    #[test]
    fn test_classify_device_first_level_wins() {
        // "SCADA server" hits both level 2 and level 3 keywords
        assert_eq!(
            AutomationLevel::classify_device("SCADA server"),
            AutomationLevel::Supervisory
        );
    }

    #[test]
    fn test_classify_unknown_defaults_to_process() {
        assert_eq!(AutomationLevel::classify_device(""), AutomationLevel::Process);
        assert_eq!(
            AutomationLevel::classify_device("mystery box"),
            AutomationLevel::Process
        );
    }

    #[test]
    fn test_try_from_out_of_range() {
        assert!(AutomationLevel::try_from(7u8).is_err());
        assert_eq!(AutomationLevel::try_from(3u8), Ok(AutomationLevel::Operations));
    }
}
