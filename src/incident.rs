use serde_derive::{Deserialize, Serialize};
use std::fmt;

use crate::risk;

/// The fixed incident taxonomy. Serialized as the human-readable label.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentKind {
    #[serde(rename = "Normal Traffic")]
    Normal,
    #[serde(rename = "Traffic Congestion")]
    Congestion,
    #[serde(rename = "Critical Traffic Accident")]
    Accident,
    #[serde(rename = "Severe Emergency: Overturned Vehicle")]
    Overturned,
    #[serde(rename = "Severe Traffic Gridlock")]
    Gridlock,
    #[serde(rename = "Critical: Active Fire/Smoke Detected")]
    Fire,
}

impl IncidentKind {
    pub fn label(&self) -> &'static str {
        match self {
            IncidentKind::Normal => "Normal Traffic",
            IncidentKind::Congestion => "Traffic Congestion",
            IncidentKind::Accident => "Critical Traffic Accident",
            IncidentKind::Overturned => "Severe Emergency: Overturned Vehicle",
            IncidentKind::Gridlock => "Severe Traffic Gridlock",
            IncidentKind::Fire => "Critical: Active Fire/Smoke Detected",
        }
    }

    /// Precedence rank. A rule may only replace a label of strictly lower tier.
    #[inline]
    pub fn tier(&self) -> u8 {
        match self {
            IncidentKind::Normal => 0,
            IncidentKind::Congestion => 1,
            IncidentKind::Accident | IncidentKind::Overturned => 2,
            IncidentKind::Gridlock => 3,
            IncidentKind::Fire => 4,
        }
    }

    /// Categorizes free text (case-insensitive keyword search).
    ///
    /// Keywords are tried in a fixed order, so "overturned after fire" is
    /// still [`IncidentKind::Fire`]. "wreckage" and "debris" count as
    /// accidents; anything unrecognised is [`IncidentKind::Normal`].
    pub fn from_label(label: &str) -> Self {
        const KEYWORDS: [(&str, IncidentKind); 7] = [
            ("fire", IncidentKind::Fire),
            ("accident", IncidentKind::Accident),
            ("overturned", IncidentKind::Overturned),
            ("wreckage", IncidentKind::Accident),
            ("debris", IncidentKind::Accident),
            ("gridlock", IncidentKind::Gridlock),
            ("congestion", IncidentKind::Congestion),
        ];

        let label = label.to_lowercase();

        KEYWORDS
            .iter()
            .find(|(word, _)| label.contains(word))
            .map(|(_, kind)| *kind)
            .unwrap_or(IncidentKind::Normal)
    }
}

impl Default for IncidentKind {
    fn default() -> Self {
        IncidentKind::Normal
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Three-tier level used both for the classifier's escalation and the
/// externally exposed risk grade.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Low
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type RiskLevel = Severity;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct IncidentDetails {
    pub vehicle_count: usize,
    pub person_count: usize,
    pub severity: Severity,
    pub flags: Vec<String>,
}

impl IncidentDetails {
    pub fn with_vehicle_count(vehicle_count: usize) -> Self {
        Self {
            vehicle_count,
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentRecord {
    pub incident_type: IncidentKind,
    pub details: IncidentDetails,
}

impl IncidentRecord {
    #[inline]
    pub fn label(&self) -> &'static str {
        self.incident_type.label()
    }

    /// The externally exposed risk level; see [`risk::grade`].
    #[inline]
    pub fn risk(&self) -> RiskLevel {
        risk::grade(self.incident_type, &self.details)
    }
}
