use std::fmt;

use crate::config::GenerationConfig;
use crate::error::Error;
use crate::incident::{IncidentKind, IncidentRecord, RiskLevel};

/// Instruction text handed to a report generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPrompt {
    pub kind: IncidentKind,
    pub risk: RiskLevel,
    pub text: String,
}

impl ReportPrompt {
    pub fn build(record: &IncidentRecord, risk: RiskLevel) -> Self {
        let details = &record.details;

        let text = match record.incident_type {
            IncidentKind::Normal => format!(
                "TASK: Act as a Smart City Traffic Monitor. Write a professional report. \
                 CONTEXT: {} vehicles detected, traffic flow is stable.",
                details.vehicle_count
            ),
            IncidentKind::Congestion | IncidentKind::Gridlock => format!(
                "TASK: Urban Safety Alert. Write an urgent congestion report. \
                 CONTEXT: {} vehicles detected. Congestion is high. RISK: {}.",
                details.vehicle_count, risk
            ),
            IncidentKind::Accident | IncidentKind::Overturned => {
                let cues = if details.flags.is_empty() {
                    String::new()
                } else {
                    format!(" VISUAL CUES: {}.", details.flags.join(", "))
                };

                format!(
                    "TASK: Emergency Management System. Write a CRITICAL incident report. \
                     CONTEXT: A severe incident ({}) has occurred.{} {} vehicles and {} persons present. \
                     RISK: {}.",
                    record.incident_type, cues, details.vehicle_count, details.person_count, risk
                )
            }
            IncidentKind::Fire => format!(
                "TASK: Safety Warning. Write a critical alert for public safety. \
                 CONTEXT: Fire/Smoke detected on camera. RISK: {}.",
                risk
            ),
        };

        Self {
            kind: record.incident_type,
            risk,
            text,
        }
    }
}

impl fmt::Display for ReportPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Turns a prompt into prose. Implemented outside this crate on top of a
/// language model.
pub trait ReportGenerator {
    fn generate(&self, prompt: &ReportPrompt, params: &GenerationConfig) -> Result<String, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::{IncidentDetails, Severity};

    fn record(kind: IncidentKind, flags: &[&str]) -> IncidentRecord {
        IncidentRecord {
            incident_type: kind,
            details: IncidentDetails {
                vehicle_count: 6,
                person_count: 3,
                severity: Severity::High,
                flags: flags.iter().map(|f| f.to_string()).collect(),
            },
        }
    }

    #[test]
    fn normal_prompt_reports_vehicle_count() {
        let prompt = ReportPrompt::build(&record(IncidentKind::Normal, &[]), RiskLevel::Low);

        assert_eq!(
            prompt.text,
            "TASK: Act as a Smart City Traffic Monitor. Write a professional report. \
             CONTEXT: 6 vehicles detected, traffic flow is stable."
        );
    }

    #[test]
    fn accident_prompt_lists_visual_cues() {
        let prompt = ReportPrompt::build(
            &record(
                IncidentKind::Overturned,
                &["Geometric Alert: Overturned car detected!", "Geometric Alert: Overturned bus detected!"],
            ),
            RiskLevel::High,
        );

        assert_eq!(
            prompt.text,
            "TASK: Emergency Management System. Write a CRITICAL incident report. \
             CONTEXT: A severe incident (Severe Emergency: Overturned Vehicle) has occurred. \
             VISUAL CUES: Geometric Alert: Overturned car detected!, Geometric Alert: Overturned bus detected!. \
             6 vehicles and 3 persons present. RISK: HIGH."
        );
    }

    #[test]
    fn accident_prompt_without_cues() {
        let prompt = ReportPrompt::build(&record(IncidentKind::Accident, &[]), RiskLevel::High);

        assert!(prompt
            .text
            .contains("(Critical Traffic Accident) has occurred. 6 vehicles and 3 persons present."));
    }

    #[test]
    fn gridlock_uses_congestion_template() {
        let prompt = ReportPrompt::build(&record(IncidentKind::Gridlock, &[]), RiskLevel::High);

        assert!(prompt.text.starts_with("TASK: Urban Safety Alert."));
        assert!(prompt.text.ends_with("RISK: HIGH."));
    }

    #[test]
    fn fire_prompt_carries_risk() {
        let prompt = ReportPrompt::build(&record(IncidentKind::Fire, &[]), RiskLevel::High);

        assert_eq!(prompt.to_string(), prompt.text);
        assert!(prompt.text.contains("Fire/Smoke detected on camera. RISK: HIGH."));
    }
}
