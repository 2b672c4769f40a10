//! Risk grading.
//!
//! The grade is recomputed from the incident tag and the vehicle count only.
//! It deliberately ignores `details.severity`: congestion escalates the
//! classifier to MEDIUM but grades LOW until more than
//! [`CONGESTION_MEDIUM_VEHICLES`] vehicles are in view.

use crate::incident::{IncidentDetails, IncidentKind, RiskLevel};

pub const CONGESTION_MEDIUM_VEHICLES: usize = 10;

pub fn grade(kind: IncidentKind, details: &IncidentDetails) -> RiskLevel {
    match kind {
        IncidentKind::Fire
        | IncidentKind::Accident
        | IncidentKind::Overturned
        | IncidentKind::Gridlock => RiskLevel::High,
        IncidentKind::Congestion if details.vehicle_count > CONGESTION_MEDIUM_VEHICLES => {
            RiskLevel::Medium
        }
        IncidentKind::Congestion | IncidentKind::Normal => RiskLevel::Low,
    }
}

/// Grades a free-text label, see [`IncidentKind::from_label`].
pub fn grade_label(label: &str, details: &IncidentDetails) -> RiskLevel {
    grade(IncidentKind::from_label(label), details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn congestion_depends_on_vehicle_count() {
        assert_eq!(
            grade_label("Traffic Congestion", &IncidentDetails::with_vehicle_count(15)),
            RiskLevel::Medium
        );
        assert_eq!(
            grade_label("Traffic Congestion", &IncidentDetails::with_vehicle_count(3)),
            RiskLevel::Low
        );
        assert_eq!(
            grade(IncidentKind::Congestion, &IncidentDetails::with_vehicle_count(10)),
            RiskLevel::Low
        );
    }

    #[test]
    fn emergencies_are_high() {
        let empty = IncidentDetails::default();

        assert_eq!(grade_label("Severe Traffic Gridlock", &empty), RiskLevel::High);
        assert_eq!(grade_label("Critical: Active Fire/Smoke Detected", &empty), RiskLevel::High);
        assert_eq!(grade_label("Severe Emergency: Overturned Vehicle", &empty), RiskLevel::High);
        assert_eq!(grade_label("Debris on carriageway", &empty), RiskLevel::High);
        assert_eq!(grade(IncidentKind::Accident, &empty), RiskLevel::High);
    }

    #[test]
    fn normal_is_low_regardless_of_count() {
        assert_eq!(
            grade(IncidentKind::Normal, &IncidentDetails::with_vehicle_count(50)),
            RiskLevel::Low
        );
        assert_eq!(grade_label("", &IncidentDetails::default()), RiskLevel::Low);
    }
}
