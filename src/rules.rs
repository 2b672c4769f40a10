//! The ordered rule passes of the incident classifier.
//!
//! Every rule looks at the same [`FrameContext`] and may return a
//! [`Finding`]. A finding's evidence flags are always kept; its label only
//! replaces the current one when it ranks strictly higher (see
//! [`IncidentKind::tier`]).

use std::fmt;

use crate::config::ClassifierConfig;
use crate::detection::{Detection, FireDetection};
use crate::geometry::{aspect_ratio, intersection_over_union};
use crate::incident::{IncidentKind, Severity};
use crate::trajectory::{TrackHistory, TrajectoryStore};

/// The slice of the world a rule gets to see for one frame.
pub struct FrameContext<'a> {
    pub vehicles: Vec<&'a Detection>,
    pub persons: Vec<&'a Detection>,
    pub fire: Option<&'a [FireDetection]>,
    pub trajectories: &'a TrajectoryStore,
}

impl<'a> FrameContext<'a> {
    /// Splits a detection batch into vehicles and persons, dropping the rest.
    pub fn partition(
        detections: &'a [Detection],
        fire: Option<&'a [FireDetection]>,
        trajectories: &'a TrajectoryStore,
    ) -> Self {
        let (vehicles, persons): (Vec<&Detection>, Vec<&Detection>) = detections
            .iter()
            .filter(|d| d.class.is_vehicle() || d.class.is_person())
            .partition(|d| d.class.is_vehicle());

        Self {
            vehicles,
            persons,
            fire,
            trajectories,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub kind: IncidentKind,
    pub severity: Severity,
    pub flags: Vec<String>,
}

impl Finding {
    fn new(kind: IncidentKind, severity: Severity) -> Self {
        Self {
            kind,
            severity,
            flags: Vec::new(),
        }
    }

    fn flagged(mut self, flag: String) -> Self {
        self.flags.push(flag);
        self
    }
}

pub trait Rule: fmt::Debug + Send {
    fn name(&self) -> &'static str;

    /// Highest tier any finding of this rule can carry. Precedence is
    /// decided by the finding's own [`IncidentKind::tier`]; this is the
    /// declared ceiling that findings are checked against.
    fn tier(&self) -> u8;

    fn evaluate(&self, frame: &FrameContext<'_>) -> Option<Finding>;
}

/// Trusts the specialized fire/smoke model above a confidence floor.
#[derive(Debug, Clone)]
pub struct FireRule {
    pub min_confidence: f32,
}

impl Rule for FireRule {
    fn name(&self) -> &'static str {
        "fire"
    }

    fn tier(&self) -> u8 {
        IncidentKind::Fire.tier()
    }

    fn evaluate(&self, frame: &FrameContext<'_>) -> Option<Finding> {
        let confidence = frame
            .fire?
            .iter()
            .map(|d| d.confidence)
            .fold(None, |best: Option<f32>, c| Some(best.map_or(c, |b| b.max(c))))?;

        if confidence <= self.min_confidence {
            return None;
        }

        Some(
            Finding::new(IncidentKind::Fire, Severity::High).flagged(format!(
                "Specialized Model: High Confidence Fire ({:.2})",
                confidence
            )),
        )
    }
}

/// Counts tracked vehicles that barely moved over their recent history.
#[derive(Debug, Clone)]
pub struct StagnancyRule {
    pub min_samples: usize,
    pub max_displacement: f32,
    pub gridlock_min: usize,
    pub congestion_min: usize,
}

impl StagnancyRule {
    fn is_stagnant(&self, history: &TrackHistory) -> bool {
        history.len() >= self.min_samples
            && history
                .displacement()
                .map_or(false, |d| d < self.max_displacement)
    }

    pub fn stagnant_count(&self, frame: &FrameContext<'_>) -> usize {
        frame
            .vehicles
            .iter()
            .filter_map(|v| v.track_id)
            .filter_map(|id| frame.trajectories.get(id))
            .filter(|h| self.is_stagnant(h))
            .count()
    }
}

impl Rule for StagnancyRule {
    fn name(&self) -> &'static str {
        "stagnancy"
    }

    fn tier(&self) -> u8 {
        IncidentKind::Gridlock.tier()
    }

    fn evaluate(&self, frame: &FrameContext<'_>) -> Option<Finding> {
        let stagnant = self.stagnant_count(frame);

        if stagnant >= self.gridlock_min {
            Some(
                Finding::new(IncidentKind::Gridlock, Severity::High).flagged(format!(
                    "Gridlock Alert: {} vehicles immobilized",
                    stagnant
                )),
            )
        } else if stagnant >= self.congestion_min {
            Some(
                Finding::new(IncidentKind::Congestion, Severity::Medium).flagged(format!(
                    "Movement Analysis: {} vehicles blocked",
                    stagnant
                )),
            )
        } else {
            None
        }
    }
}

/// Box-geometry accident cues: implausible vehicle silhouettes, overlapping
/// vehicles and people standing around vehicles.
#[derive(Debug, Clone)]
pub struct CollisionRule {
    pub max_aspect: f32,
    pub min_aspect: f32,
    pub crash_iou: f32,
    pub min_persons: usize,
}

impl CollisionRule {
    fn looks_overturned(&self, vehicle: &Detection) -> bool {
        if !vehicle.class.has_rigid_body() {
            return false;
        }

        let ar = aspect_ratio(&vehicle.bbox);
        ar > self.max_aspect || ar < self.min_aspect
    }

    pub fn crash_indicators(&self, frame: &FrameContext<'_>) -> usize {
        let vehicles = &frame.vehicles;

        (0..vehicles.len())
            .flat_map(|i| (i + 1..vehicles.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| {
                intersection_over_union(&vehicles[i].bbox, &vehicles[j].bbox) > self.crash_iou
            })
            .count()
    }
}

impl Rule for CollisionRule {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn tier(&self) -> u8 {
        IncidentKind::Overturned.tier()
    }

    fn evaluate(&self, frame: &FrameContext<'_>) -> Option<Finding> {
        let flags: Vec<String> = frame
            .vehicles
            .iter()
            .filter(|v| self.looks_overturned(v))
            .map(|v| format!("Geometric Alert: Overturned {} detected!", v.class))
            .collect();

        let overturned = !flags.is_empty();
        let crashes = self.crash_indicators(frame);
        let crowded = !frame.vehicles.is_empty() && frame.persons.len() >= self.min_persons;

        if !(overturned || crashes > 0 || crowded) {
            return None;
        }

        let kind = if overturned {
            IncidentKind::Overturned
        } else {
            IncidentKind::Accident
        };

        Some(Finding {
            kind,
            severity: Severity::High,
            flags,
        })
    }
}

/// The rule list in evaluation order.
pub fn default_rules(config: &ClassifierConfig) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(FireRule {
            min_confidence: config.fire_confidence,
        }) as Box<dyn Rule>,
        Box::new(StagnancyRule {
            min_samples: config.stagnant_min_samples,
            max_displacement: config.stagnant_max_displacement,
            gridlock_min: config.gridlock_min_vehicles,
            congestion_min: config.congestion_min_vehicles,
        }),
        Box::new(CollisionRule {
            max_aspect: config.overturned_max_aspect,
            min_aspect: config.overturned_min_aspect,
            crash_iou: config.crash_iou,
            min_persons: config.accident_min_persons,
        }),
    ]
}
