use tracing::{debug, trace};

use crate::config::ClassifierConfig;
use crate::detection::{Detection, FireDetection};
use crate::frame::Frame;
use crate::incident::{IncidentDetails, IncidentKind, IncidentRecord, Severity};
use crate::rules::{default_rules, FrameContext, Rule};
use crate::trajectory::TrajectoryStore;

/// Fuses one frame of detections, the fire model's output and the
/// trajectory history into an [`IncidentRecord`].
///
/// A classifier owns the trajectories of exactly one video session. Calls
/// must arrive in frame order; `classify` takes `&mut self`, so sharing one
/// instance between streams needs [`crate::SharedClassifier`] or, better, one
/// classifier per stream via [`crate::IncidentEngine`].
///
/// ```
/// use cityguard::bbox::BBox;
/// use cityguard::detection::{Detection, FireDetection, ObjectClass};
/// use cityguard::incident::IncidentKind;
/// use cityguard::IncidentClassifier;
///
/// let mut classifier = IncidentClassifier::default();
/// let detections = vec![Detection::new(ObjectClass::Car, BBox::ltrb(0., 0., 120., 60.), 0.9)];
/// let fire = vec![FireDetection::new(0.8)];
///
/// let record = classifier.classify(&detections, Some(&fire[..]));
/// assert_eq!(record.incident_type, IncidentKind::Fire);
/// ```
#[derive(Debug)]
pub struct IncidentClassifier {
    config: ClassifierConfig,
    trajectories: TrajectoryStore,
    rules: Vec<Box<dyn Rule>>,
}

impl IncidentClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let trajectories = TrajectoryStore::with_policy(config.history_len, config.eviction.build());

        Self::with_store(config, trajectories)
    }

    /// Uses a caller-provided store, e.g. one with a custom eviction policy.
    pub fn with_store(config: ClassifierConfig, trajectories: TrajectoryStore) -> Self {
        let rules = default_rules(&config);

        Self {
            config,
            trajectories,
            rules,
        }
    }

    #[inline]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    #[inline]
    pub fn trajectories(&self) -> &TrajectoryStore {
        &self.trajectories
    }

    /// Forgets all trajectories, e.g. when a new video starts.
    pub fn reset(&mut self) {
        self.trajectories.clear();
    }

    pub fn classify_frame(&mut self, frame: &Frame) -> IncidentRecord {
        self.classify(&frame.detections, frame.fire_detections())
    }

    pub fn classify(
        &mut self,
        detections: &[Detection],
        fire: Option<&[FireDetection]>,
    ) -> IncidentRecord {
        self.trajectories.advance_frame();

        for vehicle in detections.iter().filter(|d| d.class.is_vehicle()) {
            if let Some(track_id) = vehicle.track_id {
                self.trajectories.record(track_id, vehicle.bbox.center());
            }
        }

        self.trajectories.prune();

        let frame = FrameContext::partition(detections, fire, &self.trajectories);

        let mut record = IncidentRecord {
            incident_type: IncidentKind::Normal,
            details: IncidentDetails {
                vehicle_count: frame.vehicles.len(),
                person_count: frame.persons.len(),
                severity: Severity::Low,
                flags: Vec::new(),
            },
        };

        for rule in self.rules.iter() {
            let finding = match rule.evaluate(&frame) {
                Some(finding) => finding,
                None => continue,
            };

            debug_assert!(finding.kind.tier() <= rule.tier());

            record.details.flags.extend(finding.flags);

            if finding.kind.tier() > record.incident_type.tier() {
                trace!(
                    rule = rule.name(),
                    from = %record.incident_type,
                    to = %finding.kind,
                    "incident escalated"
                );

                record.incident_type = finding.kind;
                record.details.severity = finding.severity;
            } else {
                trace!(
                    rule = rule.name(),
                    current = %record.incident_type,
                    finding = %finding.kind,
                    "finding pre-empted"
                );
            }
        }

        debug!(
            frame = self.trajectories.frame(),
            vehicles = record.details.vehicle_count,
            persons = record.details.person_count,
            tracks = self.trajectories.len(),
            incident = %record.incident_type,
            "frame classified"
        );

        record
    }
}

impl Default for IncidentClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}
