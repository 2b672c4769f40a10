use serde_derive::Serialize;
use tracing::{debug, warn};

use crate::classifier::IncidentClassifier;
use crate::config::{Config, GenerationConfig, PipelineConfig};
use crate::detector::{FireDetector, NoFireModel, ObjectDetector};
use crate::error::Error;
use crate::incident::{IncidentRecord, RiskLevel};
use crate::report::{ReportGenerator, ReportPrompt};

/// A classified frame together with its externally exposed risk level.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    #[serde(flatten)]
    pub record: IncidentRecord,
    pub risk: RiskLevel,
}

impl From<IncidentRecord> for Assessment {
    fn from(record: IncidentRecord) -> Self {
        let risk = record.risk();

        Self { record, risk }
    }
}

/// Image in, assessment out: runs both detectors, classifies and grades.
pub struct IncidentPipeline<D, F = NoFireModel> {
    detector: D,
    fire: Option<F>,
    classifier: IncidentClassifier,
    config: PipelineConfig,
    generation: GenerationConfig,
}

impl<D> IncidentPipeline<D, NoFireModel> {
    pub fn without_fire(detector: D, config: &Config) -> Self {
        Self::new(detector, None, config)
    }
}

impl<D, F> IncidentPipeline<D, F> {
    pub fn new(detector: D, fire: Option<F>, config: &Config) -> Self {
        if fire.is_none() {
            warn!("no fire/smoke model configured, fire analysis disabled");
        }

        Self {
            detector,
            fire,
            classifier: IncidentClassifier::new(config.classifier.clone()),
            config: config.pipeline.clone(),
            generation: config.report.clone(),
        }
    }

    #[inline]
    pub fn classifier(&self) -> &IncidentClassifier {
        &self.classifier
    }

    #[inline]
    pub fn classifier_mut(&mut self) -> &mut IncidentClassifier {
        &mut self.classifier
    }

    /// Pass `track = true` for consecutive video frames so that stagnancy
    /// can be measured; single images should not be tracked.
    pub fn analyze<I>(&mut self, image: &I, track: bool) -> Result<Assessment, Error>
    where
        I: ?Sized,
        D: ObjectDetector<I>,
        F: FireDetector<I>,
    {
        let min_conf = self.config.detection_confidence;
        let mut detections = self.detector.detect(image, track)?;
        detections.retain(|d| d.confidence >= min_conf);

        let fire = match self.fire.as_mut() {
            Some(model) => {
                let min_conf = self.config.fire_confidence;
                let mut found = model.detect_fire(image)?;
                found.retain(|d| d.confidence >= min_conf);

                Some(found)
            }
            None => None,
        };

        let record = self.classifier.classify(&detections, fire.as_deref());
        let assessment = Assessment::from(record);

        debug!(
            detections = detections.len(),
            incident = %assessment.record.incident_type,
            risk = %assessment.risk,
            "image analyzed"
        );

        Ok(assessment)
    }

    pub fn report<G: ReportGenerator + ?Sized>(
        &self,
        assessment: &Assessment,
        generator: &G,
    ) -> Result<String, Error> {
        let prompt = ReportPrompt::build(&assessment.record, assessment.risk);

        generator.generate(&prompt, &self.generation)
    }
}
