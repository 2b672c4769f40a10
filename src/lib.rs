pub mod bbox;
pub mod classifier;
pub mod config;
pub mod detection;
pub mod detector;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod incident;
pub mod pipeline;
pub mod report;
pub mod risk;
pub mod rules;
pub mod trajectory;

mod circular_queue;

pub use classifier::IncidentClassifier;
pub use config::{ClassifierConfig, Config};
pub use detection::{Detection, FireDetection, ObjectClass};
pub use frame::Frame;
pub use incident::{IncidentDetails, IncidentKind, IncidentRecord, RiskLevel, Severity};
pub use pipeline::{Assessment, IncidentPipeline};

use error::Error;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Stream name used for frames that do not carry one.
pub const DEFAULT_SOURCE: &str = "default";

pub trait Classifying {
    fn classify(&mut self, frame: &Frame, src: &str) -> Result<IncidentRecord, Error>;
    fn reset(&mut self, src: &str);
}

/// Keeps one classifier per stream so that trajectories of parallel
/// cameras never mix.
pub struct IncidentEngine {
    config: ClassifierConfig,
    sources: HashMap<String, IncidentClassifier>,
}

impl IncidentEngine {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            sources: HashMap::new(),
        }
    }

    pub fn classify_frame(&mut self, frame: &Frame) -> IncidentRecord {
        let src = frame.source.as_deref().unwrap_or(DEFAULT_SOURCE);

        self.classifier_for(src).classify_frame(frame)
    }

    pub fn classifier_for(&mut self, src: &str) -> &mut IncidentClassifier {
        if !self.sources.contains_key(src) {
            info!(source = src, "new stream");
        }

        let config = &self.config;
        self.sources
            .entry(src.to_string())
            .or_insert_with(|| IncidentClassifier::new(config.clone()))
    }

    /// Drops a finished stream together with its trajectories.
    pub fn remove(&mut self, src: &str) -> Option<IncidentClassifier> {
        self.sources.remove(src)
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

impl Default for IncidentEngine {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl Classifying for IncidentEngine {
    #[inline]
    fn classify(&mut self, frame: &Frame, src: &str) -> Result<IncidentRecord, Error> {
        Ok(self.classifier_for(src).classify_frame(frame))
    }

    fn reset(&mut self, src: &str) {
        if let Some(classifier) = self.sources.get_mut(src) {
            classifier.reset();
        }
    }
}

/// One classifier shared between threads. Frames are processed one at a
/// time under the lock; `src` is ignored since all callers share the same
/// trajectories.
#[derive(Clone)]
pub struct SharedClassifier {
    inner: Arc<Mutex<IncidentClassifier>>,
}

impl SharedClassifier {
    pub fn new(classifier: IncidentClassifier) -> Self {
        Self {
            inner: Arc::new(Mutex::new(classifier)),
        }
    }

    pub fn classify(&self, frame: &Frame) -> Result<IncidentRecord, Error> {
        let mut classifier = self.inner.lock().map_err(|_| Error::Poisoned)?;

        Ok(classifier.classify_frame(frame))
    }
}

impl Classifying for SharedClassifier {
    #[inline]
    fn classify(&mut self, frame: &Frame, _src: &str) -> Result<IncidentRecord, Error> {
        SharedClassifier::classify(self, frame)
    }

    /// Clears the shared trajectories. A lock poisoned by a panicking caller
    /// is recovered here, since an emptied store is consistent whatever the
    /// panic left behind.
    fn reset(&mut self, _src: &str) {
        let mut classifier = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        classifier.reset();
        drop(classifier);

        self.inner.clear_poison();
    }
}
