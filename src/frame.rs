use serde_derive::{Deserialize, Serialize};

use crate::detection::{Detection, FireDetection};

/// Everything the backends reported for one image or video frame.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Stream the frame belongs to; frames without one share a default stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub detections: Vec<Detection>,
    /// `None` when no fire/smoke backend ran for this frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fire: Option<Vec<FireDetection>>,
}

impl Frame {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self {
            source: None,
            detections,
            fire: None,
        }
    }

    pub fn with_fire(mut self, fire: Vec<FireDetection>) -> Self {
        self.fire = Some(fire);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    #[inline]
    pub fn fire_detections(&self) -> Option<&[FireDetection]> {
        self.fire.as_deref()
    }
}
