//! Seams to the neural detection backends.
//!
//! Inference runs outside this crate; implementors wrap whatever runtime
//! hosts the models and translate its output into [`Detection`]s.

use crate::detection::{Detection, FireDetection};
use crate::error::Error;

/// General-purpose detector for vehicles and persons.
pub trait ObjectDetector<I: ?Sized> {
    /// With `track` set, the backend keeps tracker state between calls and
    /// fills in [`Detection::track_id`].
    fn detect(&mut self, image: &I, track: bool) -> Result<Vec<Detection>, Error>;
}

/// Specialized fire/smoke detector.
pub trait FireDetector<I: ?Sized> {
    fn detect_fire(&mut self, image: &I) -> Result<Vec<FireDetection>, Error>;
}

/// Placeholder for pipelines built without a fire model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFireModel;

impl<I: ?Sized> FireDetector<I> for NoFireModel {
    fn detect_fire(&mut self, _image: &I) -> Result<Vec<FireDetection>, Error> {
        Ok(Vec::new())
    }
}
