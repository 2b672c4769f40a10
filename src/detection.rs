use serde_derive::{Deserialize, Serialize};
use std::fmt;

use crate::bbox::{BBox, Ltrb};

/// Semantic category of a detection, decoded from its COCO class id.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "i32", into = "i32")]
pub enum ObjectClass {
    Person,
    Car,
    Motorcycle,
    Bus,
    Truck,
    Other(i32),
}

impl ObjectClass {
    #[inline]
    pub fn is_vehicle(&self) -> bool {
        matches!(
            self,
            ObjectClass::Car | ObjectClass::Motorcycle | ObjectClass::Bus | ObjectClass::Truck
        )
    }

    #[inline]
    pub fn is_person(&self) -> bool {
        matches!(self, ObjectClass::Person)
    }

    /// Classes whose upright silhouette is predictable enough for the
    /// overturned-vehicle heuristic. Motorcycles are excluded.
    #[inline]
    pub fn has_rigid_body(&self) -> bool {
        matches!(self, ObjectClass::Car | ObjectClass::Bus | ObjectClass::Truck)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObjectClass::Person => "person",
            ObjectClass::Car => "car",
            ObjectClass::Motorcycle => "motorcycle",
            ObjectClass::Bus => "bus",
            ObjectClass::Truck => "truck",
            ObjectClass::Other(_) => "object",
        }
    }
}

impl From<i32> for ObjectClass {
    fn from(id: i32) -> Self {
        match id {
            0 => ObjectClass::Person,
            2 => ObjectClass::Car,
            3 => ObjectClass::Motorcycle,
            5 => ObjectClass::Bus,
            7 => ObjectClass::Truck,
            other => ObjectClass::Other(other),
        }
    }
}

impl From<ObjectClass> for i32 {
    fn from(class: ObjectClass) -> Self {
        match class {
            ObjectClass::Person => 0,
            ObjectClass::Car => 2,
            ObjectClass::Motorcycle => 3,
            ObjectClass::Bus => 5,
            ObjectClass::Truck => 7,
            ObjectClass::Other(id) => id,
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One object observed by the general-purpose detector in a frame.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    #[serde(alias = "c")]
    pub class: ObjectClass,
    #[serde(rename = "box")]
    pub bbox: BBox<Ltrb>,
    #[serde(alias = "p")]
    pub confidence: f32,
    // Only present when the backend ran in tracking mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<u32>,
}

impl Detection {
    pub fn new(class: impl Into<ObjectClass>, bbox: BBox<Ltrb>, confidence: f32) -> Self {
        Self {
            class: class.into(),
            bbox,
            confidence,
            track_id: None,
        }
    }

    pub fn with_track_id(mut self, track_id: u32) -> Self {
        self.track_id = Some(track_id);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(from = "i32", into = "i32")]
pub enum FireClass {
    Fire,
    Smoke,
    Other(i32),
}

impl From<i32> for FireClass {
    fn from(id: i32) -> Self {
        match id {
            0 => FireClass::Fire,
            1 => FireClass::Smoke,
            other => FireClass::Other(other),
        }
    }
}

impl From<FireClass> for i32 {
    fn from(class: FireClass) -> Self {
        match class {
            FireClass::Fire => 0,
            FireClass::Smoke => 1,
            FireClass::Other(id) => id,
        }
    }
}

/// Output of the specialized fire/smoke detector. Only the confidence takes
/// part in classification.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FireDetection {
    #[serde(alias = "p")]
    pub confidence: f32,
    #[serde(default = "default_fire_class", alias = "c")]
    pub class: FireClass,
    #[serde(default, rename = "box", skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox<Ltrb>>,
}

fn default_fire_class() -> FireClass {
    FireClass::Fire
}

impl FireDetection {
    pub fn new(confidence: f32) -> Self {
        Self {
            confidence,
            class: FireClass::Fire,
            bbox: None,
        }
    }
}
