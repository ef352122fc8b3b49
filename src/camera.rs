use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

pub use crate::ids::CameraId;

/// A fixed traffic camera. Immutable once loaded from the manifest.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub id: CameraId,
    pub location: Point<f64>,
    pub heading: Option<f64>, // Degrees clockwise from north
    pub fov: Option<f64>,     // Field of view in degrees
    pub priority: f64,        // Zone weight under the `weighted` scoring scheme
    pub name: Option<String>,
}

impl Camera {
    /// Create a camera with default metadata (priority 1).
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: CameraId(id),
            location: Point::new(x, y),
            heading: None,
            fov: None,
            priority: 1.0,
            name: None,
        }
    }

    /// Set the priority weight.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    #[inline] pub fn coord(&self) -> Coord<f64> { self.location.0 }
}

/// One manifest record. Geographic manifests use `lat`/`lon`, planar ones `x`/`y`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraRecord {
    pub id: CameraId,
    #[serde(alias = "x", alias = "longitude")]
    pub lon: f64,
    #[serde(alias = "y", alias = "latitude")]
    pub lat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<CameraRecord> for Camera {
    fn from(record: CameraRecord) -> Self {
        Self {
            id: record.id,
            location: Point::new(record.lon, record.lat),
            heading: record.heading,
            fov: record.fov,
            priority: record.priority.unwrap_or(1.0),
            name: record.name,
        }
    }
}
