use chrono::{DateTime, FixedOffset};

use crate::{
    foundation::core::{DQuat, DVec3, FrameIndex},
    foundation::math::{euler_xyz_from_quat, focal_length_from_fovy},
    pose::sequence::CameraSample,
};

/// How a sample's field of view is turned into the animator's focal length.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LensMapping {
    /// Record `fovy` verbatim as the focal length.
    #[default]
    Direct,
    /// Convert with a pinhole model for a sensor of the given height in millimetres.
    SensorFit {
        /// Sensor height in millimetres.
        sensor_mm: f64,
    },
}

impl LensMapping {
    /// Focal length recorded for a vertical field of view in degrees.
    pub fn focal_length(self, fovy_deg: f64) -> f64 {
        match self {
            Self::Direct => fovy_deg,
            Self::SensorFit { sensor_mm } => focal_length_from_fovy(fovy_deg, sensor_mm),
        }
    }
}

/// Camera transform and lens state at one timeline frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CameraKeyframe {
    /// Timeline frame (`sample index + 1`).
    pub frame: FrameIndex,
    /// Camera location in scene coordinates.
    pub location: DVec3,
    /// Camera orientation.
    pub orientation: DQuat,
    /// Same orientation as X-Y-Z Euler angles in radians.
    pub rotation_euler: DVec3,
    /// Focal length under the table's [`LensMapping`].
    pub focal_length: f64,
    /// Acquisition time of the sample behind this key.
    pub timestamp: DateTime<FixedOffset>,
}

/// Interpolated camera state between keys.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Interpolated location.
    pub location: DVec3,
    /// Interpolated orientation.
    pub orientation: DQuat,
    /// Interpolated focal length.
    pub focal_length: f64,
}

/// One key per camera sample; the timing contract consumed by external animators.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct KeyframeTable {
    keys: Vec<CameraKeyframe>, // frame i + 1 at position i
    lens: LensMapping,
}

impl KeyframeTable {
    /// Build one key per sample, at frames `1..=samples.len()`.
    pub fn from_samples(samples: &[CameraSample], lens: LensMapping) -> Self {
        let keys = samples
            .iter()
            .enumerate()
            .map(|(i, s)| CameraKeyframe {
                frame: FrameIndex::from_sample_index(i),
                location: s.position,
                orientation: s.orientation,
                rotation_euler: euler_xyz_from_quat(s.orientation),
                focal_length: lens.focal_length(s.fovy_deg),
                timestamp: s.timestamp,
            })
            .collect();
        Self { keys, lens }
    }

    /// All keys, ordered by frame.
    pub fn keys(&self) -> &[CameraKeyframe] {
        &self.keys
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the table has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Lens mapping used for `focal_length`.
    pub fn lens(&self) -> LensMapping {
        self.lens
    }

    /// Key at an exact frame.
    pub fn get(&self, frame: FrameIndex) -> Option<&CameraKeyframe> {
        frame.sample_index().and_then(|i| self.keys.get(i))
    }

    /// Last keyed frame (the scene's end frame).
    pub fn frame_end(&self) -> Option<FrameIndex> {
        self.keys.last().map(|k| k.frame)
    }

    /// Camera state at a fractional frame, clamped to the keyed range.
    pub fn sample(&self, frame: f64) -> Option<CameraState> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        let f = if frame.is_nan() { first.frame.0 as f64 } else { frame };

        if f <= first.frame.0 as f64 {
            return Some(first.state());
        }
        if f >= last.frame.0 as f64 {
            return Some(last.state());
        }

        let idx = self.keys.partition_point(|k| (k.frame.0 as f64) <= f);
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let t = (f - a.frame.0 as f64) / (b.frame.0 - a.frame.0) as f64;

        Some(CameraState {
            location: a.location.lerp(b.location, t),
            orientation: a.orientation.slerp(b.orientation, t),
            focal_length: a.focal_length + (b.focal_length - a.focal_length) * t,
        })
    }
}

impl CameraKeyframe {
    fn state(&self) -> CameraState {
        CameraState {
            location: self.location,
            orientation: self.orientation,
            focal_length: self.focal_length,
        }
    }
}
