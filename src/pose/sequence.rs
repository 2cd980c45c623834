use chrono::{DateTime, FixedOffset};

use crate::foundation::core::{DQuat, DVec3, FrameIndex, Generation};

/// Lens defaults used when a pose record does not carry them.
pub const DEFAULT_ASPECT: f64 = 1.0;
/// Default near clip distance.
pub const DEFAULT_NEAR: f64 = 0.5;
/// Default far clip distance.
pub const DEFAULT_FAR: f64 = 100.0;

/// One reconstructed camera pose.
///
/// `position` is already in the Y-up scene frame; see [`crate::remap_z_up_to_y_up`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CameraSample {
    /// Vertical field of view in degrees.
    pub fovy_deg: f64,
    /// Aspect ratio (width / height).
    pub aspect: f64,
    /// Near clip distance.
    pub near: f64,
    /// Far clip distance.
    pub far: f64,
    /// Camera position in scene coordinates.
    pub position: DVec3,
    /// Unit orientation quaternion.
    pub orientation: DQuat,
    /// Source image identifier (file name relative to the image root).
    pub image_file: String,
    /// Acquisition time.
    pub timestamp: DateTime<FixedOffset>,
}

/// Ordered, index-addressable camera samples from one load.
///
/// Indices are dense (`0..len`) and sample `i` is shown at timeline frame `i + 1`.
#[derive(Clone, Debug, serde::Serialize)]
pub struct CameraSequence {
    generation: Generation,
    samples: Vec<CameraSample>,
}

impl CameraSequence {
    /// Wrap parsed samples; the sequence is unpublished until a session stamps it.
    pub fn new(samples: Vec<CameraSample>) -> Self {
        Self {
            generation: Generation::UNPUBLISHED,
            samples,
        }
    }

    /// Same samples under a new generation id.
    pub fn stamped(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    /// Generation this sequence was published under.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `index`.
    pub fn get(&self, index: usize) -> Option<&CameraSample> {
        self.samples.get(index)
    }

    /// All samples in acquisition order.
    pub fn samples(&self) -> &[CameraSample] {
        &self.samples
    }

    /// Iterate samples in acquisition order.
    pub fn iter(&self) -> std::slice::Iter<'_, CameraSample> {
        self.samples.iter()
    }

    /// Sample shown at a timeline frame.
    pub fn at_frame(&self, frame: FrameIndex) -> Option<&CameraSample> {
        frame.sample_index().and_then(|i| self.samples.get(i))
    }

    /// Last usable timeline frame, `None` when empty.
    pub fn frame_end(&self) -> Option<FrameIndex> {
        self.samples
            .len()
            .checked_sub(1)
            .map(FrameIndex::from_sample_index)
    }

    /// Time between first and last sample.
    pub fn time_span(&self) -> Option<chrono::TimeDelta> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some(last.timestamp - first.timestamp)
    }
}

impl<'a> IntoIterator for &'a CameraSequence {
    type Item = &'a CameraSample;
    type IntoIter = std::slice::Iter<'a, CameraSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
