pub use glam::{DMat3, DQuat, DVec3};
pub use kurbo::Vec2;

/// Timeline frame as seen by the external animator.
///
/// Frame 0 is reserved; sample `i` of a [`crate::CameraSequence`] lives at frame `i + 1`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// First usable frame.
    pub const FIRST: Self = Self(1);

    /// Frame that shows the sample at `index`.
    pub fn from_sample_index(index: usize) -> Self {
        Self(index as u64 + 1)
    }

    /// Sample index shown at this frame, `None` for the reserved frame 0.
    pub fn sample_index(self) -> Option<usize> {
        self.0.checked_sub(1).map(|v| v as usize)
    }
}

/// Monotonic id of a loaded camera sequence.
///
/// Every reload allocates a new generation; results computed against an older generation are
/// stale and never merged with newer ones.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Generation(pub u64);

impl Generation {
    /// Generation of a sequence that has not been published by a session.
    pub const UNPUBLISHED: Self = Self(0);

    /// The generation following this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
