use std::ops::Range;

use crate::{
    foundation::core::{DVec3, Generation, Vec2},
    foundation::error::{LightFieldError, LightFieldResult},
    pose::sequence::CameraSequence,
};

/// Scene axis along which the focus offset displaces camera rigs.
///
/// This is the Y-up frame's Y axis, the target of the ingestion axis swap.
pub const LATERAL_AXIS: DVec3 = DVec3::Y;

/// Largest accepted focus magnitude; larger values are clamped.
pub const FOCUS_LIMIT: f64 = 100.0;

/// Where a window starts relative to the timeline position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowProfile {
    /// Window starts at `start_index + 1`.
    #[default]
    FromNext,
    /// Window starts at `start_index`.
    FromCurrent,
}

impl WindowProfile {
    fn first_index(self, start_index: usize) -> usize {
        match self {
            Self::FromNext => start_index.saturating_add(1),
            Self::FromCurrent => start_index,
        }
    }
}

/// How the focus value turns into per-entry displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusModel {
    /// Every entry's rig moves by `focus * LATERAL_AXIS`.
    #[default]
    UniformShift,
    /// Rigs stay put; rendered buffers are shifted horizontally by `focus * factor * j`
    /// pixels, `j` being the entry's position in the window.
    PixelShift {
        /// Pixels per window step per unit of focus.
        factor: f64,
    },
}

/// Window width, focus and strategy for one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FocusWindowSpec {
    /// Number of neighbouring samples, at least 1.
    pub window_width: usize,
    /// Signed focus displacement, clamped to `[-FOCUS_LIMIT, FOCUS_LIMIT]`.
    pub focus_offset: f64,
    /// Window start policy.
    pub profile: WindowProfile,
    /// Displacement strategy.
    pub model: FocusModel,
}

impl Default for FocusWindowSpec {
    fn default() -> Self {
        Self {
            window_width: 1,
            focus_offset: 0.0,
            profile: WindowProfile::FromNext,
            model: FocusModel::UniformShift,
        }
    }
}

impl FocusWindowSpec {
    /// From-next, uniform-shift window of the given width and focus.
    pub fn new(window_width: usize, focus_offset: f64) -> LightFieldResult<Self> {
        let spec = Self {
            window_width,
            focus_offset,
            ..Self::default()
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check width and focus; focus magnitude is clamped later, not rejected.
    pub fn validate(&self) -> LightFieldResult<()> {
        if self.window_width == 0 {
            return Err(LightFieldError::validation("window_width must be >= 1"));
        }
        if !self.focus_offset.is_finite() {
            return Err(LightFieldError::validation("focus_offset must be finite"));
        }
        if let FocusModel::PixelShift { factor } = self.model
            && !factor.is_finite()
        {
            return Err(LightFieldError::validation(
                "pixel shift factor must be finite",
            ));
        }
        Ok(())
    }

    /// Focus after clamping to the accepted range.
    pub fn clamped_focus(&self) -> f64 {
        clamp_focus(self.focus_offset)
    }
}

/// One windowed sample and the displacement it receives.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct WindowEntry {
    /// Index into the camera sequence.
    pub sample_index: usize,
    /// Rig displacement in scene units.
    pub spatial_offset: DVec3,
    /// Image-space shift applied after rendering, in pixels.
    pub pixel_shift: Vec2,
}

/// Ordered samples that take part in one blend.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WindowResult {
    /// Generation of the sequence the window was computed against.
    pub generation: Generation,
    /// Timeline position the window was computed for.
    pub start_index: usize,
    /// Requested width before clipping.
    pub nominal_width: usize,
    /// Entries in window order.
    pub entries: Vec<WindowEntry>,
}

impl WindowResult {
    /// Number of samples actually used after clipping.
    pub fn actual_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to blend.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sample indices in window order.
    pub fn sample_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|e| e.sample_index)
    }
}

/// Sample indices covered by a window, clipped to `0..len`.
pub fn window_range(
    len: usize,
    start_index: usize,
    window_width: usize,
    profile: WindowProfile,
) -> Range<usize> {
    let first = profile.first_index(start_index).min(len);
    let end = first.saturating_add(window_width).min(len);
    first..end
}

/// Compute the focal window at `start_index`.
///
/// Never indexes past the last sample; an exhausted window comes back empty.
pub fn compute_window(
    sequence: &CameraSequence,
    start_index: usize,
    spec: &FocusWindowSpec,
) -> WindowResult {
    let range = window_range(
        sequence.len(),
        start_index,
        spec.window_width,
        spec.profile,
    );
    let focus = spec.clamped_focus();

    let entries = range
        .enumerate()
        .map(|(j, sample_index)| match spec.model {
            FocusModel::UniformShift => WindowEntry {
                sample_index,
                spatial_offset: LATERAL_AXIS * focus,
                pixel_shift: Vec2::ZERO,
            },
            FocusModel::PixelShift { factor } => WindowEntry {
                sample_index,
                spatial_offset: DVec3::ZERO,
                pixel_shift: Vec2::new(focus * factor * j as f64, 0.0),
            },
        })
        .collect::<Vec<_>>();

    if entries.len() < spec.window_width {
        tracing::debug!(
            start_index,
            nominal = spec.window_width,
            actual = entries.len(),
            "focal window clipped at sequence end"
        );
    }

    WindowResult {
        generation: sequence.generation(),
        start_index,
        nominal_width: spec.window_width,
        entries,
    }
}

/// Translate `base_position` by the clamped focus along [`LATERAL_AXIS`].
pub fn compute_offset(focus_value: f64, base_position: DVec3) -> DVec3 {
    base_position + LATERAL_AXIS * clamp_focus(focus_value)
}

fn clamp_focus(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(-FOCUS_LIMIT, FOCUS_LIMIT)
}

#[cfg(test)]
#[path = "../../tests/unit/window/focus.rs"]
mod tests;
