pub(crate) mod keyframes;
pub(crate) mod path;

use crate::{
    foundation::core::{DVec3, Generation},
    foundation::error::{LightFieldError, LightFieldResult},
    pose::sequence::CameraSequence,
    trajectory::keyframes::{KeyframeTable, LensMapping},
    trajectory::path::TrajectoryPath,
};

/// Knobs for [`Trajectory::build_with`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrajectorySettings {
    /// Fraction of path points kept by decimation, in `(0, 1]`.
    pub keep_fraction: f64,
    /// Offset added to every path point.
    pub display_offset: DVec3,
    /// Field-of-view to focal-length mapping for the keyframe table.
    pub lens: LensMapping,
}

impl Default for TrajectorySettings {
    fn default() -> Self {
        Self {
            keep_fraction: 0.3,
            display_offset: DVec3::new(0.0, -1.0, 0.0),
            lens: LensMapping::Direct,
        }
    }
}

impl TrajectorySettings {
    /// Check parameter ranges.
    pub fn validate(&self) -> LightFieldResult<()> {
        if !(self.keep_fraction > 0.0 && self.keep_fraction <= 1.0) {
            return Err(LightFieldError::validation(
                "trajectory keep_fraction must be in (0, 1]",
            ));
        }
        if !self.display_offset.is_finite() {
            return Err(LightFieldError::validation(
                "trajectory display_offset must be finite",
            ));
        }
        if let LensMapping::SensorFit { sensor_mm } = self.lens
            && !(sensor_mm.is_finite() && sensor_mm > 0.0)
        {
            return Err(LightFieldError::validation("sensor_mm must be > 0"));
        }
        Ok(())
    }
}

/// Timeline and path derived from a camera sequence.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Trajectory {
    generation: Generation,
    keyframes: KeyframeTable,
    path: TrajectoryPath,
}

impl Trajectory {
    /// Build with default settings.
    pub fn build(sequence: &CameraSequence) -> LightFieldResult<Self> {
        Self::build_with(sequence, &TrajectorySettings::default())
    }

    /// Build the keyframe table and smoothed path for `sequence`.
    #[tracing::instrument(skip(sequence), fields(samples = sequence.len()))]
    pub fn build_with(
        sequence: &CameraSequence,
        settings: &TrajectorySettings,
    ) -> LightFieldResult<Self> {
        if sequence.is_empty() {
            return Err(LightFieldError::EmptySequence);
        }
        settings.validate()?;

        let keyframes = KeyframeTable::from_samples(sequence.samples(), settings.lens);
        let positions: Vec<DVec3> = sequence.iter().map(|s| s.position).collect();
        let path = TrajectoryPath::build(
            &positions,
            settings.keep_fraction,
            settings.display_offset,
        );

        tracing::debug!(
            keys = keyframes.len(),
            path_points = path.points.len(),
            "built trajectory"
        );
        Ok(Self {
            generation: sequence.generation(),
            keyframes,
            path,
        })
    }

    /// Generation of the sequence this trajectory was built from.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Per-frame keyframe table.
    pub fn keyframes(&self) -> &KeyframeTable {
        &self.keyframes
    }

    /// Smoothed path through the camera positions.
    pub fn path(&self) -> &TrajectoryPath {
        &self.path
    }

    /// Serialize keyframes and path as pretty JSON.
    pub fn to_json(&self) -> LightFieldResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LightFieldError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trajectory/trajectory.rs"]
mod tests;
