use std::path::Path;

use crate::{
    composite::blend::BlendSettings,
    foundation::error::{LightFieldError, LightFieldResult},
    trajectory::TrajectorySettings,
    window::focus::{FocusModel, FocusWindowSpec, WindowProfile},
};

/// Upper bound for `stride` and `window.width`.
pub const MAX_STEP: usize = 100;

/// Focal window section of [`LightFieldConfig`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Number of neighbouring samples blended per frame.
    pub width: usize,
    /// Focus offset; clamped when the window is computed.
    pub focus: f64,
    /// Window start policy.
    pub profile: WindowProfile,
    /// Focus displacement strategy.
    pub model: FocusModel,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1,
            focus: 0.0,
            profile: WindowProfile::FromNext,
            model: FocusModel::UniformShift,
        }
    }
}

impl WindowConfig {
    /// Window parameters for one evaluation.
    pub fn spec(&self) -> FocusWindowSpec {
        FocusWindowSpec {
            window_width: self.width,
            focus_offset: self.focus,
            profile: self.profile,
            model: self.model,
        }
    }
}

/// Engine configuration, loadable from JSON.
///
/// Every section falls back to its defaults, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LightFieldConfig {
    /// Keep every n-th complete pose record.
    pub stride: usize,
    /// Focal window.
    pub window: WindowConfig,
    /// Compositor.
    pub composite: BlendSettings,
    /// Trajectory path and keyframes.
    pub trajectory: TrajectorySettings,
}

impl Default for LightFieldConfig {
    fn default() -> Self {
        Self {
            stride: 1,
            window: WindowConfig::default(),
            composite: BlendSettings::default(),
            trajectory: TrajectorySettings::default(),
        }
    }
}

impl LightFieldConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> LightFieldResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| LightFieldError::serde(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> LightFieldResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LightFieldError::io(format!("read config '{}': {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Check every section.
    pub fn validate(&self) -> LightFieldResult<()> {
        if !(1..=MAX_STEP).contains(&self.stride) {
            return Err(LightFieldError::validation(format!(
                "stride must be in 1..={MAX_STEP}, got {}",
                self.stride
            )));
        }
        if !(1..=MAX_STEP).contains(&self.window.width) {
            return Err(LightFieldError::validation(format!(
                "window.width must be in 1..={MAX_STEP}, got {}",
                self.window.width
            )));
        }
        self.window.spec().validate()?;
        self.composite.validate()?;
        self.trajectory.validate()
    }
}
