use std::{path::Path, sync::Arc};

use serde_json::Value;

use crate::{
    composite::blend::BlendResult,
    config::LightFieldConfig,
    foundation::core::Generation,
    foundation::error::{LightFieldError, LightFieldResult},
    pose::{document, sequence::CameraSequence},
    render::controller::{RangeController, WindowRenderer},
    trajectory::Trajectory,
};

/// Owns the current camera sequence and the latest accepted blend.
///
/// Each successful load publishes a new [`Generation`]; results from older generations are
/// stale and are discarded by [`LightFieldSession::accept`].
#[derive(Debug)]
pub struct LightFieldSession {
    config: LightFieldConfig,
    sequence: Option<Arc<CameraSequence>>,
    trajectory: Option<Trajectory>,
    generation: Generation,
    controller: RangeController,
    last_result: Option<BlendResult>,
}

impl LightFieldSession {
    /// Empty session; nothing is loaded yet.
    pub fn new(config: LightFieldConfig) -> LightFieldResult<Self> {
        config.validate()?;
        let controller = RangeController::new(config.composite);
        Ok(Self {
            config,
            sequence: None,
            trajectory: None,
            generation: Generation::UNPUBLISHED,
            controller,
            last_result: None,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &LightFieldConfig {
        &self.config
    }

    /// Replace the configuration. Window settings apply to the next render; stride and
    /// trajectory settings apply to the next load.
    pub fn set_config(&mut self, config: LightFieldConfig) -> LightFieldResult<()> {
        config.validate()?;
        self.controller = self.controller.with_settings(config.composite);
        self.config = config;
        Ok(())
    }

    /// Parse `doc` and publish it as the current sequence.
    ///
    /// On error nothing is published and the previous sequence stays current.
    #[tracing::instrument(skip(self, doc), fields(previous = self.generation.0))]
    pub fn load_document(&mut self, doc: &Value) -> LightFieldResult<Generation> {
        let parsed = document::parse(doc, self.config.stride)?;
        self.publish(parsed)
    }

    /// Parse a pose file and publish it as the current sequence.
    #[tracing::instrument(skip(self), fields(previous = self.generation.0))]
    pub fn load_file(&mut self, path: &Path) -> LightFieldResult<Generation> {
        let parsed = document::parse_file(path, self.config.stride)?;
        self.publish(parsed)
    }

    fn publish(&mut self, parsed: CameraSequence) -> LightFieldResult<Generation> {
        let generation = self.generation.next();
        let sequence = parsed.stamped(generation);
        let trajectory = if sequence.is_empty() {
            None
        } else {
            Some(Trajectory::build_with(&sequence, &self.config.trajectory)?)
        };

        self.controller.supersede_handle().supersede();
        self.generation = generation;
        self.sequence = Some(Arc::new(sequence));
        self.trajectory = trajectory;
        self.last_result = None;
        tracing::info!(
            generation = generation.0,
            samples = self.len(),
            "camera sequence published"
        );
        Ok(generation)
    }

    /// Generation of the current sequence.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Shared handle to the current sequence, for rendering off the session's thread.
    pub fn sequence(&self) -> Option<Arc<CameraSequence>> {
        self.sequence.clone()
    }

    /// Samples in the current sequence (0 when nothing is loaded).
    pub fn len(&self) -> usize {
        self.sequence.as_ref().map_or(0, |s| s.len())
    }

    /// Whether no samples are loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trajectory of the current sequence; `None` when it is empty or unloaded.
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    /// Controller shared with off-thread renders.
    pub fn controller(&self) -> &RangeController {
        &self.controller
    }

    /// Latest accepted blend.
    pub fn last_result(&self) -> Option<&BlendResult> {
        self.last_result.as_ref()
    }

    /// Render the focal window at `position` with the configured window settings.
    ///
    /// On failure the previously accepted result stays in place.
    pub fn render_at(
        &mut self,
        position: usize,
        renderer: &mut dyn WindowRenderer,
    ) -> LightFieldResult<&BlendResult> {
        let sequence = self.sequence.clone().ok_or(LightFieldError::EmptySequence)?;
        let spec = self.config.window.spec();
        let result = self
            .controller
            .render_window(&sequence, position, &spec, renderer)
            .inspect_err(|e| {
                tracing::warn!(position, error = %e, "keeping previous blend");
            })?;
        Ok(self.last_result.insert(result))
    }

    /// Install a result rendered elsewhere, unless it belongs to an older generation.
    pub fn accept(&mut self, result: BlendResult) -> bool {
        if result.generation != self.generation {
            tracing::debug!(
                stale = result.generation.0,
                current = self.generation.0,
                "discarding stale blend"
            );
            return false;
        }
        self.last_result = Some(result);
        true
    }
}
