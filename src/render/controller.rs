use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    composite::blend::{BlendResult, BlendSettings, blend_with},
    composite::buffer::PixelBuffer,
    composite::shift::shift_buffer,
    foundation::core::{DVec3, Vec2},
    foundation::error::{LightFieldError, LightFieldResult},
    pose::sequence::{CameraSample, CameraSequence},
    window::focus::{FocusWindowSpec, WindowResult, compute_window},
};

/// External renderer that turns one windowed camera into pixels.
///
/// Calls happen sequentially and in window order.
pub trait WindowRenderer {
    /// Render `sample` with its rig displaced by `spatial_offset`.
    fn render(
        &mut self,
        sample_index: usize,
        sample: &CameraSample,
        spatial_offset: DVec3,
    ) -> anyhow::Result<PixelBuffer>;

    /// Temporary resources created for `window` may be disposed.
    ///
    /// Called once per window render, whether it succeeded or not.
    fn release_window(&mut self, _window: &WindowResult) {}
}

/// Adapts a `render_fn(sample_index, spatial_offset)` closure to [`WindowRenderer`].
pub struct FnRenderer<F>(pub F);

impl<F> WindowRenderer for FnRenderer<F>
where
    F: FnMut(usize, DVec3) -> anyhow::Result<PixelBuffer>,
{
    fn render(
        &mut self,
        sample_index: usize,
        _sample: &CameraSample,
        spatial_offset: DVec3,
    ) -> anyhow::Result<PixelBuffer> {
        (self.0)(sample_index, spatial_offset)
    }
}

/// Invalidates in-flight window renders from any thread.
#[derive(Clone, Debug)]
pub struct SupersedeHandle {
    latest: Arc<AtomicU64>,
}

impl SupersedeHandle {
    /// Abandon every render that is currently running; returns the new latest ticket.
    pub fn supersede(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Orchestrates window computation, rendering and blending.
///
/// Clones share one ticket counter, so a request through any clone supersedes the others.
#[derive(Clone, Debug, Default)]
pub struct RangeController {
    latest: Arc<AtomicU64>,
    settings: BlendSettings,
}

impl RangeController {
    /// Controller with the given compositor settings.
    pub fn new(settings: BlendSettings) -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            settings,
        }
    }

    /// Controller with new compositor settings that shares this one's ticket counter.
    pub fn with_settings(&self, settings: BlendSettings) -> Self {
        Self {
            latest: Arc::clone(&self.latest),
            settings,
        }
    }

    /// Compositor settings used for every window.
    pub fn settings(&self) -> &BlendSettings {
        &self.settings
    }

    /// Handle that can cancel in-flight renders.
    pub fn supersede_handle(&self) -> SupersedeHandle {
        SupersedeHandle {
            latest: Arc::clone(&self.latest),
        }
    }

    /// Render and blend the focal window at `start_index`.
    ///
    /// Any renderer failure aborts the whole window with [`LightFieldError::RenderFailure`];
    /// nothing from a failed batch is blended. If a newer request arrives meanwhile the call
    /// fails with [`LightFieldError::Superseded`] instead of delivering a stale result.
    #[tracing::instrument(
        skip(self, sequence, spec, renderer),
        fields(generation = sequence.generation().0, len = sequence.len())
    )]
    pub fn render_window(
        &self,
        sequence: &CameraSequence,
        start_index: usize,
        spec: &FocusWindowSpec,
        renderer: &mut dyn WindowRenderer,
    ) -> LightFieldResult<BlendResult> {
        spec.validate()?;
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let window = compute_window(sequence, start_index, spec);

        let outcome = self
            .render_entries(ticket, sequence, &window, renderer)
            .and_then(|buffers| blend_with(&buffers, &self.settings));
        renderer.release_window(&window);

        let mut result = outcome?;
        self.ensure_current(ticket)?;
        result.generation = window.generation;
        tracing::info!(
            ticket,
            start_index,
            actual = window.actual_count(),
            contributing = result.non_transparent_count,
            "focal window blended"
        );
        Ok(result)
    }

    fn render_entries(
        &self,
        ticket: u64,
        sequence: &CameraSequence,
        window: &WindowResult,
        renderer: &mut dyn WindowRenderer,
    ) -> LightFieldResult<Vec<PixelBuffer>> {
        let mut buffers = Vec::with_capacity(window.actual_count());
        for entry in &window.entries {
            self.ensure_current(ticket)?;
            let index = entry.sample_index;
            let Some(sample) = sequence.get(index) else {
                return Err(LightFieldError::RenderFailure {
                    index,
                    source: anyhow::anyhow!("sample index out of range"),
                });
            };
            let buf = renderer
                .render(index, sample, entry.spatial_offset)
                .map_err(|source| LightFieldError::RenderFailure { index, source })?;
            buffers.push(if entry.pixel_shift == Vec2::ZERO {
                buf
            } else {
                shift_buffer(&buf, entry.pixel_shift)
            });
        }
        Ok(buffers)
    }

    fn ensure_current(&self, ticket: u64) -> LightFieldResult<()> {
        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::warn!(ticket, "window render superseded");
            return Err(LightFieldError::Superseded { ticket });
        }
        Ok(())
    }
}
