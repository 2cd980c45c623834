use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::decode::{apply_alpha_mask, read_pixel_buffer},
    composite::buffer::PixelBuffer,
    foundation::core::DVec3,
    pose::sequence::CameraSample,
    render::controller::WindowRenderer,
    window::focus::WindowResult,
};

/// Renders a sample by loading its source photograph from an image root.
///
/// This is not a rasterizer: spatial offsets cannot be applied and are only traced. Pair it
/// with the pixel-shift focus model to refocus.
#[derive(Clone, Debug)]
pub struct SourceImageRenderer {
    root: PathBuf,
    mask: Option<PixelBuffer>,
    loaded: Vec<PathBuf>,
}

impl SourceImageRenderer {
    /// Renderer reading `CameraSample::image_file` relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mask: None,
            loaded: Vec::new(),
        }
    }

    /// Multiply every loaded image's alpha by `mask` luminance.
    pub fn with_mask(mut self, mask: PixelBuffer) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Image root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Images loaded since the last released window.
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }
}

impl WindowRenderer for SourceImageRenderer {
    fn render(
        &mut self,
        sample_index: usize,
        sample: &CameraSample,
        spatial_offset: DVec3,
    ) -> anyhow::Result<PixelBuffer> {
        if spatial_offset != DVec3::ZERO {
            tracing::trace!(
                sample_index,
                ?spatial_offset,
                "source renderer ignores spatial offset"
            );
        }
        let path = self.root.join(&sample.image_file);
        let mut buf = read_pixel_buffer(&path)
            .with_context(|| format!("load source image for sample {sample_index}"))?;
        self.loaded.push(path.clone());
        if let Some(mask) = &self.mask {
            apply_alpha_mask(&mut buf, mask)
                .with_context(|| format!("mask '{}'", path.display()))?;
        }
        Ok(buf)
    }

    fn release_window(&mut self, window: &WindowResult) {
        let images = std::mem::take(&mut self.loaded);
        tracing::debug!(
            start_index = window.start_index,
            entries = window.actual_count(),
            ?images,
            "window released"
        );
    }
}
