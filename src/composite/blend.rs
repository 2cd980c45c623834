use rayon::prelude::*;

use crate::{
    composite::buffer::PixelBuffer,
    foundation::core::Generation,
    foundation::error::{LightFieldError, LightFieldResult},
};

/// Output opacity used when the caller does not choose one.
pub const DEFAULT_TARGET_MEAN_ALPHA: f32 = 0.5;

/// Compositor settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BlendSettings {
    /// Scalar applied to the mean alpha of the output.
    pub target_mean_alpha: f32,
    /// Split output rows across the rayon pool.
    ///
    /// Each pixel still folds its sources in input order, so output is bit-identical to the
    /// sequential path.
    pub parallel_rows: bool,
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self {
            target_mean_alpha: DEFAULT_TARGET_MEAN_ALPHA,
            parallel_rows: false,
        }
    }
}

impl BlendSettings {
    /// Check parameter ranges.
    pub fn validate(&self) -> LightFieldResult<()> {
        if !self.target_mean_alpha.is_finite() {
            return Err(LightFieldError::validation(
                "target_mean_alpha must be finite",
            ));
        }
        Ok(())
    }
}

/// Blended image plus how many sources contributed.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendResult {
    /// Blended pixels.
    pub buffer: PixelBuffer,
    /// Sources whose alpha was not zero everywhere.
    pub non_transparent_count: usize,
    /// Sequence generation the sources were rendered from.
    pub generation: Generation,
}

impl BlendResult {
    /// Whether no source contributed (the buffer is all zeros).
    pub fn is_blank(&self) -> bool {
        self.non_transparent_count == 0
    }
}

/// Alpha-weighted average of `buffers` with the default sequential settings.
pub fn blend(buffers: &[PixelBuffer], target_mean_alpha: f32) -> LightFieldResult<BlendResult> {
    blend_with(
        buffers,
        &BlendSettings {
            target_mean_alpha,
            ..BlendSettings::default()
        },
    )
}

/// Alpha-weighted average of `buffers`.
///
/// Fully transparent sources are skipped. Per pixel: `rgb = sum(rgb * a) / sum(a)` (divisor 1
/// where `sum(a) == 0`) and `alpha = sum(a) / contributing * target_mean_alpha`.
pub fn blend_with(
    buffers: &[PixelBuffer],
    settings: &BlendSettings,
) -> LightFieldResult<BlendResult> {
    settings.validate()?;
    let first = buffers.first().ok_or(LightFieldError::EmptyBlendSet)?;
    for (index, b) in buffers.iter().enumerate().skip(1) {
        if !b.is_compatible(first) {
            return Err(LightFieldError::DimensionMismatch {
                index,
                expected: first.dimensions(),
                found: b.dimensions(),
            });
        }
    }

    let sources: Vec<&[f32]> = buffers
        .iter()
        .filter(|b| !b.is_fully_transparent())
        .map(PixelBuffer::data)
        .collect();
    let count = sources.len();
    let (width, height) = first.dimensions();

    if count == 0 {
        tracing::debug!(buffers = buffers.len(), "all blend sources fully transparent");
        return Ok(BlendResult {
            buffer: PixelBuffer::transparent(width, height),
            non_transparent_count: 0,
            generation: Generation::UNPUBLISHED,
        });
    }

    let row_len = width as usize * 4;
    let mut out = vec![0.0f32; row_len * height as usize];
    if row_len > 0 {
        let target = settings.target_mean_alpha;
        let fold = |(y, row): (usize, &mut [f32])| {
            blend_row(row, y * row_len, &sources, count, target);
        };
        if settings.parallel_rows {
            out.par_chunks_mut(row_len).enumerate().for_each(fold);
        } else {
            out.chunks_mut(row_len).enumerate().for_each(fold);
        }
    }

    Ok(BlendResult {
        buffer: PixelBuffer::new(width, height, out)?,
        non_transparent_count: count,
        generation: Generation::UNPUBLISHED,
    })
}

fn blend_row(row: &mut [f32], offset: usize, sources: &[&[f32]], count: usize, target: f32) {
    let n = count as f32;
    for (k, px) in row.chunks_exact_mut(4).enumerate() {
        let base = offset + k * 4;
        let (mut r, mut g, mut b, mut a) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
        for src in sources {
            let sa = src[base + 3];
            r += src[base] * sa;
            g += src[base + 1] * sa;
            b += src[base + 2] * sa;
            a += sa;
        }
        let div = if a == 0.0 { 1.0 } else { a };
        px[0] = r / div;
        px[1] = g / div;
        px[2] = b / div;
        px[3] = (a / n) * target;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
