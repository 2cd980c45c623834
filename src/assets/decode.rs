use std::path::Path;

use anyhow::Context;

use crate::{
    composite::buffer::PixelBuffer,
    foundation::error::{LightFieldError, LightFieldResult},
};

/// Decode encoded image bytes into straight-alpha `f32` RGBA in `[0, 1]`.
pub fn decode_pixel_buffer(bytes: &[u8]) -> LightFieldResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    into_pixel_buffer(dyn_img)
}

/// Read an image file into a [`PixelBuffer`].
pub fn read_pixel_buffer(path: &Path) -> LightFieldResult<PixelBuffer> {
    let dyn_img = image::open(path)
        .with_context(|| format!("read image '{}'", path.display()))?;
    into_pixel_buffer(dyn_img)
}

fn into_pixel_buffer(dyn_img: image::DynamicImage) -> LightFieldResult<PixelBuffer> {
    let rgba = dyn_img.to_rgba32f();
    let (width, height) = rgba.dimensions();
    PixelBuffer::new(width, height, rgba.into_raw())
}

/// Quantize to RGBA8 (clamped, rounded).
pub fn to_rgba8(buf: &PixelBuffer) -> Vec<u8> {
    buf.data()
        .iter()
        .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect()
}

/// Write a buffer as an 8-bit RGBA PNG, creating parent directories.
pub fn write_png(path: &Path, buf: &PixelBuffer) -> LightFieldResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            LightFieldError::io(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }

    image::save_buffer_with_format(
        path,
        &to_rgba8(buf),
        buf.width(),
        buf.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Multiply `buf`'s alpha by the Rec. 709 luminance of `mask`.
pub fn apply_alpha_mask(buf: &mut PixelBuffer, mask: &PixelBuffer) -> LightFieldResult<()> {
    if !buf.is_compatible(mask) {
        return Err(LightFieldError::validation(format!(
            "mask is {}x{}, image is {}x{}",
            mask.width(),
            mask.height(),
            buf.width(),
            buf.height()
        )));
    }
    for (px, m) in buf.data_mut().chunks_exact_mut(4).zip(mask.pixels()) {
        let lum = 0.2126 * m[0] + 0.7152 * m[1] + 0.0722 * m[2];
        px[3] *= lum.clamp(0.0, 1.0);
    }
    Ok(())
}
