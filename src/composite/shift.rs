use crate::{composite::buffer::PixelBuffer, foundation::core::Vec2};

/// Translate a buffer by whole pixels (rounded); vacated pixels become transparent.
pub fn shift_buffer(src: &PixelBuffer, shift: Vec2) -> PixelBuffer {
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));
    // Clamped to the buffer extent so the integer math below cannot overflow.
    let dx = shift.x.round().clamp(-(w as f64), w as f64) as i64;
    let dy = shift.y.round().clamp(-(h as f64), h as f64) as i64;
    if dx == 0 && dy == 0 {
        return src.clone();
    }

    let mut out = PixelBuffer::transparent(src.width(), src.height());
    if dx.abs() >= w || dy.abs() >= h {
        return out;
    }

    let row_len = w as usize * 4;
    let x0 = dx.max(0) as usize;
    let sx0 = (-dx).max(0) as usize;
    let span = (w - dx.abs()) as usize * 4;
    let data = src.data();
    let dst = out.data_mut();

    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        let d = y as usize * row_len + x0 * 4;
        let s = sy as usize * row_len + sx0 * 4;
        dst[d..d + span].copy_from_slice(&data[s..s + span]);
    }
    out
}
