use super::*;

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

fn assert_px_close(got: [f32; 4], want: [f32; 4]) {
    for c in 0..4 {
        assert!((got[c] - want[c]).abs() <= 1e-6, "{got:?} vs {want:?}");
    }
}

fn gradient(w: u32, h: u32, seed: f32) -> PixelBuffer {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let t = (x as f32 * 0.37 + y as f32 * 0.11 + seed).fract();
            data.extend_from_slice(&[t, 1.0 - t, (t * 3.0).fract(), (t * 7.0).fract()]);
        }
    }
    PixelBuffer::new(w, h, data).unwrap()
}

#[test]
fn empty_set_fails() {
    assert!(matches!(
        blend(&[], 0.5).unwrap_err(),
        LightFieldError::EmptyBlendSet
    ));
}

#[test]
fn dimension_mismatch_names_buffer() {
    let bufs = [
        PixelBuffer::filled(4, 3, RED),
        PixelBuffer::filled(4, 3, BLUE),
        PixelBuffer::filled(3, 4, BLUE),
    ];
    match blend(&bufs, 0.5).unwrap_err() {
        LightFieldError::DimensionMismatch {
            index,
            expected,
            found,
        } => {
            assert_eq!(index, 2);
            assert_eq!(expected, (4, 3));
            assert_eq!(found, (3, 4));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn red_and_blue_average_to_purple() {
    let bufs = [PixelBuffer::filled(3, 2, RED), PixelBuffer::filled(3, 2, BLUE)];
    let out = blend(&bufs, 0.5).unwrap();
    assert_eq!(out.non_transparent_count, 2);
    for px in out.buffer.pixels() {
        assert_eq!(px, &[0.5, 0.0, 0.5, 0.5]);
    }
}

#[test]
fn fully_transparent_source_is_skipped() {
    let bufs = [
        PixelBuffer::filled(2, 2, RED),
        PixelBuffer::transparent(2, 2),
        PixelBuffer::filled(2, 2, BLUE),
    ];
    let out = blend(&bufs, 1.0).unwrap();
    assert_eq!(out.non_transparent_count, 2);
    for px in out.buffer.pixels() {
        // A counted transparent source would pull alpha down to 2/3.
        assert_eq!(px, &[0.5, 0.0, 0.5, 1.0]);
    }
}

#[test]
fn transparent_source_with_colour_contributes_nothing() {
    let ghost = PixelBuffer::filled(2, 2, [0.0, 1.0, 0.0, 0.0]);
    let with = blend(&[PixelBuffer::filled(2, 2, RED), ghost], 0.5).unwrap();
    let without = blend(&[PixelBuffer::filled(2, 2, RED)], 0.5).unwrap();
    assert_eq!(with.buffer, without.buffer);
}

#[test]
fn identical_buffers_are_idempotent() {
    let b = gradient(5, 4, 0.2);
    for n in 1..=4 {
        let bufs = vec![b.clone(); n];
        let out = blend(&bufs, 0.5).unwrap();
        assert_eq!(out.non_transparent_count, n);
        for y in 0..4 {
            for x in 0..5 {
                let src = b.pixel(x, y).unwrap();
                let got = out.buffer.pixel(x, y).unwrap();
                let want = if src[3] == 0.0 {
                    [0.0, 0.0, 0.0, 0.0]
                } else {
                    [src[0], src[1], src[2], src[3] * 0.5]
                };
                assert_px_close(got, want);
            }
        }
    }
}

#[test]
fn all_transparent_yields_blank_result() {
    let bufs = [PixelBuffer::transparent(3, 3), PixelBuffer::transparent(3, 3)];
    let out = blend(&bufs, 0.5).unwrap();
    assert!(out.is_blank());
    assert_eq!(out.buffer, PixelBuffer::transparent(3, 3));
}

#[test]
fn zero_alpha_pixels_do_not_divide_by_zero() {
    let mut a = PixelBuffer::filled(2, 1, [0.8, 0.6, 0.4, 1.0]);
    a.data_mut()[4..8].copy_from_slice(&[0.9, 0.9, 0.9, 0.0]);
    let out = blend(&[a], 0.5).unwrap();
    assert_px_close(out.buffer.pixel(0, 0).unwrap(), [0.8, 0.6, 0.4, 0.5]);
    assert_eq!(out.buffer.pixel(1, 0).unwrap(), [0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn partial_alpha_weights_colour() {
    let a = PixelBuffer::filled(1, 1, [1.0, 0.0, 0.0, 0.75]);
    let b = PixelBuffer::filled(1, 1, [0.0, 0.0, 1.0, 0.25]);
    let out = blend(&[a, b], 1.0).unwrap();
    assert_px_close(out.buffer.pixel(0, 0).unwrap(), [0.75, 0.0, 0.25, 0.5]);
}

#[test]
fn parallel_rows_are_bit_identical() {
    let bufs: Vec<PixelBuffer> = (0..5).map(|i| gradient(17, 9, i as f32 * 0.13)).collect();
    let seq = blend_with(&bufs, &BlendSettings::default()).unwrap();
    let par = blend_with(
        &bufs,
        &BlendSettings {
            parallel_rows: true,
            ..BlendSettings::default()
        },
    )
    .unwrap();
    let bits = |r: &BlendResult| -> Vec<u32> {
        r.buffer.data().iter().map(|v| v.to_bits()).collect()
    };
    assert_eq!(bits(&seq), bits(&par));
}

#[test]
fn repeated_blends_are_bit_identical() {
    let bufs: Vec<PixelBuffer> = (0..3).map(|i| gradient(8, 8, i as f32 * 0.31)).collect();
    let a = blend(&bufs, 0.5).unwrap();
    let b = blend(&bufs, 0.5).unwrap();
    assert_eq!(a, b);
}

#[test]
fn non_finite_target_is_rejected() {
    let bufs = [PixelBuffer::filled(1, 1, RED)];
    assert!(matches!(
        blend(&bufs, f32::NAN).unwrap_err(),
        LightFieldError::Validation(_)
    ));
}

#[test]
fn zero_sized_buffers_blend_to_empty() {
    let out = blend(&[PixelBuffer::filled(0, 3, RED)], 0.5).unwrap();
    assert_eq!(out.buffer.dimensions(), (0, 3));
    assert!(out.buffer.data().is_empty());
}
