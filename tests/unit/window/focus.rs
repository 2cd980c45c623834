use super::*;
use crate::{foundation::core::DQuat, pose::sequence::CameraSample};

fn sequence(n: usize) -> CameraSequence {
    let ts = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
    CameraSequence::new(
        (0..n)
            .map(|i| CameraSample {
                fovy_deg: 50.0,
                aspect: 1.0,
                near: 0.5,
                far: 100.0,
                position: DVec3::new(i as f64, 0.0, 0.0),
                orientation: DQuat::IDENTITY,
                image_file: format!("{i}.png"),
                timestamp: ts,
            })
            .collect(),
    )
}

fn spec(width: usize, focus: f64, profile: WindowProfile) -> FocusWindowSpec {
    FocusWindowSpec {
        window_width: width,
        focus_offset: focus,
        profile,
        model: FocusModel::UniformShift,
    }
}

#[test]
fn from_next_starts_after_position() {
    let w = compute_window(&sequence(10), 2, &spec(3, 0.0, WindowProfile::FromNext));
    assert_eq!(w.sample_indices().collect::<Vec<_>>(), vec![3, 4, 5]);
    assert_eq!(w.actual_count(), 3);
    assert_eq!(w.nominal_width, 3);
}

#[test]
fn from_current_includes_position() {
    let w = compute_window(&sequence(10), 2, &spec(3, 0.0, WindowProfile::FromCurrent));
    assert_eq!(w.sample_indices().collect::<Vec<_>>(), vec![2, 3, 4]);
}

#[test]
fn window_is_clipped_at_sequence_end() {
    for profile in [WindowProfile::FromNext, WindowProfile::FromCurrent] {
        let w = compute_window(&sequence(10), 8, &spec(5, 0.0, profile));
        assert!(w.actual_count() <= 2, "{profile:?}");
        assert!(w.sample_indices().all(|i| i <= 9));
        assert_eq!(w.nominal_width, 5);
    }
}

#[test]
fn exhausted_window_is_empty_not_error() {
    let w = compute_window(&sequence(4), 3, &spec(2, 0.0, WindowProfile::FromNext));
    assert!(w.is_empty());

    let w = compute_window(&sequence(4), 17, &spec(2, 0.0, WindowProfile::FromCurrent));
    assert!(w.is_empty());

    let w = compute_window(&sequence(0), 0, &spec(2, 0.0, WindowProfile::FromCurrent));
    assert!(w.is_empty());
}

#[test]
fn uniform_shift_applies_same_offset_to_all_entries() {
    let w = compute_window(&sequence(10), 0, &spec(4, 2.5, WindowProfile::FromNext));
    for e in &w.entries {
        assert_eq!(e.spatial_offset, DVec3::new(0.0, 2.5, 0.0));
        assert_eq!(e.pixel_shift, Vec2::ZERO);
    }
}

#[test]
fn focus_is_clamped() {
    let w = compute_window(&sequence(3), 0, &spec(1, 1.0e6, WindowProfile::FromNext));
    assert_eq!(w.entries[0].spatial_offset.y, FOCUS_LIMIT);
    assert_eq!(
        compute_offset(-250.0, DVec3::new(1.0, 1.0, 1.0)),
        DVec3::new(1.0, -99.0, 1.0)
    );
}

#[test]
fn compute_offset_moves_along_lateral_axis() {
    let base = DVec3::new(3.0, -4.0, 5.0);
    assert_eq!(compute_offset(0.0, base), base);
    assert_eq!(compute_offset(1.5, base), DVec3::new(3.0, -2.5, 5.0));
}

#[test]
fn pixel_shift_grows_with_window_position() {
    let s = FocusWindowSpec {
        model: FocusModel::PixelShift { factor: 2.0 },
        ..spec(3, 1.5, WindowProfile::FromCurrent)
    };
    let w = compute_window(&sequence(10), 0, &s);
    let shifts: Vec<f64> = w.entries.iter().map(|e| e.pixel_shift.x).collect();
    assert_eq!(shifts, vec![0.0, 3.0, 6.0]);
    assert!(w.entries.iter().all(|e| e.spatial_offset == DVec3::ZERO));
}

#[test]
fn spec_validation() {
    assert!(FocusWindowSpec::new(0, 0.0).is_err());
    assert!(FocusWindowSpec::new(1, f64::INFINITY).is_err());
    let s = FocusWindowSpec::new(3, 500.0).unwrap();
    assert_eq!(s.clamped_focus(), FOCUS_LIMIT);
}

#[test]
fn window_carries_sequence_generation() {
    let seq = sequence(3).stamped(Generation(7));
    let w = compute_window(&seq, 0, &FocusWindowSpec::default());
    assert_eq!(w.generation, Generation(7));
}
