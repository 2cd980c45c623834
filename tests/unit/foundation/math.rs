use super::*;

fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "{a} vs {b}");
}

fn assert_deg_close(a: f64, b: f64, tol: f64) {
    assert_close(wrap_degrees(a - b), 0.0, tol);
}

#[test]
fn remap_swaps_y_and_z() {
    let v = remap_z_up_to_y_up([1.0, 2.0, 3.0]);
    assert_eq!(v, DVec3::new(1.0, -3.0, 2.0));
}

#[test]
fn remap_is_not_an_involution() {
    let once = remap_z_up_to_y_up([1.0, 2.0, 3.0]);
    let twice = remap_z_up_to_y_up(once.to_array());
    assert_ne!(twice, DVec3::new(1.0, 2.0, 3.0));
    assert_eq!(twice, DVec3::new(1.0, -2.0, -3.0));
}

#[test]
fn euler_xyz_applies_x_first() {
    // Rotating +Y by 90 deg about X gives +Z; then 90 deg about Z leaves +Z fixed.
    let q = quat_from_euler_xyz(DVec3::new(
        90f64.to_radians(),
        0.0,
        90f64.to_radians(),
    ));
    let v = q * DVec3::Y;
    assert_close(v.x, 0.0, 1e-12);
    assert_close(v.y, 0.0, 1e-12);
    assert_close(v.z, 1.0, 1e-12);
}

#[test]
fn euler_quat_round_trip() {
    let angles = DVec3::new(0.3, -0.7, 2.1);
    let back = euler_xyz_from_quat(quat_from_euler_xyz(angles));
    assert_close(back.x, angles.x, 1e-9);
    assert_close(back.y, angles.y, 1e-9);
    assert_close(back.z, angles.z, 1e-9);
}

#[test]
fn pose_euler_reproduces_correction_offsets() {
    // Every `b` here lands the corrected Y inside (-90, 90), where XYZ angles are unique.
    for a in [-120.0, 0.0, 10.0, 75.0, 179.0] {
        for b in [-250.0, -170.0, -135.0, 100.0, 150.0] {
            for c in [-45.0, 0.0, 80.0, 200.0] {
                let q = quat_from_pose_euler_deg([a, b, c]);
                let back = euler_xyz_from_quat(q);
                assert_deg_close(back.x.to_degrees(), a, 1e-5);
                assert_deg_close(back.y.to_degrees(), b + 180.0, 1e-5);
                assert_deg_close(back.z.to_degrees(), c - 90.0, 1e-5);

                let again = quat_from_euler_xyz(back);
                assert!(q.dot(again).abs() > 1.0 - 1e-9, "({a}, {b}, {c})");
            }
        }
    }
}

#[test]
fn pose_euler_near_gimbal_lock_keeps_rotation() {
    // Corrected Y at +-90 deg: angles are not unique, the rotation is.
    for (a, b, c) in [(30.0, -90.0, 10.0), (-60.0, 90.0, 135.0), (0.0, 270.0, -20.0)] {
        let q = quat_from_pose_euler_deg([a, b, c]);
        let again = quat_from_euler_xyz(euler_xyz_from_quat(q));
        assert!(q.dot(again).abs() > 1.0 - 1e-9, "({a}, {b}, {c})");
    }
}

#[test]
fn gimbal_lock_keeps_rotation() {
    let angles = DVec3::new(0.4, std::f64::consts::FRAC_PI_2, 0.0);
    let q = quat_from_euler_xyz(angles);
    let back = quat_from_euler_xyz(euler_xyz_from_quat(q));
    assert!(q.dot(back).abs() > 1.0 - 1e-9);
}

#[test]
fn wrap_degrees_range() {
    assert_close(wrap_degrees(190.0), -170.0, 1e-12);
    assert_close(wrap_degrees(-190.0), 170.0, 1e-12);
    assert_close(wrap_degrees(180.0), 180.0, 1e-12);
    assert_close(wrap_degrees(720.0), 0.0, 1e-12);
}

#[test]
fn focal_length_for_common_fov() {
    // 90 deg vertical fov on a 24 mm sensor is 12 mm.
    assert_close(focal_length_from_fovy(90.0, 24.0), 12.0, 1e-9);
    assert!(focal_length_from_fovy(0.0, 24.0).is_infinite());
}
