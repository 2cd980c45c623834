use crate::foundation::core::{DMat3, DQuat, DVec3};

/// Additive corrections applied to Euler-angle poses before conversion, in degrees.
///
/// The capture tool writes Euler triples with the camera looking down the wrong axes; the
/// Y-analog component is off by a half turn and the Z-analog by a quarter turn.
pub const EULER_CORRECTION_DEG: [f64; 3] = [0.0, 180.0, -90.0];

/// Remap a Z-up source position `(x, y, z)` into the Y-up scene frame as `(x, -z, y)`.
///
/// Not an involution: applying it twice yields `(x, -y, -z)`.
pub fn remap_z_up_to_y_up(v: [f64; 3]) -> DVec3 {
    DVec3::new(v[0], -v[2], v[1])
}

/// Quaternion for Euler angles in radians, axis order X-Y-Z (X applied first).
pub fn quat_from_euler_xyz(angles: DVec3) -> DQuat {
    DQuat::from_rotation_z(angles.z)
        * DQuat::from_rotation_y(angles.y)
        * DQuat::from_rotation_x(angles.x)
}

/// Euler angles in radians, axis order X-Y-Z, inverse of [`quat_from_euler_xyz`].
///
/// The Y component is returned in `[-pi/2, pi/2]`; at gimbal lock the Z component is zero.
pub fn euler_xyz_from_quat(q: DQuat) -> DVec3 {
    let m = DMat3::from_quat(q.normalize());
    // Row/column naming: m_rc = m.col(c)[r].
    let m20 = m.x_axis.z;
    let sy = (-m20).clamp(-1.0, 1.0);
    let y = sy.asin();
    let cy = (1.0 - sy * sy).sqrt();

    if cy > 1e-6 {
        let x = m.y_axis.z.atan2(m.z_axis.z);
        let z = m.x_axis.y.atan2(m.x_axis.x);
        DVec3::new(x, y, z)
    } else {
        let x = (-m.z_axis.y).atan2(m.y_axis.y);
        DVec3::new(x, y, 0.0)
    }
}

/// Quaternion for a pose document's Euler triple in degrees, corrections included.
pub fn quat_from_pose_euler_deg(angles: [f64; 3]) -> DQuat {
    let corrected = DVec3::new(
        (angles[0] + EULER_CORRECTION_DEG[0]).to_radians(),
        (angles[1] + EULER_CORRECTION_DEG[1]).to_radians(),
        (angles[2] + EULER_CORRECTION_DEG[2]).to_radians(),
    );
    quat_from_euler_xyz(corrected)
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Focal length in millimetres for a vertical field of view and sensor height.
pub fn focal_length_from_fovy(fovy_deg: f64, sensor_mm: f64) -> f64 {
    let half = (fovy_deg.to_radians() * 0.5).tan();
    if half <= f64::EPSILON {
        return f64::INFINITY;
    }
    sensor_mm * 0.5 / half
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
