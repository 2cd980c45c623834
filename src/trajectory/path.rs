use crate::foundation::core::DVec3;

/// One cubic Bezier span of the trajectory path.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PathSegment {
    /// Start point.
    pub p0: DVec3,
    /// First control point.
    pub c1: DVec3,
    /// Second control point.
    pub c2: DVec3,
    /// End point.
    pub p1: DVec3,
}

impl PathSegment {
    /// Point at `t` in `[0, 1]`.
    pub fn eval(&self, t: f64) -> DVec3 {
        let t = t.clamp(0.0, 1.0);
        let mt = 1.0 - t;
        self.p0 * (mt * mt * mt)
            + self.c1 * (3.0 * mt * mt * t)
            + self.c2 * (3.0 * mt * t * t)
            + self.p1 * (t * t * t)
    }
}

/// Smoothed, decimated camera path; a visualization aid only.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct TrajectoryPath {
    /// Control points kept after decimation, already offset by `display_offset`.
    pub points: Vec<DVec3>,
    /// Bezier spans between consecutive control points.
    pub segments: Vec<PathSegment>,
    /// Offset applied to every point so the path does not clip the camera view.
    pub display_offset: DVec3,
}

impl TrajectoryPath {
    /// Decimate `positions` to `keep_fraction` of their count and fit a smooth curve.
    pub fn build(positions: &[DVec3], keep_fraction: f64, display_offset: DVec3) -> Self {
        let kept = decimate(positions, keep_fraction);
        let points: Vec<DVec3> = kept.iter().map(|&i| positions[i] + display_offset).collect();
        let segments = catmull_rom_segments(&points);
        Self {
            points,
            segments,
            display_offset,
        }
    }

    /// Point at normalized arc parameter `u` in `[0, 1]` (uniform per segment).
    pub fn sample(&self, u: f64) -> Option<DVec3> {
        if self.segments.is_empty() {
            return self.points.first().copied();
        }
        let n = self.segments.len();
        let x = u.clamp(0.0, 1.0) * n as f64;
        let i = (x.floor() as usize).min(n - 1);
        Some(self.segments[i].eval(x - i as f64))
    }
}

/// Indices of the points kept when decimating to `keep_fraction`.
///
/// Keeps `max(2, ceil(n * keep_fraction))` points including both endpoints. Interior points
/// are removed one at a time by least distance to the chord of their current neighbours,
/// lowest index first on ties.
pub fn decimate(positions: &[DVec3], keep_fraction: f64) -> Vec<usize> {
    let n = positions.len();
    if n <= 2 {
        return (0..n).collect();
    }

    let target = ((n as f64 * keep_fraction.clamp(0.0, 1.0)).ceil() as usize).clamp(2, n);
    let mut kept: Vec<usize> = (0..n).collect();

    while kept.len() > target {
        let mut best = 1;
        let mut best_d = f64::INFINITY;
        for j in 1..kept.len() - 1 {
            let d = distance_to_segment(
                positions[kept[j]],
                positions[kept[j - 1]],
                positions[kept[j + 1]],
            );
            if d < best_d {
                best_d = d;
                best = j;
            }
        }
        kept.remove(best);
    }
    kept
}

fn distance_to_segment(p: DVec3, a: DVec3, b: DVec3) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn catmull_rom_segments(points: &[DVec3]) -> Vec<PathSegment> {
    let n = points.len();
    (0..n.saturating_sub(1))
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let p0 = points[i];
            let p1 = points[i + 1];
            let next = points[(i + 2).min(n - 1)];
            PathSegment {
                p0,
                c1: p0 + (p1 - prev) / 6.0,
                c2: p1 - (next - p0) / 6.0,
                p1,
            }
        })
        .collect()
}
