//! 2D vector algebra and angle helpers.
//!
//! Vectors are `glam::DVec2` values; every function here is pure. Degenerate
//! inputs (zero-length vectors) produce defined zero results instead of NaN.

use glam::DVec2;

/// Convert degrees to radians.
pub fn rads(deg: f64) -> f64 {
    deg.to_radians()
}

/// Convert radians to degrees.
pub fn degs(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Normalize a rotation in degrees to `[0, 360)`.
///
/// Non-finite input maps to `0.0`.
pub fn clamp_rot(rot: f64) -> f64 {
    if !rot.is_finite() {
        return 0.0;
    }
    let r = rot.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Euclidean length of `v`.
pub fn magnitude(v: DVec2) -> f64 {
    v.length()
}

/// Unit vector in the direction of `v`. The zero vector maps to zero.
pub fn unit(v: DVec2) -> DVec2 {
    let len = v.length();
    if len > 0.0 {
        v / len
    } else {
        DVec2::ZERO
    }
}

/// Angle between two vectors in radians, in `[0, π]`.
///
/// Returns `0.0` when either vector has zero length.
pub fn angle_between(a: DVec2, b: DVec2) -> f64 {
    let denom = a.length() * b.length();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Scalar projection of `a` onto `b`: `|a| * cos(angle(b, a))`.
pub fn project(a: DVec2, b: DVec2) -> f64 {
    if b.length() == 0.0 {
        return 0.0;
    }
    a.length() * angle_between(b, a).cos()
}

/// The two normals of `v`: `(-y, x)` and `(y, -x)`.
pub fn normals(v: DVec2) -> [DVec2; 2] {
    [DVec2::new(-v.y, v.x), DVec2::new(v.y, -v.x)]
}

/// Rotate `point` around `pivot` by `rotation` radians.
pub fn rotate_around_point(rotation: f64, pivot: DVec2, point: DVec2) -> DVec2 {
    let (sin, cos) = rotation.sin_cos();
    let t = point - pivot;
    DVec2::new(cos * t.x - sin * t.y, sin * t.x + cos * t.y) + pivot
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn unit_has_length_one_for_nonzero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let v = DVec2::new(rng.gen_range(-1e4..1e4), rng.gen_range(-1e4..1e4));
            if v.length() == 0.0 {
                continue;
            }
            assert!((magnitude(unit(v)) - 1.0).abs() < EPS, "unit({:?})", v);
        }
    }

    #[test]
    fn unit_of_zero_is_zero() {
        let u = unit(DVec2::ZERO);
        assert_eq!(u, DVec2::ZERO);
        assert!(!u.x.is_nan() && !u.y.is_nan());
    }

    #[test]
    fn angle_between_is_in_range_and_clamped() {
        assert!((angle_between(DVec2::X, DVec2::Y) - std::f64::consts::FRAC_PI_2).abs() < EPS);
        assert!((angle_between(DVec2::X, -DVec2::X) - std::f64::consts::PI).abs() < EPS);
        // Nearly parallel vectors push the cosine past 1.0 without clamping
        let a = DVec2::new(0.1, 0.2) * 3.0;
        let b = DVec2::new(0.1, 0.2);
        let angle = angle_between(a, b);
        assert!(!angle.is_nan());
        assert!(angle.abs() < 1e-6);
        assert_eq!(angle_between(DVec2::ZERO, DVec2::X), 0.0);
    }

    #[test]
    fn project_signed_component() {
        let v = DVec2::new(3.0, 4.0);
        assert!((project(v, DVec2::X) - 3.0).abs() < EPS);
        assert!((project(v, -DVec2::Y) + 4.0).abs() < EPS);
        assert_eq!(project(v, DVec2::ZERO), 0.0);
        assert_eq!(project(DVec2::ZERO, DVec2::X), 0.0);
    }

    #[test]
    fn normals_are_perpendicular() {
        let v = DVec2::new(2.0, -5.0);
        let [n1, n2] = normals(v);
        assert_eq!(n1, DVec2::new(5.0, 2.0));
        assert_eq!(n2, DVec2::new(-5.0, -2.0));
        assert_eq!(n1.dot(v), 0.0);
    }

    #[test]
    fn rotate_quarter_turn_about_origin() {
        let p = rotate_around_point(rads(90.0), DVec2::ZERO, DVec2::new(0.0, 1.0));
        assert!((p.x + 1.0).abs() < EPS);
        assert!(p.y.abs() < EPS);
    }

    #[test]
    fn rotate_about_pivot_keeps_distance() {
        let pivot = DVec2::new(10.0, -3.0);
        let p = DVec2::new(13.0, 1.0);
        let r = rotate_around_point(1.234, pivot, p);
        assert!(((r - pivot).length() - 5.0).abs() < EPS);
    }

    #[test]
    fn clamp_rot_known_values() {
        assert_eq!(clamp_rot(0.0), 0.0);
        assert_eq!(clamp_rot(360.0), 0.0);
        assert_eq!(clamp_rot(-360.0), 0.0);
        assert_eq!(clamp_rot(370.0), 10.0);
        assert_eq!(clamp_rot(-10.0), 350.0);
        assert_eq!(clamp_rot(f64::NAN), 0.0);
    }

    #[test]
    fn clamp_rot_total_and_idempotent() {
        let mut rng = StdRng::seed_from_u64(360);
        for _ in 0..2000 {
            let r: f64 = rng.gen_range(-1e7..1e7);
            let c = clamp_rot(r);
            assert!((0.0..360.0).contains(&c), "clamp_rot({}) = {}", r, c);
            assert_eq!(clamp_rot(c), c);
        }
        let tiny = clamp_rot(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }
}
