//! Angle and polar-coordinate helpers. All angles are radians.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

/// Point at `angle` and distance `len` from the origin.
pub fn from_angle(angle: f32, len: f32) -> Vec2 {
    Vec2::from_angle(angle) * len
}

/// Direction of `v` in `[-π, π]`.
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Rotate `v` counterclockwise by `angle`.
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Wrap into `[0, 2π)`.
pub fn norm_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Signed shortest rotation from `a` to `b`, in `[-π, π)`.
pub fn angle_diff(a: f32, b: f32) -> f32 {
    norm_angle(b - a + PI) - PI
}

/// Angular rate of something moving at linear speed `arc` on a circle of `radius`.
pub fn arc_to_angle(arc: f32, radius: f32) -> f32 {
    arc / radius
}

/// Center of the fixed-width window that contains `value`.
pub fn window_center(value: f32, width: f32) -> f32 {
    (value / width).floor() * width + width * 0.5
}

/// Index of the fixed-width window that contains `value`.
pub fn window_index(value: f32, width: f32) -> i32 {
    (value / width).floor() as i32
}

/// Half of the angle subtended by a sphere of `radius` seen from `dist`.
pub fn angular_width_of_sphere(radius: f32, dist: f32) -> f32 {
    if dist <= radius {
        return PI;
    }
    (radius / dist).asin()
}

/// 2D cross product (z component).
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_diff_wraps() {
        let d = angle_diff(TAU - 0.1, 0.1);
        assert!((d - 0.2).abs() < 1e-5, "Expected +0.2, got {d}");
        let d = angle_diff(0.1, TAU - 0.1);
        assert!((d + 0.2).abs() < 1e-5, "Expected -0.2, got {d}");
    }

    #[test]
    fn test_window_center() {
        assert_eq!(window_center(7.0, 5.0), 7.5);
        assert_eq!(window_center(-1.0, 5.0), -2.5);
        assert_eq!(window_index(7.0, 5.0), 1);
    }

    #[test]
    fn test_from_angle_and_back() {
        let v = from_angle(1.0, 3.0);
        assert!((v.length() - 3.0).abs() < 1e-5);
        assert!((angle_of(v) - 1.0).abs() < 1e-5);
        let r = rotate(Vec2::X, PI / 2.0);
        assert!((r - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_angular_width() {
        assert_eq!(angular_width_of_sphere(2.0, 1.0), PI);
        let w = angular_width_of_sphere(1.0, 2.0);
        assert!((w - PI / 6.0).abs() < 1e-5);
    }
}
