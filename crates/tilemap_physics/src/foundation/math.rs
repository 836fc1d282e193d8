//! Math utilities and types
//!
//! Provides the 2D vector type used by every geometry and physics routine.
//! Level coordinates are screen-style: x grows to the right, y grows down.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Operations on [`Vec2`] that nalgebra does not provide under these names
pub trait VectorExt {
    /// 2D cross product (`x1 * y2 - y1 * x2`)
    fn perp_dot(&self, other: &Self) -> f32;

    /// Vector rotated by a quarter turn: `(-y, x)`
    fn perpendicular(&self) -> Self;

    /// Vector rotated by `angle` radians
    ///
    /// Uses the matrix `[cos, sin; -sin, cos]`. Every rotation in the crate
    /// (rectangle objects, polygons, body shapes) goes through this method so
    /// the handedness stays consistent.
    fn rotated(&self, angle: f32) -> Self;

    /// Unit vector in the same direction, or the zero vector for zero length
    fn normalized_or_zero(&self) -> Self;
}

impl VectorExt for Vec2 {
    fn perp_dot(&self, other: &Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    fn perpendicular(&self) -> Self {
        Vec2::new(-self.y, self.x)
    }

    fn rotated(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(cos * self.x + sin * self.y, -sin * self.x + cos * self.y)
    }

    fn normalized_or_zero(&self) -> Self {
        let length = self.norm();
        if length == 0.0 {
            Vec2::zeros()
        } else {
            self / length
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_normalized_zero_vector_is_zero() {
        assert_eq!(Vec2::zeros().normalized_or_zero(), Vec2::zeros());
    }

    #[test]
    fn test_normalized_has_unit_length() {
        let v = Vec2::new(3.0, -4.0).normalized_or_zero();
        assert_relative_eq!(v.norm(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(v, Vec2::new(0.6, -0.8), epsilon = EPSILON);
    }

    #[test]
    fn test_perpendicular_and_perp_dot() {
        let v = Vec2::new(2.0, 1.0);
        let p = v.perpendicular();
        assert_eq!(p, Vec2::new(-1.0, 2.0));
        assert_eq!(v.dot(&p), 0.0);
        assert_eq!(Vec2::new(1.0, 0.0).perp_dot(&Vec2::new(0.0, 1.0)), 1.0);
        assert_eq!(Vec2::new(0.0, 1.0).perp_dot(&Vec2::new(1.0, 0.0)), -1.0);
    }

    #[test]
    fn test_rotation_handedness() {
        // Positive angles turn +x towards -y
        let rotated = Vec2::new(1.0, 0.0).rotated(FRAC_PI_2);
        assert_relative_eq!(rotated, Vec2::new(0.0, -1.0), epsilon = EPSILON);

        let back = rotated.rotated(-FRAC_PI_2);
        assert_relative_eq!(back, Vec2::new(1.0, 0.0), epsilon = EPSILON);
    }
}
