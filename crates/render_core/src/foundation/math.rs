//! Math utilities and types
//!
//! Provides the 2D math used by cameras, scene objects and render stages.
//! Transforms are 3x3 homogeneous matrices; rotations are unit complex numbers
//! so that blending between two orientations can take the shorter arc.

pub use nalgebra::{Matrix3, UnitComplex, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 homogeneous matrix type for 2D transforms
pub type Mat3 = Matrix3<f32>;

/// 2D rotation stored as a unit complex number
pub type Rotation2 = UnitComplex<f32>;

/// Linear blend between two positions
///
/// `t = 0` yields `from`, `t = 1` yields `to`.
pub fn lerp_vec2(from: &Vec2, to: &Vec2, t: f32) -> Vec2 {
    to * t + from * (1.0 - t)
}

/// Spherical blend between two rotations along the shorter arc
///
/// Blending raw angles breaks at the wrap-around boundary (e.g. 170° to -170°
/// would sweep through 0°). The relative rotation between the two samples is
/// always expressed in `(-π, π]`, so scaling it by `t` follows the short way.
pub fn slerp_rotation(from: &Rotation2, to: &Rotation2, t: f32) -> Rotation2 {
    let delta = to * from.inverse();
    from * Rotation2::new(delta.angle() * t)
}

/// Orthographic projection for 2D rendering
///
/// Maps `[left, right] x [bottom, top]` onto normalized device coordinates
/// `[-1, 1] x [-1, 1]`. Degenerate bounds yield the identity matrix.
pub fn orthographic_2d(left: f32, right: f32, bottom: f32, top: f32) -> Mat3 {
    let width = right - left;
    let height = top - bottom;
    if width.abs() <= f32::EPSILON || height.abs() <= f32::EPSILON {
        return Mat3::identity();
    }

    Mat3::new(
        2.0 / width, 0.0, -(right + left) / width,
        0.0, 2.0 / height, -(top + bottom) / height,
        0.0, 0.0, 1.0,
    )
}

/// Model transform: rotate about the origin, then translate
pub fn transform_2d(position: &Vec2, rotation: &Rotation2) -> Mat3 {
    Mat3::new_translation(position) * rotation.to_homogeneous()
}

/// View transform: the inverse of a camera placed at `position` with `rotation`
pub fn view_2d(position: &Vec2, rotation: &Rotation2) -> Mat3 {
    rotation.inverse().to_homogeneous() * Mat3::new_translation(&-position)
}

/// Applies a homogeneous 2D transform to a point
pub fn transform_point(matrix: &Mat3, point: &Vec2) -> Vec2 {
    let p = matrix * nalgebra::Vector3::new(point.x, point.y, 1.0);
    Vec2::new(p.x / p.z, p.y / p.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_lerp_endpoints() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 6.0);

        assert_relative_eq!(lerp_vec2(&a, &b, 0.0), a, epsilon = EPSILON);
        assert_relative_eq!(lerp_vec2(&a, &b, 1.0), b, epsilon = EPSILON);
        assert_relative_eq!(lerp_vec2(&a, &b, 0.5), Vec2::new(2.0, 4.0), epsilon = EPSILON);
    }

    #[test]
    fn test_slerp_takes_shorter_arc_across_wrap() {
        let from = Rotation2::new(PI - 0.1);
        let to = Rotation2::new(-PI + 0.1);

        // Halfway along the short arc is exactly at ±π, not at 0
        let mid = slerp_rotation(&from, &to, 0.5);
        assert_relative_eq!(mid.angle().abs(), PI, epsilon = 1e-4);
    }

    #[test]
    fn test_slerp_endpoints() {
        let from = Rotation2::new(0.3);
        let to = Rotation2::new(1.2);

        assert_relative_eq!(slerp_rotation(&from, &to, 0.0).angle(), 0.3, epsilon = EPSILON);
        assert_relative_eq!(slerp_rotation(&from, &to, 1.0).angle(), 1.2, epsilon = EPSILON);
        assert_relative_eq!(slerp_rotation(&from, &to, 0.5).angle(), 0.75, epsilon = EPSILON);
    }

    #[test]
    fn test_orthographic_maps_bounds_to_ndc() {
        let projection = orthographic_2d(-4.0, 4.0, -2.0, 2.0);

        let corner = transform_point(&projection, &Vec2::new(4.0, 2.0));
        assert_relative_eq!(corner, Vec2::new(1.0, 1.0), epsilon = EPSILON);

        let other = transform_point(&projection, &Vec2::new(-4.0, -2.0));
        assert_relative_eq!(other, Vec2::new(-1.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_degenerate_orthographic_is_identity() {
        assert_eq!(orthographic_2d(1.0, 1.0, 0.0, 1.0), Mat3::identity());
    }

    #[test]
    fn test_view_inverts_model() {
        let position = Vec2::new(5.0, -3.0);
        let rotation = Rotation2::new(FRAC_PI_2);

        let model = transform_2d(&position, &rotation);
        let view = view_2d(&position, &rotation);

        assert_relative_eq!(view * model, Mat3::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_transform_rotates_then_translates() {
        let matrix = transform_2d(&Vec2::new(10.0, 0.0), &Rotation2::new(FRAC_PI_2));
        let point = transform_point(&matrix, &Vec2::new(1.0, 0.0));

        assert_relative_eq!(point, Vec2::new(10.0, 1.0), epsilon = EPSILON);
    }
}
