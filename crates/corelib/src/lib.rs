//! Core shared types: math re-exports and the model Transform.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod transform;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn translate_then_scale_matrix() {
        let mut t = Transform::identity();
        t.translation = vec3(1.0, 2.0, 3.0);
        t.set_scale(2.0);
        // Last column = translation, diagonal = scale (no rotation).
        let m = t.matrix().to_cols_array();
        assert!((m[12] - 1.0).abs() < 1e-6);
        assert!((m[13] - 2.0).abs() < 1e-6);
        assert!((m[14] - 3.0).abs() < 1e-6);
        assert!((m[0] - 2.0).abs() < 1e-6);
        assert!((m[5] - 2.0).abs() < 1e-6);
        assert!((m[10] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_is_given_in_degrees() {
        let mut t = Transform::identity();
        t.rotation_deg = vec3(0.0, 90.0, 0.0);
        // 90 degrees about Y maps +X to -Z.
        let p = t.matrix().transform_point3(vec3(1.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-6);
        assert!((p.z + 1.0).abs() < 1e-6);
    }
}
