use crate::{EulerRot, Mat4, Quat, Vec3};

/// Smallest uniform scale a model may take; writes below this clamp up.
pub const MIN_SCALE: f32 = 0.1;

/// Model placement: translation, per-axis rotation applied X then Y then
/// Z, and a uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    /// Euler angles in degrees (XYZ order).
    pub rotation_deg: Vec3,
    scale: f32,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_deg: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Back to identity values, as after a fresh load.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set the uniform scale, clamped to [`MIN_SCALE`].
    #[inline]
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(MIN_SCALE);
    }

    /// Adjust the uniform scale by a delta, clamped to [`MIN_SCALE`].
    #[inline]
    pub fn zoom_by(&mut self, delta: f32) {
        self.set_scale(self.scale + delta);
    }

    /// Build matrix = T * R * S (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation_deg.x.to_radians(),
            self.rotation_deg.y.to_radians(),
            self.rotation_deg.z.to_radians(),
        );
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), q, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn scale_clamps_to_floor() {
        let mut t = Transform::identity();
        t.set_scale(0.0);
        assert_eq!(t.scale(), MIN_SCALE);
        t.set_scale(1.0);
        t.zoom_by(-5.0);
        assert_eq!(t.scale(), MIN_SCALE);
        t.zoom_by(0.4);
        assert!((t.scale() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn reset_restores_identity() {
        let mut t = Transform::identity();
        t.translation = vec3(4.0, 5.0, 6.0);
        t.rotation_deg = vec3(10.0, 20.0, 30.0);
        t.set_scale(3.0);
        t.reset();
        assert_eq!(t, Transform::identity());
    }
}
