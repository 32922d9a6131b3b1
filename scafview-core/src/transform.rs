//! 4x4 homogeneous transform builders
use nalgebra::{Matrix4, Vector3};

/// Transform builder for the part pipeline
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(tx, ty, tz))
    }

    /// Create a rotation matrix around the Z axis (angle in degrees)
    pub fn rotation_z(degrees: f64) -> Matrix4<f64> {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        m
    }
}

/// Scene-wide transform applied on top of every part's own matrix
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExtraTransform {
    /// Rotation around Z in degrees
    pub rotation_z: Option<f64>,
    pub translation: Vector3<f64>,
}

impl ExtraTransform {
    pub fn new(rotation_z: Option<f64>, tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            rotation_z,
            translation: Vector3::new(tx, ty, tz),
        }
    }

    /// Compose the matrix: rotation first, then translation (`T * R`)
    pub fn matrix(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        if let Some(degrees) = self.rotation_z {
            m = Transform::rotation_z(degrees) * m;
        }
        if self.translation != Vector3::zeros() {
            let t = self.translation;
            m = Transform::translation(t.x, t.y, t.z) * m;
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix3, Vector4};

    #[test]
    fn test_rotation_z_quarter_turn() {
        let p = Transform::rotation_z(90.0) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p - Vector4::new(0.0, 1.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_translation_column() {
        let m = Transform::translation(1.0, -2.0, 3.5);
        assert_eq!(m[(0, 3)], 1.0);
        assert_eq!(m[(1, 3)], -2.0);
        assert_eq!(m[(2, 3)], 3.5);
        assert_eq!(m.fixed_view::<3, 3>(0, 0).into_owned(), Matrix3::identity());
    }

    #[test]
    fn test_empty_extra_is_identity() {
        assert_eq!(ExtraTransform::default().matrix(), Matrix4::identity());
        assert_eq!(
            ExtraTransform::new(Some(0.0), 0.0, 0.0, 0.0).matrix(),
            Matrix4::identity()
        );
    }

    #[test]
    fn test_extra_rotates_before_translating() {
        let m = ExtraTransform::new(Some(90.0), 1.0, 0.0, 0.0).matrix();
        let p = m * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) -> rotate -> (0,1,0) -> translate -> (1,1,0)
        assert!((p - Vector4::new(1.0, 1.0, 0.0, 1.0)).norm() < 1e-12);
    }
}
