use glam::{EulerRot, Mat4, Quat, Vec3};
use uuid::Uuid;

/// Unique identifier for a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for logs and debug labels.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotation as intrinsic X, then Y, then Z angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Euler {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, self.z)
    }

    pub fn from_quat(q: Quat) -> Self {
        let (x, y, z) = q.to_euler(EulerRot::XYZ);
        Self { x, y, z }
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Euler,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Euler::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Local-to-world matrix (the scene graph is flat, so local is world).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation.to_quat(), self.position)
    }

    /// Orient so the local -Z axis points at `target`, keeping +Y as up.
    ///
    /// A target coincident with the position leaves the rotation untouched.
    pub fn look_at(&mut self, target: Vec3) {
        let back = self.position - target;
        if back.length_squared() <= f32::EPSILON {
            return;
        }
        let z = back.normalize();
        let mut x = Vec3::Y.cross(z);
        if x.length_squared() <= f32::EPSILON {
            // Looking straight up or down; pick any perpendicular.
            x = Vec3::X;
        }
        let x = x.normalize();
        let y = z.cross(x);
        let basis = glam::Mat3::from_cols(x, y, z);
        self.rotation = Euler::from_quat(Quat::from_mat3(&basis));
    }

    /// Direction the local -Z axis points in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation.to_quat() * Vec3::NEG_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_uniqueness() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Euler::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn euler_quat_round_trip() {
        let e = Euler::new(0.3, -0.2, 0.1);
        let back = Euler::from_quat(e.to_quat());
        assert!((back.x - e.x).abs() < 1e-5);
        assert!((back.y - e.y).abs() < 1e-5);
        assert!((back.z - e.z).abs() < 1e-5);
    }

    #[test]
    fn look_at_faces_target() {
        let mut t = Transform::from_position(Vec3::new(-1.5, 0.0, 1.5));
        t.look_at(Vec3::ZERO);
        let expected = (Vec3::ZERO - t.position).normalize();
        assert!(t.forward().abs_diff_eq(expected, 1e-5));
        assert!((t.rotation.y + std::f32::consts::FRAC_PI_4).abs() < 1e-5);
    }

    #[test]
    fn look_at_straight_down() {
        let mut t = Transform::from_position(Vec3::new(0.0, 3.0, 0.0));
        t.look_at(Vec3::ZERO);
        assert!(t.forward().abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn look_at_self_is_noop() {
        let mut t = Transform::from_position(Vec3::ONE);
        t.look_at(Vec3::ONE);
        assert_eq!(t.rotation, Euler::ZERO);
    }
}
