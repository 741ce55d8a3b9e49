use glam::Mat4;

/// Perspective projection parameters. Position and orientation live on the
/// owning node's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_degrees,
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Recompute the cached projection after editing any public field.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    /// Projection as of the last [`update_projection_matrix`](Self::update_projection_matrix).
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_cached_until_updated() {
        let mut cam = PerspectiveCamera::new(75.0, 800.0 / 600.0, 0.1, 100.0);
        let before = cam.projection_matrix();
        assert!(!before.col(0).x.is_nan());

        cam.aspect = 2.0;
        assert_eq!(cam.projection_matrix(), before);

        cam.update_projection_matrix();
        assert_ne!(cam.projection_matrix(), before);
        let expected = Mat4::perspective_rh(75.0_f32.to_radians(), 2.0, 0.1, 100.0);
        assert_eq!(cam.projection_matrix(), expected);
    }
}
