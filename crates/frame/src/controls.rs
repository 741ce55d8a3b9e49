use std::f32::consts::{PI, TAU};

use glam::Vec3;
use lightbench_common::Transform;

const EPS: f32 = 1e-6;

/// Position relative to the orbit target: radius, azimuth around +Y measured
/// from +Z, and polar angle measured from +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius <= EPS {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let ring = self.phi.sin() * self.radius;
        Vec3::new(
            ring * self.theta.sin(),
            self.phi.cos() * self.radius,
            ring * self.theta.cos(),
        )
    }
}

/// Orbit camera controls with optional damping.
///
/// Pointer input accumulates into pending deltas; [`update`](Self::update)
/// applies them to a camera transform. With damping on, only a fraction of
/// each pending delta is applied per update and the rest decays, so the
/// camera keeps gliding after the pointer stops.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    /// Controls orbiting the origin with damping enabled.
    pub fn damped() -> Self {
        Self {
            enable_damping: true,
            ..Self::default()
        }
    }

    /// Pointer drag of `dx`, `dy` pixels on a viewport `viewport_height` tall.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.delta.theta -= TAU * dx / h * self.rotate_speed;
        self.delta.phi -= TAU * dy / h * self.rotate_speed;
    }

    /// Wheel input; positive steps move towards the target.
    pub fn zoom(&mut self, steps: f32) {
        self.scale *= 0.95_f32.powf(self.zoom_speed * steps);
    }

    /// Screen-space pan of `dx`, `dy` pixels.
    pub fn pan(
        &mut self,
        dx: f32,
        dy: f32,
        viewport_height: f32,
        camera: &Transform,
        fov_degrees: f32,
    ) {
        let h = viewport_height.max(1.0);
        let distance = (camera.position - self.target).length()
            * (fov_degrees.to_radians() * 0.5).tan();
        let rotation = camera.rotation.to_quat();
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        let k = 2.0 * distance / h * self.pan_speed;
        self.pan_offset += up * (dy * k) - right * (dx * k);
    }

    /// Whether any rotate, zoom or pan input is still waiting to be applied.
    #[cfg(test)]
    fn has_pending_motion(&self) -> bool {
        self.delta.theta.abs() > EPS
            || self.delta.phi.abs() > EPS
            || (self.scale - 1.0).abs() > EPS
            || self.pan_offset.length_squared() > EPS * EPS
    }

    /// Apply pending input to `camera` and aim it at the target. Returns
    /// whether the camera moved.
    pub fn update(&mut self, camera: &mut Transform) -> bool {
        let before = camera.position;
        let mut s = Spherical::from_offset(camera.position - self.target);

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        s.theta += self.delta.theta * factor;
        s.phi += self.delta.phi * factor;
        s.phi = s
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        s.radius = (s.radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * factor;

        camera.position = self.target + s.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            self.delta.theta *= 1.0 - self.damping_factor;
            self.delta.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        before.distance_squared(camera.position) > EPS
    }
}
