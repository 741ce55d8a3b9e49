use std::time::Instant;

use lightbench_common::NodeId;
use lightbench_scene::{DemoScene, Scene, SceneError};

use crate::clock::Clock;
use crate::controls::OrbitControls;
use crate::viewport::Viewport;

/// Angular speed about Y, radians per second.
const SPIN_Y: f32 = 0.1;
/// Angular speed about X, radians per second.
const SPIN_X: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No frame produced yet.
    Idle,
    Rendering,
    /// The host stopped delivering frames (minimised, occluded, suspended).
    Suspended,
}

/// What one call to [`FrameDriver::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Zero-based frame counter.
    pub index: u64,
    /// Seconds since the first frame.
    pub elapsed: f32,
}

/// Advances the scene once per displayed frame and tracks the viewport.
#[derive(Debug)]
pub struct FrameDriver {
    clock: Clock,
    state: DriverState,
    viewport: Viewport,
    frames: u64,
}

impl FrameDriver {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            clock: Clock::new(),
            state: DriverState::Idle,
            viewport,
            frames: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether the host should be asked for another frame.
    pub fn wants_frames(&self) -> bool {
        self.state != DriverState::Suspended
    }

    pub fn suspend(&mut self) {
        if self.state != DriverState::Suspended {
            tracing::info!("frame driver suspended after {} frames", self.frames);
            self.state = DriverState::Suspended;
        }
    }

    pub fn resume(&mut self) {
        if self.state == DriverState::Suspended {
            self.state = if self.frames == 0 {
                DriverState::Idle
            } else {
                DriverState::Rendering
            };
            tracing::info!("frame driver resumed");
        }
    }

    /// Animate meshes and step the camera controls for the current instant.
    pub fn advance(
        &mut self,
        demo: &mut DemoScene,
        controls: &mut OrbitControls,
    ) -> Result<Frame, SceneError> {
        self.advance_at(demo, controls, Instant::now())
    }

    pub fn advance_at(
        &mut self,
        demo: &mut DemoScene,
        controls: &mut OrbitControls,
        now: Instant,
    ) -> Result<Frame, SceneError> {
        let elapsed = self.clock.elapsed_at(now);
        spin(&mut demo.scene, &demo.handles.spinning(), elapsed)?;

        let camera = demo.scene.node_mut(demo.handles.camera)?;
        controls.update(&mut camera.transform);

        if self.state == DriverState::Idle {
            tracing::debug!("first frame");
        }
        self.state = DriverState::Rendering;
        let frame = Frame {
            index: self.frames,
            elapsed,
        };
        self.frames += 1;
        Ok(frame)
    }

    /// Track a new window size: refresh the camera aspect and projection and
    /// return the drawing-buffer size the renderer should use.
    pub fn resize(
        &mut self,
        demo: &mut DemoScene,
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
    ) -> Result<(u32, u32), SceneError> {
        self.viewport.set(width, height, device_pixel_ratio);

        let camera = demo.scene.camera_mut(demo.handles.camera)?;
        camera.aspect = self.viewport.aspect();
        camera.update_projection_matrix();

        let size = self.viewport.drawing_buffer_size();
        tracing::info!(
            "viewport {}x{} @{} -> drawing buffer {}x{}",
            width,
            height,
            self.viewport.pixel_ratio,
            size.0,
            size.1
        );
        Ok(size)
    }
}

/// Set the time-based rotation of `ids` for `elapsed` seconds.
pub fn spin(scene: &mut Scene, ids: &[NodeId], elapsed: f32) -> Result<(), SceneError> {
    for &id in ids {
        let rotation = &mut scene.node_mut(id)?.transform.rotation;
        rotation.y = SPIN_Y * elapsed;
        rotation.x = SPIN_X * elapsed;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use lightbench_common::Euler;
    use lightbench_scene::compose;
    use std::f32::consts::PI;
    use std::time::Duration;

    fn setup() -> (FrameDriver, DemoScene, OrbitControls) {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        (
            FrameDriver::new(viewport),
            compose(viewport.aspect()),
            OrbitControls::damped(),
        )
    }

    #[test]
    fn rotation_tracks_elapsed_time() {
        let (mut driver, mut demo, mut controls) = setup();
        let t0 = Instant::now();
        for secs in [0.0_f32, 0.5, 1.0, 7.25, 120.0] {
            let now = t0 + Duration::from_secs_f32(secs);
            let frame = driver.advance_at(&mut demo, &mut controls, now).unwrap();
            assert!((frame.elapsed - secs).abs() < 1e-4);
            for id in demo.handles.spinning() {
                let r = demo.scene.node(id).unwrap().transform.rotation;
                assert!((r.y - 0.1 * frame.elapsed).abs() < 1e-6);
                assert!((r.x - 0.15 * frame.elapsed).abs() < 1e-6);
            }
            let plane = demo.scene.node(demo.handles.plane).unwrap();
            assert_eq!(plane.transform.rotation, Euler::new(-PI * 0.5, 0.0, 0.0));
        }
    }

    #[test]
    fn clock_starts_at_first_frame_not_composition() {
        let (mut driver, mut demo, mut controls) = setup();
        let later = Instant::now() + Duration::from_secs(5);
        let frame = driver.advance_at(&mut demo, &mut controls, later).unwrap();
        assert_eq!(frame.elapsed, 0.0);
        assert_eq!(frame.index, 0);
    }

    #[test]
    fn rotation_ignores_frame_rate() {
        let (mut slow, mut a, mut ca) = setup();
        let (mut fast, mut b, mut cb) = setup();
        let t0 = Instant::now();
        slow.advance_at(&mut a, &mut ca, t0).unwrap();
        fast.advance_at(&mut b, &mut cb, t0).unwrap();
        for i in 1..=60 {
            fast.advance_at(&mut b, &mut cb, t0 + Duration::from_millis(i * 50))
                .unwrap();
        }
        slow.advance_at(&mut a, &mut ca, t0 + Duration::from_secs(3))
            .unwrap();
        let ra = a.scene.node(a.handles.cube).unwrap().transform.rotation;
        let rb = b.scene.node(b.handles.cube).unwrap().transform.rotation;
        assert!((ra.y - rb.y).abs() < 1e-5);
        assert_eq!(slow.frames(), 2);
        assert_eq!(fast.frames(), 61);
    }

    #[test]
    fn rect_light_orientation_survives_ticks() {
        let (mut driver, mut demo, mut controls) = setup();
        let before = demo.scene.node(demo.handles.rect_area).unwrap().transform;
        let t0 = Instant::now();
        for i in 0..100 {
            driver
                .advance_at(&mut demo, &mut controls, t0 + Duration::from_millis(i * 16))
                .unwrap();
        }
        let after = demo.scene.node(demo.handles.rect_area).unwrap().transform;
        assert_eq!(before, after);
    }

    #[test]
    fn lights_untouched_by_frames() {
        let (mut driver, mut demo, mut controls) = setup();
        let before: Vec<_> = demo.scene.lights().map(|(_, n, l)| (n.transform, *l)).collect();
        driver.advance(&mut demo, &mut controls).unwrap();
        let after: Vec<_> = demo.scene.lights().map(|(_, n, l)| (n.transform, *l)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn state_machine() {
        let (mut driver, mut demo, mut controls) = setup();
        assert_eq!(driver.state(), DriverState::Idle);
        driver.suspend();
        assert!(!driver.wants_frames());
        driver.resume();
        assert_eq!(driver.state(), DriverState::Idle);

        driver.advance(&mut demo, &mut controls).unwrap();
        assert_eq!(driver.state(), DriverState::Rendering);
        driver.suspend();
        assert_eq!(driver.state(), DriverState::Suspended);
        driver.resume();
        assert_eq!(driver.state(), DriverState::Rendering);
        assert!(driver.wants_frames());
    }

    #[test]
    fn suspension_keeps_wall_clock() {
        let (mut driver, mut demo, mut controls) = setup();
        let t0 = Instant::now();
        driver.advance_at(&mut demo, &mut controls, t0).unwrap();
        driver.suspend();
        driver.resume();
        let frame = driver
            .advance_at(&mut demo, &mut controls, t0 + Duration::from_secs(10))
            .unwrap();
        assert!((frame.elapsed - 10.0).abs() < 1e-4);
    }

    #[test]
    fn resize_updates_camera_and_buffer() {
        let (mut driver, mut demo, _) = setup();
        let size = driver.resize(&mut demo, 1600.0, 300.0, 1.0).unwrap();
        assert_eq!(size, (1600, 300));

        let cam = demo.scene.camera(demo.handles.camera).unwrap();
        assert!((cam.aspect - 1600.0 / 300.0).abs() < 1e-5);
        let expected = Mat4::perspective_rh(75.0_f32.to_radians(), cam.aspect, 0.1, 100.0);
        assert_eq!(cam.projection_matrix(), expected);
    }

    #[test]
    fn resize_caps_pixel_ratio() {
        let (mut driver, mut demo, _) = setup();
        let size = driver.resize(&mut demo, 1600.0, 300.0, 3.0).unwrap();
        assert_eq!(driver.viewport().pixel_ratio, 2.0);
        assert_eq!(size, (3200, 600));

        let size = driver.resize(&mut demo, 1600.0, 300.0, 1.25).unwrap();
        assert_eq!(driver.viewport().pixel_ratio, 1.25);
        assert_eq!(size, (2000, 375));
    }

    #[test]
    fn orbit_controls_aim_camera_each_frame() {
        let (mut driver, mut demo, mut controls) = setup();
        driver.advance(&mut demo, &mut controls).unwrap();
        let cam = demo.scene.node(demo.handles.camera).unwrap().transform;
        let to_origin = (-cam.position).normalize();
        assert!(cam.forward().abs_diff_eq(to_origin, 1e-5));
    }
}
