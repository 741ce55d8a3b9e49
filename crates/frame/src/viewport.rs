/// Upper bound on the device pixel ratio used for the drawing buffer.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Window size in logical pixels plus the pixel ratio the renderer draws at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: capped(device_pixel_ratio),
        }
    }

    pub fn set(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
        *self = Self::new(width, height, device_pixel_ratio);
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height.max(1.0)) as f32
    }

    /// Size of the render output in physical pixels, never below 1×1.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let scale = |v: f64| ((v * self.pixel_ratio).floor() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

fn capped(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}
