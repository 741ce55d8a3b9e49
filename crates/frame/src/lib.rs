//! Per-frame driving of the composed scene.
//!
//! # Invariants
//! - Animation is a function of wall-clock time since the first frame, not of
//!   the number of frames produced.
//! - Resize and frame updates write disjoint state (camera projection vs. mesh
//!   rotation and camera placement), so their relative order does not matter.

mod clock;
mod controls;
mod driver;
mod viewport;

pub use clock::Clock;
pub use controls::OrbitControls;
pub use driver::{DriverState, Frame, FrameDriver, spin};
pub use viewport::{MAX_PIXEL_RATIO, Viewport};
