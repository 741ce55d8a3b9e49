//! wgpu render backend for the lights demo.
//!
//! Draws every visible mesh of a [`lightbench_scene::Scene`] lit by its
//! visible lights into an offscreen target sized to the drawing buffer, then
//! stretches that target over the window surface.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - Geometry is uploaded once per mesh node; transforms, materials and
//!   lights are re-read every frame.

mod gpu;
mod shaders;

pub use gpu::{MAX_LIGHTS, WgpuRenderer};
