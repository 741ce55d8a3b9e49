//! Shared value types for the lightbench workspace.

mod color;
mod types;

pub use color::Color;
pub use types::{Euler, NodeId, Transform};
