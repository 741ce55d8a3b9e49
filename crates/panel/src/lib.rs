//! Parameter panel: tunable light and material fields exposed as widgets.
//!
//! A [`Panel`] is a declarative tree of folders and controls. Each control
//! holds a [`Binding`] naming a scene node (or material) and one of its
//! fields. Drawing the panel reads the field straight from the scene and
//! writes edits straight back, so there is no copy to keep in sync.
//!
//! # Invariants
//! - Controls never cache field values between frames.
//! - Number edits are snapped to the control's step, then clamped to its range.

mod bind;
mod binding;
mod panel;
mod ui;

pub use bind::bind;
pub use binding::{BindError, Binding, Field, Target, Value};
pub use panel::{Control, ControlKind, Folder, NumberRange, Panel};
pub use ui::show;
