//! Scene graph for the lights demo.
//!
//! A flat root container holds every light, mesh, camera and aim target.
//! Meshes reference materials by handle, so one material can be shared by
//! many meshes and an edit to it shows up on all of them.
//!
//! # Invariants
//! - Nodes are never removed once composed.
//! - Panel bindings and the frame driver address nodes by `NodeId`; nothing
//!   copies a node out of the scene and writes it back.

mod camera;
mod compose;
mod light;
mod mesh;
mod scene;

pub use camera::PerspectiveCamera;
pub use compose::{DemoScene, SceneHandles, compose};
pub use light::{
    AmbientLight, DirectionalLight, HemisphereLight, Light, PointLight, RectAreaLight, SpotLight,
};
pub use mesh::{Geometry, Material, MaterialHandle, Mesh, MeshBuffers};
pub use scene::{Node, NodeKind, Scene, SceneError};
