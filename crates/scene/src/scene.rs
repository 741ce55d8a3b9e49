use std::collections::BTreeMap;

use glam::{Mat4, Vec3};
use lightbench_common::{NodeId, Transform};

use crate::camera::PerspectiveCamera;
use crate::light::Light;
use crate::mesh::{Material, MaterialHandle, Mesh};

/// Errors from typed scene lookups.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),
    #[error("material {0:?} not found")]
    MaterialNotFound(MaterialHandle),
    #[error("node {id:?} is a {found}, expected a {expected}")]
    KindMismatch {
        id: NodeId,
        expected: &'static str,
        found: &'static str,
    },
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Light(Light),
    Mesh(Mesh),
    Camera(PerspectiveCamera),
    /// Positionable aim point with no appearance of its own.
    Target,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Light(_) => "light",
            Self::Mesh(_) => "mesh",
            Self::Camera(_) => "camera",
            Self::Target => "target",
        }
    }
}

/// One entry in the root container.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub visible: bool,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: impl Into<NodeKind>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            transform: Transform::default(),
            kind: kind.into(),
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Turn the node so its local -Z axis faces `target`.
    pub fn look_at(&mut self, target: Vec3) {
        self.transform.look_at(target);
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }
}

impl From<Light> for NodeKind {
    fn from(light: Light) -> Self {
        Self::Light(light)
    }
}

impl From<Mesh> for NodeKind {
    fn from(mesh: Mesh) -> Self {
        Self::Mesh(mesh)
    }
}

impl From<PerspectiveCamera> for NodeKind {
    fn from(camera: PerspectiveCamera) -> Self {
        Self::Camera(camera)
    }
}

/// The root container.
///
/// Nodes live in a BTreeMap so iteration order is stable for a given set of
/// ids. Materials are stored separately and shared by handle.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    materials: BTreeMap<MaterialHandle, Material>,
    next_material: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a node to the root container. Returns its id.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId::new();
        tracing::debug!("adding {} '{}' as {}", node.kind.name(), node.name, id.short());
        self.nodes.insert(id, node);
        id
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.next_material);
        self.next_material += 1;
        self.materials.insert(handle, material);
        handle
    }

    /// Number of nodes in the root container.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))
    }

    pub fn material(&self, handle: MaterialHandle) -> Result<&Material, SceneError> {
        self.materials
            .get(&handle)
            .ok_or(SceneError::MaterialNotFound(handle))
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> Result<&mut Material, SceneError> {
        self.materials
            .get_mut(&handle)
            .ok_or(SceneError::MaterialNotFound(handle))
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn light(&self, id: NodeId) -> Result<&Light, SceneError> {
        match &self.node(id)?.kind {
            NodeKind::Light(light) => Ok(light),
            other => Err(mismatch(id, "light", other)),
        }
    }

    pub fn light_mut(&mut self, id: NodeId) -> Result<&mut Light, SceneError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Light(light) => Ok(light),
            other => Err(mismatch(id, "light", other)),
        }
    }

    pub fn mesh(&self, id: NodeId) -> Result<&Mesh, SceneError> {
        match &self.node(id)?.kind {
            NodeKind::Mesh(mesh) => Ok(mesh),
            other => Err(mismatch(id, "mesh", other)),
        }
    }

    pub fn camera(&self, id: NodeId) -> Result<&PerspectiveCamera, SceneError> {
        match &self.node(id)?.kind {
            NodeKind::Camera(camera) => Ok(camera),
            other => Err(mismatch(id, "camera", other)),
        }
    }

    pub fn camera_mut(&mut self, id: NodeId) -> Result<&mut PerspectiveCamera, SceneError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Camera(camera) => Ok(camera),
            other => Err(mismatch(id, "camera", other)),
        }
    }

    /// All light nodes, visible or not.
    pub fn lights(&self) -> impl Iterator<Item = (NodeId, &Node, &Light)> {
        self.nodes.iter().filter_map(|(id, node)| match &node.kind {
            NodeKind::Light(light) => Some((*id, node, light)),
            _ => None,
        })
    }

    /// All mesh nodes, visible or not.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Node, &Mesh)> {
        self.nodes.iter().filter_map(|(id, node)| match &node.kind {
            NodeKind::Mesh(mesh) => Some((*id, node, mesh)),
            _ => None,
        })
    }
}

fn mismatch(id: NodeId, expected: &'static str, found: &NodeKind) -> SceneError {
    SceneError::KindMismatch {
        id,
        expected,
        found: found.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::AmbientLight;
    use crate::mesh::Geometry;
    use lightbench_common::Color;

    fn plane(material: MaterialHandle) -> Mesh {
        Mesh {
            geometry: Geometry::Plane {
                width: 1.0,
                height: 1.0,
            },
            material,
        }
    }

    #[test]
    fn scene_starts_empty() {
        let s = Scene::new();
        assert!(s.is_empty());
        assert_eq!(s.material_count(), 0);
    }

    #[test]
    fn add_and_lookup() {
        let mut s = Scene::new();
        let light = s.add(Node::new(
            "ambient",
            Light::from(AmbientLight::new(Color::WHITE, 1.0)),
        ));
        let target = s.add(Node::new("target", NodeKind::Target).with_position(Vec3::X));
        assert_eq!(s.len(), 2);
        assert_eq!(s.light(light).map(|l| l.intensity()).ok(), Some(1.0));
        assert_eq!(s.node(target).map(|n| n.transform.position).ok(), Some(Vec3::X));
    }

    #[test]
    fn kind_mismatch_reported() {
        let mut s = Scene::new();
        let target = s.add(Node::new("target", NodeKind::Target));
        let err = s.light(target).unwrap_err();
        assert!(matches!(
            err,
            SceneError::KindMismatch {
                expected: "light",
                found: "target",
                ..
            }
        ));
    }

    #[test]
    fn missing_node_and_material() {
        let s = Scene::new();
        assert!(matches!(
            s.node(NodeId::new()),
            Err(SceneError::NodeNotFound(_))
        ));
        assert!(matches!(
            s.material(MaterialHandle(7)),
            Err(SceneError::MaterialNotFound(MaterialHandle(7)))
        ));
    }

    #[test]
    fn shared_material_edits_are_seen_by_every_mesh() {
        let mut s = Scene::new();
        let handle = s.add_material(Material::default());
        let a = s.add(Node::new("a", plane(handle)));
        let b = s.add(Node::new("b", plane(handle)));

        s.material_mut(handle).unwrap().roughness = 0.25;

        for id in [a, b] {
            let mesh = s.mesh(id).unwrap();
            assert_eq!(s.material(mesh.material).unwrap().roughness, 0.25);
        }
    }

    #[test]
    fn filtered_iterators() {
        let mut s = Scene::new();
        let handle = s.add_material(Material::default());
        s.add(Node::new("m", plane(handle)));
        s.add(Node::new("l", Light::from(AmbientLight::new(Color::WHITE, 1.0))));
        s.add(Node::new("t", NodeKind::Target));
        assert_eq!(s.lights().count(), 1);
        assert_eq!(s.meshes().count(), 1);
    }
}
