use std::f32::consts::PI;

use glam::Vec3;
use lightbench_common::{Color, Euler, NodeId};

use crate::camera::PerspectiveCamera;
use crate::light::{
    AmbientLight, DirectionalLight, HemisphereLight, Light, PointLight, RectAreaLight, SpotLight,
};
use crate::mesh::{Geometry, Material, MaterialHandle, Mesh};
use crate::scene::{Node, NodeKind, Scene};

/// Ids of everything [`compose`] creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandles {
    pub ambient: NodeId,
    pub directional: NodeId,
    pub hemisphere: NodeId,
    pub point: NodeId,
    pub rect_area: NodeId,
    pub spot: NodeId,
    pub spot_target: NodeId,
    pub material: MaterialHandle,
    pub sphere: NodeId,
    pub cube: NodeId,
    pub torus: NodeId,
    pub plane: NodeId,
    pub camera: NodeId,
}

impl SceneHandles {
    /// Meshes that rotate with elapsed time. The plane stays put.
    pub fn spinning(&self) -> [NodeId; 3] {
        [self.sphere, self.cube, self.torus]
    }
}

/// The composed scene together with handles into it.
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub scene: Scene,
    pub handles: SceneHandles,
}

/// Build the lights demo: six light sources, four meshes sharing one
/// material, and a perspective camera, all attached to one root container.
pub fn compose(aspect: f32) -> DemoScene {
    let mut scene = Scene::new();

    let ambient = scene.add(light_node(
        "Ambient Light",
        AmbientLight::new(Color::from_hex(0xffffff), 1.0),
        None,
    ));
    let directional = scene.add(light_node(
        "Directional Light",
        DirectionalLight::new(Color::from_hex(0x00fffc), 2.0),
        Some(Vec3::new(1.0, 0.25, 0.0)),
    ));
    let hemisphere = scene.add(light_node(
        "Hemisphere Light",
        HemisphereLight::new(Color::from_hex(0xff0000), Color::from_hex(0x0000ff), 0.9),
        None,
    ));
    let point = scene.add(light_node(
        "Point Light",
        PointLight::new(Color::from_hex(0xff9000), 1.5, 10.0, 1.0),
        Some(Vec3::new(1.0, -0.5, 1.0)),
    ));

    // Aimed once here; moving it later does not re-aim it.
    let mut rect = light_node(
        "RectArea Light",
        RectAreaLight::new(Color::from_hex(0x4e00ff), 3.0, 3.0, 1.0),
        Some(Vec3::new(-1.5, 0.0, 1.5)),
    );
    rect.look_at(Vec3::ZERO);
    let rect_area = scene.add(rect);

    let spot_target = scene.add(
        Node::new("Spotlight Target", NodeKind::Target).with_position(Vec3::new(-0.75, 0.0, 0.0)),
    );
    let spot = scene.add(light_node(
        "Spotlight",
        SpotLight::new(
            Color::from_hex(0x78ff00),
            4.0,
            10.0,
            PI * 0.1,
            0.25,
            1.0,
            spot_target,
        ),
        Some(Vec3::new(0.0, 2.0, 3.0)),
    ));

    let material = scene.add_material(Material {
        roughness: 0.4,
        ..Material::default()
    });

    let sphere = scene.add(
        mesh_node(
            "Sphere",
            Geometry::Sphere {
                radius: 0.5,
                width_segments: 32,
                height_segments: 32,
            },
            material,
        )
        .with_position(Vec3::new(-1.5, 0.0, 0.0)),
    );
    let cube = scene.add(mesh_node(
        "Cube",
        Geometry::Box {
            width: 0.75,
            height: 0.75,
            depth: 0.75,
        },
        material,
    ));
    let torus = scene.add(
        mesh_node(
            "Torus",
            Geometry::Torus {
                radius: 0.3,
                tube: 0.2,
                radial_segments: 32,
                tubular_segments: 64,
            },
            material,
        )
        .with_position(Vec3::new(1.5, 0.0, 0.0)),
    );
    let mut floor = mesh_node(
        "Plane",
        Geometry::Plane {
            width: 5.0,
            height: 5.0,
        },
        material,
    )
    .with_position(Vec3::new(0.0, -0.65, 0.0));
    floor.transform.rotation = Euler::new(-PI * 0.5, 0.0, 0.0);
    let plane = scene.add(floor);

    let camera = scene.add(
        Node::new("Camera", PerspectiveCamera::new(75.0, aspect, 0.1, 100.0))
            .with_position(Vec3::new(1.0, 1.0, 2.0)),
    );

    tracing::info!(
        "composed scene: {} nodes ({} lights, {} meshes), {} material",
        scene.len(),
        scene.lights().count(),
        scene.meshes().count(),
        scene.material_count()
    );

    DemoScene {
        scene,
        handles: SceneHandles {
            ambient,
            directional,
            hemisphere,
            point,
            rect_area,
            spot,
            spot_target,
            material,
            sphere,
            cube,
            torus,
            plane,
            camera,
        },
    }
}

fn light_node(name: &str, light: impl Into<Light>, position: Option<Vec3>) -> Node {
    let node = Node::new(name, NodeKind::Light(light.into()));
    match position {
        Some(p) => node.with_position(p),
        None => node,
    }
}

fn mesh_node(name: &str, geometry: Geometry, material: MaterialHandle) -> Node {
    Node::new(name, Mesh { geometry, material })
}
