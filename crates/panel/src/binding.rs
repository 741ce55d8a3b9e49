use lightbench_common::{Color, NodeId};
use lightbench_scene::{Light, Material, MaterialHandle, Node, NodeKind, Scene, SceneError};

/// A tunable property on a light, node, or material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Visible,
    Intensity,
    Color,
    GroundColor,
    PositionX,
    PositionY,
    PositionZ,
    Distance,
    Decay,
    Width,
    Height,
    Angle,
    Penumbra,
    Metalness,
    Roughness,
}

impl Field {
    /// Property name used as the default control label.
    pub fn property(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Intensity => "intensity",
            Self::Color => "color",
            Self::GroundColor => "groundColor",
            Self::PositionX => "x",
            Self::PositionY => "y",
            Self::PositionZ => "z",
            Self::Distance => "distance",
            Self::Decay => "decay",
            Self::Width => "width",
            Self::Height => "height",
            Self::Angle => "angle",
            Self::Penumbra => "penumbra",
            Self::Metalness => "metalness",
            Self::Roughness => "roughness",
        }
    }
}

/// What a binding points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Node(NodeId),
    Material(MaterialHandle),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f32),
    Color(Color),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Color(_) => "color",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("field `{}` is not available on a {target}", .field.property())]
    Unsupported { field: Field, target: &'static str },
    #[error("field `{}` holds a {expected}, got a {got}", .field.property())]
    TypeMismatch {
        field: Field,
        expected: &'static str,
        got: &'static str,
    },
}

/// Mutable view of one bound field.
enum Slot<'a> {
    Bool(&'a mut bool),
    Number(&'a mut f32),
    Color(&'a mut Color),
}

impl Slot<'_> {
    fn get(&self) -> Value {
        match self {
            Self::Bool(v) => Value::Bool(**v),
            Self::Number(v) => Value::Number(**v),
            Self::Color(v) => Value::Color(**v),
        }
    }

    fn set(self, field: Field, value: Value) -> Result<(), BindError> {
        match (self, value) {
            (Self::Bool(slot), Value::Bool(v)) => *slot = v,
            (Self::Number(slot), Value::Number(v)) => *slot = v,
            (Self::Color(slot), Value::Color(v)) => *slot = v,
            (slot, value) => {
                return Err(BindError::TypeMismatch {
                    field,
                    expected: slot.get().kind(),
                    got: value.kind(),
                });
            }
        }
        Ok(())
    }
}

/// A scene field addressed by target and field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub target: Target,
    pub field: Field,
}

impl Binding {
    pub fn node(id: NodeId, field: Field) -> Self {
        Self {
            target: Target::Node(id),
            field,
        }
    }

    pub fn material(handle: MaterialHandle, field: Field) -> Self {
        Self {
            target: Target::Material(handle),
            field,
        }
    }

    /// Current value of the bound field.
    pub fn read(&self, scene: &Scene) -> Result<Value, BindError> {
        match self.target {
            Target::Node(id) => node_value(scene.node(id)?, self.field),
            Target::Material(handle) => material_value(scene.material(handle)?, self.field),
        }
    }

    /// Store `value` into the bound field of the live scene.
    pub fn write(&self, scene: &mut Scene, value: Value) -> Result<(), BindError> {
        let slot = match self.target {
            Target::Node(id) => node_slot(scene.node_mut(id)?, self.field)?,
            Target::Material(handle) => material_slot(scene.material_mut(handle)?, self.field)?,
        };
        slot.set(self.field, value)
    }
}

fn node_value(node: &Node, field: Field) -> Result<Value, BindError> {
    let position = node.transform.position;
    match field {
        Field::Visible => Ok(Value::Bool(node.visible)),
        Field::PositionX => Ok(Value::Number(position.x)),
        Field::PositionY => Ok(Value::Number(position.y)),
        Field::PositionZ => Ok(Value::Number(position.z)),
        _ => match &node.kind {
            NodeKind::Light(light) => light_value(light, field),
            other => Err(BindError::Unsupported {
                field,
                target: other.name(),
            }),
        },
    }
}

fn light_value(light: &Light, field: Field) -> Result<Value, BindError> {
    let number = match (light, field) {
        (_, Field::Intensity) => light.intensity(),
        (_, Field::Color) => return Ok(Value::Color(light.color())),
        (Light::Hemisphere(l), Field::GroundColor) => return Ok(Value::Color(l.ground_color)),
        (Light::Point(l), Field::Distance) => l.distance,
        (Light::Point(l), Field::Decay) => l.decay,
        (Light::Spot(l), Field::Distance) => l.distance,
        (Light::Spot(l), Field::Decay) => l.decay,
        (Light::Spot(l), Field::Angle) => l.angle,
        (Light::Spot(l), Field::Penumbra) => l.penumbra,
        (Light::RectArea(l), Field::Width) => l.width,
        (Light::RectArea(l), Field::Height) => l.height,
        _ => {
            return Err(BindError::Unsupported {
                field,
                target: light.kind_name(),
            });
        }
    };
    Ok(Value::Number(number))
}

fn material_value(material: &Material, field: Field) -> Result<Value, BindError> {
    match field {
        Field::Color => Ok(Value::Color(material.color)),
        Field::Metalness => Ok(Value::Number(material.metalness)),
        Field::Roughness => Ok(Value::Number(material.roughness)),
        _ => Err(BindError::Unsupported {
            field,
            target: "material",
        }),
    }
}

fn node_slot(node: &mut Node, field: Field) -> Result<Slot<'_>, BindError> {
    match field {
        Field::Visible => Ok(Slot::Bool(&mut node.visible)),
        Field::PositionX => Ok(Slot::Number(&mut node.transform.position.x)),
        Field::PositionY => Ok(Slot::Number(&mut node.transform.position.y)),
        Field::PositionZ => Ok(Slot::Number(&mut node.transform.position.z)),
        _ => match &mut node.kind {
            NodeKind::Light(light) => light_slot(light, field),
            other => Err(BindError::Unsupported {
                field,
                target: other.name(),
            }),
        },
    }
}

fn light_slot(light: &mut Light, field: Field) -> Result<Slot<'_>, BindError> {
    let target = light.kind_name();
    let slot = match field {
        Field::Intensity => Some(Slot::Number(light.intensity_mut())),
        Field::Color => Some(Slot::Color(light.color_mut())),
        Field::GroundColor => light.ground_color_mut().map(Slot::Color),
        Field::Distance => light.distance_mut().map(Slot::Number),
        Field::Decay => light.decay_mut().map(Slot::Number),
        Field::Width => light.width_mut().map(Slot::Number),
        Field::Height => light.height_mut().map(Slot::Number),
        Field::Angle => light.angle_mut().map(Slot::Number),
        Field::Penumbra => light.penumbra_mut().map(Slot::Number),
        _ => None,
    };
    slot.ok_or(BindError::Unsupported { field, target })
}

fn material_slot(material: &mut Material, field: Field) -> Result<Slot<'_>, BindError> {
    match field {
        Field::Color => Ok(Slot::Color(&mut material.color)),
        Field::Metalness => Ok(Slot::Number(&mut material.metalness)),
        Field::Roughness => Ok(Slot::Number(&mut material.roughness)),
        _ => Err(BindError::Unsupported {
            field,
            target: "material",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightbench_scene::compose;

    #[test]
    fn read_light_fields() {
        let d = compose(1.0);
        let h = d.handles;
        let read = |b: Binding| b.read(&d.scene).unwrap();

        assert_eq!(read(Binding::node(h.ambient, Field::Visible)), Value::Bool(true));
        assert_eq!(read(Binding::node(h.point, Field::Distance)), Value::Number(10.0));
        assert_eq!(
            read(Binding::node(h.hemisphere, Field::GroundColor)),
            Value::Color(Color::from_hex(0x0000ff))
        );
        assert_eq!(
            read(Binding::node(h.spot_target, Field::PositionX)),
            Value::Number(-0.75)
        );
        assert_eq!(
            read(Binding::material(h.material, Field::Roughness)),
            Value::Number(0.4)
        );
    }

    #[test]
    fn write_goes_into_live_scene() {
        let mut d = compose(1.0);
        let h = d.handles;
        Binding::node(h.rect_area, Field::Width)
            .write(&mut d.scene, Value::Number(5.0))
            .unwrap();
        let Light::RectArea(rect) = d.scene.light(h.rect_area).unwrap() else {
            panic!("rect area light expected");
        };
        assert_eq!(rect.width, 5.0);
    }

    const ALL_FIELDS: [Field; 15] = [
        Field::Visible,
        Field::Intensity,
        Field::Color,
        Field::GroundColor,
        Field::PositionX,
        Field::PositionY,
        Field::PositionZ,
        Field::Distance,
        Field::Decay,
        Field::Width,
        Field::Height,
        Field::Angle,
        Field::Penumbra,
        Field::Metalness,
        Field::Roughness,
    ];

    fn same_support(binding: Binding, scene: &mut Scene) {
        match binding.read(scene) {
            Ok(value) => {
                binding.write(scene, value).unwrap();
                assert_eq!(binding.read(scene).unwrap(), value, "{binding:?}");
            }
            Err(BindError::Unsupported { .. }) => {
                let err = binding.write(scene, Value::Number(0.0)).unwrap_err();
                assert!(matches!(err, BindError::Unsupported { .. }), "{binding:?}: {err}");
            }
            Err(err) => panic!("{binding:?}: {err}"),
        }
    }

    #[test]
    fn read_and_write_support_the_same_fields() {
        let mut d = compose(1.0);
        let ids: Vec<NodeId> = d.scene.nodes().keys().copied().collect();
        for id in ids {
            for field in ALL_FIELDS {
                same_support(Binding::node(id, field), &mut d.scene);
            }
        }
        for field in ALL_FIELDS {
            same_support(Binding::material(d.handles.material, field), &mut d.scene);
        }
    }

    #[test]
    fn unsupported_read_names_the_light_kind() {
        let d = compose(1.0);
        let err = Binding::node(d.handles.point, Field::Angle)
            .read(&d.scene)
            .unwrap_err();
        assert_eq!(err.to_string(), "field `angle` is not available on a point");
    }

    #[test]
    fn visibility_toggle_touches_only_its_light() {
        let mut d = compose(1.0);
        let h = d.handles;
        Binding::node(h.point, Field::Visible)
            .write(&mut d.scene, Value::Bool(false))
            .unwrap();
        for (id, node) in d.scene.nodes() {
            assert_eq!(node.visible, *id != h.point, "{}", node.name);
        }
    }

    #[test]
    fn unsupported_field_for_kind() {
        let d = compose(1.0);
        let err = Binding::node(d.handles.ambient, Field::Distance)
            .read(&d.scene)
            .unwrap_err();
        assert!(matches!(
            err,
            BindError::Unsupported {
                field: Field::Distance,
                target: "ambient"
            }
        ));

        let err = Binding::node(d.handles.spot_target, Field::Intensity)
            .read(&d.scene)
            .unwrap_err();
        assert!(matches!(err, BindError::Unsupported { target: "target", .. }));

        let err = Binding::material(d.handles.material, Field::Visible)
            .read(&d.scene)
            .unwrap_err();
        assert!(matches!(err, BindError::Unsupported { target: "material", .. }));
    }

    #[test]
    fn type_mismatch_leaves_field_untouched() {
        let mut d = compose(1.0);
        let b = Binding::node(d.handles.spot, Field::Intensity);
        let err = b.write(&mut d.scene, Value::Bool(true)).unwrap_err();
        assert!(matches!(
            err,
            BindError::TypeMismatch {
                expected: "number",
                got: "bool",
                ..
            }
        ));
        assert_eq!(b.read(&d.scene).unwrap(), Value::Number(4.0));
    }

    #[test]
    fn missing_node_is_a_scene_error() {
        let d = compose(1.0);
        let err = Binding::node(NodeId::new(), Field::Visible)
            .read(&d.scene)
            .unwrap_err();
        assert!(matches!(err, BindError::Scene(SceneError::NodeNotFound(_))));
    }
}
