use std::f32::consts::PI;

use lightbench_common::NodeId;
use lightbench_scene::SceneHandles;

use crate::binding::{Binding, Field};
use crate::panel::{Folder, Panel};

const FINE_STEP: f32 = 0.0001;

/// Register the demo's debug controls against the composed scene.
pub fn bind(h: &SceneHandles) -> Panel {
    let mut panel = Panel::new();

    let ambient = panel.add_folder("Ambient Light");
    toggle(ambient, h.ambient);
    number(ambient, h.ambient, Field::Intensity, 0.0, 3.0);
    ambient.add(Binding::node(h.ambient, Field::Color));

    let directional = panel.add_folder("Directional Light");
    toggle(directional, h.directional);
    number(directional, h.directional, Field::Intensity, 0.0, 10.0);
    directional.add(Binding::node(h.directional, Field::Color));
    position(directional, h.directional);

    let hemisphere = panel.add_folder("Hemisphere Light");
    toggle(hemisphere, h.hemisphere);
    number(hemisphere, h.hemisphere, Field::Intensity, 0.0, 10.0);
    hemisphere.add(Binding::node(h.hemisphere, Field::Color));
    hemisphere.add(Binding::node(h.hemisphere, Field::GroundColor));

    let point = panel.add_folder("Point Light");
    toggle(point, h.point);
    number(point, h.point, Field::Intensity, 0.0, 10.0);
    number(point, h.point, Field::Distance, 0.0, 10.0);
    number(point, h.point, Field::Decay, 0.0, 2.0);
    point.add(Binding::node(h.point, Field::Color));
    position(point, h.point);

    let rect = panel.add_folder("RectArea Light");
    toggle(rect, h.rect_area);
    number(rect, h.rect_area, Field::Intensity, 0.0, 10.0);
    number(rect, h.rect_area, Field::Width, 0.0, 10.0);
    number(rect, h.rect_area, Field::Height, 0.0, 10.0);
    rect.add(Binding::node(h.rect_area, Field::Color));
    position(rect, h.rect_area);

    let spot = panel.add_folder("Spotlight");
    toggle(spot, h.spot);
    number(spot, h.spot, Field::Intensity, 0.0, 10.0);
    number(spot, h.spot, Field::Distance, 0.0, 10.0);
    number(spot, h.spot, Field::Decay, 0.0, 2.0);
    number(spot, h.spot, Field::Angle, 0.0, PI * 0.1);
    number(spot, h.spot, Field::Penumbra, 0.0, 1.0);
    spot.add(Binding::node(h.spot, Field::Color));
    position(spot.add_folder("Position"), h.spot);
    position(spot.add_folder("Target"), h.spot_target);

    let material = panel.add_folder("Material");
    for field in [Field::Metalness, Field::Roughness] {
        material
            .add(Binding::material(h.material, field))
            .min(0.0)
            .max(1.0)
            .step(FINE_STEP);
    }

    tracing::info!(
        "debug panel: {} folders, {} controls",
        panel.folders().len(),
        panel.control_count()
    );
    panel
}

fn toggle(folder: &mut Folder, id: NodeId) {
    folder.add(Binding::node(id, Field::Visible)).name("on/off");
}

fn number(folder: &mut Folder, id: NodeId, field: Field, min: f32, max: f32) {
    folder
        .add(Binding::node(id, field))
        .min(min)
        .max(max)
        .step(FINE_STEP);
}

fn position(folder: &mut Folder, id: NodeId) {
    for field in [Field::PositionX, Field::PositionY, Field::PositionZ] {
        folder
            .add(Binding::node(id, field))
            .min(-5.0)
            .max(5.0)
            .step(0.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Target, Value};
    use crate::panel::{Control, ControlKind, NumberRange};
    use lightbench_scene::{Light, compose};

    fn range(control: &Control) -> NumberRange {
        match control.kind() {
            ControlKind::Number(r) => r,
            other => panic!("{} is {other:?}", control.label()),
        }
    }

    #[test]
    fn folder_order() {
        let d = compose(1.0);
        let panel = bind(&d.handles);
        let titles: Vec<_> = panel.folders().iter().map(Folder::title).collect();
        assert_eq!(
            titles,
            [
                "Ambient Light",
                "Directional Light",
                "Hemisphere Light",
                "Point Light",
                "RectArea Light",
                "Spotlight",
                "Material"
            ]
        );
        let spot = panel.folder("Spotlight").unwrap();
        let nested: Vec<_> = spot.folders().iter().map(Folder::title).collect();
        assert_eq!(nested, ["Position", "Target"]);
    }

    #[test]
    fn every_light_has_toggle_intensity_color() {
        let d = compose(1.0);
        let panel = bind(&d.handles);
        for folder in &panel.folders()[..6] {
            let labels: Vec<_> = folder.controls().iter().map(Control::label).collect();
            assert_eq!(labels[0], "on/off", "{}", folder.title());
            assert!(labels.contains(&"intensity"), "{}", folder.title());
            assert!(labels.contains(&"color"), "{}", folder.title());
        }
    }

    #[test]
    fn intensity_bounds() {
        let d = compose(1.0);
        let panel = bind(&d.handles);
        let ambient = range(panel.folder("Ambient Light").unwrap().control("intensity").unwrap());
        assert_eq!(ambient.max, Some(3.0));
        assert_eq!(ambient.step, Some(FINE_STEP));
        for title in ["Directional Light", "Hemisphere Light", "Point Light", "RectArea Light", "Spotlight"] {
            let r = range(panel.folder(title).unwrap().control("intensity").unwrap());
            assert_eq!((r.min, r.max), (Some(0.0), Some(10.0)), "{title}");
        }
    }

    #[test]
    fn spot_controls() {
        let d = compose(1.0);
        let panel = bind(&d.handles);
        let spot = panel.folder("Spotlight").unwrap();
        let angle = range(spot.control("angle").unwrap());
        assert_eq!(angle.max, Some(PI * 0.1));
        assert_eq!(range(spot.control("penumbra").unwrap()).max, Some(1.0));
        assert_eq!(range(spot.control("decay").unwrap()).max, Some(2.0));

        let target = spot.folder("Target").unwrap();
        assert_eq!(target.controls().len(), 3);
        for control in target.controls() {
            assert_eq!(control.binding().target, Target::Node(d.handles.spot_target));
            let r = range(control);
            assert_eq!((r.min, r.max, r.step), (Some(-5.0), Some(5.0), Some(0.1)));
        }
        let position = spot.folder("Position").unwrap();
        assert!(position
            .controls()
            .iter()
            .all(|c| c.binding().target == Target::Node(d.handles.spot)));
    }

    #[test]
    fn hemisphere_has_ground_color() {
        let d = compose(1.0);
        let panel = bind(&d.handles);
        let hemi = panel.folder("Hemisphere Light").unwrap();
        assert_eq!(hemi.control("groundColor").unwrap().kind(), ControlKind::Color);
        assert!(hemi.control("x").is_none());
    }

    #[test]
    fn material_controls_hit_shared_material() {
        let mut d = compose(1.0);
        let panel = bind(&d.handles);
        let material = panel.folder("Material").unwrap();
        material
            .control("metalness")
            .unwrap()
            .write(&mut d.scene, Value::Number(0.7))
            .unwrap();
        let metalness: Vec<f32> = d
            .scene
            .meshes()
            .map(|(_, _, m)| d.scene.material(m.material).unwrap().metalness)
            .collect();
        assert_eq!(metalness.len(), 4);
        assert!(metalness.iter().all(|&m| (m - 0.7).abs() < 1e-6));
    }

    #[test]
    fn position_slider_moves_rect_light_without_reaiming() {
        let mut d = compose(1.0);
        let before = d.scene.node(d.handles.rect_area).unwrap().transform.rotation;
        let panel = bind(&d.handles);
        panel
            .folder("RectArea Light")
            .and_then(|f| f.control("x"))
            .unwrap()
            .write(&mut d.scene, Value::Number(2.0))
            .unwrap();
        let node = d.scene.node(d.handles.rect_area).unwrap();
        assert!((node.transform.position.x - 2.0).abs() < 1e-5);
        assert_eq!(node.transform.rotation, before);
        assert!(matches!(node.kind, lightbench_scene::NodeKind::Light(Light::RectArea(_))));
    }

    fn walk<'a>(folder: &'a Folder, path: String, out: &mut Vec<(String, &'a Control)>) {
        for control in folder.controls() {
            out.push((path.clone(), control));
        }
        for nested in folder.folders() {
            walk(nested, format!("{path}/{}", nested.title()), out);
        }
    }

    #[test]
    fn every_control_has_expected_kind_and_range() {
        const TOGGLE: Option<(f32, f32, f32)> = None;
        const COLOR: Option<(f32, f32, f32)> = None;
        let light = |max: f32| Some((0.0, max, FINE_STEP));
        let axis = Some((-5.0, 5.0, 0.1));
        let unit = Some((0.0, 1.0, FINE_STEP));

        #[rustfmt::skip]
        let expected = [
            ("Ambient Light", "on/off", TOGGLE),
            ("Ambient Light", "intensity", light(3.0)),
            ("Ambient Light", "color", COLOR),
            ("Directional Light", "on/off", TOGGLE),
            ("Directional Light", "intensity", light(10.0)),
            ("Directional Light", "color", COLOR),
            ("Directional Light", "x", axis),
            ("Directional Light", "y", axis),
            ("Directional Light", "z", axis),
            ("Hemisphere Light", "on/off", TOGGLE),
            ("Hemisphere Light", "intensity", light(10.0)),
            ("Hemisphere Light", "color", COLOR),
            ("Hemisphere Light", "groundColor", COLOR),
            ("Point Light", "on/off", TOGGLE),
            ("Point Light", "intensity", light(10.0)),
            ("Point Light", "distance", light(10.0)),
            ("Point Light", "decay", light(2.0)),
            ("Point Light", "color", COLOR),
            ("Point Light", "x", axis),
            ("Point Light", "y", axis),
            ("Point Light", "z", axis),
            ("RectArea Light", "on/off", TOGGLE),
            ("RectArea Light", "intensity", light(10.0)),
            ("RectArea Light", "width", light(10.0)),
            ("RectArea Light", "height", light(10.0)),
            ("RectArea Light", "color", COLOR),
            ("RectArea Light", "x", axis),
            ("RectArea Light", "y", axis),
            ("RectArea Light", "z", axis),
            ("Spotlight", "on/off", TOGGLE),
            ("Spotlight", "intensity", light(10.0)),
            ("Spotlight", "distance", light(10.0)),
            ("Spotlight", "decay", light(2.0)),
            ("Spotlight", "angle", light(PI * 0.1)),
            ("Spotlight", "penumbra", unit),
            ("Spotlight", "color", COLOR),
            ("Spotlight/Position", "x", axis),
            ("Spotlight/Position", "y", axis),
            ("Spotlight/Position", "z", axis),
            ("Spotlight/Target", "x", axis),
            ("Spotlight/Target", "y", axis),
            ("Spotlight/Target", "z", axis),
            ("Material", "metalness", unit),
            ("Material", "roughness", unit),
        ];

        let d = compose(1.0);
        let panel = bind(&d.handles);
        let mut controls = Vec::new();
        for folder in panel.folders() {
            walk(folder, folder.title().to_string(), &mut controls);
        }
        assert_eq!(controls.len(), expected.len());

        for ((path, control), (want_path, label, want)) in controls.iter().zip(expected) {
            let at = format!("{want_path} > {label}");
            assert_eq!((path.as_str(), control.label()), (want_path, label));
            match (control.kind(), want) {
                (ControlKind::Number(r), Some((min, max, step))) => {
                    assert_eq!((r.min, r.max, r.step), (Some(min), Some(max), Some(step)), "{at}");
                }
                (ControlKind::Toggle, None) => assert_eq!(label, "on/off", "{at}"),
                (ControlKind::Color, None) => assert!(label.ends_with("olor"), "{at}"),
                (kind, want) => panic!("{at}: {kind:?} vs {want:?}"),
            }
            let value = control
                .read(&d.scene)
                .unwrap_or_else(|e| panic!("{at}: {e}"));
            let matches_kind = matches!(
                (control.kind(), value),
                (ControlKind::Toggle, Value::Bool(_))
                    | (ControlKind::Number(_), Value::Number(_))
                    | (ControlKind::Color, Value::Color(_))
            );
            assert!(matches_kind, "{at}: {value:?}");
        }
    }

    #[test]
    fn control_total() {
        let d = compose(1.0);
        let panel = bind(&d.handles);
        // ambient 3, directional 6, hemisphere 4, point 8, rect 8, spot 7+3+3, material 2
        assert_eq!(panel.control_count(), 44);
    }
}
