use lightbench_common::Color;
use lightbench_scene::Scene;

use crate::binding::Value;
use crate::panel::{Control, ControlKind, Folder, Panel};

/// Draw every folder of `panel`, writing widget edits into `scene`.
pub fn show(panel: &Panel, ui: &mut egui::Ui, scene: &mut Scene) {
    for folder in panel.folders() {
        show_folder(folder, ui, scene);
    }
}

fn show_folder(folder: &Folder, ui: &mut egui::Ui, scene: &mut Scene) {
    egui::CollapsingHeader::new(folder.title())
        .default_open(true)
        .show(ui, |ui| {
            for control in folder.controls() {
                show_control(control, ui, scene);
            }
            for child in folder.folders() {
                show_folder(child, ui, scene);
            }
        });
}

fn show_control(control: &Control, ui: &mut egui::Ui, scene: &mut Scene) {
    let current = match control.read(scene) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("skipping control '{}': {e}", control.label());
            return;
        }
    };

    let edited = match (control.kind(), current) {
        (ControlKind::Toggle, Value::Bool(mut on)) => ui
            .checkbox(&mut on, control.label())
            .changed()
            .then_some(Value::Bool(on)),
        (ControlKind::Number(range), Value::Number(mut v)) => {
            let response = match range.bounded() {
                // Snapping happens in `Control::write`; egui's own step would
                // also snap values the user never touched.
                Some((min, max)) => {
                    ui.add(egui::Slider::new(&mut v, min..=max).text(control.label()))
                }
                None => {
                    ui.horizontal(|ui| {
                        let drag = ui.add(
                            egui::DragValue::new(&mut v).speed(range.step.unwrap_or(0.01) as f64),
                        );
                        ui.label(control.label());
                        drag
                    })
                    .inner
                }
            };
            response.changed().then_some(Value::Number(v))
        }
        (ControlKind::Color, Value::Color(color)) => {
            let mut srgb = color.to_srgb8();
            ui.horizontal(|ui| {
                let picker = ui.color_edit_button_srgb(&mut srgb);
                ui.label(control.label());
                picker
            })
            .inner
            .changed()
            .then_some(Value::Color(Color::from_srgb8(srgb)))
        }
        (kind, value) => {
            tracing::warn!(
                "control '{}' ({kind:?}) cannot show {value:?}",
                control.label()
            );
            None
        }
    };

    if let Some(value) = edited {
        if let Err(e) = control.write(scene, value) {
            tracing::warn!("failed to apply '{}': {e}", control.label());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::bind;
    use crate::binding::{Binding, Field};
    use lightbench_scene::compose;

    fn draw(panel: &Panel, scene: &mut Scene) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| show(panel, ui, scene));
        });
    }

    #[test]
    fn swatch_shows_stored_hex() {
        let d = compose(1.0);
        let Ok(Value::Color(color)) = Binding::node(d.handles.point, Field::Color).read(&d.scene)
        else {
            panic!("point light color expected");
        };
        let [r, g, b] = color.to_srgb8();
        assert_eq!(
            egui::Color32::from_rgb(r, g, b),
            egui::Color32::from_rgb(0xff, 0x90, 0x00)
        );
    }

    #[test]
    fn drawing_without_input_leaves_scene_untouched() {
        let mut d = compose(1.0);
        let panel = bind(&d.handles);
        let before = d.scene.clone();
        draw(&panel, &mut d.scene);
        draw(&panel, &mut d.scene);
        for (id, node) in before.nodes() {
            assert_eq!(d.scene.node(*id).unwrap(), node, "{}", node.name);
        }
        assert_eq!(
            d.scene.material(d.handles.material).unwrap(),
            before.material(d.handles.material).unwrap()
        );
    }
}
