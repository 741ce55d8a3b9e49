use lightbench_scene::Scene;

use crate::binding::{BindError, Binding, Field, Value};

/// Bounds and increment for a number control. Unset parts are unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberRange {
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub step: Option<f32>,
}

impl NumberRange {
    /// Snap to the step grid anchored at `min` (or `max`), then clamp.
    pub fn constrain(&self, value: f32) -> f32 {
        self.clamp(self.snap(value))
    }

    fn snap(&self, value: f32) -> f32 {
        match self.step {
            Some(step) if step > 0.0 => {
                let offset = self.min.or(self.max).unwrap_or(0.0);
                ((value - offset) / step).round() * step + offset
            }
            _ => value,
        }
    }

    fn clamp(&self, mut value: f32) -> f32 {
        if let Some(min) = self.min {
            value = value.max(min);
        }
        if let Some(max) = self.max {
            value = value.min(max);
        }
        value
    }

    /// Both bounds set, so the control can be drawn as a slider.
    pub fn bounded(&self) -> Option<(f32, f32)> {
        self.min.zip(self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Toggle,
    Number(NumberRange),
    Color,
}

impl ControlKind {
    fn for_field(field: Field) -> Self {
        match field {
            Field::Visible => Self::Toggle,
            Field::Color | Field::GroundColor => Self::Color,
            _ => Self::Number(NumberRange::default()),
        }
    }
}

/// One labeled widget bound to a scene field.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    label: String,
    binding: Binding,
    kind: ControlKind,
}

impl Control {
    fn new(binding: Binding) -> Self {
        Self {
            label: binding.field.property().to_string(),
            binding,
            kind: ControlKind::for_field(binding.field),
        }
    }

    pub fn name(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    pub fn min(&mut self, min: f32) -> &mut Self {
        self.range_mut(|r| r.min = Some(min))
    }

    pub fn max(&mut self, max: f32) -> &mut Self {
        self.range_mut(|r| r.max = Some(max))
    }

    pub fn step(&mut self, step: f32) -> &mut Self {
        self.range_mut(|r| r.step = Some(step))
    }

    fn range_mut(&mut self, edit: impl FnOnce(&mut NumberRange)) -> &mut Self {
        match &mut self.kind {
            ControlKind::Number(range) => edit(range),
            kind => tracing::warn!("'{}' is a {kind:?} control; range ignored", self.label),
        }
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn read(&self, scene: &Scene) -> Result<Value, BindError> {
        self.binding.read(scene)
    }

    /// Write through to the scene, constraining numbers to the control's range.
    pub fn write(&self, scene: &mut Scene, value: Value) -> Result<(), BindError> {
        let value = match (self.kind, value) {
            (ControlKind::Number(range), Value::Number(v)) => Value::Number(range.constrain(v)),
            (_, v) => v,
        };
        self.binding.write(scene, value)
    }
}

/// A named group of controls, possibly with nested folders.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    title: String,
    controls: Vec<Control>,
    folders: Vec<Folder>,
}

impl Folder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            controls: Vec::new(),
            folders: Vec::new(),
        }
    }

    /// Register a control for `binding`; the widget type follows the field.
    pub fn add(&mut self, binding: Binding) -> &mut Control {
        self.controls.push(Control::new(binding));
        let last = self.controls.len() - 1;
        &mut self.controls[last]
    }

    pub fn add_folder(&mut self, title: impl Into<String>) -> &mut Folder {
        self.folders.push(Folder::new(title));
        let last = self.folders.len() - 1;
        &mut self.folders[last]
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, title: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.title == title)
    }

    pub fn control(&self, label: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.label == label)
    }

    /// Controls in this folder and all nested folders.
    pub fn control_count(&self) -> usize {
        self.controls.len() + self.folders.iter().map(Folder::control_count).sum::<usize>()
    }
}

/// The process-wide debug panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    folders: Vec<Folder>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&mut self, title: impl Into<String>) -> &mut Folder {
        self.folders.push(Folder::new(title));
        let last = self.folders.len() - 1;
        &mut self.folders[last]
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, title: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.title == title)
    }

    pub fn control_count(&self) -> usize {
        self.folders.iter().map(Folder::control_count).sum()
    }
}
