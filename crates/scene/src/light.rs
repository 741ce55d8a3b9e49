use lightbench_common::{Color, NodeId};

/// Uniform light hitting every surface from every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }
}

/// Parallel rays travelling from the node's position towards the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }
}

/// Sky color from above blending into ground color from below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky_color: Color,
    pub ground_color: Color,
    pub intensity: f32,
}

impl HemisphereLight {
    pub fn new(sky_color: Color, ground_color: Color, intensity: f32) -> Self {
        Self {
            sky_color,
            ground_color,
            intensity,
        }
    }
}

/// Omnidirectional light. `distance == 0` means no cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
}

impl PointLight {
    pub fn new(color: Color, intensity: f32, distance: f32, decay: f32) -> Self {
        Self {
            color,
            intensity,
            distance,
            decay,
        }
    }
}

/// Rectangular emitter shining along the node's local -Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectAreaLight {
    pub color: Color,
    pub intensity: f32,
    pub width: f32,
    pub height: f32,
}

impl RectAreaLight {
    pub fn new(color: Color, intensity: f32, width: f32, height: f32) -> Self {
        Self {
            color,
            intensity,
            width,
            height,
        }
    }
}

/// Cone of light aimed at a separate target node.
///
/// `angle` is the cone half-angle in radians, `penumbra` the fraction of the
/// cone that fades out at its edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub color: Color,
    pub intensity: f32,
    pub distance: f32,
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub target: NodeId,
}

impl SpotLight {
    pub fn new(
        color: Color,
        intensity: f32,
        distance: f32,
        angle: f32,
        penumbra: f32,
        decay: f32,
        target: NodeId,
    ) -> Self {
        Self {
            color,
            intensity,
            distance,
            angle,
            penumbra,
            decay,
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient(AmbientLight),
    Directional(DirectionalLight),
    Hemisphere(HemisphereLight),
    Point(PointLight),
    RectArea(RectAreaLight),
    Spot(SpotLight),
}

impl Light {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Ambient(_) => "ambient",
            Self::Directional(_) => "directional",
            Self::Hemisphere(_) => "hemisphere",
            Self::Point(_) => "point",
            Self::RectArea(_) => "rect_area",
            Self::Spot(_) => "spot",
        }
    }

    /// Main color. For a hemisphere light this is the sky color.
    pub fn color(&self) -> Color {
        match self {
            Self::Ambient(l) => l.color,
            Self::Directional(l) => l.color,
            Self::Hemisphere(l) => l.sky_color,
            Self::Point(l) => l.color,
            Self::RectArea(l) => l.color,
            Self::Spot(l) => l.color,
        }
    }

    pub fn color_mut(&mut self) -> &mut Color {
        match self {
            Self::Ambient(l) => &mut l.color,
            Self::Directional(l) => &mut l.color,
            Self::Hemisphere(l) => &mut l.sky_color,
            Self::Point(l) => &mut l.color,
            Self::RectArea(l) => &mut l.color,
            Self::Spot(l) => &mut l.color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Self::Ambient(l) => l.intensity,
            Self::Directional(l) => l.intensity,
            Self::Hemisphere(l) => l.intensity,
            Self::Point(l) => l.intensity,
            Self::RectArea(l) => l.intensity,
            Self::Spot(l) => l.intensity,
        }
    }

    pub fn intensity_mut(&mut self) -> &mut f32 {
        match self {
            Self::Ambient(l) => &mut l.intensity,
            Self::Directional(l) => &mut l.intensity,
            Self::Hemisphere(l) => &mut l.intensity,
            Self::Point(l) => &mut l.intensity,
            Self::RectArea(l) => &mut l.intensity,
            Self::Spot(l) => &mut l.intensity,
        }
    }

    pub fn ground_color_mut(&mut self) -> Option<&mut Color> {
        match self {
            Self::Hemisphere(l) => Some(&mut l.ground_color),
            _ => None,
        }
    }

    pub fn distance_mut(&mut self) -> Option<&mut f32> {
        match self {
            Self::Point(l) => Some(&mut l.distance),
            Self::Spot(l) => Some(&mut l.distance),
            _ => None,
        }
    }

    pub fn decay_mut(&mut self) -> Option<&mut f32> {
        match self {
            Self::Point(l) => Some(&mut l.decay),
            Self::Spot(l) => Some(&mut l.decay),
            _ => None,
        }
    }

    pub fn width_mut(&mut self) -> Option<&mut f32> {
        match self {
            Self::RectArea(l) => Some(&mut l.width),
            _ => None,
        }
    }

    pub fn height_mut(&mut self) -> Option<&mut f32> {
        match self {
            Self::RectArea(l) => Some(&mut l.height),
            _ => None,
        }
    }

    pub fn angle_mut(&mut self) -> Option<&mut f32> {
        match self {
            Self::Spot(l) => Some(&mut l.angle),
            _ => None,
        }
    }

    pub fn penumbra_mut(&mut self) -> Option<&mut f32> {
        match self {
            Self::Spot(l) => Some(&mut l.penumbra),
            _ => None,
        }
    }
}

macro_rules! impl_from_light {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Light {
            fn from(light: $ty) -> Self {
                Self::$variant(light)
            }
        })*
    };
}

impl_from_light! {
    AmbientLight => Ambient,
    DirectionalLight => Directional,
    HemisphereLight => Hemisphere,
    PointLight => Point,
    RectAreaLight => RectArea,
    SpotLight => Spot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_accessors() {
        let mut light: Light = PointLight::new(Color::from_hex(0xff9000), 1.5, 10.0, 1.0).into();
        assert_eq!(light.kind_name(), "point");
        assert_eq!(light.intensity(), 1.5);
        *light.intensity_mut() = 2.0;
        assert_eq!(light.intensity(), 2.0);
        *light.color_mut() = Color::WHITE;
        assert_eq!(light.color(), Color::WHITE);
    }

    #[test]
    fn optional_fields_follow_kind() {
        let mut ambient: Light = AmbientLight::new(Color::WHITE, 1.0).into();
        assert!(ambient.distance_mut().is_none());
        assert!(ambient.ground_color_mut().is_none());

        let mut spot: Light =
            SpotLight::new(Color::WHITE, 4.0, 10.0, 0.3, 0.25, 1.0, NodeId::new()).into();
        assert!(spot.angle_mut().is_some());
        assert!(spot.penumbra_mut().is_some());
        assert!(spot.width_mut().is_none());
    }

    #[test]
    fn hemisphere_color_is_sky() {
        let mut hemi: Light =
            HemisphereLight::new(Color::from_hex(0xff0000), Color::from_hex(0x0000ff), 0.9).into();
        assert_eq!(hemi.color(), Color::from_hex(0xff0000));
        let ground = hemi.ground_color_mut().map(|c| *c);
        assert_eq!(ground, Some(Color::from_hex(0x0000ff)));
    }
}
