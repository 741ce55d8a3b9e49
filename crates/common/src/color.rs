/// An sRGB color with components in `0.0..=1.0`.
///
/// Stored the way a color picker shows it; convert with [`Color::to_linear`]
/// before handing it to a shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// 8-bit sRGB channels, as a color picker or hex readout shows them.
    pub fn to_srgb8(self) -> [u8; 3] {
        let [_, r, g, b] = self.to_hex().to_be_bytes();
        [r, g, b]
    }

    pub fn from_srgb8([r, g, b]: [u8; 3]) -> Self {
        Self::from_hex(u32::from_be_bytes([0, r, g, b]))
    }

    /// Decode the sRGB transfer curve.
    pub fn to_linear(self) -> [f32; 3] {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [decode(self.r), decode(self.g), decode(self.b)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
