//! Palette-fill composite parameters.
//!
//! The fill shader receives exactly these nine inputs before every composite
//! draw: eight scalars packed into [`FillUniforms`] plus the fill texture.

/// Names of the composite inputs, in binding order.
pub const FILL_UNIFORM_NAMES: [&str; 9] = [
    "palette",
    "variation",
    "stretch",
    "patternCrop",
    "useOriginal",
    "invert",
    "useHue",
    "preserveBlackWhite",
    "fillTexture",
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillParams {
    /// Row band of the fill image to draw colours from.
    pub palette: f32,
    pub variation: f32,
    pub stretch: f32,
    /// Fraction of the palette row that luminance is mapped across.
    pub pattern_crop: f32,
    pub use_original: bool,
    pub invert: bool,
    pub use_hue: bool,
    pub preserve_black_white: bool,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            palette: 0.0,
            variation: 1.0,
            stretch: 0.0,
            pattern_crop: 1.0,
            use_original: false,
            invert: false,
            use_hue: false,
            preserve_black_white: true,
        }
    }
}

impl FillParams {
    pub fn to_uniforms(&self) -> FillUniforms {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        FillUniforms {
            palette: self.palette,
            variation: self.variation,
            stretch: self.stretch,
            pattern_crop: self.pattern_crop,
            use_original: flag(self.use_original),
            invert: flag(self.invert),
            use_hue: flag(self.use_hue),
            preserve_black_white: flag(self.preserve_black_white),
        }
    }
}

/// GPU layout of the fill shader's uniform block.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FillUniforms {
    pub palette: f32,
    pub variation: f32,
    pub stretch: f32,
    pub pattern_crop: f32,
    pub use_original: f32,
    pub invert: f32,
    pub use_hue: f32,
    pub preserve_black_white: f32,
}
