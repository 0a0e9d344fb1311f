//! The sRGB transfer function pair (`spec.md` §1: "no color management
//! beyond a linear↔sRGB pair").

/// Converts a linear-light channel value in `[0, 1]` to sRGB-encoded.
pub fn linear_to_srgb(p_value: f32) -> f32 {
  if p_value <= 0.003_130_8 {
    p_value * 12.92
  } else {
    1.055 * p_value.powf(1.0 / 2.4) - 0.055
  }
}

/// Converts an sRGB-encoded channel value in `[0, 1]` to linear light.
pub fn srgb_to_linear(p_value: f32) -> f32 {
  if p_value <= 0.040_45 {
    p_value / 12.92
  } else {
    ((p_value + 0.055) / 1.055).powf(2.4)
  }
}
