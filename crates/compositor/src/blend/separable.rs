//! Separable W3C blend functions, each defined once on straight
//! (non-pre-multiplied) channel values in `[0, 1]` and wrapped by the
//! general pre-multiplied compositing formula (`spec.md` §4.3):
//!
//! `Co = Cs·(1−αb) + Cb·(1−αs) + αb·αs·B(cb, cs)`, `αo = αs + αb − αs·αb`.

use crate::frgba::FRgba;
use crate::operator::Operator;

fn hard_light(p_cb: f32, p_cs: f32) -> f32 {
  if p_cs <= 0.5 {
    2.0 * p_cb * p_cs
  } else {
    1.0 - 2.0 * (1.0 - p_cb) * (1.0 - p_cs)
  }
}

fn soft_light(p_cb: f32, p_cs: f32) -> f32 {
  if p_cs <= 0.5 {
    p_cb - (1.0 - 2.0 * p_cs) * p_cb * (1.0 - p_cb)
  } else {
    let d = if p_cb <= 0.25 {
      ((16.0 * p_cb - 12.0) * p_cb + 4.0) * p_cb
    } else {
      p_cb.sqrt()
    };
    p_cb + (2.0 * p_cs - 1.0) * (d - p_cb)
  }
}

/// `B(cb, cs)` for one of the per-channel separable blend modes.
/// `spec.md` §4.3's documented short-circuits for `colorDodge`/`colorBurn`
/// fall out of these guard clauses directly.
pub fn straight_blend(p_op: Operator, p_cb: f32, p_cs: f32) -> f32 {
  match p_op {
    Operator::Multiply => p_cb * p_cs,
    Operator::Screen => p_cb + p_cs - p_cb * p_cs,
    Operator::Darken => p_cb.min(p_cs),
    Operator::Lighten => p_cb.max(p_cs),
    Operator::Overlay => hard_light(p_cs, p_cb),
    Operator::HardLight => hard_light(p_cb, p_cs),
    Operator::ColorDodge => {
      if p_cb <= 0.0 {
        0.0
      } else if p_cs >= 1.0 {
        1.0
      } else {
        (p_cb / (1.0 - p_cs)).min(1.0)
      }
    }
    Operator::ColorBurn => {
      if p_cb >= 1.0 {
        1.0
      } else if p_cs <= 0.0 {
        0.0
      } else {
        1.0 - ((1.0 - p_cb) / p_cs).min(1.0)
      }
    }
    Operator::SoftLight => soft_light(p_cb, p_cs),
    Operator::Difference => (p_cb - p_cs).abs(),
    Operator::Exclusion => p_cb + p_cs - 2.0 * p_cb * p_cs,
    _ => p_cs,
  }
}

fn mul255(p_a: u32, p_b: u32) -> u32 {
  (p_a * p_b) / 255
}

fn hard_light_int(p_cb: u32, p_cs: u32) -> u32 {
  if p_cs <= 127 {
    mul255(2 * p_cb, p_cs).min(255)
  } else {
    255 - mul255(2 * (255 - p_cb), 255 - p_cs).min(255)
  }
}

/// `B(cb, cs)` in `0..=255` integer terms, for the blend modes usable in
/// integer precision (`spec.md` §4.3/§9: `colorDodge`/`colorBurn`/
/// `softLight` are float-only and never reach this function).
pub fn straight_blend_int(p_op: Operator, p_cb: u32, p_cs: u32) -> u32 {
  match p_op {
    Operator::Multiply => mul255(p_cb, p_cs),
    Operator::Screen => p_cb + p_cs - mul255(p_cb, p_cs),
    Operator::Darken => p_cb.min(p_cs),
    Operator::Lighten => p_cb.max(p_cs),
    Operator::Overlay => hard_light_int(p_cs, p_cb),
    Operator::HardLight => hard_light_int(p_cb, p_cs),
    Operator::Difference => p_cb.abs_diff(p_cs),
    Operator::Exclusion => p_cb + p_cs - 2 * mul255(p_cb, p_cs),
    _ => p_cs,
  }
}

/// Composites one channel through the general pre-multiplied blend
/// formula.
fn composite_channel(p_cb_premul: f32, p_cs_premul: f32, p_alpha_b: f32, p_alpha_s: f32, p_b: f32) -> f32 {
  p_cs_premul * (1.0 - p_alpha_b) + p_cb_premul * (1.0 - p_alpha_s) + p_alpha_b * p_alpha_s * p_b
}

/// Composites `src` over `dst` through a separable blend mode, in float
/// precision.
pub fn composite(p_op: Operator, p_dst: FRgba, p_src: FRgba) -> FRgba {
  let (cb_r, cb_g, cb_b) = p_dst.straight_rgb();
  let (cs_r, cs_g, cs_b) = p_src.straight_rgb();
  let b_r = straight_blend(p_op, cb_r, cs_r);
  let b_g = straight_blend(p_op, cb_g, cs_g);
  let b_b = straight_blend(p_op, cb_b, cs_b);
  FRgba {
    r: composite_channel(p_dst.r, p_src.r, p_dst.a, p_src.a, b_r),
    g: composite_channel(p_dst.g, p_src.g, p_dst.a, p_src.a, b_g),
    b: composite_channel(p_dst.b, p_src.b, p_dst.a, p_src.a, b_b),
    a: p_src.a + p_dst.a - p_src.a * p_dst.a,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use primitives::pixel::Rgba;

  #[test]
  fn multiply_matches_the_documented_premultiplied_formula() {
    // spec.md §4.3: multiply.rgb = s.rgb·d.rgb + s.rgb·(1−d.a) + d.rgb·(1−s.a)
    let dst = FRgba::new(0.2, 0.4, 0.6, 0.8);
    let src = FRgba::new(0.1, 0.3, 0.5, 0.9);
    let out = composite(Operator::Multiply, dst, src);
    let expected_r = src.r * dst.r + src.r * (1.0 - dst.a) + dst.r * (1.0 - src.a);
    assert!((out.r - expected_r).abs() < 1e-6);
  }

  #[test]
  fn overlay_worked_example() {
    // spec.md §8 seed scenario 4. The 0..1 inputs are the decimal
    // approximations of 8-bit pixels, so quantize through `Rgba` first
    // (as a real surface read would) rather than treating them as exact
    // floats.
    let src = FRgba::from_rgba8(Rgba::new(143, 128, 227, 255));
    let dst = FRgba::from_rgba8(Rgba::new(176, 59, 54, 255));
    let out = composite(Operator::Overlay, dst, src);
    let encoded = out.to_rgba8();
    assert_eq!((encoded.r, encoded.g, encoded.b, encoded.a), (186, 59, 96, 255));
  }

  #[test]
  fn screen_is_alpha_free_in_straight_terms() {
    let out = composite(Operator::Screen, FRgba::new(0.5, 0.5, 0.5, 1.0), FRgba::new(0.25, 0.25, 0.25, 1.0));
    assert!((out.r - (0.5 + 0.25 - 0.125)).abs() < 1e-6);
  }
}
