//! Dispatches an `Operator` to its composite function in either
//! precision (`spec.md` §4.3).

mod nonseparable;
mod separable;

use primitives::pixel::Rgba;

use crate::frgba::FRgba;
use crate::operator::Operator;

/// Composites `src` over `dst` in float precision. Every operator is
/// supported in this mode.
pub fn composite_float(p_op: Operator, p_dst: FRgba, p_src: FRgba) -> FRgba {
  match p_op {
    Operator::Hue | Operator::Saturation | Operator::Color | Operator::Luminosity => {
      nonseparable::composite(p_op, p_dst, p_src)
    }
    op if op.is_blend_mode() => separable::composite(op, p_dst, p_src),
    _ => {
      let (fa, fb) = p_op.porter_duff_coefficients(p_src.a, p_dst.a);
      FRgba {
        r: p_src.r * fa + p_dst.r * fb,
        g: p_src.g * fa + p_dst.g * fb,
        b: p_src.b * fa + p_dst.b * fb,
        a: (p_src.a * fa + p_dst.a * fb).min(1.0),
      }
    }
  }
}

fn mul255(p_a: u32, p_b: u32) -> u32 {
  (p_a * p_b) / 255
}

/// Composites `src` over `dst` in integer precision, per-channel `u16`
/// scratch widened to `u32` for products. Float-only operators return
/// `Rgba::CLEAR` (`spec.md` §4.3/§9 — documented, not an error).
pub fn composite_int(p_op: Operator, p_dst: Rgba, p_src: Rgba) -> Rgba {
  if p_op.requires_float() {
    return Rgba::CLEAR;
  }
  if p_op.is_blend_mode() {
    let demul = |c: u8, a: u8| if a == 0 { 0u32 } else { ((c as u32 * 255) / a as u32).min(255) };
    let (cb_r, cb_g, cb_b) = (demul(p_dst.r, p_dst.a), demul(p_dst.g, p_dst.a), demul(p_dst.b, p_dst.a));
    let (cs_r, cs_g, cs_b) = (demul(p_src.r, p_src.a), demul(p_src.g, p_src.a), demul(p_src.b, p_src.a));
    let b_r = separable::straight_blend_int(p_op, cb_r, cs_r);
    let b_g = separable::straight_blend_int(p_op, cb_g, cs_g);
    let b_b = separable::straight_blend_int(p_op, cb_b, cs_b);
    let (ab, as_) = (p_dst.a as u32, p_src.a as u32);
    let composite_channel = |cb_premul: u32, cs_premul: u32, b: u32| -> u8 {
      let term1 = (cs_premul * (255 - ab)) / 255;
      let term2 = (cb_premul * (255 - as_)) / 255;
      let term3 = mul255(mul255(ab, as_), b);
      (term1 + term2 + term3).min(255) as u8
    };
    let out_r = composite_channel(p_dst.r as u32, p_src.r as u32, b_r);
    let out_g = composite_channel(p_dst.g as u32, p_src.g as u32, b_g);
    let out_b = composite_channel(p_dst.b as u32, p_src.b as u32, b_b);
    let out_a = (as_ + ab - mul255(as_, ab)).min(255) as u8;
    return Rgba::new(out_r, out_g, out_b, out_a);
  }
  let (fa, fb) = p_op.porter_duff_coefficients_int(p_src.a as u32, p_dst.a as u32);
  let term = |c: u8, f: u32| mul255(c as u32, f);
  let r = (term(p_src.r, fa) + term(p_dst.r, fb)).min(255) as u8;
  let g = (term(p_src.g, fa) + term(p_dst.g, fb)).min(255) as u8;
  let b = (term(p_src.b, fa) + term(p_dst.b, fb)).min(255) as u8;
  let a = (term(p_src.a, fa) + term(p_dst.a, fb)).min(255) as u8;
  Rgba::new(r, g, b, a)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn src_over_in_integer_mode_matches_the_dedicated_rgba_formula() {
    let dst = Rgba::new(15, 254, 249, 229);
    let src = Rgba::new(54, 10, 63, 191);
    let via_operator = composite_int(Operator::SrcOver, dst, src);
    let direct = Rgba::src_over(dst, src);
    assert_eq!((via_operator.r, via_operator.g, via_operator.b, via_operator.a), (direct.r, direct.g, direct.b, direct.a));
  }

  #[test]
  fn float_only_operator_in_integer_mode_returns_clear() {
    let dst = Rgba::new(10, 20, 30, 255);
    let src = Rgba::new(40, 50, 60, 255);
    assert_eq!(composite_int(Operator::ColorDodge, dst, src), Rgba::CLEAR);
  }

  #[test]
  fn clear_operator_yields_transparent_in_both_precisions() {
    let dst = Rgba::new(10, 20, 30, 255);
    let src = Rgba::new(40, 50, 60, 255);
    assert_eq!(composite_int(Operator::Clear, dst, src), Rgba::CLEAR);
    let f_out = composite_float(Operator::Clear, FRgba::from_rgba8(dst), FRgba::from_rgba8(src));
    assert_eq!(f_out, FRgba::CLEAR);
  }
}
