//! A format-tagged pixel value, used wherever `Surface`/`Stride` need to
//! move a single pixel between formats without the caller juggling which
//! concrete `primitives::pixel` type applies (`spec.md` §4.1's `copySrc`
//! cross-format casts, driven from `Surface`/`Stride` call sites).

use primitives::pixel::{Alpha1, Alpha2, Alpha4, Alpha8, PixelFormat, Rgb, Rgba};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelValue {
  Rgb(Rgb),
  Rgba(Rgba),
  Alpha8(Alpha8),
  Alpha4(Alpha4),
  Alpha2(Alpha2),
  Alpha1(Alpha1),
}

impl PixelValue {
  pub fn format(self) -> PixelFormat {
    match self {
      PixelValue::Rgb(_) => PixelFormat::Rgb,
      PixelValue::Rgba(_) => PixelFormat::Rgba,
      PixelValue::Alpha8(_) => PixelFormat::Alpha8,
      PixelValue::Alpha4(_) => PixelFormat::Alpha4,
      PixelValue::Alpha2(_) => PixelFormat::Alpha2,
      PixelValue::Alpha1(_) => PixelFormat::Alpha1,
    }
  }

  /// The fully-transparent (for alpha formats, zero-coverage) value for
  /// a given format. Used to pad out-of-range reads.
  pub fn clear(p_format: PixelFormat) -> PixelValue {
    match p_format {
      PixelFormat::Rgb => PixelValue::Rgb(Rgb::black()),
      PixelFormat::Rgba => PixelValue::Rgba(Rgba::CLEAR),
      PixelFormat::Alpha8 => PixelValue::Alpha8(Alpha8(0)),
      PixelFormat::Alpha4 => PixelValue::Alpha4(Alpha4(0)),
      PixelFormat::Alpha2 => PixelValue::Alpha2(Alpha2(0)),
      PixelFormat::Alpha1 => PixelValue::Alpha1(Alpha1(0)),
    }
  }

  /// Converts through pre-multiplied `Rgba` as the common intermediate
  /// representation, matching `spec.md` §4.1's deterministic lossy casts:
  /// `Rgb` is treated as opaque, alpha-only formats as black with that
  /// alpha, and widening/narrowing between alpha depths is bit-replication.
  pub fn to_rgba(self) -> Rgba {
    match self {
      PixelValue::Rgb(p) => Rgba::copy_src_rgb(p),
      PixelValue::Rgba(p) => p,
      PixelValue::Alpha8(p) => Rgba::copy_src_alpha(p.0 as u32, Alpha8::BITS),
      PixelValue::Alpha4(p) => Rgba::copy_src_alpha(p.0 as u32, Alpha4::BITS),
      PixelValue::Alpha2(p) => Rgba::copy_src_alpha(p.0 as u32, Alpha2::BITS),
      PixelValue::Alpha1(p) => Rgba::copy_src_alpha(p.0 as u32, Alpha1::BITS),
    }
  }

  pub fn from_rgba(p_format: PixelFormat, p_rgba: Rgba) -> PixelValue {
    match p_format {
      PixelFormat::Rgb => PixelValue::Rgb(Rgb::copy_src_rgba(p_rgba)),
      PixelFormat::Rgba => PixelValue::Rgba(p_rgba),
      PixelFormat::Alpha8 => PixelValue::Alpha8(Alpha8::scale_from(p_rgba.a as u32, 8)),
      PixelFormat::Alpha4 => PixelValue::Alpha4(Alpha4::scale_from(p_rgba.a as u32, 8)),
      PixelFormat::Alpha2 => PixelValue::Alpha2(Alpha2::scale_from(p_rgba.a as u32, 8)),
      PixelFormat::Alpha1 => PixelValue::Alpha1(Alpha1::scale_from(p_rgba.a as u32, 8)),
    }
  }

  /// Casts `self` to `p_format`, round-tripping through `Rgba` when the
  /// formats differ. A same-format cast is the identity.
  pub fn copy_src(self, p_format: PixelFormat) -> PixelValue {
    if self.format() == p_format {
      return self;
    }
    PixelValue::from_rgba(p_format, self.to_rgba())
  }

  /// Porter-Duff `src-over`, dispatched to the matching same-format
  /// per-pixel operation. Panics if `dst`/`src` formats differ; callers
  /// are expected to `copy_src` onto a common format first.
  pub fn src_over(p_dst: PixelValue, p_src: PixelValue) -> PixelValue {
    match (p_dst, p_src) {
      (PixelValue::Rgb(_), PixelValue::Rgb(_)) => p_src,
      (PixelValue::Rgba(d), PixelValue::Rgba(s)) => PixelValue::Rgba(Rgba::src_over(d, s)),
      (PixelValue::Alpha8(d), PixelValue::Alpha8(s)) => PixelValue::Alpha8(Alpha8::src_over(d, s)),
      (PixelValue::Alpha4(d), PixelValue::Alpha4(s)) => PixelValue::Alpha4(Alpha4::src_over(d, s)),
      (PixelValue::Alpha2(d), PixelValue::Alpha2(s)) => PixelValue::Alpha2(Alpha2::src_over(d, s)),
      (PixelValue::Alpha1(d), PixelValue::Alpha1(s)) => PixelValue::Alpha1(Alpha1::src_over(d, s)),
      _ => panic!("src_over requires matching pixel formats"),
    }
  }

  pub fn dst_in(p_dst: PixelValue, p_src: PixelValue) -> PixelValue {
    match (p_dst, p_src) {
      (PixelValue::Rgb(d), PixelValue::Rgb(_)) => PixelValue::Rgb(d),
      (PixelValue::Rgba(d), PixelValue::Rgba(s)) => PixelValue::Rgba(Rgba::dst_in(d, s)),
      (PixelValue::Alpha8(d), PixelValue::Alpha8(s)) => PixelValue::Alpha8(Alpha8::dst_in(d, s)),
      (PixelValue::Alpha4(d), PixelValue::Alpha4(s)) => PixelValue::Alpha4(Alpha4::dst_in(d, s)),
      (PixelValue::Alpha2(d), PixelValue::Alpha2(s)) => PixelValue::Alpha2(Alpha2::dst_in(d, s)),
      (PixelValue::Alpha1(d), PixelValue::Alpha1(s)) => PixelValue::Alpha1(Alpha1::dst_in(d, s)),
      _ => panic!("dst_in requires matching pixel formats"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rgb_copy_src_to_rgba_is_opaque() {
    let v = PixelValue::Rgb(Rgb::new(10, 20, 30)).copy_src(PixelFormat::Rgba);
    assert_eq!(v, PixelValue::Rgba(Rgba::new(10, 20, 30, 255)));
  }

  #[test]
  fn alpha_copy_src_to_rgb_is_black() {
    let v = PixelValue::Alpha8(Alpha8(200)).copy_src(PixelFormat::Rgb);
    assert_eq!(v, PixelValue::Rgb(Rgb::black()));
  }

  #[test]
  fn alpha_copy_src_max_maps_to_max() {
    let v = PixelValue::Alpha8(Alpha8::opaque()).copy_src(PixelFormat::Alpha4);
    assert_eq!(v, PixelValue::Alpha4(Alpha4::opaque()));
  }

  #[test]
  fn same_format_copy_src_is_identity() {
    let v = PixelValue::Rgba(Rgba::new(1, 2, 3, 4));
    assert_eq!(v.copy_src(PixelFormat::Rgba), v);
  }
}
