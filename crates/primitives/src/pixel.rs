//! The six concrete pixel layouts the library composites onto: `Rgb`,
//! `Rgba` (pre-multiplied), and four alpha-only depths, plus the
//! cross-format `copy_src` conversion and the two Porter–Duff helpers
//! (`src_over`, `dst_in`) every format exposes. See `spec.md` §3/§4.1.

/// Identifies one of the six pixel layouts (`spec.md` §6 exposed IDs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
  Rgb,
  Rgba,
  Alpha8,
  Alpha4,
  Alpha2,
  Alpha1,
}

impl PixelFormat {
  /// Bit depth of one pixel's alpha channel (or, for `Rgb`/`Rgba`, `8`
  /// since those are always byte-addressable).
  pub fn alpha_bits(self) -> u32 {
    match self {
      PixelFormat::Rgb | PixelFormat::Rgba | PixelFormat::Alpha8 => 8,
      PixelFormat::Alpha4 => 4,
      PixelFormat::Alpha2 => 2,
      PixelFormat::Alpha1 => 1,
    }
  }

  /// Whether pixels of this format are individually byte-addressable
  /// (`Rgb`, `Rgba`, `Alpha8`) or packed several-to-a-byte.
  pub fn is_byte_addressable(self) -> bool {
    self.alpha_bits() >= 8
  }
}

/// Scales an alpha-like value from one bit depth to another using
/// bit-replication, so the maximum source value always maps to the
/// maximum target value (`spec.md` §4.1's `copySrc` invariant).
pub fn scale_alpha(p_value: u32, p_from_bits: u32, p_to_bits: u32) -> u32 {
  if p_from_bits == p_to_bits {
    return p_value;
  }
  if p_to_bits == 1 {
    // Scaling to 1-bit: threshold at the source's half-max.
    return if p_value >= (1u32 << (p_from_bits - 1)) { 1 } else { 0 };
  }
  if p_from_bits == 1 {
    // Scaling from 1-bit: multiply by the target's max value.
    let max = (1u32 << p_to_bits) - 1;
    return p_value * max;
  }
  if p_from_bits > p_to_bits {
    // Narrowing: keep the top `to_bits` bits.
    return p_value >> (p_from_bits - p_to_bits);
  }
  // Widening: replicate the source bit pattern, MSB-aligned, until the
  // target width is filled.
  let mut result = 0u32;
  let mut filled = 0i64;
  let to = p_to_bits as i64;
  let from = p_from_bits as i64;
  while filled < to {
    let shift = to - filled - from;
    if shift >= 0 {
      result |= p_value << shift;
    } else {
      result |= p_value >> (-shift);
    }
    filled += from;
  }
  result
}

/// An opaque, alpha-free RGB pixel. Treated as fully opaque in composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl Rgb {
  pub fn new(p_r: u8, p_g: u8, p_b: u8) -> Self {
    Rgb { r: p_r, g: p_g, b: p_b }
  }

  pub fn black() -> Self {
    Rgb { r: 0, g: 0, b: 0 }
  }
}

/// A pre-multiplied RGBA pixel. All compositor math assumes `r/g/b <= a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Rgba {
  /// The fully transparent pixel (all channels zero).
  pub const CLEAR: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

  /// Fully opaque black. `Opaque` in `spec.md`'s terms is context
  /// dependent per format; for `Rgba` this is the identity for `src_over`.
  pub const OPAQUE_BLACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 255 };

  pub fn new(p_r: u8, p_g: u8, p_b: u8, p_a: u8) -> Self {
    Rgba {
      r: p_r,
      g: p_g,
      b: p_b,
      a: p_a,
    }
  }

  /// Converts a straight-alpha `(r, g, b, a)` tuple into pre-multiplied form.
  pub fn multiply(p_r: u8, p_g: u8, p_b: u8, p_a: u8) -> Rgba {
    let a = p_a as u32;
    Rgba {
      r: ((p_r as u32 * a) / 255) as u8,
      g: ((p_g as u32 * a) / 255) as u8,
      b: ((p_b as u32 * a) / 255) as u8,
      a: p_a,
    }
  }

  /// Converts this pre-multiplied pixel back to straight alpha.
  /// Demultiplying a zero-alpha pixel yields transparent black by definition.
  pub fn demultiply(&self) -> (u8, u8, u8, u8) {
    if self.a == 0 {
      return (0, 0, 0, 0);
    }
    let a = self.a as u32;
    let r = ((self.r as u32 * 255 + a / 2) / a).min(255) as u8;
    let g = ((self.g as u32 * 255 + a / 2) / a).min(255) as u8;
    let b = ((self.b as u32 * 255 + a / 2) / a).min(255) as u8;
    (r, g, b, self.a)
  }

  /// Porter–Duff `src-over`: `s + d * (1 - s.a)`, rounded toward zero.
  pub fn src_over(p_dst: Rgba, p_src: Rgba) -> Rgba {
    let inv_a = 255 - p_src.a as u32;
    Rgba {
      r: (p_src.r as u32 + (p_dst.r as u32 * inv_a) / 255) as u8,
      g: (p_src.g as u32 + (p_dst.g as u32 * inv_a) / 255) as u8,
      b: (p_src.b as u32 + (p_dst.b as u32 * inv_a) / 255) as u8,
      a: (p_src.a as u32 + (p_dst.a as u32 * inv_a) / 255) as u8,
    }
  }

  /// Porter–Duff `dst-in`: destination multiplied by normalized source alpha.
  pub fn dst_in(p_dst: Rgba, p_src: Rgba) -> Rgba {
    let a = p_src.a as u32;
    Rgba {
      r: ((p_dst.r as u32 * a) / 255) as u8,
      g: ((p_dst.g as u32 * a) / 255) as u8,
      b: ((p_dst.b as u32 * a) / 255) as u8,
      a: ((p_dst.a as u32 * a) / 255) as u8,
    }
  }

  /// Cross-format conversion from `Rgb` (fully opaque).
  pub fn copy_src_rgb(p_src: Rgb) -> Rgba {
    Rgba {
      r: p_src.r,
      g: p_src.g,
      b: p_src.b,
      a: 255,
    }
  }

  /// Cross-format conversion from an alpha-only pixel (color set to black,
  /// alpha widened/narrowed to 8 bits).
  pub fn copy_src_alpha(p_value: u32, p_bits: u32) -> Rgba {
    let a = scale_alpha(p_value, p_bits, 8) as u8;
    Rgba { r: 0, g: 0, b: 0, a }
  }
}

impl Rgb {
  /// Cross-format conversion from `Rgba`: alpha is dropped.
  pub fn copy_src_rgba(p_src: Rgba) -> Rgb {
    Rgb {
      r: p_src.r,
      g: p_src.g,
      b: p_src.b,
    }
  }
}

/// A single alpha-only pixel at a fixed bit depth. `Alpha8` is
/// byte-addressable; `Alpha4`/`Alpha2`/`Alpha1` are packed several-to-a-byte
/// (handled by `raster_core::Surface`, not by this type itself).
macro_rules! alpha_format {
  ($name:ident, $bits:expr) => {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct $name(pub u8);

    impl $name {
      pub const BITS: u32 = $bits;
      pub const MAX: u8 = ((1u32 << $bits) - 1) as u8;

      /// The all-ones "fully covered" value at this bit depth.
      pub fn opaque() -> Self {
        $name(Self::MAX)
      }

      pub fn src_over(p_dst: $name, p_src: $name) -> $name {
        let max = Self::MAX as u32;
        let inv_a = max - p_src.0 as u32;
        let a = p_src.0 as u32 + (p_dst.0 as u32 * inv_a) / max;
        $name(a.min(max) as u8)
      }

      pub fn dst_in(p_dst: $name, p_src: $name) -> $name {
        let max = Self::MAX as u32;
        $name(((p_dst.0 as u32 * p_src.0 as u32) / max) as u8)
      }

      /// Converts to another alpha bit depth via bit-replication scaling.
      pub fn scale_to(self, p_to_bits: u32) -> u32 {
        scale_alpha(self.0 as u32, $bits, p_to_bits)
      }

      /// Converts from an alpha value at another bit depth.
      pub fn scale_from(p_value: u32, p_from_bits: u32) -> Self {
        $name(scale_alpha(p_value, p_from_bits, $bits) as u8)
      }
    }
  };
}

alpha_format!(Alpha8, 8);
alpha_format!(Alpha4, 4);
alpha_format!(Alpha2, 2);
alpha_format!(Alpha1, 1);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn demultiply_then_multiply_preserves_alpha() {
    for a in [1u8, 64, 128, 200, 255] {
      for rgb in [(10u8, 200u8, 33u8), (255, 255, 255), (0, 0, 1)] {
        let premul = Rgba::multiply(rgb.0, rgb.1, rgb.2, a);
        let (_, _, _, a_out) = premul.demultiply();
        assert_eq!(a_out, a);
      }
    }
  }

  #[test]
  fn demultiply_zero_alpha_is_transparent_black() {
    let p = Rgba::new(0, 0, 0, 0);
    assert_eq!(p.demultiply(), (0, 0, 0, 0));
  }

  #[test]
  fn src_over_full_opacity_worked_example() {
    // Per the formula above: `s + d·(255−s.a)/255`, round toward zero.
    let dst = Rgba::new(15, 254, 249, 229);
    let src = Rgba::new(54, 10, 63, 191);
    let out = Rgba::src_over(dst, src);
    assert_eq!((out.r, out.g, out.b, out.a), (57, 73, 125, 248));
  }

  #[test]
  fn src_over_identities() {
    let dst = Rgba::new(12, 34, 56, 78);
    let opaque = Rgba::new(200, 100, 50, 255);
    assert_eq!(Rgba::src_over(dst, opaque), opaque);
    assert_eq!(Rgba::src_over(dst, Rgba::CLEAR), dst);
  }

  #[test]
  fn dst_in_identities() {
    let dst = Rgba::new(12, 34, 56, 78);
    assert_eq!(Rgba::dst_in(dst, Rgba::new(0, 0, 0, 255)), dst);
    assert_eq!(Rgba::dst_in(dst, Rgba::CLEAR), Rgba::CLEAR);
  }

  #[test]
  fn scale_alpha_max_maps_to_max() {
    for (from, to) in [(1, 2), (1, 4), (1, 8), (2, 4), (2, 8), (4, 8), (8, 4), (8, 2), (8, 1), (4, 1), (2, 1)] {
      let src_max = (1u32 << from) - 1;
      let dst_max = (1u32 << to) - 1;
      assert_eq!(scale_alpha(src_max, from, to), dst_max, "from {from} to {to}");
      assert_eq!(scale_alpha(0, from, to), 0, "from {from} to {to}");
    }
  }

  #[test]
  fn scale_alpha_widens_4_to_8_by_replication() {
    // 0x5 (0b0101) replicated to 8 bits is 0x55.
    assert_eq!(scale_alpha(0x5, 4, 8), 0x55);
  }

  #[test]
  fn alpha4_opaque_is_all_ones() {
    assert_eq!(Alpha4::opaque().0, 0x0F);
  }
}
