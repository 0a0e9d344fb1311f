//! The 28 Porter-Duff and W3C blend-mode operators a compositor batch can
//! apply (`spec.md` §4.3), plus the integer/float precision a batch runs
//! in.

/// Which scratch representation a batch computes in. The surface-level
/// API auto-promotes to `Float` whenever the batch contains a float-only
/// operator; the stride-level API takes this as a required parameter and
/// never auto-promotes (`spec.md` §4.3/§9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
  Integer,
  Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
  Clear,
  Src,
  Dst,
  SrcOver,
  DstOver,
  SrcIn,
  DstIn,
  SrcOut,
  DstOut,
  SrcAtop,
  DstAtop,
  Xor,
  Plus,
  Multiply,
  Screen,
  Overlay,
  Darken,
  Lighten,
  ColorDodge,
  ColorBurn,
  HardLight,
  SoftLight,
  Difference,
  Exclusion,
  Hue,
  Saturation,
  Color,
  Luminosity,
}

impl Operator {
  /// Whether this operator requires float precision. Invoking one of
  /// these in integer mode deterministically returns opaque zero
  /// (`clear`), never diverges (`spec.md` §4.3/§9).
  pub fn requires_float(self) -> bool {
    matches!(
      self,
      Operator::ColorDodge
        | Operator::ColorBurn
        | Operator::SoftLight
        | Operator::Hue
        | Operator::Saturation
        | Operator::Color
        | Operator::Luminosity
    )
  }

  /// Whether this operator blends colors via a W3C blend function (as
  /// opposed to being a plain Porter-Duff `Fa`/`Fb` compositing rule).
  pub fn is_blend_mode(self) -> bool {
    matches!(
      self,
      Operator::Multiply
        | Operator::Screen
        | Operator::Overlay
        | Operator::Darken
        | Operator::Lighten
        | Operator::ColorDodge
        | Operator::ColorBurn
        | Operator::HardLight
        | Operator::SoftLight
        | Operator::Difference
        | Operator::Exclusion
        | Operator::Hue
        | Operator::Saturation
        | Operator::Color
        | Operator::Luminosity
    )
  }

  /// The Porter-Duff `(Fa, Fb)` coefficient pair for the plain
  /// compositing operators (`clear` through `plus`). Not meaningful for
  /// blend-mode operators.
  pub fn porter_duff_coefficients(self, p_src_alpha: f32, p_dst_alpha: f32) -> (f32, f32) {
    match self {
      Operator::Clear => (0.0, 0.0),
      Operator::Src => (1.0, 0.0),
      Operator::Dst => (0.0, 1.0),
      Operator::SrcOver => (1.0, 1.0 - p_src_alpha),
      Operator::DstOver => (1.0 - p_dst_alpha, 1.0),
      Operator::SrcIn => (p_dst_alpha, 0.0),
      Operator::DstIn => (0.0, p_src_alpha),
      Operator::SrcOut => (1.0 - p_dst_alpha, 0.0),
      Operator::DstOut => (0.0, 1.0 - p_src_alpha),
      Operator::SrcAtop => (p_dst_alpha, 1.0 - p_src_alpha),
      Operator::DstAtop => (1.0 - p_dst_alpha, p_src_alpha),
      Operator::Xor => (1.0 - p_dst_alpha, 1.0 - p_src_alpha),
      Operator::Plus => (1.0, 1.0),
      _ => (0.0, 0.0),
    }
  }

  /// The same `(Fa, Fb)` pair as `porter_duff_coefficients`, in the
  /// `0..=255` integer domain the integer-precision compositor scratch
  /// uses, so the two precisions apply the identical truncating-division
  /// formula rather than diverging via a float round-trip.
  pub fn porter_duff_coefficients_int(self, p_src_alpha: u32, p_dst_alpha: u32) -> (u32, u32) {
    match self {
      Operator::Clear => (0, 0),
      Operator::Src => (255, 0),
      Operator::Dst => (0, 255),
      Operator::SrcOver => (255, 255 - p_src_alpha),
      Operator::DstOver => (255 - p_dst_alpha, 255),
      Operator::SrcIn => (p_dst_alpha, 0),
      Operator::DstIn => (0, p_src_alpha),
      Operator::SrcOut => (255 - p_dst_alpha, 0),
      Operator::DstOut => (0, 255 - p_src_alpha),
      Operator::SrcAtop => (p_dst_alpha, 255 - p_src_alpha),
      Operator::DstAtop => (255 - p_dst_alpha, p_src_alpha),
      Operator::Xor => (255 - p_dst_alpha, 255 - p_src_alpha),
      Operator::Plus => (255, 255),
      _ => (0, 0),
    }
  }
}
