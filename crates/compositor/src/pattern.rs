//! The per-pixel color sources a batch can paint with: a solid color, a
//! sampled gradient, or a thresholded dither of either (`spec.md` §6's
//! `getPixel`/`getRGBAVec`/`getColorVec` pattern surface). Grounded on
//! the teacher's `Shader` trait — one `shade`-like query per sample
//! point, with a vectorized variant for a whole stride at once.

use primitives::{Color, Gradient, PointF, Rgba};

use crate::dither::{self, DitherKind};

/// A source of color sampled at device-space coordinates. Implementations
/// must be `Sync`: batches sample patterns from parallel surface rows.
pub trait Pattern: Sync {
  /// The straight-alpha linear color at `(p_x, p_y)`.
  fn get_color(&self, p_x: f64, p_y: f64) -> Color;

  /// The pre-multiplied 8-bit pixel at `(p_x, p_y)`.
  fn get_pixel(&self, p_x: f64, p_y: f64) -> Rgba {
    self.get_color(p_x, p_y).to_linear_rgba()
  }

  /// Samples `p_len` consecutive pixels starting at `(p_x, p_y)`,
  /// advancing one device unit per sample.
  fn get_rgba_vec(&self, p_x: f64, p_y: f64, p_len: usize) -> Vec<Rgba> {
    (0..p_len).map(|i| self.get_pixel(p_x + i as f64, p_y)).collect()
  }

  /// The `Color` counterpart of `get_rgba_vec`.
  fn get_color_vec(&self, p_x: f64, p_y: f64, p_len: usize) -> Vec<Color> {
    (0..p_len).map(|i| self.get_color(p_x + i as f64, p_y)).collect()
  }

  /// `Some(color)` when this pattern is a single, position-independent
  /// color (as `SolidPattern` is). Lets a painter skip building a full
  /// foreground surface when an alpha-only destination just needs a
  /// coverage mask scaled by one constant alpha.
  fn solid_color(&self) -> Option<Color> {
    None
  }
}

/// A pattern that returns the same color everywhere.
pub struct SolidPattern {
  color: Color,
}

impl SolidPattern {
  pub fn new(p_color: Color) -> Self {
    SolidPattern { color: p_color }
  }
}

impl Pattern for SolidPattern {
  fn get_color(&self, _p_x: f64, _p_y: f64) -> Color {
    self.color
  }

  fn solid_color(&self) -> Option<Color> {
    Some(self.color)
  }
}

/// A pattern backed by a `Gradient`, sampled directly in device space.
pub struct GradientPattern {
  gradient: Gradient,
  origin: PointF,
}

impl GradientPattern {
  pub fn new(p_gradient: Gradient, p_origin: PointF) -> Self {
    GradientPattern {
      gradient: p_gradient,
      origin: p_origin,
    }
  }
}

impl Pattern for GradientPattern {
  fn get_color(&self, p_x: f64, p_y: f64) -> Color {
    self.gradient.sample(p_x - self.origin.x, p_y - self.origin.y)
  }
}

/// Wraps another pattern, perturbing its sampled channels by a threshold
/// matrix before quantizing to `target_bits` (`spec.md` §4.9).
pub struct DitherPattern<P: Pattern> {
  inner: P,
  kind: DitherKind,
  target_bits: u32,
}

impl<P: Pattern> DitherPattern<P> {
  pub fn new(p_inner: P, p_kind: DitherKind, p_target_bits: u32) -> Self {
    DitherPattern {
      inner: p_inner,
      kind: p_kind,
      target_bits: p_target_bits,
    }
  }
}

impl<P: Pattern> Pattern for DitherPattern<P> {
  fn get_color(&self, p_x: f64, p_y: f64) -> Color {
    let c = self.inner.get_color(p_x, p_y);
    let perturbed = dither::perturb(self.kind, p_x.floor() as i64, p_y.floor() as i64, [c.r, c.g, c.b, c.a], self.target_bits);
    Color::new(perturbed[0], perturbed[1], perturbed[2], perturbed[3])
  }
}
