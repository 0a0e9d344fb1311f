//! What a batch operation reads as its source: a fixed pixel, another
//! surface's stride, a sampled gradient, or a dithered wrapping of one of
//! those (`spec.md` §4.3/§4.9's `src`/`dst` overrides).

use primitives::{Gradient, PointF};
use raster_core::{PixelValue, Stride};

use crate::dither::DitherKind;

/// An override for the running value a batch operation reads, or `None`
/// to fall back to the batch's current running value (`spec.md` §4.3).
#[derive(Debug, Clone)]
pub enum Source {
  /// Use the batch's running intermediate value unmodified.
  None,
  /// A single fixed pixel, broadcast across the whole stride.
  Pixel(PixelValue),
  /// Another surface's pre-read stride, aligned one-to-one by index.
  Stride(Stride),
  /// Sample a gradient at each position, offset from `p_origin`.
  Gradient { gradient: Gradient, origin: PointF },
  /// Perturb the wrapped source's sampled channels by a threshold matrix
  /// before quantizing to `target_bits` (`spec.md` §4.9).
  Dither {
    inner: Box<Source>,
    kind: DitherKind,
    target_bits: u32,
  },
}

impl Source {
  pub fn dither(p_inner: Source, p_kind: DitherKind, p_target_bits: u32) -> Source {
    Source::Dither {
      inner: Box::new(p_inner),
      kind: p_kind,
      target_bits: p_target_bits,
    }
  }
}
