//! Errors raised by `Painter::fill`/`Painter::stroke` (`spec.md` §7).

use raster_core::SurfaceError;

/// Errors `Painter::fill` can return before or during rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillError {
  /// At least one sub-path was left open; fill requires every sub-path closed.
  PathNotClosed,
  /// A scratch surface (the supersample mask or foreground) failed to
  /// allocate, passed through verbatim.
  Surface(SurfaceError),
}

impl std::fmt::Display for FillError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FillError::PathNotClosed => write!(f, "fill requires every sub-path to be closed"),
      FillError::Surface(e) => write!(f, "{e}"),
    }
  }
}

impl std::error::Error for FillError {}

impl From<SurfaceError> for FillError {
  fn from(p_err: SurfaceError) -> Self {
    FillError::Surface(p_err)
  }
}

/// Errors `Painter::stroke` can return before or during rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeError {
  /// The current transform has a zero determinant; stroking requires an
  /// invertible transform to offset the path in device space (`spec.md`
  /// §4.6/§7, seed scenario 6).
  InvalidMatrix,
  /// A scratch surface (the supersample mask or foreground) failed to
  /// allocate, passed through verbatim.
  Surface(SurfaceError),
}

impl std::fmt::Display for StrokeError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      StrokeError::InvalidMatrix => write!(f, "stroke requires an invertible transform"),
      StrokeError::Surface(e) => write!(f, "{e}"),
    }
  }
}

impl std::error::Error for StrokeError {}

impl From<SurfaceError> for StrokeError {
  fn from(p_err: SurfaceError) -> Self {
    StrokeError::Surface(p_err)
  }
}
