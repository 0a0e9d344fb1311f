//! Error types surfaced while building a [`crate::Path`].
//!
//! Hand-rolled `Display`/`Error` impls, no derive-macro error crate —
//! matching the teacher's `AiError` pattern (`abra/ai/core/src/error.rs`).

/// Errors raised by path-construction operations that require prior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
  /// `curve_to`/`line_to` called before any `move_to` established a current point.
  NoCurrentPoint,
  /// An operation required a sub-path's initial point but none was set.
  NoInitialPoint,
}

impl std::fmt::Display for PathError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PathError::NoCurrentPoint => write!(f, "path operation requires a current point"),
      PathError::NoInitialPoint => write!(f, "path operation requires a sub-path initial point"),
    }
  }
}

impl std::error::Error for PathError {}
