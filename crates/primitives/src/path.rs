//! Path construction (`spec.md` §3 "Path", §4.4 arc-to-cubic decomposition).
//!
//! A `Path` is a sequence of nodes built with a small fluent API
//! (`move_to`/`line_to`/`curve_to`/`close_path`), following the teacher's
//! `Area::rect` chaining style (`abra/core/core/src/geometry/area.rs`).
//! Tolerance-adaptive flattening of the resulting `CurveTo` nodes lives in
//! the `paint` crate, alongside the fill/stroke plotters that consume it.

use crate::error::PathError;
use crate::point::PointF;

/// One node in a path's node list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
  MoveTo(PointF),
  LineTo(PointF),
  CurveTo(PointF, PointF, PointF),
  ClosePath,
}

/// A sequence of path nodes plus the builder state needed to emit them
/// (current point, sub-path initial point, a pending tolerance).
#[derive(Debug, Clone)]
pub struct Path {
  nodes: Vec<Node>,
  current: Option<PointF>,
  initial: Option<PointF>,
  tolerance: f32,
}

impl Default for Path {
  fn default() -> Self {
    Path::new()
  }
}

/// Clamps a point's coordinates into the 32-bit signed-integer range
/// before storage (`spec.md` §3 Path invariants).
fn clamp_point(p_point: PointF) -> PointF {
  PointF::new(
    p_point.x.clamp(i32::MIN as f64, i32::MAX as f64),
    p_point.y.clamp(i32::MIN as f64, i32::MAX as f64),
  )
}

/// Whether every sub-path drawn by `nodes` has been closed.
///
/// A sub-path only counts as "open" once it has drawn content (`LineTo`/
/// `CurveTo`) since its last `MoveTo`; a bare `MoveTo` with nothing drawn
/// into it yet — including the implicit `MoveTo` `close_path` appends after
/// every `ClosePath` (`spec.md` §3) — is not itself unclosed. Starting a new
/// `MoveTo` (or reaching the end of the node list) while a sub-path still
/// has undrawn-over content makes the whole path not closed, even if a
/// later sub-path is properly closed. Shared by `Path::is_closed` and
/// `Painter::fill`'s precondition check so the two never drift apart.
pub fn nodes_are_closed(p_nodes: &[Node]) -> bool {
  let mut has_open_content = false;
  let mut all_closed = true;
  for node in p_nodes {
    match node {
      Node::MoveTo(_) => {
        if has_open_content {
          all_closed = false;
        }
        has_open_content = false;
      }
      Node::LineTo(_) | Node::CurveTo(..) => has_open_content = true,
      Node::ClosePath => has_open_content = false,
    }
  }
  if has_open_content {
    all_closed = false;
  }
  all_closed
}

impl Path {
  /// Creates a new, empty path with the default flattening tolerance.
  pub fn new() -> Path {
    Path {
      nodes: Vec::new(),
      current: None,
      initial: None,
      tolerance: crate::consts::DEFAULT_TOLERANCE,
    }
  }

  /// Sets the flattening tolerance, clamped to the documented minimum.
  pub fn with_tolerance(mut self, p_tolerance: f32) -> Self {
    self.tolerance = p_tolerance.max(crate::consts::MIN_TOLERANCE);
    self
  }

  pub fn tolerance(&self) -> f32 {
    self.tolerance
  }

  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn current_point(&self) -> Option<PointF> {
    self.current
  }

  /// Starts a new sub-path at `p_point`. The first emitted node of any
  /// sub-path is always a `MoveTo`.
  pub fn move_to(&mut self, p_point: impl Into<PointF>) -> &mut Self {
    let p = clamp_point(p_point.into());
    self.nodes.push(Node::MoveTo(p));
    self.current = Some(p);
    self.initial = Some(p);
    self
  }

  /// Appends a straight line segment. Errors if no current point exists.
  pub fn line_to(&mut self, p_point: impl Into<PointF>) -> Result<&mut Self, PathError> {
    if self.current.is_none() {
      return Err(PathError::NoCurrentPoint);
    }
    let p = clamp_point(p_point.into());
    self.nodes.push(Node::LineTo(p));
    self.current = Some(p);
    Ok(self)
  }

  /// Appends a cubic Bézier segment. Errors if no current point exists
  /// (`spec.md` §3: "`curveTo` without a current point is an error").
  pub fn curve_to(
    &mut self, p_ctrl1: impl Into<PointF>, p_ctrl2: impl Into<PointF>, p_to: impl Into<PointF>,
  ) -> Result<&mut Self, PathError> {
    if self.current.is_none() {
      return Err(PathError::NoCurrentPoint);
    }
    let p1 = clamp_point(p_ctrl1.into());
    let p2 = clamp_point(p_ctrl2.into());
    let p3 = clamp_point(p_to.into());
    self.nodes.push(Node::CurveTo(p1, p2, p3));
    self.current = Some(p3);
    Ok(self)
  }

  /// Decomposes a circular arc into cubic Bézier segments of angular span
  /// at most π/2 each, using the classical four-control-point
  /// approximation (`spec.md` §4.4), and appends them as `CurveTo` nodes.
  /// Errors if no current point exists.
  pub fn arc_to(
    &mut self, p_center: impl Into<PointF>, p_radius: f64, p_start_angle: f64, p_end_angle: f64,
  ) -> Result<&mut Self, PathError> {
    if self.current.is_none() {
      return Err(PathError::NoCurrentPoint);
    }
    let center = p_center.into();
    let total = p_end_angle - p_start_angle;
    if total.abs() <= f64::EPSILON || p_radius <= 0.0 {
      return Ok(self);
    }
    let max_span = std::f64::consts::FRAC_PI_2;
    let segment_count = (total.abs() / max_span).ceil().max(1.0) as usize;
    let span = total / segment_count as f64;

    for i in 0..segment_count {
      let a0 = p_start_angle + span * i as f64;
      let a1 = a0 + span;
      let p0 = PointF::new(center.x + p_radius * a0.cos(), center.y + p_radius * a0.sin());
      let p3 = PointF::new(center.x + p_radius * a1.cos(), center.y + p_radius * a1.sin());
      // Classical approximation: control point distance = radius * (4/3) * tan(span/4).
      let k = (4.0 / 3.0) * (span / 4.0).tan();
      let p1 = PointF::new(p0.x - k * p_radius * a0.sin(), p0.y + k * p_radius * a0.cos());
      let p2 = PointF::new(p3.x + k * p_radius * a1.sin(), p3.y - k * p_radius * a1.cos());
      self.curve_to(p1, p2, p3)?;
    }
    Ok(self)
  }

  /// Closes the current sub-path. Always followed by an implicit
  /// `MoveTo` back to the sub-path's initial point (`spec.md` §3).
  pub fn close_path(&mut self) -> Result<&mut Self, PathError> {
    let initial = self.initial.ok_or(PathError::NoInitialPoint)?;
    self.nodes.push(Node::ClosePath);
    self.nodes.push(Node::MoveTo(initial));
    self.current = Some(initial);
    Ok(self)
  }

  /// Whether every sub-path in this path has been closed. An empty path
  /// is vacuously closed. Used by `Painter::fill` to validate preconditions
  /// before any rasterization work begins (`spec.md` §4.7/§7).
  pub fn is_closed(&self) -> bool {
    nodes_are_closed(&self.nodes)
  }

  /// A convenience rectangle path, matching the teacher's `Area::rect`
  /// shape but returning an owned, open `Path` (callers close it).
  pub fn rect(p_origin: impl Into<PointF>, p_width: f64, p_height: f64) -> Path {
    let origin = p_origin.into();
    let mut path = Path::new();
    path.move_to(origin);
    let _ = path.line_to(PointF::new(origin.x + p_width, origin.y));
    let _ = path.line_to(PointF::new(origin.x + p_width, origin.y + p_height));
    let _ = path.line_to(PointF::new(origin.x, origin.y + p_height));
    let _ = path.close_path();
    path
  }
}
