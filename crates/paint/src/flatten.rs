//! Tolerance-adaptive flattening of a path's node list into a polyline of
//! `Move`/`Line`/`Close` steps (`spec.md` §4.4). Cubic Béziers are
//! subdivided by de Casteljau halving until the control points deviate
//! from the chord by no more than `tolerance`; three co-linear control
//! legs collapse to a single `Line` on the first flatness check.

use primitives::point::PointF;
use primitives::{Node, path::Path};

/// One step of a flattened path: straight segments and sub-path
/// boundaries only, no curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlatNode {
  Move(PointF),
  Line(PointF),
  Close,
}

/// Recursion depth past which a cubic is flattened regardless of its
/// flatness error, guarding against pathological/degenerate control
/// points that never converge.
const MAX_SUBDIVISION_DEPTH: u32 = 24;

fn point_line_distance(p_point: PointF, p_a: PointF, p_b: PointF) -> f64 {
  let axis = p_b - p_a;
  let len = axis.length();
  if len <= f64::EPSILON {
    return (p_point - p_a).length();
  }
  (axis.cross(p_point - p_a)).abs() / len
}

fn flatten_cubic(
  p_p0: PointF, p_p1: PointF, p_p2: PointF, p_p3: PointF, p_tolerance: f64, p_depth: u32, p_out: &mut Vec<FlatNode>,
) {
  let flat = p_depth >= MAX_SUBDIVISION_DEPTH
    || (point_line_distance(p_p1, p_p0, p_p3) <= p_tolerance && point_line_distance(p_p2, p_p0, p_p3) <= p_tolerance);
  if flat {
    p_out.push(FlatNode::Line(p_p3));
    return;
  }
  let p01 = p_p0.lerp(p_p1, 0.5);
  let p12 = p_p1.lerp(p_p2, 0.5);
  let p23 = p_p2.lerp(p_p3, 0.5);
  let p012 = p01.lerp(p12, 0.5);
  let p123 = p12.lerp(p23, 0.5);
  let mid = p012.lerp(p123, 0.5);
  flatten_cubic(p_p0, p01, p012, mid, p_tolerance, p_depth + 1, p_out);
  flatten_cubic(mid, p123, p23, p_p3, p_tolerance, p_depth + 1, p_out);
}

/// Flattens a node list at `p_tolerance` device units (clamped to
/// `primitives::consts::MIN_TOLERANCE`).
pub fn flatten_path(p_nodes: &[Node], p_tolerance: f32) -> Vec<FlatNode> {
  let tolerance = (p_tolerance.max(primitives::consts::MIN_TOLERANCE)) as f64;
  let mut out = Vec::new();
  let mut current = PointF::zero();
  for node in p_nodes {
    match node {
      Node::MoveTo(p) => {
        out.push(FlatNode::Move(*p));
        current = *p;
      }
      Node::LineTo(p) => {
        out.push(FlatNode::Line(*p));
        current = *p;
      }
      Node::CurveTo(c1, c2, p3) => {
        flatten_cubic(current, *c1, *c2, *p3, tolerance, 0, &mut out);
        current = *p3;
      }
      Node::ClosePath => out.push(FlatNode::Close),
    }
  }
  out
}

/// Convenience wrapper over `flatten_path` for a built `Path`.
pub fn flatten(p_path: &Path, p_tolerance: f32) -> Vec<FlatNode> {
  flatten_path(p_path.nodes(), p_tolerance)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn straight_curve_collapses_to_one_line() {
    // Three co-linear control legs: the curve is itself a straight line.
    let p0 = PointF::new(0.0, 0.0);
    let p1 = PointF::new(10.0, 0.0);
    let p2 = PointF::new(20.0, 0.0);
    let p3 = PointF::new(30.0, 0.0);
    let mut out = Vec::new();
    flatten_cubic(p0, p1, p2, p3, 0.1, 0, &mut out);
    assert_eq!(out, vec![FlatNode::Line(p3)]);
  }

  #[test]
  fn curved_segment_subdivides_more_than_once() {
    let p0 = PointF::new(0.0, 0.0);
    let p1 = PointF::new(0.0, 100.0);
    let p2 = PointF::new(100.0, 100.0);
    let p3 = PointF::new(100.0, 0.0);
    let mut out = Vec::new();
    flatten_cubic(p0, p1, p2, p3, 0.1, 0, &mut out);
    assert!(out.len() > 1);
  }

  #[test]
  fn tighter_tolerance_yields_more_segments() {
    let p0 = PointF::new(0.0, 0.0);
    let p1 = PointF::new(0.0, 100.0);
    let p2 = PointF::new(100.0, 100.0);
    let p3 = PointF::new(100.0, 0.0);
    let mut loose = Vec::new();
    flatten_cubic(p0, p1, p2, p3, 5.0, 0, &mut loose);
    let mut tight = Vec::new();
    flatten_cubic(p0, p1, p2, p3, 0.01, 0, &mut tight);
    assert!(tight.len() >= loose.len());
  }
}
