//! Turns a flattened path into a filled outline polygon set: joins, caps,
//! dashing, the thin-stroke reversion, and the hard minimum width
//! (`spec.md` §4.6 "StrokePlotter"). Geometry is produced in whatever
//! space the caller's points are already in — `Painter::stroke` is
//! responsible for applying the current transform first.

use primitives::consts::{DEFAULT_MITER_LIMIT, MIN_STROKE_WIDTH, THIN_STROKE_WIDTH};
use primitives::{Node, Polygon, PolygonSet, PointF};

use crate::flatten::{flatten_path, FlatNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
  Miter,
  Round,
  Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
  Butt,
  Round,
  Square,
}

/// Stroke rendering parameters (`spec.md` §4.6).
#[derive(Debug, Clone)]
pub struct StrokeOptions {
  pub width: f64,
  pub join: LineJoin,
  pub cap: LineCap,
  pub miter_limit: f64,
  pub tolerance: f32,
  /// On/off lengths; an empty list (or all-zero) disables dashing.
  pub dashes: Vec<f64>,
  pub dash_offset: f64,
}

impl Default for StrokeOptions {
  fn default() -> Self {
    StrokeOptions {
      width: 1.0,
      join: LineJoin::Miter,
      cap: LineCap::Butt,
      miter_limit: DEFAULT_MITER_LIMIT as f64,
      tolerance: primitives::consts::DEFAULT_TOLERANCE,
      dashes: Vec::new(),
      dash_offset: 0.0,
    }
  }
}

struct ResolvedSubpath {
  points: Vec<PointF>,
  closed: bool,
}

/// Groups a flattened node list into sub-paths, recording whether each was
/// terminated by an explicit `Close`.
fn subpaths_from_flat(p_flat: &[FlatNode]) -> Vec<ResolvedSubpath> {
  let mut out = Vec::new();
  let mut current: Vec<PointF> = Vec::new();
  let mut closed = false;
  for node in p_flat {
    match node {
      FlatNode::Move(p) => {
        if current.len() >= 2 {
          out.push(ResolvedSubpath { points: std::mem::take(&mut current), closed });
        } else {
          current.clear();
        }
        closed = false;
        current.push(*p);
      }
      FlatNode::Line(p) => current.push(*p),
      FlatNode::Close => closed = true,
    }
  }
  if current.len() >= 2 {
    out.push(ResolvedSubpath { points: current, closed });
  }
  out
}

/// Walks `p_points` by arc length, alternating on/off per `p_dashes`
/// starting at phase `p_dash_offset`, and returns each resulting "on" run
/// as its own open polyline. A closed source is walked as if its closing
/// edge were an explicit segment back to the first point.
fn apply_dashes(p_points: &[PointF], p_closed: bool, p_dashes: &[f64], p_dash_offset: f64) -> Vec<Vec<PointF>> {
  let total: f64 = p_dashes.iter().sum();
  if p_dashes.is_empty() || total <= 0.0 {
    return vec![p_points.to_vec()];
  }

  let mut points = p_points.to_vec();
  if p_closed {
    points.push(p_points[0]);
  }

  let mut phase = p_dash_offset.rem_euclid(total);
  let mut index = 0usize;
  let mut on = true;
  while phase >= p_dashes[index] {
    phase -= p_dashes[index];
    index = (index + 1) % p_dashes.len();
    on = !on;
  }
  let mut remaining = p_dashes[index] - phase;

  let mut segments: Vec<Vec<PointF>> = Vec::new();
  let mut current: Vec<PointF> = if on { vec![points[0]] } else { Vec::new() };

  for window in points.windows(2) {
    let mut a = window[0];
    let b = window[1];
    loop {
      let seg_len = (b - a).length();
      if seg_len <= remaining {
        remaining -= seg_len;
        if on {
          current.push(b);
        }
        break;
      }
      let t = remaining / seg_len;
      let mid = a.lerp(b, t);
      if on {
        current.push(mid);
        segments.push(std::mem::take(&mut current));
      } else {
        current = vec![mid];
      }
      a = mid;
      index = (index + 1) % p_dashes.len();
      on = !on;
      remaining = p_dashes[index];
    }
  }
  if on && !current.is_empty() {
    segments.push(current);
  }
  segments.retain(|s| !s.is_empty());
  segments
}

fn line_intersection(p_p0: PointF, p_d0: PointF, p_p1: PointF, p_d1: PointF) -> Option<PointF> {
  let denom = p_d0.cross(p_d1);
  if denom.abs() <= 1e-9 {
    return None;
  }
  let diff = p_p1 - p_p0;
  let t = diff.cross(p_d1) / denom;
  Some(p_p0 + p_d0 * t)
}

/// Number of interior points to fan an arc of `p_delta` radians at
/// `p_radius` into, so the chord error stays within `p_tolerance`.
fn arc_steps(p_radius: f64, p_delta: f64, p_tolerance: f64) -> usize {
  if p_radius <= p_tolerance {
    return 1;
  }
  let max_step = 2.0 * (1.0 - p_tolerance / p_radius).acos();
  if max_step <= 1e-9 {
    return 1;
  }
  ((p_delta.abs() / max_step).ceil() as usize).max(1)
}

fn push_arc(p_center: PointF, p_from: PointF, p_to: PointF, p_radius: f64, p_tolerance: f64, p_out: &mut Vec<PointF>) {
  let a0 = (p_from.y - p_center.y).atan2(p_from.x - p_center.x);
  let a1 = (p_to.y - p_center.y).atan2(p_to.x - p_center.x);
  let mut delta = a1 - a0;
  while delta > std::f64::consts::PI {
    delta -= std::f64::consts::TAU;
  }
  while delta < -std::f64::consts::PI {
    delta += std::f64::consts::TAU;
  }
  let steps = arc_steps(p_radius, delta, p_tolerance);
  for i in 1..steps {
    let a = a0 + delta * (i as f64 / steps as f64);
    p_out.push(PointF::new(p_center.x + p_radius * a.cos(), p_center.y + p_radius * a.sin()));
  }
}

/// Emits the join geometry between the outgoing offset of the previous
/// segment and the incoming offset of the next, on one side of the path
/// (`p_side` = `+1.0` or `-1.0`). Applied identically to both the left and
/// right offset chains; on the concave side this produces benign
/// self-overlapping geometry that the non-zero fill rule absorbs.
fn emit_join(
  p_vertex: PointF, p_prev_dir: PointF, p_next_dir: PointF, p_half_width: f64, p_side: f64, p_join: LineJoin,
  p_miter_limit: f64, p_tolerance: f64, p_out: &mut Vec<PointF>,
) {
  let n0 = p_prev_dir.perpendicular().normalize() * (p_half_width * p_side);
  let n1 = p_next_dir.perpendicular().normalize() * (p_half_width * p_side);
  let p0 = p_vertex + n0;
  let p1 = p_vertex + n1;

  if (p0 - p1).length() <= 1e-9 {
    p_out.push(p0);
    return;
  }

  match p_join {
    LineJoin::Bevel => {
      p_out.push(p0);
      p_out.push(p1);
    }
    LineJoin::Round => {
      p_out.push(p0);
      push_arc(p_vertex, p0, p1, p_half_width, p_tolerance, p_out);
      p_out.push(p1);
    }
    LineJoin::Miter => {
      let cos_theta = p_prev_dir.dot(p_next_dir).clamp(-1.0, 1.0);
      let turn = cos_theta.acos();
      let half_interior = (std::f64::consts::PI - turn) / 2.0;
      let miter_ratio = 1.0 / half_interior.sin().max(1e-6);
      if miter_ratio > p_miter_limit {
        p_out.push(p0);
        p_out.push(p1);
        return;
      }
      match line_intersection(p0, p_prev_dir, p1, p_next_dir) {
        Some(tip) => {
          p_out.push(p0);
          p_out.push(tip);
          p_out.push(p1);
        }
        None => {
          p_out.push(p0);
          p_out.push(p1);
        }
      }
    }
  }
}

/// Builds one side's offset chain for a sub-path, with joins inserted at
/// every interior vertex (and, for a closed sub-path, at the wrap vertex
/// too).
fn chain_for_side(
  p_points: &[PointF], p_closed: bool, p_half_width: f64, p_side: f64, p_join: LineJoin, p_miter_limit: f64,
  p_tolerance: f64,
) -> Vec<PointF> {
  let n = p_points.len();
  let seg_count = if p_closed { n } else { n - 1 };
  let mut dirs = Vec::with_capacity(seg_count);
  for i in 0..seg_count {
    let a = p_points[i];
    let b = p_points[(i + 1) % n];
    dirs.push((b - a).normalize());
  }

  let mut chain = Vec::new();
  for v in 0..n {
    let has_prev = p_closed || v > 0;
    let has_next = p_closed || v < n - 1;
    if has_prev && has_next {
      let prev_dir = dirs[(v + seg_count - 1) % seg_count];
      let next_dir = dirs[v % seg_count];
      emit_join(p_points[v], prev_dir, next_dir, p_half_width, p_side, p_join, p_miter_limit, p_tolerance, &mut chain);
    } else if has_next {
      let next_dir = dirs[0];
      let nrm = next_dir.perpendicular().normalize() * (p_half_width * p_side);
      chain.push(p_points[v] + nrm);
    } else {
      let prev_dir = dirs[seg_count - 1];
      let nrm = prev_dir.perpendicular().normalize() * (p_half_width * p_side);
      chain.push(p_points[v] + nrm);
    }
  }
  chain
}

fn cap_points(p_vertex: PointF, p_from: PointF, p_to: PointF, p_half_width: f64, p_tangent: PointF, p_cap: LineCap, p_tolerance: f64) -> Vec<PointF> {
  match p_cap {
    LineCap::Butt => Vec::new(),
    LineCap::Square => {
      let ext = p_tangent * p_half_width;
      vec![p_from + ext, p_to + ext]
    }
    LineCap::Round => {
      let mut pts = vec![p_from];
      push_arc(p_vertex, p_from, p_to, p_half_width, p_tolerance, &mut pts);
      pts.push(p_to);
      pts
    }
  }
}

fn circle_polygon(p_center: PointF, p_radius: f64, p_tolerance: f64) -> Polygon {
  let mut pts = vec![PointF::new(p_center.x + p_radius, p_center.y)];
  push_arc(
    p_center,
    pts[0],
    PointF::new(p_center.x + p_radius, p_center.y),
    p_radius,
    p_tolerance,
    &mut pts,
  );
  Polygon::new(pts)
}

fn square_polygon(p_center: PointF, p_half_width: f64) -> Polygon {
  Polygon::new(vec![
    PointF::new(p_center.x - p_half_width, p_center.y - p_half_width),
    PointF::new(p_center.x + p_half_width, p_center.y - p_half_width),
    PointF::new(p_center.x + p_half_width, p_center.y + p_half_width),
    PointF::new(p_center.x - p_half_width, p_center.y + p_half_width),
  ])
}

/// Builds the outline polygon(s) for one dashed run (open) or whole
/// sub-path (open or closed), at effective `p_width`.
fn build_outline(
  p_points: &[PointF], p_closed: bool, p_width: f64, p_join: LineJoin, p_cap: LineCap, p_miter_limit: f64,
  p_tolerance: f64,
) -> Vec<Polygon> {
  let half_width = p_width / 2.0;

  if p_points.len() < 2 {
    return match p_cap {
      LineCap::Round => p_points.first().map(|p| vec![circle_polygon(*p, half_width, p_tolerance)]).unwrap_or_default(),
      LineCap::Square => p_points.first().map(|p| vec![square_polygon(*p, half_width)]).unwrap_or_default(),
      LineCap::Butt => Vec::new(),
    };
  }

  let left = chain_for_side(p_points, p_closed, half_width, 1.0, p_join, p_miter_limit, p_tolerance);
  let right = chain_for_side(p_points, p_closed, half_width, -1.0, p_join, p_miter_limit, p_tolerance);

  if p_closed {
    let mut right_reversed = right;
    right_reversed.reverse();
    return vec![Polygon::new(left), Polygon::new(right_reversed)];
  }

  let n = p_points.len();
  let end_tangent = (p_points[n - 1] - p_points[n - 2]).normalize();
  let start_tangent = (p_points[0] - p_points[1]).normalize();

  let mut outline = left.clone();
  outline.extend(cap_points(
    p_points[n - 1],
    *left.last().unwrap(),
    *right.last().unwrap(),
    half_width,
    end_tangent,
    p_cap,
    p_tolerance,
  ));
  outline.extend(right.iter().rev().copied());
  outline.extend(cap_points(
    p_points[0],
    *right.first().unwrap(),
    *left.first().unwrap(),
    half_width,
    start_tangent,
    p_cap,
    p_tolerance,
  ));
  vec![Polygon::new(outline)]
}

/// Flattens `p_nodes`, applies dashing, and produces a non-zero filled
/// `PolygonSet` for the resulting outline (`spec.md` §4.6). Points are
/// consumed in whatever coordinate space they're already in.
pub fn plot_stroke(p_nodes: &[Node], p_options: &StrokeOptions) -> PolygonSet {
  let flat = flatten_path(p_nodes, p_options.tolerance);
  let subpaths = subpaths_from_flat(&flat);

  let width = (p_options.width.max(MIN_STROKE_WIDTH as f64)).max(0.0);
  let thin = width < THIN_STROKE_WIDTH as f64;
  let join = if thin { LineJoin::Miter } else { p_options.join };
  let cap = if thin { LineCap::Butt } else { p_options.cap };
  let miter_limit = if thin { DEFAULT_MITER_LIMIT as f64 } else { p_options.miter_limit };

  let mut set = PolygonSet::new();
  for subpath in &subpaths {
    let dashed_runs = if p_options.dashes.is_empty() {
      vec![(subpath.points.clone(), subpath.closed)]
    } else {
      apply_dashes(&subpath.points, subpath.closed, &p_options.dashes, p_options.dash_offset)
        .into_iter()
        .map(|run| (run, false))
        .collect()
    };
    for (points, closed) in dashed_runs {
      for polygon in build_outline(&points, closed, width, join, cap, miter_limit, p_options.tolerance as f64) {
        set.push(polygon);
      }
    }
  }
  set
}

#[cfg(test)]
mod tests {
  use super::*;

  fn horizontal_line() -> Vec<Node> {
    vec![Node::MoveTo(PointF::new(0.0, 0.0)), Node::LineTo(PointF::new(100.0, 0.0))]
  }

  #[test]
  fn butt_cap_produces_a_single_rectangle() {
    let opts = StrokeOptions {
      width: 10.0,
      join: LineJoin::Miter,
      cap: LineCap::Butt,
      ..StrokeOptions::default()
    };
    let set = plot_stroke(&horizontal_line(), &opts);
    assert_eq!(set.polygons().len(), 1);
    assert_eq!(set.polygons()[0].points().len(), 4);
  }

  #[test]
  fn square_cap_extends_beyond_the_endpoints() {
    let opts = StrokeOptions {
      width: 10.0,
      cap: LineCap::Square,
      ..StrokeOptions::default()
    };
    let set = plot_stroke(&horizontal_line(), &opts);
    let (min, max) = set.bounds();
    assert!(min.x < 0.0);
    assert!(max.x > 100.0);
  }

  #[test]
  fn round_cap_adds_extra_points_beyond_the_rectangle() {
    let opts = StrokeOptions {
      width: 10.0,
      cap: LineCap::Round,
      tolerance: 0.01,
      ..StrokeOptions::default()
    };
    let set = plot_stroke(&horizontal_line(), &opts);
    assert!(set.polygons()[0].points().len() > 4);
  }

  #[test]
  fn thin_stroke_reverts_to_miter_butt() {
    let opts = StrokeOptions {
      width: 0.5,
      join: LineJoin::Round,
      cap: LineCap::Round,
      ..StrokeOptions::default()
    };
    // A thin stroke reverts to butt caps: exactly 4 points, no cap fan.
    let set = plot_stroke(&horizontal_line(), &opts);
    assert_eq!(set.polygons()[0].points().len(), 4);
  }

  #[test]
  fn hard_minimum_width_is_enforced() {
    let opts = StrokeOptions { width: 0.0, ..StrokeOptions::default() };
    let set = plot_stroke(&horizontal_line(), &opts);
    let (min, max) = set.bounds();
    assert!((max.y - min.y) > 0.0);
  }

  #[test]
  fn dashing_splits_a_line_into_multiple_polygons() {
    let opts = StrokeOptions {
      width: 4.0,
      dashes: vec![10.0, 10.0],
      ..StrokeOptions::default()
    };
    let set = plot_stroke(&horizontal_line(), &opts);
    assert_eq!(set.polygons().len(), 5);
  }

  #[test]
  fn closed_subpath_produces_two_rings() {
    let nodes = vec![
      Node::MoveTo(PointF::new(0.0, 0.0)),
      Node::LineTo(PointF::new(100.0, 0.0)),
      Node::LineTo(PointF::new(100.0, 100.0)),
      Node::LineTo(PointF::new(0.0, 100.0)),
      Node::ClosePath,
    ];
    let opts = StrokeOptions { width: 10.0, ..StrokeOptions::default() };
    let set = plot_stroke(&nodes, &opts);
    assert_eq!(set.polygons().len(), 2);
  }
}
