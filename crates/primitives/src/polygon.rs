//! Polygon sets produced by the fill and stroke plotters, and the
//! scanline edge-crossing query the rasterizer drives from (`spec.md`
//! §3/§4.5).

use crate::point::PointF;

/// Which winding rule determines a polygon set's interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
  EvenOdd,
  NonZero,
}

/// A directed edge between two consecutive polygon vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
  from: PointF,
  to: PointF,
}

/// One closed polygon: an ordered list of vertices plus the edges
/// (including the closing edge) between consecutive points.
#[derive(Debug, Clone)]
pub struct Polygon {
  points: Vec<PointF>,
  edges: Vec<Edge>,
}

impl Polygon {
  /// Builds a polygon from a point list, appending the closing edge back
  /// to the first point.
  pub fn new(p_points: Vec<PointF>) -> Self {
    let mut edges = Vec::with_capacity(p_points.len());
    for i in 0..p_points.len() {
      let from = p_points[i];
      let to = p_points[(i + 1) % p_points.len()];
      edges.push(Edge { from, to });
    }
    Polygon { points: p_points, edges }
  }

  pub fn points(&self) -> &[PointF] {
    &self.points
  }

  pub fn is_empty(&self) -> bool {
    self.points.len() < 3
  }
}

/// A directed x-crossing of a scanline: the x coordinate and winding
/// direction (`+1` if the edge goes downward, `-1` if upward).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Crossing {
  x: f64,
  direction: i32,
}

/// A set of polygons sharing a bounding box, with the scanline
/// edge-crossing query the rasterizer uses to fill them.
#[derive(Debug, Clone)]
pub struct PolygonSet {
  polygons: Vec<Polygon>,
  min: PointF,
  max: PointF,
}

impl Default for PolygonSet {
  fn default() -> Self {
    PolygonSet::new()
  }
}

impl PolygonSet {
  pub fn new() -> Self {
    PolygonSet {
      polygons: Vec::new(),
      min: PointF::new(f64::MAX, f64::MAX),
      max: PointF::new(f64::MIN, f64::MIN),
    }
  }

  /// Appends a polygon, updating the running bounding box on every
  /// inserted vertex (`spec.md` §4.5).
  pub fn push(&mut self, p_polygon: Polygon) {
    for p in &p_polygon.points {
      self.min.x = self.min.x.min(p.x);
      self.min.y = self.min.y.min(p.y);
      self.max.x = self.max.x.max(p.x);
      self.max.y = self.max.y.max(p.y);
    }
    self.polygons.push(p_polygon);
  }

  pub fn polygons(&self) -> &[Polygon] {
    &self.polygons
  }

  pub fn is_empty(&self) -> bool {
    self.polygons.is_empty() || self.polygons.iter().all(Polygon::is_empty)
  }

  /// The bounding box as `(min, max)`. Returns `(0,0)`/`(0,0)` for an
  /// empty set.
  pub fn bounds(&self) -> (PointF, PointF) {
    if self.polygons.is_empty() {
      return (PointF::zero(), PointF::zero());
    }
    (self.min, self.max)
  }

  /// Computes the sorted x-crossing intervals for the scanline `y + 0.5`
  /// (half-pixel sampling), under the given fill rule. Crossings exactly
  /// at `y` treat the lower endpoint as inclusive, the upper as exclusive
  /// (`spec.md` §4.5 / §9 open question).
  pub fn edges_for_y(&self, p_y: i64, p_rule: FillRule) -> Vec<(f64, f64)> {
    let scan_y = p_y as f64 + 0.5;
    let mut crossings: Vec<Crossing> = Vec::new();

    for polygon in &self.polygons {
      for edge in &polygon.edges {
        let (lower, upper, direction) = if edge.from.y <= edge.to.y {
          (edge.from, edge.to, 1)
        } else {
          (edge.to, edge.from, -1)
        };
        // Lower endpoint inclusive, upper endpoint exclusive.
        if scan_y < lower.y || scan_y >= upper.y {
          continue;
        }
        let dy = upper.y - lower.y;
        if dy.abs() <= f64::EPSILON {
          continue;
        }
        let t = (scan_y - lower.y) / dy;
        let x = lower.x + (upper.x - lower.x) * t;
        crossings.push(Crossing { x, direction });
      }
    }

    crossings.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

    match p_rule {
      FillRule::EvenOdd => crossings
        .chunks_exact(2)
        .map(|pair| (pair[0].x, pair[1].x))
        .collect(),
      FillRule::NonZero => {
        let mut intervals = Vec::new();
        let mut winding = 0;
        let mut span_start: Option<f64> = None;
        for c in &crossings {
          let was_nonzero = winding != 0;
          winding += c.direction;
          let is_nonzero = winding != 0;
          if !was_nonzero && is_nonzero {
            span_start = Some(c.x);
          } else if was_nonzero && !is_nonzero {
            if let Some(start) = span_start.take() {
              intervals.push((start, c.x));
            }
          }
        }
        intervals
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn triangle() -> PolygonSet {
    // spec.md seed scenario 1.
    let mut set = PolygonSet::new();
    set.push(Polygon::new(vec![
      PointF::new(0.0, 0.0),
      PointF::new(199.0, 0.0),
      PointF::new(100.0, 199.0),
    ]));
    set
  }

  #[test]
  fn triangle_fill_even_odd_matches_worked_example() {
    let set = triangle();
    let pairs = set.edges_for_y(100, FillRule::EvenOdd);
    assert_eq!(pairs.len(), 1);
    let (x0, x1) = pairs[0];
    assert!((x0 - 50.0).abs() < 1.0, "x0={x0}");
    assert!((x1 - 149.0).abs() < 1.0, "x1={x1}");
  }

  #[test]
  fn non_zero_and_even_odd_agree_for_a_simple_polygon() {
    let set = triangle();
    let eo = set.edges_for_y(100, FillRule::EvenOdd);
    let nz = set.edges_for_y(100, FillRule::NonZero);
    assert_eq!(eo.len(), nz.len());
  }

  #[test]
  fn bounds_cover_all_pushed_points() {
    let set = triangle();
    let (min, max) = set.bounds();
    assert_eq!(min, PointF::new(0.0, 0.0));
    assert_eq!(max, PointF::new(199.0, 199.0));
  }

  #[test]
  fn empty_set_has_no_crossings() {
    let set = PolygonSet::new();
    assert!(set.edges_for_y(0, FillRule::EvenOdd).is_empty());
  }
}
