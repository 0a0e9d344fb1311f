//! Walks a flattened path's nodes into the `PolygonSet` the rasterizer
//! scans (`spec.md` §4.5 "FillPlotter"). The crossing math itself lives in
//! `primitives::polygon`; this module only groups points by sub-path.

use primitives::{Node, Polygon, PolygonSet};

use crate::flatten::{flatten_path, FlatNode};

/// Flattens `p_nodes` at `p_tolerance` and groups the resulting polyline
/// into closed polygons, one per sub-path with at least 3 vertices.
/// Sub-paths with fewer vertices contribute no area and are dropped.
pub fn plot_fill(p_nodes: &[Node], p_tolerance: f32) -> PolygonSet {
  let flat = flatten_path(p_nodes, p_tolerance);
  let mut set = PolygonSet::new();
  let mut current: Vec<primitives::PointF> = Vec::new();

  let mut push_current = |p_current: &mut Vec<primitives::PointF>, p_set: &mut PolygonSet| {
    if p_current.len() >= 3 {
      p_set.push(Polygon::new(std::mem::take(p_current)));
    } else {
      p_current.clear();
    }
  };

  for node in flat {
    match node {
      FlatNode::Move(p) => {
        push_current(&mut current, &mut set);
        current.push(p);
      }
      FlatNode::Line(p) => current.push(p),
      FlatNode::Close => push_current(&mut current, &mut set),
    }
  }
  push_current(&mut current, &mut set);
  set
}

#[cfg(test)]
mod tests {
  use super::*;
  use primitives::PointF;

  fn triangle_nodes() -> Vec<Node> {
    vec![
      Node::MoveTo(PointF::new(0.0, 0.0)),
      Node::LineTo(PointF::new(199.0, 0.0)),
      Node::LineTo(PointF::new(100.0, 199.0)),
      Node::ClosePath,
    ]
  }

  #[test]
  fn triangle_plots_to_a_single_polygon() {
    let set = plot_fill(&triangle_nodes(), 0.1);
    assert_eq!(set.polygons().len(), 1);
    assert_eq!(set.polygons()[0].points().len(), 3);
  }

  #[test]
  fn matches_the_scanline_worked_example() {
    let set = plot_fill(&triangle_nodes(), 0.1);
    let pairs = set.edges_for_y(100, primitives::FillRule::EvenOdd);
    assert_eq!(pairs.len(), 1);
    let (x0, x1) = pairs[0];
    assert!((x0 - 50.0).abs() < 1.0);
    assert!((x1 - 149.0).abs() < 1.0);
  }

  #[test]
  fn open_subpath_with_too_few_points_is_dropped() {
    let nodes = vec![Node::MoveTo(PointF::new(0.0, 0.0)), Node::LineTo(PointF::new(10.0, 0.0))];
    let set = plot_fill(&nodes, 0.1);
    assert!(set.is_empty());
  }

  #[test]
  fn curved_subpath_flattens_before_plotting() {
    let nodes = vec![
      Node::MoveTo(PointF::new(0.0, 0.0)),
      Node::CurveTo(PointF::new(0.0, 50.0), PointF::new(50.0, 50.0), PointF::new(50.0, 0.0)),
      Node::LineTo(PointF::new(0.0, 0.0)),
      Node::ClosePath,
    ];
    let set = plot_fill(&nodes, 0.1);
    assert_eq!(set.polygons().len(), 1);
    assert!(set.polygons()[0].points().len() > 3);
  }
}
