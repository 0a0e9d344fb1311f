//! Orchestrates a fill or stroke against a destination surface: validates
//! preconditions, flattens/plots the path, picks an anti-aliasing
//! strategy, and composites the result (`spec.md` §4.7 "Painter").

use compositor::Pattern;
use primitives::consts::SUPERSAMPLE_SCALE;
use primitives::pixel::PixelFormat;
use primitives::{nodes_are_closed, FillRule, Node, Polygon, PolygonSet, PointF, Transform};
use raster_core::{PixelValue, Surface};

use crate::error::{FillError, StrokeError};
use crate::fill::plot_fill;
use crate::stroke::{plot_stroke, StrokeOptions};

/// Whether a shape edge is aliased (one sample per pixel) or supersampled
/// through a 4x scratch coverage mask (`spec.md` §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntiAlias {
  None,
  Supersample,
}

#[derive(Debug, Clone)]
pub struct FillOptions {
  pub anti_alias: AntiAlias,
  pub fill_rule: FillRule,
  pub tolerance: f32,
}

impl Default for FillOptions {
  fn default() -> Self {
    FillOptions {
      anti_alias: AntiAlias::Supersample,
      fill_rule: FillRule::NonZero,
      tolerance: primitives::consts::DEFAULT_TOLERANCE,
    }
  }
}

fn is_alpha_family(p_format: PixelFormat) -> bool {
  matches!(
    p_format,
    PixelFormat::Alpha8 | PixelFormat::Alpha4 | PixelFormat::Alpha2 | PixelFormat::Alpha1
  )
}

/// Stateless orchestration: every call takes the destination surface and
/// path explicitly, matching the batch compositor's style of not holding
/// surface state between calls.
pub struct Painter;

impl Painter {
  pub fn fill(
    p_surface: &mut Surface, p_pattern: &dyn Pattern, p_nodes: &[Node], p_options: &FillOptions,
  ) -> Result<(), FillError> {
    if !nodes_are_closed(p_nodes) {
      return Err(FillError::PathNotClosed);
    }
    let anti_alias = if p_surface.format() == PixelFormat::Alpha1 {
      AntiAlias::None
    } else {
      p_options.anti_alias
    };
    let polygons = plot_fill(p_nodes, p_options.tolerance);
    if polygons.is_empty() {
      return Ok(());
    }
    rasterize(p_surface, p_pattern, &polygons, p_options.fill_rule, anti_alias)
  }

  pub fn stroke(
    p_surface: &mut Surface, p_pattern: &dyn Pattern, p_nodes: &[Node], p_stroke: &StrokeOptions,
    p_anti_alias: AntiAlias, p_transform: &Transform,
  ) -> Result<(), StrokeError> {
    if !p_transform.is_invertible() {
      return Err(StrokeError::InvalidMatrix);
    }
    let anti_alias = if p_surface.format() == PixelFormat::Alpha1 {
      AntiAlias::None
    } else {
      p_anti_alias
    };
    let device_nodes = transform_nodes(p_nodes, p_transform);
    let polygons = plot_stroke(&device_nodes, p_stroke);
    if polygons.is_empty() {
      return Ok(());
    }
    rasterize(p_surface, p_pattern, &polygons, FillRule::NonZero, anti_alias)?;
    Ok(())
  }
}

fn transform_nodes(p_nodes: &[Node], p_transform: &Transform) -> Vec<Node> {
  p_nodes
    .iter()
    .map(|n| match n {
      Node::MoveTo(p) => Node::MoveTo(p_transform.apply_point(*p)),
      Node::LineTo(p) => Node::LineTo(p_transform.apply_point(*p)),
      Node::CurveTo(c1, c2, p3) => Node::CurveTo(
        p_transform.apply_point(*c1),
        p_transform.apply_point(*c2),
        p_transform.apply_point(*p3),
      ),
      Node::ClosePath => Node::ClosePath,
    })
    .collect()
}

fn scale_and_shift(p_set: &PolygonSet, p_scale: f64, p_dx: f64, p_dy: f64) -> PolygonSet {
  let mut out = PolygonSet::new();
  for polygon in p_set.polygons() {
    let points: Vec<PointF> = polygon
      .points()
      .iter()
      .map(|p| PointF::new(p.x * p_scale + p_dx, p.y * p_scale + p_dy))
      .collect();
    out.push(Polygon::new(points));
  }
  out
}

/// Shared by `fill`/`stroke`: composites an already-built `PolygonSet`
/// onto `p_surface` with `p_pattern`, at the requested anti-alias mode.
fn rasterize<E: From<raster_core::SurfaceError>>(
  p_surface: &mut Surface, p_pattern: &dyn Pattern, p_polygons: &PolygonSet, p_rule: FillRule, p_anti_alias: AntiAlias,
) -> Result<(), E> {
  match p_anti_alias {
    AntiAlias::None => {
      rasterize_aliased(p_surface, p_pattern, p_polygons, p_rule);
      Ok(())
    }
    AntiAlias::Supersample => rasterize_supersampled(p_surface, p_pattern, p_polygons, p_rule),
  }
}

/// Samples `p_pattern` along every covered scanline in parallel (one rayon
/// task per destination row, matching the teacher's per-row idiom), then
/// applies the resulting writes to `p_surface` sequentially — `Surface`
/// only exposes safe single-pixel mutation, so the compositing step itself
/// stays on the calling thread.
fn rasterize_aliased(p_surface: &mut Surface, p_pattern: &dyn Pattern, p_polygons: &PolygonSet, p_rule: FillRule) {
  use rayon::prelude::*;

  let (min, max) = p_polygons.bounds();
  let y0 = min.y.floor() as i64;
  let y1 = max.y.ceil() as i64;
  let format = p_surface.format();

  let rows: Vec<(i64, Vec<(i64, PixelValue)>)> = (y0..=y1)
    .into_par_iter()
    .map(|y| {
      let mut writes = Vec::new();
      for (x0, x1) in p_polygons.edges_for_y(y, p_rule) {
        let xi0 = x0.ceil() as i64;
        let xi1 = x1.floor() as i64;
        for x in xi0..=xi1 {
          writes.push((x, p_pattern.get_pixel(x as f64, y as f64).copy_src_wrap(format)));
        }
      }
      (y, writes)
    })
    .collect();

  for (y, writes) in rows {
    for (x, src) in writes {
      let dst = p_surface.get_pixel(x, y).unwrap_or_else(|| PixelValue::clear(format));
      p_surface.put_pixel(x, y, PixelValue::src_over(dst, src));
    }
  }
}

/// Small adapter: `Pattern::get_pixel` returns a `primitives::Rgba`, which
/// this crate wraps as `PixelValue::Rgba` before converting to the
/// destination format via `copy_src`.
trait RgbaPixelExt {
  fn copy_src_wrap(self, p_format: PixelFormat) -> PixelValue;
}

impl RgbaPixelExt for primitives::Rgba {
  fn copy_src_wrap(self, p_format: PixelFormat) -> PixelValue {
    PixelValue::Rgba(self).copy_src(p_format)
  }
}

fn rasterize_supersampled<E: From<raster_core::SurfaceError>>(
  p_surface: &mut Surface, p_pattern: &dyn Pattern, p_polygons: &PolygonSet, p_rule: FillRule,
) -> Result<(), E> {
  let (min, max) = p_polygons.bounds();
  let bbox_x = min.x.floor() as i64;
  let bbox_y = min.y.floor() as i64;
  let bbox_w = ((max.x.ceil() - bbox_x as f64).max(1.0)) as u32;
  let bbox_h = ((max.y.ceil() - bbox_y as f64).max(1.0)) as u32;

  let scale = SUPERSAMPLE_SCALE as f64;
  let mask_w = bbox_w * SUPERSAMPLE_SCALE;
  let mask_h = bbox_h * SUPERSAMPLE_SCALE;
  let mut mask = Surface::new(PixelFormat::Alpha8, mask_w, mask_h)?;
  let scaled = scale_and_shift(p_polygons, scale, -(bbox_x as f64) * scale, -(bbox_y as f64) * scale);

  // Per-row coverage spans computed in parallel (the expensive edge-crossing
  // work); applied to the mask sequentially, same split as rasterize_aliased.
  let rows: Vec<(i64, Vec<(i64, i64)>)> = {
    use rayon::prelude::*;
    (0..mask_h as i64)
      .into_par_iter()
      .map(|y| {
        let spans = scaled
          .edges_for_y(y, p_rule)
          .into_iter()
          .map(|(x0, x1)| ((x0.ceil() as i64).max(0), (x1.floor() as i64).min(mask_w as i64 - 1)))
          .collect();
        (y, spans)
      })
      .collect()
  };
  for (y, spans) in rows {
    for (xi0, xi1) in spans {
      for x in xi0..=xi1 {
        mask.put_pixel(x, y, PixelValue::Alpha8(primitives::pixel::Alpha8::opaque()));
      }
    }
  }
  mask.downsample();

  if let Some(color) = p_pattern.solid_color() {
    if is_alpha_family(p_surface.format()) {
      if color.a < 1.0 {
        for y in 0..mask.height() as i64 {
          for x in 0..mask.width() as i64 {
            if let Some(PixelValue::Alpha8(a)) = mask.get_pixel(x, y) {
              let scaled = ((a.0 as f32) * color.a).round().clamp(0.0, 255.0) as u8;
              mask.put_pixel(x, y, PixelValue::Alpha8(primitives::pixel::Alpha8(scaled)));
            }
          }
        }
      }
      p_surface.src_over(&mask, bbox_x, bbox_y);
      return Ok(());
    }
  }

  let mut foreground = Surface::new(PixelFormat::Rgba, mask.width(), mask.height())?;
  for y in 0..foreground.height() as i64 {
    for x in 0..foreground.width() as i64 {
      let color = p_pattern.get_color((bbox_x + x) as f64, (bbox_y + y) as f64);
      foreground.put_pixel(x, y, PixelValue::Rgba(color.to_linear_rgba()));
    }
  }
  for y in 0..foreground.height() as i64 {
    for x in 0..foreground.width() as i64 {
      let mask_rgba = mask.get_pixel(x, y).unwrap().to_rgba();
      if let Some(PixelValue::Rgba(fg)) = foreground.get_pixel(x, y) {
        foreground.put_pixel(x, y, PixelValue::Rgba(primitives::Rgba::dst_in(fg, mask_rgba)));
      }
    }
  }
  p_surface.src_over(&foreground, bbox_x, bbox_y);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use compositor::SolidPattern;
  use primitives::Color;

  fn triangle_nodes() -> Vec<Node> {
    vec![
      Node::MoveTo(PointF::new(0.0, 0.0)),
      Node::LineTo(PointF::new(199.0, 0.0)),
      Node::LineTo(PointF::new(100.0, 199.0)),
      Node::ClosePath,
    ]
  }

  #[test]
  fn aliased_triangle_fill_paints_inside_and_leaves_outside_clear() {
    let mut surface = Surface::new(PixelFormat::Rgba, 200, 200).unwrap();
    let pattern = SolidPattern::new(Color::black());
    let opts = FillOptions {
      anti_alias: AntiAlias::None,
      ..FillOptions::default()
    };
    Painter::fill(&mut surface, &pattern, &triangle_nodes(), &opts).unwrap();
    match surface.get_pixel(100, 100) {
      Some(PixelValue::Rgba(p)) => assert_eq!(p.a, 255),
      other => panic!("expected opaque pixel inside triangle, got {other:?}"),
    }
    match surface.get_pixel(5, 5) {
      Some(PixelValue::Rgba(p)) => assert_eq!(p.a, 0),
      other => panic!("expected clear pixel outside triangle, got {other:?}"),
    }
  }

  #[test]
  fn fill_accepts_a_path_built_rect_with_its_trailing_implicit_move_to() {
    let mut surface = Surface::new(PixelFormat::Rgba, 50, 50).unwrap();
    let pattern = SolidPattern::new(Color::black());
    let path = primitives::Path::rect((5.0, 5.0), 20.0, 20.0);
    let opts = FillOptions { anti_alias: AntiAlias::None, ..FillOptions::default() };
    Painter::fill(&mut surface, &pattern, path.nodes(), &opts).unwrap();
    match surface.get_pixel(10, 10) {
      Some(PixelValue::Rgba(p)) => assert_eq!(p.a, 255),
      other => panic!("expected opaque pixel inside the rect, got {other:?}"),
    }
  }

  #[test]
  fn open_path_fill_is_rejected() {
    let mut surface = Surface::new(PixelFormat::Rgba, 10, 10).unwrap();
    let pattern = SolidPattern::new(Color::black());
    let nodes = vec![Node::MoveTo(PointF::new(0.0, 0.0)), Node::LineTo(PointF::new(5.0, 5.0))];
    let result = Painter::fill(&mut surface, &pattern, &nodes, &FillOptions::default());
    assert_eq!(result, Err(FillError::PathNotClosed));
  }

  #[test]
  fn stroke_with_uninvertible_transform_fails_without_touching_the_surface() {
    let mut surface = Surface::new(PixelFormat::Rgba, 20, 20).unwrap();
    let pattern = SolidPattern::new(Color::black());
    let nodes = vec![Node::MoveTo(PointF::new(0.0, 0.0)), Node::LineTo(PointF::new(10.0, 0.0))];
    // Matches spec.md seed scenario 6: [[1,1,5],[2,2,6]], determinant zero.
    let singular = Transform::new([[1.0, 1.0, 5.0], [2.0, 2.0, 6.0]]);
    let stroke_opts = StrokeOptions { width: 2.0, ..StrokeOptions::default() };
    let result = Painter::stroke(&mut surface, &pattern, &nodes, &stroke_opts, AntiAlias::None, &singular);
    assert_eq!(result, Err(StrokeError::InvalidMatrix));
    for y in 0..20i64 {
      for x in 0..20i64 {
        match surface.get_pixel(x, y) {
          Some(PixelValue::Rgba(p)) => assert_eq!(p.a, 0, "surface touched at ({x},{y})"),
          other => panic!("unexpected {other:?}"),
        }
      }
    }
  }

  #[test]
  fn supersampled_fill_produces_antialiased_edge_alpha() {
    let mut surface = Surface::new(PixelFormat::Rgba, 200, 200).unwrap();
    let pattern = SolidPattern::new(Color::black());
    Painter::fill(&mut surface, &pattern, &triangle_nodes(), &FillOptions::default()).unwrap();
    match surface.get_pixel(100, 100) {
      Some(PixelValue::Rgba(p)) => assert_eq!(p.a, 255),
      other => panic!("expected opaque pixel inside triangle, got {other:?}"),
    }
  }

  #[test]
  fn stroke_rasterizes_a_band_around_the_line() {
    let mut surface = Surface::new(PixelFormat::Rgba, 50, 50).unwrap();
    let pattern = SolidPattern::new(Color::black());
    let nodes = vec![Node::MoveTo(PointF::new(5.0, 25.0)), Node::LineTo(PointF::new(45.0, 25.0))];
    let stroke_opts = StrokeOptions { width: 6.0, ..StrokeOptions::default() };
    Painter::stroke(&mut surface, &pattern, &nodes, &stroke_opts, AntiAlias::None, &Transform::identity()).unwrap();
    match surface.get_pixel(25, 25) {
      Some(PixelValue::Rgba(p)) => assert_eq!(p.a, 255),
      other => panic!("expected opaque pixel on the stroke centerline, got {other:?}"),
    }
    match surface.get_pixel(25, 0) {
      Some(PixelValue::Rgba(p)) => assert_eq!(p.a, 0),
      other => panic!("unexpected {other:?}"),
    }
  }
}
