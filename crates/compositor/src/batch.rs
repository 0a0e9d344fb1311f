//! Executes an ordered batch of compositor operations over one
//! destination stride, or over a whole destination surface (`spec.md`
//! §4.3). A batch's running intermediate persists across operations; the
//! `src = none`/`dst = none` shorthand always refers to that running
//! value, seeded from a fresh destination read only before the first
//! operation touches it.

use primitives::pixel::{PixelFormat, Rgba};
use primitives::{Gradient, PointF};
use raster_core::{PixelValue, Stride, Surface};

use crate::blend::{composite_float, composite_int};
use crate::dither::{self, DitherKind};
use crate::frgba::FRgba;
use crate::operator::{Operator, Precision};
use crate::source::Source;

/// One `{operator, dst-override, src-override}` triple (`spec.md` §4.3).
#[derive(Debug, Clone)]
pub struct BatchOp {
  pub operator: Operator,
  pub dst: Source,
  pub src: Source,
}

impl BatchOp {
  pub fn new(p_operator: Operator, p_dst: Source, p_src: Source) -> Self {
    BatchOp {
      operator: p_operator,
      dst: p_dst,
      src: p_src,
    }
  }
}

fn dither_sample(p_inner: Rgba, p_kind: DitherKind, p_x: f64, p_y: f64, p_target_bits: u32) -> Rgba {
  let (r, g, b, a) = p_inner.demultiply();
  let channels = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0];
  let out = dither::perturb(p_kind, p_x.floor() as i64, p_y.floor() as i64, channels, p_target_bits);
  let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
  Rgba::multiply(to_u8(out[0]), to_u8(out[1]), to_u8(out[2]), to_u8(out[3]))
}

/// Resolves a `Source` to its pre-multiplied `Rgba` value at stride index
/// `p_index`, device-space `(p_x, p_y)`.
fn resolve(
  p_source: &Source, p_index: usize, p_current: Option<Rgba>, p_dst_stride: &Stride, p_format: PixelFormat, p_x: f64,
  p_y: f64,
) -> Rgba {
  match p_source {
    Source::None => p_current
      .unwrap_or_else(|| p_dst_stride.get(p_index).unwrap_or_else(|| PixelValue::clear(p_format)).to_rgba()),
    Source::Pixel(v) => v.to_rgba(),
    Source::Stride(s) => s.get(p_index).unwrap_or_else(|| PixelValue::clear(p_format)).to_rgba(),
    Source::Gradient { gradient, origin } => gradient.sample(p_x - origin.x, p_y - origin.y).to_linear_rgba(),
    Source::Dither { inner, kind, target_bits } => {
      let base = resolve(inner, p_index, p_current, p_dst_stride, p_format, p_x, p_y);
      dither_sample(base, *kind, p_x, p_y, *target_bits)
    }
  }
}

/// Runs a batch over one destination stride, returning the fully
/// composited replacement (`spec.md` §4.3's stride-level batch
/// algorithm). `p_start_x`/`p_y` are the stride's device-space position,
/// used by `gradient`/`dither` sources.
pub fn execute_stride(
  p_ops: &[BatchOp], p_precision: Precision, p_format: PixelFormat, p_dst_stride: &Stride, p_start_x: i64, p_y: i64,
) -> Stride {
  let len = p_dst_stride.len();
  let mut out = Vec::with_capacity(len);
  for i in 0..len {
    let x = (p_start_x + i as i64) as f64;
    let mut current: Option<Rgba> = None;
    for op in p_ops {
      let src = resolve(&op.src, i, current, p_dst_stride, p_format, x, p_y as f64);
      let dst = resolve(&op.dst, i, current, p_dst_stride, p_format, x, p_y as f64);
      let result = match p_precision {
        Precision::Integer => composite_int(op.operator, dst, src),
        Precision::Float => composite_float(op.operator, FRgba::from_rgba8(dst), FRgba::from_rgba8(src)).to_rgba8(),
      };
      current = Some(result);
    }
    let final_value =
      current.unwrap_or_else(|| p_dst_stride.get(i).unwrap_or_else(|| PixelValue::clear(p_format)).to_rgba());
    out.push(PixelValue::from_rgba(p_format, final_value));
  }
  Stride::new(p_format, out)
}

/// A `Source` counterpart used by surface-level batches, where a `surface`
/// override references a whole other `Surface` rather than a pre-read row.
#[derive(Clone)]
pub enum SurfaceSource<'a> {
  None,
  Pixel(PixelValue),
  Surface(&'a Surface),
  Gradient { gradient: Gradient, origin: PointF },
  Dither { inner: Box<SurfaceSource<'a>>, kind: DitherKind, target_bits: u32 },
}

/// One surface-level batch operation (`spec.md` §4.3/§4.2's `srcOver`/
/// `dstIn` whole-surface wrappers generalize this).
pub struct SurfaceBatchOp<'a> {
  pub operator: Operator,
  pub dst: SurfaceSource<'a>,
  pub src: SurfaceSource<'a>,
}

impl<'a> SurfaceBatchOp<'a> {
  pub fn new(p_operator: Operator, p_dst: SurfaceSource<'a>, p_src: SurfaceSource<'a>) -> Self {
    SurfaceBatchOp {
      operator: p_operator,
      dst: p_dst,
      src: p_src,
    }
  }
}

fn to_row_source(p_source: &SurfaceSource, p_surface_x: i64, p_surface_y: i64, p_len: usize) -> Source {
  match p_source {
    SurfaceSource::None => Source::None,
    SurfaceSource::Pixel(v) => Source::Pixel(*v),
    SurfaceSource::Surface(s) => Source::Stride(s.get_stride(p_surface_x, p_surface_y, p_len)),
    SurfaceSource::Gradient { gradient, origin } => Source::Gradient {
      gradient: gradient.clone(),
      origin: *origin,
    },
    SurfaceSource::Dither { inner, kind, target_bits } => Source::dither(
      to_row_source(inner, p_surface_x, p_surface_y, p_len),
      *kind,
      *target_bits,
    ),
  }
}

/// Clips a destination offset/source extent pair against the
/// destination's size along one axis, per `spec.md` §4.3's
/// "negative destination offsets clip the source start; extents
/// exceeding the destination clip the length." Returns
/// `(source_start, destination_start, length)`.
fn clip_axis(p_dst_offset: i64, p_src_extent: i64, p_dst_size: i64) -> (i64, i64, i64) {
  let (src_start, dst_start) = if p_dst_offset < 0 { (-p_dst_offset, 0) } else { (0, p_dst_offset) };
  let remaining = p_src_extent - src_start;
  let available = p_dst_size - dst_start;
  let len = remaining.min(available).max(0);
  (src_start, dst_start, len)
}

/// Runs a batch over a whole destination surface at `(p_dst_x, p_dst_y)`
/// (`spec.md` §4.3's surface-level bounds/auto-promotion rules).
pub fn execute_surface(p_ops: &[SurfaceBatchOp], p_dst: &mut Surface, p_dst_x: i64, p_dst_y: i64) {
  let Some(first) = p_ops.first() else { return };

  let (src_w, src_h) = match &first.src {
    SurfaceSource::Surface(s) => (s.width() as i64, s.height() as i64),
    _ => {
      if (p_dst_x, p_dst_y) != (0, 0) {
        return;
      }
      (p_dst.width() as i64, p_dst.height() as i64)
    }
  };

  let (sx0, dx0, len_x) = clip_axis(p_dst_x, src_w, p_dst.width() as i64);
  let (sy0, dy0, len_y) = clip_axis(p_dst_y, src_h, p_dst.height() as i64);
  if len_x <= 0 || len_y <= 0 {
    return;
  }

  let precision = if p_ops.iter().any(|op| op.operator.requires_float()) {
    Precision::Float
  } else {
    Precision::Integer
  };

  let len = len_x as usize;
  let format = p_dst.format();
  for ry in 0..len_y {
    let dst_y = dy0 + ry;
    let src_y = sy0 + ry;
    let dst_stride = p_dst.get_stride(dx0, dst_y, len);
    let row_ops: Vec<BatchOp> = p_ops
      .iter()
      .map(|op| BatchOp {
        operator: op.operator,
        dst: to_row_source(&op.dst, dx0, dst_y, len),
        src: match &op.src {
          SurfaceSource::Surface(s) => Source::Stride(s.get_stride(sx0, src_y, len)),
          other => to_row_source(other, dx0, dst_y, len),
        },
      })
      .collect();
    let result = execute_stride(&row_ops, precision, format, &dst_stride, dx0, dst_y);
    p_dst.put_stride(dx0, dst_y, &result);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use primitives::pixel::Rgba as RgbaPixel;

  fn stride_of(p_pixels: Vec<Rgba>) -> Stride {
    Stride::new(PixelFormat::Rgba, p_pixels.into_iter().map(PixelValue::Rgba).collect())
  }

  #[test]
  fn single_stride_override_matches_copy_src() {
    // spec.md §8: batch `[{src: stride}]` equals copySrc of that stride.
    let dst = stride_of(vec![RgbaPixel::new(1, 2, 3, 4); 3]);
    let src = stride_of(vec![RgbaPixel::new(10, 20, 30, 40); 3]);
    let ops = vec![BatchOp::new(Operator::Src, Source::None, Source::Stride(src.clone()))];
    let out = execute_stride(&ops, Precision::Integer, PixelFormat::Rgba, &dst, 0, 0);
    assert_eq!(out.pixels(), src.pixels());
  }

  #[test]
  fn empty_batch_leaves_stride_unchanged() {
    let dst = stride_of(vec![RgbaPixel::new(5, 6, 7, 8); 2]);
    let out = execute_stride(&[], Precision::Integer, PixelFormat::Rgba, &dst, 0, 0);
    assert_eq!(out.pixels(), dst.pixels());
  }

  #[test]
  fn running_value_persists_across_operations() {
    // src_over(clear, x) then src_over(running, y) should equal a single
    // src_over(x, y) composited onto clear, i.e. `y` fully replaces since
    // `x` is opaque-free clear-backed, then `y` src-overs atop that.
    let dst = stride_of(vec![RgbaPixel::CLEAR]);
    let first = stride_of(vec![RgbaPixel::new(100, 0, 0, 100)]);
    let second = stride_of(vec![RgbaPixel::new(0, 100, 0, 200)]);
    let ops = vec![
      BatchOp::new(Operator::SrcOver, Source::None, Source::Stride(first.clone())),
      BatchOp::new(Operator::SrcOver, Source::None, Source::Stride(second.clone())),
    ];
    let out = execute_stride(&ops, Precision::Integer, PixelFormat::Rgba, &dst, 0, 0);

    let step1 = composite_int(Operator::SrcOver, RgbaPixel::CLEAR, first.get(0).unwrap().to_rgba());
    let expected = composite_int(Operator::SrcOver, step1, second.get(0).unwrap().to_rgba());
    let PixelValue::Rgba(got) = out.get(0).unwrap() else { unreachable!() };
    assert_eq!(got, expected);
  }

  #[test]
  fn surface_level_pixel_source_noops_off_origin() {
    let mut dst = Surface::new(PixelFormat::Rgba, 4, 4).unwrap();
    let ops = vec![SurfaceBatchOp::new(
      Operator::SrcOver,
      SurfaceSource::None,
      SurfaceSource::Pixel(PixelValue::Rgba(RgbaPixel::new(1, 2, 3, 255))),
    )];
    execute_surface(&ops, &mut dst, 1, 1);
    assert_eq!(dst.get_pixel(1, 1), Some(PixelValue::Rgba(RgbaPixel::CLEAR)));
  }

  #[test]
  fn surface_level_source_over_whole_surface() {
    let mut dst = Surface::new(PixelFormat::Rgba, 2, 2).unwrap();
    let mut src = Surface::new(PixelFormat::Rgba, 2, 2).unwrap();
    src.paint_pixel(PixelValue::Rgba(RgbaPixel::new(10, 20, 30, 255)));
    let ops = vec![SurfaceBatchOp::new(Operator::SrcOver, SurfaceSource::None, SurfaceSource::Surface(&src))];
    execute_surface(&ops, &mut dst, 0, 0);
    assert_eq!(dst.get_pixel(0, 0), Some(PixelValue::Rgba(RgbaPixel::new(10, 20, 30, 255))));
  }
}
