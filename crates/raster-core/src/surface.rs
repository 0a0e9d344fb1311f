//! The owned pixel buffer every rendering operation reads from and
//! writes to (`spec.md` §4.2 "Surface").

use primitives::consts::SUPERSAMPLE_SCALE;
use primitives::pixel::PixelFormat;
use rayon::prelude::*;

use crate::error::SurfaceError;
use crate::pixel_value::PixelValue;
use crate::stride::Stride;

/// Number of whole bytes one row of `p_width` pixels at `p_format`'s bit
/// depth would need in isolation. Only meaningful for the byte-addressable
/// formats, where it doubles as the actual per-row stride; for the
/// packed-alpha formats the buffer is one flat bitstream with no per-row
/// padding (`spec.md` §4.2 seed scenario 5), so this is informational only
/// and must not be used to size or address the backing buffer.
fn row_stride_bytes(p_format: PixelFormat, p_width: u32) -> usize {
  match bytes_per_pixel(p_format) {
    Some(bpp) => p_width as usize * bpp,
    None => {
      let bits = p_format.alpha_bits() as u64;
      ((p_width as u64 * bits + 7) / 8) as usize
    }
  }
}

/// Total backing-buffer length in bytes for a surface of this format/size.
/// Byte-addressable formats are simply `row_stride_bytes * height`; packed
/// formats are one flat row-major bitstream over every pixel in the
/// surface, `ceil(width * height * bits_per_pixel / 8)`.
fn buffer_len_bytes(p_format: PixelFormat, p_width: u32, p_height: u32) -> usize {
  match bytes_per_pixel(p_format) {
    Some(bpp) => p_width as usize * bpp * p_height as usize,
    None => {
      let bits = p_format.alpha_bits() as u64;
      let total_bits = p_width as u64 * p_height as u64 * bits;
      ((total_bits + 7) / 8) as usize
    }
  }
}

/// Bit offset and byte/shift decomposition of pixel `(p_x, p_y)` within a
/// flat, row-major packed-alpha bitstream (no per-row padding).
fn packed_bit_location(p_format: PixelFormat, p_width: u32, p_x: usize, p_y: usize) -> (usize, u32) {
  let bits = p_format.alpha_bits() as u64;
  let pixel_index = p_y as u64 * p_width as u64 + p_x as u64;
  let bit_offset = pixel_index * bits;
  ((bit_offset / 8) as usize, (bit_offset % 8) as u32)
}

/// `Some(bytes)` for the three byte-addressable formats, `None` for the
/// three packed-alpha formats (several pixels per byte).
fn bytes_per_pixel(p_format: PixelFormat) -> Option<usize> {
  match p_format {
    PixelFormat::Rgb => Some(3),
    PixelFormat::Rgba => Some(4),
    PixelFormat::Alpha8 => Some(1),
    PixelFormat::Alpha4 | PixelFormat::Alpha2 | PixelFormat::Alpha1 => None,
  }
}

/// An owned (or externally-supplied) pixel buffer of a fixed format,
/// width, and height. Out-of-range `get_pixel`/`put_pixel` calls are
/// silent no-ops rather than errors (`spec.md` §4.2).
#[derive(Debug, Clone)]
pub struct Surface {
  format: PixelFormat,
  width: u32,
  height: u32,
  data: Vec<u8>,
}

impl Surface {
  /// Allocates a new, zero-filled surface (`init`).
  pub fn new(p_format: PixelFormat, p_width: u32, p_height: u32) -> Result<Surface, SurfaceError> {
    if p_width == 0 {
      return Err(SurfaceError::InvalidWidth);
    }
    if p_height == 0 {
      return Err(SurfaceError::InvalidHeight);
    }
    Ok(Surface {
      format: p_format,
      width: p_width,
      height: p_height,
      data: vec![0u8; buffer_len_bytes(p_format, p_width, p_height)],
    })
  }

  /// Allocates a new surface with every pixel set to `p_value` (`initPixel`).
  pub fn new_filled(
    p_format: PixelFormat, p_width: u32, p_height: u32, p_value: PixelValue,
  ) -> Result<Surface, SurfaceError> {
    let mut surface = Surface::new(p_format, p_width, p_height)?;
    surface.paint_pixel(p_value);
    Ok(surface)
  }

  /// Wraps an externally-owned buffer as a surface (`initBuffer`). The
  /// buffer is resized (zero-padded, or truncated) to exactly the byte
  /// length this format/width/height combination requires.
  pub fn from_buffer(
    p_format: PixelFormat, mut p_buffer: Vec<u8>, p_width: u32, p_height: u32,
  ) -> Result<Surface, SurfaceError> {
    if p_width == 0 {
      return Err(SurfaceError::InvalidWidth);
    }
    if p_height == 0 {
      return Err(SurfaceError::InvalidHeight);
    }
    let expected = buffer_len_bytes(p_format, p_width, p_height);
    p_buffer.resize(expected, 0);
    Ok(Surface {
      format: p_format,
      width: p_width,
      height: p_height,
      data: p_buffer,
    })
  }

  pub fn format(&self) -> PixelFormat {
    self.format
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn row_stride_bytes(&self) -> usize {
    row_stride_bytes(self.format, self.width)
  }

  pub fn data(&self) -> &[u8] {
    &self.data
  }

  pub fn data_mut(&mut self) -> &mut [u8] {
    &mut self.data
  }

  fn in_bounds(&self, p_x: i64, p_y: i64) -> bool {
    p_x >= 0 && p_y >= 0 && (p_x as u32) < self.width && (p_y as u32) < self.height
  }

  /// Reads the pixel at `(p_x, p_y)`, or `None` if out of range.
  pub fn get_pixel(&self, p_x: i64, p_y: i64) -> Option<PixelValue> {
    if !self.in_bounds(p_x, p_y) {
      return None;
    }
    let row = self.row_stride_bytes();
    let x = p_x as usize;
    let y = p_y as usize;
    Some(match self.format {
      PixelFormat::Rgb => {
        let base = y * row + x * 3;
        PixelValue::Rgb(primitives::pixel::Rgb::new(self.data[base], self.data[base + 1], self.data[base + 2]))
      }
      PixelFormat::Rgba => {
        let base = y * row + x * 4;
        PixelValue::Rgba(primitives::pixel::Rgba::new(
          self.data[base],
          self.data[base + 1],
          self.data[base + 2],
          self.data[base + 3],
        ))
      }
      PixelFormat::Alpha8 => {
        let base = y * row + x;
        PixelValue::Alpha8(primitives::pixel::Alpha8(self.data[base]))
      }
      PixelFormat::Alpha4 | PixelFormat::Alpha2 | PixelFormat::Alpha1 => {
        let bits = self.format.alpha_bits() as usize;
        let (byte_index, shift) = packed_bit_location(self.format, self.width, x, y);
        let mask = (1u32 << bits) - 1;
        let value = ((self.data[byte_index] as u32) >> shift) & mask;
        match self.format {
          PixelFormat::Alpha4 => PixelValue::Alpha4(primitives::pixel::Alpha4(value as u8)),
          PixelFormat::Alpha2 => PixelValue::Alpha2(primitives::pixel::Alpha2(value as u8)),
          PixelFormat::Alpha1 => PixelValue::Alpha1(primitives::pixel::Alpha1(value as u8)),
          _ => unreachable!(),
        }
      }
    })
  }

  /// Writes `p_value` at `(p_x, p_y)`. A silent no-op when out of range,
  /// and when `p_value`'s format doesn't match this surface's.
  pub fn put_pixel(&mut self, p_x: i64, p_y: i64, p_value: PixelValue) {
    if !self.in_bounds(p_x, p_y) || p_value.format() != self.format {
      return;
    }
    let row = self.row_stride_bytes();
    let x = p_x as usize;
    let y = p_y as usize;
    match p_value {
      PixelValue::Rgb(p) => {
        let base = y * row + x * 3;
        self.data[base] = p.r;
        self.data[base + 1] = p.g;
        self.data[base + 2] = p.b;
      }
      PixelValue::Rgba(p) => {
        let base = y * row + x * 4;
        self.data[base] = p.r;
        self.data[base + 1] = p.g;
        self.data[base + 2] = p.b;
        self.data[base + 3] = p.a;
      }
      PixelValue::Alpha8(p) => {
        self.data[y * row + x] = p.0;
      }
      PixelValue::Alpha4(_) | PixelValue::Alpha2(_) | PixelValue::Alpha1(_) => {
        let bits = self.format.alpha_bits() as usize;
        let (byte_index, shift) = packed_bit_location(self.format, self.width, x, y);
        let mask = (1u32 << bits) - 1;
        let raw = match p_value {
          PixelValue::Alpha4(p) => p.0 as u32,
          PixelValue::Alpha2(p) => p.0 as u32,
          PixelValue::Alpha1(p) => p.0 as u32,
          _ => unreachable!(),
        };
        let byte = &mut self.data[byte_index];
        *byte = (*byte & !((mask as u8) << shift)) | (((raw & mask) as u8) << shift);
      }
    }
  }

  /// Fills the whole surface with `p_value`. For packed-alpha formats
  /// this replicates the pixel's bit pattern across a whole byte and
  /// fills the buffer byte-wise; a zero value short-circuits to a bulk
  /// zero-fill (`spec.md` §4.2).
  pub fn paint_pixel(&mut self, p_value: PixelValue) {
    if p_value.format() != self.format {
      return;
    }
    match p_value {
      PixelValue::Alpha4(p) if p.0 == 0 => self.data.fill(0),
      PixelValue::Alpha2(p) if p.0 == 0 => self.data.fill(0),
      PixelValue::Alpha1(p) if p.0 == 0 => self.data.fill(0),
      PixelValue::Alpha4(p) => {
        let byte = p.0 | (p.0 << 4);
        self.data.fill(byte);
      }
      PixelValue::Alpha2(p) => {
        let byte = p.0 | (p.0 << 2) | (p.0 << 4) | (p.0 << 6);
        self.data.fill(byte);
      }
      PixelValue::Alpha1(p) => {
        let byte = if p.0 != 0 { 0xFFu8 } else { 0 };
        self.data.fill(byte);
      }
      PixelValue::Alpha8(p) => self.data.fill(p.0),
      PixelValue::Rgb(_) | PixelValue::Rgba(_) => {
        for y in 0..self.height as i64 {
          for x in 0..self.width as i64 {
            self.put_pixel(x, y, p_value);
          }
        }
      }
    }
  }

  /// Reads `p_len` consecutive pixels starting at `(p_x, p_y)` into an
  /// owned `Stride`. Out-of-range positions read as this format's clear
  /// value (`spec.md` §4.2's "Stride" view).
  pub fn get_stride(&self, p_x: i64, p_y: i64, p_len: usize) -> Stride {
    let mut pixels = Vec::with_capacity(p_len);
    for i in 0..p_len {
      pixels.push(self.get_pixel(p_x + i as i64, p_y).unwrap_or_else(|| PixelValue::clear(self.format)));
    }
    Stride::new(self.format, pixels)
  }

  /// Writes a `Stride` back starting at `(p_x, p_y)`. Positions outside
  /// the surface are silently skipped, matching `put_pixel`.
  pub fn put_stride(&mut self, p_x: i64, p_y: i64, p_stride: &Stride) {
    for (i, pixel) in p_stride.pixels().iter().enumerate() {
      self.put_pixel(p_x + i as i64, p_y, *pixel);
    }
  }

  /// Porter-Duff `src-over` of `p_src` onto this whole surface at
  /// `(p_dst_x, p_dst_y)`, pixel by pixel (`spec.md` §4.2).
  pub fn src_over(&mut self, p_src: &Surface, p_dst_x: i64, p_dst_y: i64) {
    for y in 0..p_src.height as i64 {
      for x in 0..p_src.width as i64 {
        if let Some(src_px) = p_src.get_pixel(x, y) {
          let src_px = src_px.copy_src(self.format);
          let dst_px = self.get_pixel(p_dst_x + x, p_dst_y + y).unwrap_or_else(|| PixelValue::clear(self.format));
          self.put_pixel(p_dst_x + x, p_dst_y + y, PixelValue::src_over(dst_px, src_px));
        }
      }
    }
  }

  /// Porter-Duff `dst-in` of `p_src` against this whole surface at
  /// `(p_dst_x, p_dst_y)`.
  pub fn dst_in(&mut self, p_src: &Surface, p_dst_x: i64, p_dst_y: i64) {
    for y in 0..p_src.height as i64 {
      for x in 0..p_src.width as i64 {
        if let Some(src_px) = p_src.get_pixel(x, y) {
          let src_px = src_px.copy_src(self.format);
          let dst_px = self.get_pixel(p_dst_x + x, p_dst_y + y).unwrap_or_else(|| PixelValue::clear(self.format));
          self.put_pixel(p_dst_x + x, p_dst_y + y, PixelValue::dst_in(dst_px, src_px));
        }
      }
    }
  }

  /// Box-averages this surface down by the fixed supersample factor
  /// (`spec.md` §4.2/§5: "downsample() performs 4x4 box averaging... and
  /// rewrites it in place with new dimensions ⌊w/4⌋ × ⌊h/4⌋"). Rows of
  /// the (smaller) output are computed in parallel with rayon, each row
  /// written into its own byte-aligned chunk of the output buffer — exact
  /// for the byte-addressable formats (the only ones this is ever called
  /// on in practice, always `Alpha8`); a packed sub-byte format whose row
  /// width isn't a whole number of bytes would need bit-level stitching
  /// across chunk boundaries that this per-row chunking doesn't do.
  pub fn downsample(&mut self) {
    let scale = SUPERSAMPLE_SCALE as u32;
    let new_width = self.width / scale;
    let new_height = self.height / scale;
    if new_width == 0 || new_height == 0 {
      self.width = new_width;
      self.height = new_height;
      self.data.clear();
      return;
    }
    let new_row_bytes = row_stride_bytes(self.format, new_width);
    let mut output = vec![0u8; new_row_bytes * new_height as usize];

    let source = &*self;
    let format = self.format;
    output
      .par_chunks_mut(new_row_bytes)
      .enumerate()
      .for_each(|(oy, row)| {
        let mut scratch = Surface {
          format,
          width: new_width,
          height: 1,
          data: vec![0u8; row.len()],
        };
        for ox in 0..new_width as i64 {
          let mut sum_r = 0u32;
          let mut sum_g = 0u32;
          let mut sum_b = 0u32;
          let mut sum_a = 0u32;
          for sy in 0..scale as i64 {
            for sx in 0..scale as i64 {
              let px = source
                .get_pixel(ox * scale as i64 + sx, oy as i64 * scale as i64 + sy)
                .unwrap_or_else(|| PixelValue::clear(format))
                .to_rgba();
              sum_r += px.r as u32;
              sum_g += px.g as u32;
              sum_b += px.b as u32;
              sum_a += px.a as u32;
            }
          }
          let samples = (scale * scale) as u32;
          let avg = primitives::pixel::Rgba::new(
            ((sum_r + samples / 2) / samples) as u8,
            ((sum_g + samples / 2) / samples) as u8,
            ((sum_b + samples / 2) / samples) as u8,
            ((sum_a + samples / 2) / samples) as u8,
          );
          scratch.put_pixel(ox, 0, PixelValue::from_rgba(format, avg));
        }
        row.copy_from_slice(&scratch.data);
      });

    self.width = new_width;
    self.height = new_height;
    self.data = output;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use primitives::pixel::{Alpha4, Rgba};

  #[test]
  fn invalid_dimensions_are_rejected() {
    assert_eq!(Surface::new(PixelFormat::Rgba, 0, 10), Err(SurfaceError::InvalidWidth));
    assert_eq!(Surface::new(PixelFormat::Rgba, 10, 0), Err(SurfaceError::InvalidHeight));
  }

  #[test]
  fn out_of_range_access_is_silent() {
    let s = Surface::new(PixelFormat::Rgba, 4, 4).unwrap();
    assert_eq!(s.get_pixel(-1, 0), None);
    assert_eq!(s.get_pixel(4, 0), None);
  }

  #[test]
  fn put_then_get_round_trips() {
    let mut s = Surface::new(PixelFormat::Rgba, 4, 4).unwrap();
    let px = PixelValue::Rgba(Rgba::new(10, 20, 30, 40));
    s.put_pixel(1, 2, px);
    assert_eq!(s.get_pixel(1, 2), Some(px));
  }

  #[test]
  fn alpha4_packing_worked_example() {
    // spec.md §8 seed scenario 5: a 3x3 Alpha4 surface with putPixel(0,0)=5,
    // (1,1)=10, (2,2)=15 packs into one flat bitstream over all 9 pixels
    // (36 bits -> 5 bytes), not three independently byte-padded rows (which
    // would pack 3 px/row into 2 bytes/row = 6 bytes). Pixel index = y*3+x,
    // so (0,0) is pixel 0 (low nibble of byte 0), (1,1) is pixel 4 (low
    // nibble of byte 2), (2,2) is pixel 8 (low nibble of byte 4).
    let mut s = Surface::new(PixelFormat::Alpha4, 3, 3).unwrap();
    s.put_pixel(0, 0, PixelValue::Alpha4(Alpha4(5)));
    s.put_pixel(1, 1, PixelValue::Alpha4(Alpha4(10)));
    s.put_pixel(2, 2, PixelValue::Alpha4(Alpha4(15)));
    assert_eq!(s.data(), &[0x05, 0x00, 0x0A, 0x00, 0x0F]);
  }

  #[test]
  fn alpha4_packing_does_not_pad_each_row_to_a_whole_byte() {
    // A 5-pixel-wide row (5 * 4 = 20 bits) is not a whole number of bytes,
    // so row 1 must start mid-byte in the flat bitstream rather than at a
    // fresh byte boundary.
    let mut s = Surface::new(PixelFormat::Alpha4, 5, 2).unwrap();
    for (i, v) in [5u8, 0, 10, 0, 15].into_iter().enumerate() {
      s.put_pixel(i as i64, 0, PixelValue::Alpha4(Alpha4(v)));
    }
    s.put_pixel(0, 1, PixelValue::Alpha4(Alpha4(7)));
    // Row 0 occupies 20 bits (2.5 bytes); pixel (0,1) is global pixel index
    // 5, bit offset 20, i.e. the high nibble of byte 2.
    assert_eq!(s.data()[2], 0x7F);
    assert_eq!(s.get_pixel(0, 1), Some(PixelValue::Alpha4(Alpha4(7))));
  }

  #[test]
  fn paint_pixel_zero_is_bulk_zero_fill() {
    let mut s = Surface::new(PixelFormat::Alpha2, 8, 1).unwrap();
    s.paint_pixel(PixelValue::Alpha2(primitives::pixel::Alpha2(3)));
    assert!(s.data().iter().all(|b| *b == 0xFF));
    s.paint_pixel(PixelValue::Alpha2(primitives::pixel::Alpha2(0)));
    assert!(s.data().iter().all(|b| *b == 0));
  }

  #[test]
  fn downsample_averages_a_uniform_block_to_itself() {
    let mut s = Surface::new(PixelFormat::Alpha8, 8, 8).unwrap();
    s.paint_pixel(PixelValue::Alpha8(primitives::pixel::Alpha8(128)));
    s.downsample();
    assert_eq!(s.width(), 2);
    assert_eq!(s.height(), 2);
    assert_eq!(s.get_pixel(0, 0), Some(PixelValue::Alpha8(primitives::pixel::Alpha8(128))));
  }

  #[test]
  fn downsample_of_a_half_covered_block_yields_half_coverage() {
    let mut s = Surface::new(PixelFormat::Alpha8, 4, 4).unwrap();
    for y in 0..4i64 {
      for x in 0..2i64 {
        s.put_pixel(x, y, PixelValue::Alpha8(primitives::pixel::Alpha8(255)));
      }
    }
    s.downsample();
    assert_eq!(s.width(), 1);
    assert_eq!(s.height(), 1);
    match s.get_pixel(0, 0) {
      Some(PixelValue::Alpha8(a)) => assert!((a.0 as i32 - 128).abs() <= 1),
      other => panic!("unexpected {other:?}"),
    }
  }

  #[test]
  fn from_buffer_pads_a_short_buffer() {
    let s = Surface::from_buffer(PixelFormat::Rgba, vec![1, 2, 3], 2, 2).unwrap();
    assert_eq!(s.data().len(), 16);
  }
}
