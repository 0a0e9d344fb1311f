//! The four non-separable blend modes (`hue`, `saturation`, `color`,
//! `luminosity`), which blend the whole `(r, g, b)` triplet together
//! rather than channel-by-channel (`spec.md` §4.3). Float precision only;
//! integer mode degrades to `clear` before reaching here.

use crate::frgba::FRgba;
use crate::operator::Operator;

type Rgb = (f32, f32, f32);

fn lum(p_c: Rgb) -> f32 {
  0.30 * p_c.0 + 0.59 * p_c.1 + 0.11 * p_c.2
}

fn sat(p_c: Rgb) -> f32 {
  p_c.0.max(p_c.1).max(p_c.2) - p_c.0.min(p_c.1).min(p_c.2)
}

/// Clips an out-of-gamut triple back into `[0, 1]` by re-scaling about
/// its luminosity (`spec.md` §4.3 `clipColor`).
fn clip_color(p_c: Rgb) -> Rgb {
  let l = lum(p_c);
  let n = p_c.0.min(p_c.1).min(p_c.2);
  let mut c = p_c;
  if n < 0.0 && l > n {
    let scale = l / (l - n);
    c = (l + (c.0 - l) * scale, l + (c.1 - l) * scale, l + (c.2 - l) * scale);
  }
  let x = c.0.max(c.1).max(c.2);
  if x > 1.0 && x > l {
    let scale = (1.0 - l) / (x - l);
    c = (l + (c.0 - l) * scale, l + (c.1 - l) * scale, l + (c.2 - l) * scale);
  }
  c
}

fn set_lum(p_c: Rgb, p_l: f32) -> Rgb {
  let d = p_l - lum(p_c);
  clip_color((p_c.0 + d, p_c.1 + d, p_c.2 + d))
}

fn set_sat(p_c: Rgb, p_s: f32) -> Rgb {
  let mut channels = [p_c.0, p_c.1, p_c.2];
  let mut order = [0usize, 1, 2];
  order.sort_by(|&a, &b| channels[a].partial_cmp(&channels[b]).unwrap_or(std::cmp::Ordering::Equal));
  let (lo, mid, hi) = (order[0], order[1], order[2]);
  if channels[hi] > channels[lo] {
    channels[mid] = (channels[mid] - channels[lo]) * p_s / (channels[hi] - channels[lo]);
    channels[hi] = p_s;
  } else {
    channels[mid] = 0.0;
    channels[hi] = 0.0;
  }
  channels[lo] = 0.0;
  (channels[0], channels[1], channels[2])
}

fn blend_triplet(p_op: Operator, p_cb: Rgb, p_cs: Rgb) -> Rgb {
  match p_op {
    Operator::Hue => set_lum(set_sat(p_cs, sat(p_cb)), lum(p_cb)),
    Operator::Saturation => set_lum(set_sat(p_cb, sat(p_cs)), lum(p_cb)),
    Operator::Color => set_lum(p_cs, lum(p_cb)),
    Operator::Luminosity => set_lum(p_cb, lum(p_cs)),
    _ => p_cs,
  }
}

fn composite_channel(p_cb_premul: f32, p_cs_premul: f32, p_alpha_b: f32, p_alpha_s: f32, p_b: f32) -> f32 {
  p_cs_premul * (1.0 - p_alpha_b) + p_cb_premul * (1.0 - p_alpha_s) + p_alpha_b * p_alpha_s * p_b
}

pub fn composite(p_op: Operator, p_dst: FRgba, p_src: FRgba) -> FRgba {
  let cb = p_dst.straight_rgb();
  let cs = p_src.straight_rgb();
  let b = blend_triplet(p_op, cb, cs);
  FRgba {
    r: composite_channel(p_dst.r, p_src.r, p_dst.a, p_src.a, b.0),
    g: composite_channel(p_dst.g, p_src.g, p_dst.a, p_src.a, b.1),
    b: composite_channel(p_dst.b, p_src.b, p_dst.a, p_src.a, b.2),
    a: p_src.a + p_dst.a - p_src.a * p_dst.a,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn luminosity_of_a_pixel_against_itself_is_identity() {
    let c = FRgba::new(0.2, 0.4, 0.6, 1.0);
    let out = composite(Operator::Luminosity, c, c);
    assert!((out.r - c.r).abs() < 1e-6);
    assert!((out.g - c.g).abs() < 1e-6);
    assert!((out.b - c.b).abs() < 1e-6);
  }

  #[test]
  fn color_takes_hue_and_saturation_from_source_luminosity_from_dest() {
    let dst = FRgba::new(0.8, 0.8, 0.8, 1.0); // gray, high luminosity
    let src = FRgba::new(1.0, 0.0, 0.0, 1.0); // saturated red
    let out = composite(Operator::Color, dst, src);
    // Result should keep dst's (high) luminosity while being saturated.
    assert!(out.r > out.g);
    assert!((lum((out.r, out.g, out.b)) - lum((dst.r, dst.g, dst.b))).abs() < 1e-5);
  }

  #[test]
  fn set_sat_of_a_gray_triplet_stays_gray() {
    let out = set_sat((0.5, 0.5, 0.5), 0.7);
    assert_eq!(out, (0.0, 0.0, 0.0));
  }
}
