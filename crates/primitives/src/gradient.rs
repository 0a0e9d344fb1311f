//! Gradient stops and geometry (`spec.md` §3 "Gradient", §4.8).

use crate::color::Color;
use crate::point::PointF;

/// One `(offset, color)` stop. Offsets are sorted ascending by `Gradient::new`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
  pub offset: f32,
  pub color: Color,
}

impl Stop {
  pub fn new(p_offset: f32, p_color: Color) -> Self {
    Stop {
      offset: p_offset.clamp(0.0, 1.0),
      color: p_color,
    }
  }
}

/// How a gradient's stops are interpolated between brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMethod {
  /// Interpolate linearly in linear-RGB space (the default).
  Linear,
  /// Hold the lower stop's color across the whole bracket (hard edges).
  Stepped,
}

/// The parametric shape a gradient is sampled along.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientGeometry {
  /// Linear gradient between two endpoints.
  Linear { p0: PointF, p1: PointF },
  /// Radial gradient between two circles (center + radius each); the
  /// common case of a gradient with a single circle is `c0 == c1, r0 == 0`.
  Radial { c0: PointF, r0: f64, c1: PointF, r1: f64 },
  /// Conic (angular) gradient sweeping from `start_angle` around `center`.
  Conic { center: PointF, start_angle: f64 },
}

/// A sorted list of color stops plus the geometry they are mapped onto.
#[derive(Debug, Clone)]
pub struct Gradient {
  stops: Vec<Stop>,
  geometry: GradientGeometry,
  interpolation: InterpolationMethod,
}

impl Gradient {
  /// Creates a gradient from stops (sorted by offset) and geometry.
  pub fn new(p_stops: Vec<Stop>, p_geometry: GradientGeometry) -> Self {
    let mut stops = p_stops;
    stops.sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap_or(std::cmp::Ordering::Equal));
    Gradient {
      stops,
      geometry: p_geometry,
      interpolation: InterpolationMethod::Linear,
    }
  }

  pub fn with_interpolation(mut self, p_method: InterpolationMethod) -> Self {
    self.interpolation = p_method;
    self
  }

  pub fn stops(&self) -> &[Stop] {
    &self.stops
  }

  pub fn geometry(&self) -> &GradientGeometry {
    &self.geometry
  }

  pub fn interpolation_method(&self) -> InterpolationMethod {
    self.interpolation
  }

  /// Maps device-space `(x, y)` to a parametric offset in `[0, 1]`,
  /// clamped at the ends (`spec.md` §4.8).
  pub fn offset_at(&self, p_x: f64, p_y: f64) -> f32 {
    let t = match &self.geometry {
      GradientGeometry::Linear { p0, p1 } => {
        let axis = *p1 - *p0;
        let len_sq = axis.length_squared();
        if len_sq <= 0.0 {
          0.0
        } else {
          (PointF::new(p_x, p_y) - *p0).dot(axis) / len_sq
        }
      }
      GradientGeometry::Radial { c0, r0, c1, r1 } => {
        // Approximate the general two-circle radial gradient by the
        // common case used here: interpolate center and radius linearly
        // and solve for the parametric t whose circle passes through the
        // sample point, falling back to 0 for a degenerate gradient.
        let p = PointF::new(p_x, p_y);
        let dr = r1 - r0;
        if dr.abs() <= f64::EPSILON {
          let d = p.distance_to(*c0);
          if *r0 <= 0.0 { 0.0 } else { d / r0 }
        } else {
          let dc = *c1 - *c0;
          // Solve |p - (c0 + t*dc)| = r0 + t*dr for t, picking the
          // closest non-negative root; this is the standard two-circle
          // radial gradient parameterization.
          let pd = p - *c0;
          let a = dc.length_squared() - dr * dr;
          let b = -2.0 * (pd.dot(dc) + r0 * dr);
          let c = pd.length_squared() - r0 * r0;
          if a.abs() <= f64::EPSILON {
            if b.abs() <= f64::EPSILON { 0.0 } else { -c / b }
          } else {
            let disc = b * b - 4.0 * a * c;
            if disc < 0.0 {
              0.0
            } else {
              let sqrt_disc = disc.sqrt();
              let t0 = (-b + sqrt_disc) / (2.0 * a);
              let t1 = (-b - sqrt_disc) / (2.0 * a);
              [t0, t1]
                .into_iter()
                .filter(|t| r0 + t * dr >= 0.0)
                .fold(None, |acc, t| match acc {
                  None => Some(t),
                  Some(best) if t > best => Some(t),
                  Some(best) => Some(best),
                })
                .unwrap_or(0.0)
            }
          }
        }
      }
      GradientGeometry::Conic { center, start_angle } => {
        let p = PointF::new(p_x, p_y);
        let angle = (p.y - center.y).atan2(p.x - center.x) - start_angle;
        let two_pi = std::f64::consts::PI * 2.0;
        let wrapped = angle.rem_euclid(two_pi);
        wrapped / two_pi
      }
    };
    t.clamp(0.0, 1.0) as f32
  }

  /// Returns the bracketing stop pair and the local `[0, 1]` interpolation
  /// parameter for a global offset (`spec.md` §3/§4.8).
  pub fn search_in_stops(&self, p_offset: f32) -> (Color, Color, f32) {
    let t = p_offset.clamp(0.0, 1.0);
    if self.stops.is_empty() {
      return (Color::transparent(), Color::transparent(), 0.0);
    }
    if self.stops.len() == 1 || t <= self.stops[0].offset {
      let c = self.stops[0].color;
      return (c, c, 0.0);
    }
    let last = self.stops.len() - 1;
    if t >= self.stops[last].offset {
      let c = self.stops[last].color;
      return (c, c, 0.0);
    }
    for i in 0..last {
      let s0 = self.stops[i];
      let s1 = self.stops[i + 1];
      if t >= s0.offset && t <= s1.offset {
        let span = s1.offset - s0.offset;
        let local = if span <= 0.0 { 0.0 } else { (t - s0.offset) / span };
        return (s0.color, s1.color, local);
      }
    }
    let c = self.stops[last].color;
    (c, c, 0.0)
  }

  /// Samples a single color at device-space `(x, y)`.
  pub fn sample(&self, p_x: f64, p_y: f64) -> Color {
    let offset = self.offset_at(p_x, p_y);
    let (c0, c1, local) = self.search_in_stops(offset);
    match self.interpolation {
      InterpolationMethod::Linear => c0.lerp(c1, local),
      InterpolationMethod::Stepped => c0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn two_stop_linear() -> Gradient {
    Gradient::new(
      vec![Stop::new(0.0, Color::black()), Stop::new(1.0, Color::white())],
      GradientGeometry::Linear {
        p0: PointF::new(0.0, 0.0),
        p1: PointF::new(100.0, 0.0),
      },
    )
  }

  #[test]
  fn search_in_stops_returns_bracket_and_local_offset() {
    let g = two_stop_linear();
    let (c0, c1, local) = g.search_in_stops(0.25);
    assert_eq!(c0, Color::black());
    assert_eq!(c1, Color::white());
    assert!((local - 0.25).abs() < 1e-6);
  }

  #[test]
  fn offsets_outside_range_clamp() {
    let g = two_stop_linear();
    assert_eq!(g.offset_at(-50.0, 0.0), 0.0);
    assert_eq!(g.offset_at(500.0, 0.0), 1.0);
  }

  #[test]
  fn midpoint_sample_is_the_average() {
    let g = two_stop_linear();
    let mid = g.sample(50.0, 0.0);
    assert!((mid.r - 0.5).abs() < 1e-6);
  }
}
