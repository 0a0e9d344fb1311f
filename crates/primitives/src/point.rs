use std::fmt::Display;
use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq)]
/// A point in 2D space with double-precision coordinates.
///
/// Polygons and fill/stroke math are carried out in `f64` (per `spec.md`
/// §3's `Polygon`/`PolygonSet` data model); device-space path nodes are
/// also stored as `PointF` so no precision is lost converting between the
/// two.
pub struct PointF {
  /// The x-coordinate of the point.
  pub x: f64,
  /// The y-coordinate of the point.
  pub y: f64,
}

impl Display for PointF {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

impl Default for PointF {
  fn default() -> Self {
    PointF { x: 0.0, y: 0.0 }
  }
}

impl From<(f64, f64)> for PointF {
  fn from(p_tuple: (f64, f64)) -> Self {
    PointF {
      x: p_tuple.0,
      y: p_tuple.1,
    }
  }
}

impl From<(f32, f32)> for PointF {
  fn from(p_tuple: (f32, f32)) -> Self {
    PointF {
      x: p_tuple.0 as f64,
      y: p_tuple.1 as f64,
    }
  }
}

impl From<(i32, i32)> for PointF {
  fn from(p_tuple: (i32, i32)) -> Self {
    PointF {
      x: p_tuple.0 as f64,
      y: p_tuple.1 as f64,
    }
  }
}

impl From<PointF> for (f64, f64) {
  fn from(p: PointF) -> Self {
    (p.x, p.y)
  }
}

impl Add for PointF {
  type Output = PointF;

  fn add(self, p_rhs: PointF) -> PointF {
    PointF {
      x: self.x + p_rhs.x,
      y: self.y + p_rhs.y,
    }
  }
}

impl Sub for PointF {
  type Output = PointF;

  fn sub(self, p_rhs: PointF) -> PointF {
    PointF {
      x: self.x - p_rhs.x,
      y: self.y - p_rhs.y,
    }
  }
}

impl Mul<f64> for PointF {
  type Output = PointF;

  fn mul(self, p_scalar: f64) -> PointF {
    PointF {
      x: self.x * p_scalar,
      y: self.y * p_scalar,
    }
  }
}

impl Div<f64> for PointF {
  type Output = PointF;

  fn div(self, p_scalar: f64) -> PointF {
    PointF {
      x: self.x / p_scalar,
      y: self.y / p_scalar,
    }
  }
}

impl PointF {
  /// Creates a new point with the given coordinates.
  pub fn new(p_x: f64, p_y: f64) -> PointF {
    PointF { x: p_x, y: p_y }
  }

  /// The origin.
  pub fn zero() -> PointF {
    PointF { x: 0.0, y: 0.0 }
  }

  /// Length (magnitude) of the vector from the origin to this point.
  pub fn length(&self) -> f64 {
    (self.x * self.x + self.y * self.y).sqrt()
  }

  /// Squared length (avoids a `sqrt` call).
  pub fn length_squared(&self) -> f64 {
    self.x * self.x + self.y * self.y
  }

  /// A unit vector in the same direction, or the origin if this point is
  /// already the origin.
  pub fn normalize(&self) -> PointF {
    let len = self.length();
    if len > 0.0 { *self / len } else { PointF::zero() }
  }

  /// Dot product with another point, treated as a vector.
  pub fn dot(&self, p_other: PointF) -> f64 {
    self.x * p_other.x + self.y * p_other.y
  }

  /// The z-component of the 2D cross product with another vector.
  pub fn cross(&self, p_other: PointF) -> f64 {
    self.x * p_other.y - self.y * p_other.x
  }

  /// Euclidean distance to another point.
  pub fn distance_to(&self, p_other: PointF) -> f64 {
    (*self - p_other).length()
  }

  /// The vector rotated 90 degrees counter-clockwise.
  pub fn perpendicular(&self) -> PointF {
    PointF { x: -self.y, y: self.x }
  }

  /// Linear interpolation between this point and another.
  pub fn lerp(&self, p_other: PointF, p_t: f64) -> PointF {
    *self + (p_other - *self) * p_t
  }
}
