//! Leaf data types shared by the rest of the rasterization workspace:
//! pixel formats, color, path/polygon geometry, gradients, and the small
//! affine transform stand-in consumed by the stroke plotter.
//!
//! This crate carries no rendering logic of its own — it is intended to be
//! light-weight and free of heavy dependencies, mirroring the teacher's
//! `primitives` crate.

pub mod consts;
pub mod error;
pub mod gradient;
pub mod path;
pub mod pixel;
pub mod point;
pub mod polygon;
pub mod transform;

pub mod color;

pub use self::color::Color;
pub use self::error::PathError;
pub use self::gradient::{Gradient, GradientGeometry, InterpolationMethod, Stop};
pub use self::path::{nodes_are_closed, Node, Path};
pub use self::pixel::{Alpha1, Alpha2, Alpha4, Alpha8, PixelFormat, Rgb, Rgba};
pub use self::point::PointF;
pub use self::polygon::{FillRule, Polygon, PolygonSet};
pub use self::transform::Transform;
