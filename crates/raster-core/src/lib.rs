//! The pixel buffer and stride-view types the compositor and paint
//! crates build on: owned `Surface`s, the `Stride` run the batch
//! compositor consumes, and the format-tagged `PixelValue` that moves a
//! single pixel between them.

pub mod error;
pub mod pixel_value;
pub mod stride;
pub mod surface;

pub use self::error::SurfaceError;
pub use self::pixel_value::PixelValue;
pub use self::stride::Stride;
pub use self::surface::Surface;
