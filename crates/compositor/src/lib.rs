//! The batched pixel-blending engine: Porter-Duff operators and W3C
//! blend modes at integer and float precision, threshold-matrix dither,
//! and the gradient/solid `Pattern`s a batch can paint with (`spec.md`
//! §4.3/§4.8/§4.9).

mod blend;

pub mod batch;
pub mod dither;
pub mod frgba;
pub mod operator;
pub mod pattern;
pub mod source;

pub use self::batch::{execute_stride, execute_surface, BatchOp, SurfaceBatchOp, SurfaceSource};
pub use self::blend::{composite_float, composite_int};
pub use self::dither::DitherKind;
pub use self::frgba::FRgba;
pub use self::operator::{Operator, Precision};
pub use self::pattern::{DitherPattern, GradientPattern, Pattern, SolidPattern};
pub use self::source::Source;
