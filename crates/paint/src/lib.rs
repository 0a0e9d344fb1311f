//! Path flattening, the fill and stroke plotters, and the `Painter` that
//! orchestrates them against a destination surface (`spec.md` §4.4-§4.7).

pub mod error;
pub mod fill;
pub mod flatten;
pub mod painter;
pub mod stroke;

pub use self::error::{FillError, StrokeError};
pub use self::fill::plot_fill;
pub use self::flatten::{flatten, flatten_path, FlatNode};
pub use self::painter::{AntiAlias, FillOptions, Painter};
pub use self::stroke::{plot_stroke, LineCap, LineJoin, StrokeOptions};
