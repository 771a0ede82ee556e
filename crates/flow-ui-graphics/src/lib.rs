//! Pure geometry for Component Flow
//!
//! Points, sizes and rectangles used by views, transitions and the
//! component host.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{Point, Rect, Size};
}
