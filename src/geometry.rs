//! Planar geometry for tag quadrilaterals in display coordinates.

mod homography;
mod orientation;
mod point;
mod rect;

pub use homography::Homography;
pub use orientation::normalize_orientation;
pub use point::{Point, Quad, centroid};
pub use rect::Rect;
