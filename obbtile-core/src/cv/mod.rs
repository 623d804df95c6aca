pub mod overlap;
pub mod sign;

pub use overlap::{OverlapMode, Point, Quad, intersection_area, overlap_ratio, quad_from_coords};
pub use sign::{Sign, classify_sign};
