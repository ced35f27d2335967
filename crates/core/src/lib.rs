#![forbid(unsafe_code)]

pub mod bbox;
pub mod cloud;
pub mod point;

pub use bbox::Aabb;
pub use cloud::PointCloud;
pub use point::{Point, Rgb};
