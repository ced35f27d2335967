//! Decode PCD point-cloud files into renderer-ready point sets.
//!
//! ```no_run
//! let raw = std::fs::read("scan.pcd").unwrap();
//! let cloud = pcdview::decode(&raw).unwrap();
//! println!("{} points, bounds {:?}", cloud.len(), cloud.bounds());
//! ```
#![forbid(unsafe_code)]

pub mod config;
pub mod loader;

pub use config::{ConfigError, FallbackPolicy, LoadOptions};
pub use loader::{decode, spawn_load, Loaded, Loader};
pub use pcdview_core::{Aabb, Point, PointCloud, Rgb};
pub use pcdview_io::{decode_pcd, encode_pcd, Encoding, PcdError, PcdFrame, PcdHeader};
