#![forbid(unsafe_code)]

pub mod stride_downsample;

pub use stride_downsample::{stride_downsample, stride_for, DEFAULT_MAX_POINTS};
