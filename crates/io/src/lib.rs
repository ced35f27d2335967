#![forbid(unsafe_code)]

pub mod error;
pub mod pcd;

pub use error::{PcdError, Result};
pub use pcd::{
    decode_pcd, encode_pcd, read_pcd, write_pcd, write_pcd_binary, Encoding, FieldSchema,
    FieldSpec, FieldType, PcdFrame, PcdHeader,
};
