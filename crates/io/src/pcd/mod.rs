//! PCD (Point Cloud Data) decoding and encoding.

pub mod ascii;
pub mod binary;
pub mod header;
pub mod schema;

use crate::error::{PcdError, Result};
use pcdview_core::{Point, Rgb};
use std::fs;
use std::path::Path;

pub use ascii::decode_ascii;
pub use binary::decode_binary;
pub use header::{parse_header, Encoding, FieldSpec, FieldType, PcdHeader};
pub use schema::{FieldSchema, FieldSlot};

/// Header and raw points from one decode, before any downsampling.
#[derive(Debug, Clone, PartialEq)]
pub struct PcdFrame {
    pub header: PcdHeader,
    pub points: Vec<Point>,
}

/// Decodes a complete PCD buffer.
pub fn decode_pcd(raw: &[u8]) -> Result<PcdFrame> {
    let header = parse_header(raw)?;
    let schema = FieldSchema::resolve(&header)?;

    let points = match header.encoding {
        Encoding::Ascii => decode_ascii(raw, &header, &schema)?,
        Encoding::Binary => decode_binary(raw, &header, &schema)?,
        Encoding::BinaryCompressed => {
            return Err(PcdError::UnsupportedEncoding(header.encoding.to_string()))
        }
    };

    Ok(PcdFrame { header, points })
}

/// Reads and decodes a PCD file.
pub fn read_pcd(path: impl AsRef<Path>) -> Result<PcdFrame> {
    let raw = fs::read(path)?;
    decode_pcd(&raw)
}

/// Serializes points as PCD.
///
/// Writes `x y z`, plus a `U 4` packed `rgb` field when any point has a
/// color (uncolored points then get white).
pub fn encode_pcd(points: &[Point], encoding: Encoding) -> Result<Vec<u8>> {
    let with_color = points.iter().any(|p| p.color.is_some());

    let mut out = String::new();
    out.push_str("# .PCD v0.7 - Point Cloud Data file format\n");
    out.push_str("VERSION 0.7\n");
    if with_color {
        out.push_str("FIELDS x y z rgb\n");
        out.push_str("SIZE 4 4 4 4\n");
        out.push_str("TYPE F F F U\n");
        out.push_str("COUNT 1 1 1 1\n");
    } else {
        out.push_str("FIELDS x y z\n");
        out.push_str("SIZE 4 4 4\n");
        out.push_str("TYPE F F F\n");
        out.push_str("COUNT 1 1 1\n");
    }
    out.push_str(&format!("WIDTH {}\n", points.len()));
    out.push_str("HEIGHT 1\n");
    out.push_str("VIEWPOINT 0 0 0 1 0 0 0\n");
    out.push_str(&format!("POINTS {}\n", points.len()));

    let packed = |p: &Point| p.color.unwrap_or(Rgb::WHITE).to_packed();

    match encoding {
        Encoding::Ascii => {
            out.push_str("DATA ascii\n");
            for p in points {
                if with_color {
                    out.push_str(&format!("{} {} {} {}\n", p.x, p.y, p.z, packed(p)));
                } else {
                    out.push_str(&format!("{} {} {}\n", p.x, p.y, p.z));
                }
            }
            Ok(out.into_bytes())
        }
        Encoding::Binary => {
            out.push_str("DATA binary\n");
            let stride = if with_color { 16 } else { 12 };
            let mut buf = Vec::with_capacity(out.len() + points.len() * stride);
            buf.extend_from_slice(out.as_bytes());
            for p in points {
                buf.extend_from_slice(&p.x.to_le_bytes());
                buf.extend_from_slice(&p.y.to_le_bytes());
                buf.extend_from_slice(&p.z.to_le_bytes());
                if with_color {
                    buf.extend_from_slice(&packed(p).to_le_bytes());
                }
            }
            Ok(buf)
        }
        Encoding::BinaryCompressed => Err(PcdError::UnsupportedEncoding(encoding.to_string())),
    }
}

/// Writes a PCD file in ASCII format.
pub fn write_pcd(path: impl AsRef<Path>, points: &[Point]) -> Result<()> {
    fs::write(path, encode_pcd(points, Encoding::Ascii)?)?;
    Ok(())
}

/// Writes a PCD file in binary format.
pub fn write_pcd_binary(path: impl AsRef<Path>, points: &[Point]) -> Result<()> {
    fs::write(path, encode_pcd(points, Encoding::Binary)?)?;
    Ok(())
}
