use super::header::{Encoding, FieldType, PcdHeader};
use super::schema::{FieldSchema, FieldSlot};
use crate::error::{PcdError, Result};
use byteorder::{ByteOrder, LittleEndian};
use pcdview_core::{Point, Rgb};

/// Little-endian scalar layouts the binary decoder can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scalar {
    F32,
    F64,
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
}

impl Scalar {
    fn for_slot(slot: &FieldSlot) -> Result<Self> {
        let scalar = match (slot.kind, slot.size) {
            (FieldType::Float, 4) => Scalar::F32,
            (FieldType::Float, 8) => Scalar::F64,
            (FieldType::Unsigned, 1) => Scalar::U8,
            (FieldType::Unsigned, 2) => Scalar::U16,
            (FieldType::Unsigned, 4) => Scalar::U32,
            (FieldType::Signed, 1) => Scalar::I8,
            (FieldType::Signed, 2) => Scalar::I16,
            (FieldType::Signed, 4) => Scalar::I32,
            _ => return Err(unsupported(slot)),
        };
        Ok(scalar)
    }

    fn read(self, bytes: &[u8]) -> f64 {
        match self {
            Scalar::F32 => LittleEndian::read_f32(bytes) as f64,
            Scalar::F64 => LittleEndian::read_f64(bytes),
            Scalar::U8 => bytes[0] as f64,
            Scalar::U16 => LittleEndian::read_u16(bytes) as f64,
            Scalar::U32 => LittleEndian::read_u32(bytes) as f64,
            Scalar::I8 => bytes[0] as i8 as f64,
            Scalar::I16 => LittleEndian::read_i16(bytes) as f64,
            Scalar::I32 => LittleEndian::read_i32(bytes) as f64,
        }
    }
}

fn unsupported(slot: &FieldSlot) -> PcdError {
    PcdError::UnsupportedFieldType {
        name: slot.name.clone(),
        index: slot.index,
        kind: slot.kind.letter(),
        size: slot.size,
    }
}

/// Reads an `rgb` slot as an unsigned integer of its own width, whatever
/// its declared type. An `F 4` rgb field is therefore taken by bit pattern.
fn read_packed(slot: &FieldSlot, bytes: &[u8]) -> u32 {
    match slot.size {
        1 => bytes[0] as u32,
        2 => LittleEndian::read_u16(bytes) as u32,
        _ => LittleEndian::read_u32(bytes),
    }
}

/// Decodes `DATA binary` records starting at the parser-reported offset.
///
/// Every field that is read is validated before the first record, and the
/// whole payload is bounds-checked up front, so no partial result is ever
/// produced.
pub fn decode_binary(raw: &[u8], header: &PcdHeader, schema: &FieldSchema) -> Result<Vec<Point>> {
    if header.encoding == Encoding::BinaryCompressed {
        return Err(PcdError::UnsupportedEncoding(header.encoding.to_string()));
    }

    let sx = Scalar::for_slot(&schema.x)?;
    let sy = Scalar::for_slot(&schema.y)?;
    let sz = Scalar::for_slot(&schema.z)?;
    if let Some(slot) = &schema.rgb {
        if !matches!(slot.size, 1 | 2 | 4) {
            return Err(unsupported(slot));
        }
    }

    let start = header.data_offset;
    let stride = schema.stride;
    let fits = header
        .points
        .checked_mul(stride)
        .and_then(|len| len.checked_add(start))
        .is_some_and(|end| end <= raw.len());
    if !fits {
        let record = raw.len().saturating_sub(start) / stride;
        return Err(PcdError::TruncatedBuffer {
            record,
            offset: start + record * stride,
            needed: stride,
            available: raw.len(),
        });
    }

    let payload = &raw[start..start + header.points * stride];
    let mut points = Vec::with_capacity(header.points);

    for record in payload.chunks_exact(stride) {
        let field = |slot: &FieldSlot| &record[slot.offset..slot.offset + slot.size];

        let x = sx.read(field(&schema.x)) as f32;
        let y = sy.read(field(&schema.y)) as f32;
        let z = sz.read(field(&schema.z)) as f32;
        let color = schema
            .rgb
            .as_ref()
            .map(|slot| Rgb::from_packed(read_packed(slot, field(slot))));

        points.push(Point { x, y, z, color });
    }

    Ok(points)
}
