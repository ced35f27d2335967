use super::header::{FieldType, PcdHeader};
use crate::error::{PcdError, Result};

/// Location of one field inside a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSlot {
    pub name: String,
    /// Position in the FIELDS list.
    pub index: usize,
    /// Byte offset inside a binary record.
    pub offset: usize,
    /// Token position inside an ASCII line.
    pub column: usize,
    pub kind: FieldType,
    pub size: usize,
}

/// Field layout resolved once per decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub x: FieldSlot,
    pub y: FieldSlot,
    pub z: FieldSlot,
    pub rgb: Option<FieldSlot>,
    /// Bytes per binary record.
    pub stride: usize,
    /// Tokens per ASCII line.
    pub columns: usize,
}

impl FieldSchema {
    pub fn resolve(header: &PcdHeader) -> Result<Self> {
        let mut slots = Vec::with_capacity(header.fields.len());
        let mut offset = 0usize;
        let mut column = 0usize;

        for (index, field) in header.fields.iter().enumerate() {
            slots.push(FieldSlot {
                name: field.name.clone(),
                index,
                offset,
                column,
                kind: field.kind,
                size: field.size,
            });

            let width = field
                .size
                .checked_mul(field.count)
                .and_then(|w| offset.checked_add(w))
                .ok_or_else(|| {
                    PcdError::HeaderMalformed(format!("record layout overflows at field {}", index))
                })?;
            offset = width;
            column += field.count;
        }

        let find = |names: &[&str]| {
            slots
                .iter()
                .find(|slot| names.iter().any(|n| slot.name.eq_ignore_ascii_case(n)))
                .cloned()
        };
        let required = |name: &str| {
            find(&[name]).ok_or_else(|| {
                PcdError::HeaderMalformed(format!("required field {:?} is missing from FIELDS", name))
            })
        };

        Ok(Self {
            x: required("x")?,
            y: required("y")?,
            z: required("z")?,
            rgb: find(&["rgb", "rgba"]),
            stride: offset,
            columns: column,
        })
    }
}
