use super::header::{FieldType, PcdHeader};
use super::schema::{FieldSchema, FieldSlot};
use crate::error::{PcdError, Result};
use log::{debug, warn};
use pcdview_core::{Point, Rgb};

/// Decodes `DATA ascii` records following the header.
///
/// Tokens are taken by schema column, never by position among the values
/// that happened to parse. Lines too short to reach the coordinate columns
/// are skipped; a non-numeric coordinate token is an error. Decoding stops
/// after `header.points` records or at the end of the payload.
pub fn decode_ascii(raw: &[u8], header: &PcdHeader, schema: &FieldSchema) -> Result<Vec<Point>> {
    let payload = &raw[header.data_offset..];
    let text = String::from_utf8_lossy(payload);
    let first_line = raw[..header.data_offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1;

    let needed = schema.x.column.max(schema.y.column).max(schema.z.column) + 1;
    let mut points = Vec::with_capacity(header.points.min(payload.len() / 6 + 1));
    let mut skipped = 0usize;

    for (i, line) in text.lines().enumerate() {
        if points.len() == header.points {
            break;
        }

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no = first_line + i;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < needed {
            debug!(
                "line {}: {} tokens, coordinates need {}",
                line_no,
                tokens.len(),
                needed
            );
            skipped += 1;
            continue;
        }

        let x = coordinate(&tokens, &schema.x, line_no)?;
        let y = coordinate(&tokens, &schema.y, line_no)?;
        let z = coordinate(&tokens, &schema.z, line_no)?;

        let color = match &schema.rgb {
            Some(slot) => tokens
                .get(slot.column)
                .and_then(|token| packed_rgb(token, slot))
                .map(Rgb::from_packed),
            None => None,
        };

        points.push(Point { x, y, z, color });
    }

    if skipped > 0 {
        warn!("skipped {} ASCII lines too short to hold x/y/z", skipped);
    }

    if points.is_empty() {
        return Err(PcdError::EmptyResult);
    }

    if points.len() < header.points {
        warn!(
            "payload ended after {} of {} declared points",
            points.len(),
            header.points
        );
    }

    Ok(points)
}

fn coordinate(tokens: &[&str], slot: &FieldSlot, line: usize) -> Result<f32> {
    let token = tokens[slot.column];
    token
        .parse::<f32>()
        .map_err(|_| PcdError::MalformedRecord {
            line,
            field: slot.name.clone(),
            token: token.to_string(),
        })
}

/// Converts an rgb token into a `0x00RRGGBB` integer.
///
/// Integer-valued tokens are taken numerically. A fractional token in an
/// `F 4` field is a float whose bit pattern holds the packed color.
fn packed_rgb(token: &str, slot: &FieldSlot) -> Option<u32> {
    let value = token.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }

    if slot.kind == FieldType::Float && slot.size == 4 && value.fract() != 0.0 {
        return Some((value as f32).to_bits());
    }

    Some(value as i64 as u32)
}
