//! PCD text preamble.
//!
//! The header is a sequence of `KEY value...` lines ending at the first
//! `DATA <mode>` line. Everything after that line's newline is payload.

use crate::error::{PcdError, Result};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Numeric interpretation of a field, from the `TYPE` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Float,
    Unsigned,
    Signed,
}

impl FieldType {
    pub fn letter(self) -> char {
        match self {
            FieldType::Float => 'F',
            FieldType::Unsigned => 'U',
            FieldType::Signed => 'I',
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "F" | "f" => Some(FieldType::Float),
            "U" | "u" => Some(FieldType::Unsigned),
            "I" | "i" => Some(FieldType::Signed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    /// Bytes per element.
    pub size: usize,
    pub kind: FieldType,
    /// Elements per record.
    pub count: usize,
}

/// Payload encoding declared by the `DATA` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Binary,
    BinaryCompressed,
}

impl Encoding {
    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ascii" => Some(Encoding::Ascii),
            "binary" => Some(Encoding::Binary),
            "binary_compressed" => Some(Encoding::BinaryCompressed),
            _ => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Ascii => "ascii",
            Encoding::Binary => "binary",
            Encoding::BinaryCompressed => "binary_compressed",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PcdHeader {
    pub version: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub width: usize,
    pub height: usize,
    /// `tx ty tz qw qx qy qz`
    pub viewpoint: [f32; 7],
    pub points: usize,
    pub encoding: Encoding,
    /// Byte offset of the first payload byte.
    pub data_offset: usize,
}

pub const DEFAULT_VIEWPOINT: [f32; 7] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];

#[derive(Default)]
struct HeaderLines {
    version: Option<String>,
    names: Option<Vec<String>>,
    sizes: Option<Vec<usize>>,
    types: Option<Vec<FieldType>>,
    counts: Option<Vec<usize>>,
    width: Option<usize>,
    height: Option<usize>,
    viewpoint: Option<[f32; 7]>,
    points: Option<usize>,
}

const KEYWORDS: [&str; 10] = [
    "VERSION", "FIELDS", "SIZE", "TYPE", "COUNT", "WIDTH", "HEIGHT", "VIEWPOINT", "POINTS", "DATA",
];

/// Parses the header at the start of `raw`.
///
/// Stops at the first `DATA` line and records the offset just past it.
pub fn parse_header(raw: &[u8]) -> Result<PcdHeader> {
    let mut lines = HeaderLines::default();
    let mut pos = 0;
    let mut line_no = 0;

    while pos < raw.len() {
        let end = raw[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(raw.len(), |i| pos + i);
        let next = (end + 1).min(raw.len());
        line_no += 1;

        let line = raw[pos..end].trim_ascii();
        pos = next;
        if line.is_empty() || line[0] == b'#' {
            continue;
        }

        let key_len = line
            .iter()
            .position(|b| b.is_ascii_whitespace())
            .unwrap_or(line.len());
        let key = String::from_utf8_lossy(&line[..key_len]).to_ascii_uppercase();

        let Ok(text) = std::str::from_utf8(line) else {
            if KEYWORDS.contains(&key.as_str()) {
                return Err(PcdError::HeaderMalformed(format!(
                    "{} line {} is not valid UTF-8",
                    key, line_no
                )));
            }
            debug!("skipping undecodable header line {}", line_no);
            continue;
        };
        let values: Vec<&str> = text.split_ascii_whitespace().skip(1).collect();

        match key.as_str() {
            "VERSION" => lines.version = values.first().map(|v| v.to_string()),
            "FIELDS" => lines.names = Some(values.iter().map(|v| v.to_string()).collect()),
            "SIZE" => lines.sizes = Some(parse_positive_list("SIZE", &values)?),
            "TYPE" => lines.types = Some(parse_types(&values)?),
            "COUNT" => lines.counts = Some(parse_positive_list("COUNT", &values)?),
            "WIDTH" => lines.width = Some(parse_single("WIDTH", &values)?),
            "HEIGHT" => lines.height = Some(parse_single("HEIGHT", &values)?),
            "POINTS" => lines.points = Some(parse_single("POINTS", &values)?),
            "VIEWPOINT" => lines.viewpoint = Some(parse_viewpoint(&values)?),
            "DATA" => {
                let mode = values.first().copied().unwrap_or("");
                let encoding = Encoding::from_token(mode)
                    .ok_or_else(|| PcdError::UnsupportedEncoding(mode.to_string()))?;
                return lines.finish(encoding, next);
            }
            _ => debug!("ignoring unknown PCD header key {:?}", key),
        }
    }

    Err(PcdError::HeaderIncomplete("missing DATA line".to_string()))
}

impl HeaderLines {
    fn finish(self, encoding: Encoding, data_offset: usize) -> Result<PcdHeader> {
        let points = match self.points {
            None => return Err(PcdError::HeaderIncomplete("missing POINTS".to_string())),
            Some(0) => return Err(PcdError::HeaderIncomplete("POINTS is 0".to_string())),
            Some(n) => n,
        };

        let names = self.names.unwrap_or_default();
        let n = names.len();
        let sizes = self.sizes.unwrap_or_else(|| vec![4; n]);
        let types = self.types.unwrap_or_else(|| vec![FieldType::Float; n]);
        let counts = self.counts.unwrap_or_else(|| vec![1; n]);

        if sizes.len() != n || types.len() != n || counts.len() != n {
            return Err(PcdError::HeaderMalformed(format!(
                "FIELDS has {} entries but SIZE has {}, TYPE has {}, COUNT has {}",
                n,
                sizes.len(),
                types.len(),
                counts.len()
            )));
        }

        let fields: Vec<FieldSpec> = names
            .into_iter()
            .zip(sizes)
            .zip(types)
            .zip(counts)
            .map(|(((name, size), kind), count)| FieldSpec {
                name,
                size,
                kind,
                count,
            })
            .collect();

        let header = PcdHeader {
            version: self.version,
            fields,
            width: self.width.unwrap_or(points),
            height: self.height.unwrap_or(1),
            viewpoint: self.viewpoint.unwrap_or(DEFAULT_VIEWPOINT),
            points,
            encoding,
            data_offset,
        };

        debug!(
            "PCD header: {} fields, {} points, DATA {}, payload at byte {}",
            header.fields.len(),
            header.points,
            header.encoding,
            header.data_offset
        );

        Ok(header)
    }
}

fn parse_number<T: FromStr>(key: &str, token: &str) -> Result<T> {
    token.parse::<T>().map_err(|_| {
        PcdError::HeaderMalformed(format!("{} value {:?} is not a valid number", key, token))
    })
}

fn parse_single(key: &str, values: &[&str]) -> Result<usize> {
    let token = values
        .first()
        .ok_or_else(|| PcdError::HeaderMalformed(format!("{} has no value", key)))?;
    parse_number(key, token)
}

fn parse_positive_list(key: &str, values: &[&str]) -> Result<Vec<usize>> {
    values
        .iter()
        .map(|token| match parse_number::<usize>(key, token)? {
            0 => Err(PcdError::HeaderMalformed(format!("{} entries must be positive", key))),
            v => Ok(v),
        })
        .collect()
}

fn parse_types(values: &[&str]) -> Result<Vec<FieldType>> {
    values
        .iter()
        .map(|token| {
            FieldType::from_token(token).ok_or_else(|| {
                PcdError::HeaderMalformed(format!("unknown TYPE {:?} (expected F, U or I)", token))
            })
        })
        .collect()
}

fn parse_viewpoint(values: &[&str]) -> Result<[f32; 7]> {
    if values.len() != 7 {
        return Err(PcdError::HeaderMalformed(format!(
            "VIEWPOINT needs 7 values, got {}",
            values.len()
        )));
    }

    let mut viewpoint = [0.0f32; 7];
    for (slot, token) in viewpoint.iter_mut().zip(values) {
        *slot = parse_number("VIEWPOINT", token)?;
    }
    Ok(viewpoint)
}
