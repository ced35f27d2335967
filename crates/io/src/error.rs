use std::io;

pub type Result<T> = std::result::Result<T, PcdError>;

#[derive(Debug, thiserror::Error)]
pub enum PcdError {
    #[error("header incomplete: {0}")]
    HeaderIncomplete(String),

    #[error("header malformed: {0}")]
    HeaderMalformed(String),

    #[error("unsupported encoding: DATA {0}")]
    UnsupportedEncoding(String),

    #[error("unsupported field type: field {index} ({name}) is {kind}{size}")]
    UnsupportedFieldType {
        name: String,
        index: usize,
        kind: char,
        size: usize,
    },

    #[error(
        "truncated buffer: record {record} needs {needed} bytes at offset {offset}, buffer has {available}"
    )]
    TruncatedBuffer {
        record: usize,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("malformed record on line {line}: field {field} has non-numeric value {token:?}")]
    MalformedRecord {
        line: usize,
        field: String,
        token: String,
    },

    #[error("no point records could be decoded")]
    EmptyResult,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PcdError {
    /// Short category name, stable for matching in user-facing messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PcdError::HeaderIncomplete(_) => "HeaderIncomplete",
            PcdError::HeaderMalformed(_) => "HeaderMalformed",
            PcdError::UnsupportedEncoding(_) => "UnsupportedEncoding",
            PcdError::UnsupportedFieldType { .. } => "UnsupportedFieldType",
            PcdError::TruncatedBuffer { .. } => "TruncatedBuffer",
            PcdError::MalformedRecord { .. } => "MalformedRecord",
            PcdError::EmptyResult => "EmptyResult",
            PcdError::Io(_) => "Io",
        }
    }
}
