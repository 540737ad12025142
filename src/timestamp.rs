//! Timestamp extraction from record metadata
//!
//! Produces a time vector parallel to the input records. The input order is
//! never changed here.

use crate::core_types::Nanos;
use crate::error::{PtaError, Result};
use crate::models::{Metadata, RawRow, Stream};

/// Anything that carries a capture metadata object.
pub trait HasMetadata {
    fn metadata(&self) -> &Metadata;
}

impl HasMetadata for RawRow {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Pull `field` out of every record's metadata.
///
/// Accepts non-negative JSON integers and strings of decimal digits.
/// Fails on the first record that lacks the field or holds anything else.
pub fn extract_times<R: HasMetadata>(
    stream: Stream,
    records: &[R],
    field: &str,
) -> Result<Vec<Nanos>> {
    records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            let value = record.metadata().get(field).ok_or_else(|| {
                PtaError::MissingMetadataField {
                    stream,
                    row,
                    field: field.to_string(),
                }
            })?;
            parse_nanos(value).ok_or_else(|| PtaError::InvalidTimestamp {
                stream,
                row,
                field: field.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

fn parse_nanos(value: &serde_json::Value) -> Option<Nanos> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
