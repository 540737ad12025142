//! Error taxonomy for the post-trade pipeline
//!
//! Every failure is fatal: there is no partial report and no retry.
//! Variants fall into three groups:
//! - input malformation (bad or missing data in a capture)
//! - contract violation (an internal logic defect)
//! - I/O while reading captures or writing the artifact

use crate::core_types::RowIndex;
use crate::models::Stream;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PtaError {
    // ---- input malformation ----
    #[error("{stream} row {row}: metadata has no field `{field}`")]
    MissingMetadataField {
        stream: Stream,
        row: RowIndex,
        field: String,
    },

    #[error("{stream} row {row}: metadata field `{field}` is not a nanosecond timestamp: {value}")]
    InvalidTimestamp {
        stream: Stream,
        row: RowIndex,
        field: String,
        value: String,
    },

    #[error("{stream} row {row}: missing `{field}`")]
    MissingField {
        stream: Stream,
        row: RowIndex,
        field: &'static str,
    },

    #[error("{stream} stream is empty")]
    EmptyStream { stream: Stream },

    #[error("trades row {row}: unrecognized aggressor_indicator encoding: {value}")]
    UnrecognizedAggressor { row: RowIndex, value: String },

    #[error("{stream} stream is not sorted by recv_time at row {row} ({prev} > {next})")]
    UnsortedStream {
        stream: Stream,
        row: RowIndex,
        prev: u64,
        next: u64,
    },

    #[error("orders row {row}: no trade at or before this order to mark holdings")]
    UnmarkedRow { row: RowIndex },

    #[error("{path}:{line}: malformed record: {reason}")]
    MalformedRecord {
        path: String,
        line: usize,
        reason: String,
    },

    // ---- contract violation ----
    #[error("history column `{column}` has {actual} entries, dataset has {expected} rows")]
    HistoryLengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PtaError {
    /// True for errors that indicate a logic defect rather than bad input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, PtaError::HistoryLengthMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, PtaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_classification() {
        let mismatch = PtaError::HistoryLengthMismatch {
            column: "fee",
            expected: 3,
            actual: 2,
        };
        assert!(mismatch.is_contract_violation());

        let empty = PtaError::EmptyStream {
            stream: Stream::Orders,
        };
        assert!(!empty.is_contract_violation());
    }

    #[test]
    fn test_error_messages_name_the_row() {
        let err = PtaError::MissingMetadataField {
            stream: Stream::Trades,
            row: 7,
            field: "recv_time".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "trades row 7: metadata has no field `recv_time`"
        );
    }
}
