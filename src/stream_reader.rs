//! Capture reader - load a stream's records for a date range
//!
//! Captures are stored one JSON object per line, one file per day:
//!
//! ```text
//! <source_path>/
//!   orders/2019-03-04.jsonl
//!   orders/2019-03-05.jsonl
//!   trades/2019-03-04.jsonl
//! ```
//!
//! Each line decodes into a [`RawRow`]:
//! `{"qty": 100000000, "price": 50000000000, "side": 1, "metadata": {"timestamp": 1551657600000000000}}`

use crate::error::{PtaError, Result};
use crate::models::{RawRow, Stream};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Source of captured records.
///
/// Implementations return rows in capture order for every day from `start`
/// to `end` inclusive.
pub trait EventStreamReader {
    fn read(
        &self,
        stream: Stream,
        start: NaiveDate,
        end: NaiveDate,
        source_path: &Path,
    ) -> Result<Vec<RawRow>>;
}

/// Reads `<source_path>/<stream>/<YYYY-MM-DD>.jsonl` day files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlStreamReader;

impl JsonlStreamReader {
    /// Path of one day's capture file.
    pub fn day_file(source_path: &Path, stream: Stream, day: NaiveDate) -> PathBuf {
        source_path
            .join(stream.name())
            .join(format!("{}.jsonl", day.format("%Y-%m-%d")))
    }

    fn read_file(path: &Path, rows: &mut Vec<RawRow>) -> Result<usize> {
        let reader = BufReader::new(File::open(path)?);
        let before = rows.len();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let row: RawRow =
                serde_json::from_str(&line).map_err(|e| PtaError::MalformedRecord {
                    path: path.display().to_string(),
                    line: line_num + 1,
                    reason: e.to_string(),
                })?;
            rows.push(row);
        }

        Ok(rows.len() - before)
    }
}

impl EventStreamReader for JsonlStreamReader {
    fn read(
        &self,
        stream: Stream,
        start: NaiveDate,
        end: NaiveDate,
        source_path: &Path,
    ) -> Result<Vec<RawRow>> {
        let mut rows = Vec::new();
        let mut files = 0usize;

        for day in start.iter_days().take_while(|d| *d <= end) {
            let path = Self::day_file(source_path, stream, day);
            if !path.is_file() {
                tracing::debug!(%stream, path = %path.display(), "no capture for day");
                continue;
            }
            let n = Self::read_file(&path, &mut rows)?;
            files += 1;
            tracing::debug!(%stream, path = %path.display(), rows = n, "loaded capture file");
        }

        if rows.is_empty() {
            return Err(PtaError::EmptyStream { stream });
        }

        tracing::info!(%stream, files, rows = rows.len(), %start, %end, "stream loaded");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pta_reader_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_day(root: &Path, stream: Stream, day: NaiveDate, lines: &[&str]) {
        let path = JsonlStreamReader::day_file(root, stream, day);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = File::create(path).unwrap();
        for l in lines {
            writeln!(f, "{}", l).unwrap();
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 3, d).unwrap()
    }

    #[test]
    fn test_reads_inclusive_range_and_skips_missing_days() {
        let root = scratch_dir("range");
        write_day(
            &root,
            Stream::Trades,
            day(4),
            &[r#"{"qty":1,"price":10,"metadata":{"recv_time":1}}"#],
        );
        // day 5 missing
        write_day(
            &root,
            Stream::Trades,
            day(6),
            &[
                r#"{"qty":2,"price":20,"metadata":{"recv_time":2}}"#,
                "",
                r#"{"qty":3,"price":30,"metadata":{"recv_time":3}}"#,
            ],
        );
        write_day(
            &root,
            Stream::Trades,
            day(7),
            &[r#"{"qty":9,"price":90,"metadata":{}}"#],
        );

        let rows = JsonlStreamReader
            .read(Stream::Trades, day(4), day(6), &root)
            .unwrap();
        let qtys: Vec<_> = rows.iter().map(|r| r.qty).collect();
        assert_eq!(qtys, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(rows[0].side, None);
    }

    #[test]
    fn test_missing_numeric_fields_decode_as_none() {
        let root = scratch_dir("partial");
        write_day(
            &root,
            Stream::Orders,
            day(4),
            &[r#"{"side":1,"metadata":{"timestamp":5}}"#],
        );
        let rows = JsonlStreamReader
            .read(Stream::Orders, day(4), day(4), &root)
            .unwrap();
        assert_eq!(rows[0].qty, None);
        assert_eq!(rows[0].price, None);
        assert_eq!(rows[0].side, Some(1));
    }

    #[test]
    fn test_malformed_line_names_file_and_line() {
        let root = scratch_dir("malformed");
        write_day(
            &root,
            Stream::Orders,
            day(4),
            &[r#"{"qty":1,"price":1,"side":1,"metadata":{}}"#, "{not json"],
        );
        let err = JsonlStreamReader
            .read(Stream::Orders, day(4), day(4), &root)
            .unwrap_err();
        match err {
            PtaError::MalformedRecord { path, line, .. } => {
                assert!(path.ends_with("2019-03-04.jsonl"));
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_range_is_an_error() {
        let root = scratch_dir("empty");
        assert!(matches!(
            JsonlStreamReader.read(Stream::Orders, day(4), day(8), &root),
            Err(PtaError::EmptyStream {
                stream: Stream::Orders
            })
        ));
        // end before start
        write_day(&root, Stream::Orders, day(4), &[r#"{"qty":1,"metadata":{}}"#]);
        let backwards = JsonlStreamReader.read(Stream::Orders, day(5), day(4), &root);
        assert!(backwards.is_err());
    }
}
