//! Core types used throughout the system
//!
//! These are fundamental type aliases used by all modules.
//! They provide semantic meaning and enable future type evolution.

/// Capture timestamp in nanoseconds since the Unix epoch.
///
/// # Usage:
/// - Join key for the as-of alignment
/// - Index of every plotted series in the report
pub type Nanos = u64;

/// Zero-based position of a record within its stream.
///
/// Carried in error variants so a failed run points at the offending row.
pub type RowIndex = usize;

/// Decimal type used for all scaled money and quantity arithmetic.
pub type Amount = rust_decimal::Decimal;
