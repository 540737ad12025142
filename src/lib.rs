//! Post-Trade Analysis - P&L and position report from captured streams
//!
//! Aligns an order capture against a trade capture with a backward as-of
//! join, replays the result through a cash/position/fee accumulator, and
//! writes the artifact a report renderer draws from.
//!
//! # Modules
//!
//! - [`core_types`] - Core type aliases (Nanos, RowIndex, Amount)
//! - [`models`] - Raw rows, typed order/trade records, aligned rows
//! - [`money`] - Fixed-point scaling and display formatting
//! - [`fee`] - Taker fee calculation
//! - [`timestamp`] - Metadata timestamp extraction
//! - [`align`] - Backward as-of join
//! - [`accumulator`] - Sequential P&L replay and summary
//! - [`augment`] - History columns onto the aligned dataset
//! - [`stream_reader`] - JSON-lines capture reader
//! - [`report`] - Report artifact files
//! - [`pipeline`] - End-to-end batch run

// Core types - must be first!
pub mod core_types;
pub mod error;

// Accounting components
pub mod accumulator;
pub mod align;
pub mod augment;
pub mod fee;
pub mod models;
pub mod money;
pub mod timestamp;

// I/O and wiring
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod stream_reader;

// Convenient re-exports at crate root
pub use accumulator::{
    AccountingParams, AccumulatorState, History, PnlAccumulator, Replay, RowOutcome, Summary,
    SummaryPolicy, UnmarkedPolicy,
};
pub use align::{align, asof_backward};
pub use augment::{AugmentedRow, augment};
pub use core_types::{Amount, Nanos, RowIndex};
pub use error::PtaError;
pub use models::{AlignedRow, OrderRecord, RawRow, Side, Stream, TradeRecord};
pub use pipeline::{ReportRequest, build_report, run};
pub use report::ReportArtifact;
pub use stream_reader::{EventStreamReader, JsonlStreamReader};
pub use timestamp::extract_times;
