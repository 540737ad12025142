//! Pipeline - one-shot batch run from captures to report artifact
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │  Reader  │──▶│ Extract  │──▶│  Align   │──▶│  Replay  │──▶│ Augment  │
//! │ (JSONL)  │   │ (times)  │   │ (as-of)  │   │  (P&L)   │   │ (report) │
//! └──────────┘   └──────────┘   └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! Every stage runs to completion before the next starts. Any error aborts
//! the run; nothing is written on failure.

use crate::accumulator::PnlAccumulator;
use crate::align::align;
use crate::augment::augment;
use crate::config::AccountingConfig;
use crate::core_types::{Nanos, RowIndex};
use crate::error::{PtaError, Result};
use crate::models::{
    ORDER_TIME_FIELD, OrderRecord, RawRow, Stream, TRADE_TIME_FIELD, TradeRecord,
};
use crate::report::ReportArtifact;
use crate::stream_reader::EventStreamReader;
use crate::timestamp::extract_times;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Instant;

/// Capture window and locations for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub orders_path: PathBuf,
    pub trades_path: PathBuf,
}

fn typed_orders(raw: &[RawRow], times: &[Nanos]) -> Result<Vec<OrderRecord>> {
    raw.iter()
        .zip(times)
        .enumerate()
        .map(|(row, (r, &t))| OrderRecord::from_raw(row, r, t))
        .collect()
}

fn typed_trades(raw: &[RawRow], times: &[Nanos]) -> Result<Vec<TradeRecord>> {
    raw.iter()
        .zip(times)
        .enumerate()
        .map(|(row, (r, &t))| TradeRecord::from_raw(row, r, t))
        .collect()
}

/// Compute the report from already decoded rows.
pub fn build_report(
    raw_orders: &[RawRow],
    raw_trades: &[RawRow],
    config: &AccountingConfig,
) -> Result<ReportArtifact> {
    let start = Instant::now();

    let order_times = extract_times(Stream::Orders, raw_orders, ORDER_TIME_FIELD)?;
    let trade_times = extract_times(Stream::Trades, raw_trades, TRADE_TIME_FIELD)?;

    let mut orders: Vec<(RowIndex, OrderRecord)> = typed_orders(raw_orders, &order_times)?
        .into_iter()
        .enumerate()
        .collect();
    let mut trades = typed_trades(raw_trades, &trade_times)?;

    // Stable, so equal timestamps keep capture order.
    if config.sort_inputs {
        orders.sort_by_key(|(_, o)| o.recv_time);
        trades.sort_by_key(|t| t.recv_time);
    }
    // reader_rows[i] is the reader position of the i-th aligned order
    let (reader_rows, orders): (Vec<RowIndex>, Vec<OrderRecord>) = orders.into_iter().unzip();
    let prepare_us = start.elapsed().as_micros();

    let rows = align(&orders, &trades)?;
    let unmarked = rows.iter().filter(|r| r.trade.is_none()).count();
    let align_us = start.elapsed().as_micros() - prepare_us;

    let replay = PnlAccumulator::new(config.params())
        .replay(&rows)
        .map_err(|e| match e {
            PtaError::UnmarkedRow { row } => PtaError::UnmarkedRow {
                row: reader_rows.get(row).copied().unwrap_or(row),
            },
            other => other,
        })?;
    let summary = replay.summary(config.summary_policy);

    let trade_prices = trades.iter().map(|t| (t.recv_time, t.price)).collect();
    let rows = augment(rows, replay.history)?;

    tracing::info!(
        orders = orders.len(),
        trades = trades.len(),
        unmarked,
        prepare_us,
        align_us,
        total_us = start.elapsed().as_micros(),
        "accounting complete"
    );
    if unmarked > 0 {
        tracing::warn!(
            unmarked,
            policy = ?config.unmarked_policy,
            "orders precede every trade and were marked by fallback policy"
        );
    }

    Ok(ReportArtifact {
        summary,
        rows,
        trade_prices,
    })
}

/// Read both streams for the requested window and build the report.
pub fn run<R: EventStreamReader>(
    request: &ReportRequest,
    reader: &R,
    config: &AccountingConfig,
) -> Result<ReportArtifact> {
    tracing::info!(
        start = %request.start,
        end = %request.end,
        orders = %request.orders_path.display(),
        trades = %request.trades_path.display(),
        "reading captures"
    );

    let raw_orders = reader.read(
        Stream::Orders,
        request.start,
        request.end,
        &request.orders_path,
    )?;
    let raw_trades = reader.read(
        Stream::Trades,
        request.start,
        request.end,
        &request.trades_path,
    )?;

    build_report(&raw_orders, &raw_trades, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{SummaryPolicy, UnmarkedPolicy};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRow {
        serde_json::from_value(value).unwrap()
    }

    fn order(side: i64, qty: i64, price: i64, t: u64) -> RawRow {
        raw(json!({"side": side, "qty": qty, "price": price, "metadata": {"timestamp": t}}))
    }

    fn trade(qty: i64, price: i64, t: u64, aggr: &str) -> RawRow {
        raw(json!({
            "qty": qty,
            "price": price,
            "metadata": {"recv_time": t, "aggressor_indicator": aggr}
        }))
    }

    const BTC: i64 = 100_000_000;
    const USD: i64 = 1_000_000;

    #[test]
    fn test_build_report_two_order_scenario() {
        let orders = vec![order(1, BTC, 49_000 * USD, 50), order(2, BTC, 51_000 * USD, 150)];
        let trades = vec![trade(BTC, 50_000 * USD, 100, "True")];

        let artifact = build_report(&orders, &trades, &AccountingConfig::default()).unwrap();
        let s = artifact.summary;
        assert_eq!(s.contracts, Decimal::from(2));
        assert_eq!(s.btc_holdings, Decimal::ZERO);
        assert_eq!(s.total_fees, Decimal::from(153));
        assert_eq!(s.gross_pnl, Decimal::from(2000));
        assert_eq!(s.net_pnl, Decimal::from(1847));

        assert_eq!(artifact.rows.len(), 2);
        assert!(artifact.rows[0].row.trade.is_none());
        assert_eq!(artifact.trade_prices, vec![(100, Decimal::from(50_000))]);
    }

    #[test]
    fn test_row_count_follows_orders_not_trades() {
        let orders = vec![order(1, BTC, 100 * USD, 10)];
        let trades: Vec<_> = (0..5).map(|i| trade(BTC, 100 * USD, i, "False")).collect();
        let artifact = build_report(&orders, &trades, &AccountingConfig::default()).unwrap();
        assert_eq!(artifact.rows.len(), 1);
        assert_eq!(artifact.trade_prices.len(), 5);
    }

    #[test]
    fn test_empty_trade_stream_leaves_rows_unmarked() {
        let orders = vec![order(1, BTC, 100 * USD, 10), order(2, BTC, 110 * USD, 20)];
        let artifact = build_report(&orders, &[], &AccountingConfig::default()).unwrap();
        assert!(artifact.rows.iter().all(|r| r.row.trade.is_none()));
        assert_eq!(artifact.summary.total_fees, Decimal::ZERO);
        assert_eq!(artifact.summary.gross_pnl, Decimal::from(10));
    }

    #[test]
    fn test_sorts_inputs_by_extracted_time() {
        let orders = vec![order(2, BTC, 110 * USD, 20), order(1, BTC, 100 * USD, 10)];
        let trades = vec![trade(BTC, 105 * USD, 15, "false"), trade(BTC, 90 * USD, 5, "false")];
        let artifact = build_report(&orders, &trades, &AccountingConfig::default()).unwrap();
        let times: Vec<_> = artifact.rows.iter().map(|r| r.row.order.recv_time).collect();
        assert_eq!(times, vec![10, 20]);
        assert_eq!(artifact.trade_prices[0].0, 5);
    }

    #[test]
    fn test_unsorted_input_rejected_when_sorting_disabled() {
        let orders = vec![order(2, BTC, 110 * USD, 20), order(1, BTC, 100 * USD, 10)];
        let config = AccountingConfig {
            sort_inputs: false,
            ..Default::default()
        };
        assert!(matches!(
            build_report(&orders, &[], &config),
            Err(PtaError::UnsortedStream {
                stream: Stream::Orders,
                ..
            })
        ));
    }

    #[test]
    fn test_unmarked_row_reported_in_reader_order() {
        // Reader row 1 sorts first and precedes the only trade
        let orders = vec![order(1, BTC, 110 * USD, 200), order(1, BTC, 100 * USD, 50)];
        let trades = vec![trade(BTC, 105 * USD, 100, "false")];
        let config = AccountingConfig {
            unmarked_policy: UnmarkedPolicy::Reject,
            ..Default::default()
        };
        assert!(matches!(
            build_report(&orders, &trades, &config),
            Err(PtaError::UnmarkedRow { row: 1 })
        ));
    }

    #[test]
    fn test_cumulative_policy_flows_through() {
        let orders = vec![order(1, BTC, 49_000 * USD, 150), order(2, BTC, 51_000 * USD, 160)];
        let trades = vec![trade(BTC, 50_000 * USD, 100, "True")];
        let config = AccountingConfig {
            summary_policy: SummaryPolicy::Cumulative,
            ..Default::default()
        };
        let artifact = build_report(&orders, &trades, &config).unwrap();
        assert_eq!(artifact.summary.total_fees, Decimal::from(300));
        assert_eq!(artifact.summary.net_pnl, Decimal::from(1700));
    }

    #[test]
    fn test_input_errors_are_fatal() {
        let good = vec![order(1, BTC, USD, 1)];

        let no_time = vec![raw(json!({"side": 1, "qty": 1, "price": 1, "metadata": {}}))];
        assert!(matches!(
            build_report(&no_time, &[], &AccountingConfig::default()),
            Err(PtaError::MissingMetadataField {
                stream: Stream::Orders,
                ..
            })
        ));

        let bad_flag = vec![trade(1, 1, 0, "maybe")];
        assert!(matches!(
            build_report(&good, &bad_flag, &AccountingConfig::default()),
            Err(PtaError::UnrecognizedAggressor { row: 0, .. })
        ));

        let no_price = vec![raw(json!({"side": 1, "qty": 1, "metadata": {"timestamp": 1}}))];
        assert!(matches!(
            build_report(&no_price, &[], &AccountingConfig::default()),
            Err(PtaError::MissingField { field: "price", .. })
        ));

        assert!(matches!(
            build_report(&[], &[], &AccountingConfig::default()),
            Err(PtaError::EmptyStream { .. })
        ));
    }
}
