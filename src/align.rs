//! Backward as-of join of the order stream against the trade stream
//!
//! For every order, find the trade with the greatest `recv_time` that is
//! still `<=` the order's `recv_time`. Both sides must already be sorted
//! ascending, so a single forward pass over each suffices:
//!
//! ```text
//! trades:  t0(100)  t1(100)  t2(180)
//! orders:  o0(50)   o1(100)  o2(150)  o3(200)
//! match:   -        t1       t1       t2
//! ```
//!
//! Ties on time resolve to the highest trade index.

use crate::core_types::Nanos;
use crate::error::{PtaError, Result};
use crate::models::{AlignedRow, OrderRecord, Stream, TradeRecord};

/// Fail unless `times` is non-decreasing.
pub fn ensure_sorted(stream: Stream, times: &[Nanos]) -> Result<()> {
    match times.windows(2).position(|w| w[0] > w[1]) {
        Some(i) => Err(PtaError::UnsortedStream {
            stream,
            row: i + 1,
            prev: times[i],
            next: times[i + 1],
        }),
        None => Ok(()),
    }
}

/// Two-pointer backward as-of match.
///
/// Returns, for each primary time, the index of the matching secondary
/// element or `None` when every secondary time is later. O(|P| + |S|).
pub fn asof_backward(
    primary_times: &[Nanos],
    secondary_times: &[Nanos],
) -> Result<Vec<Option<usize>>> {
    ensure_sorted(Stream::Orders, primary_times)?;
    ensure_sorted(Stream::Trades, secondary_times)?;

    let mut matches = Vec::with_capacity(primary_times.len());
    // Count of secondary elements with time <= current primary time.
    let mut consumed = 0usize;

    for &p in primary_times {
        while consumed < secondary_times.len() && secondary_times[consumed] <= p {
            consumed += 1;
        }
        matches.push(consumed.checked_sub(1));
    }

    Ok(matches)
}

/// Align typed orders against typed trades.
///
/// One output row per order, in order. The trade side is cloned from the
/// matched trade or left absent.
pub fn align(orders: &[OrderRecord], trades: &[TradeRecord]) -> Result<Vec<AlignedRow>> {
    let order_times: Vec<Nanos> = orders.iter().map(|o| o.recv_time).collect();
    let trade_times: Vec<Nanos> = trades.iter().map(|t| t.recv_time).collect();

    let matches = asof_backward(&order_times, &trade_times)?;

    Ok(orders
        .iter()
        .zip(matches)
        .map(|(order, m)| AlignedRow {
            order: order.clone(),
            trade: m.map(|i| trades[i].clone()),
        })
        .collect())
}
