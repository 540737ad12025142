//! Column augmentation - attach replay history to the aligned dataset
//!
//! Every history column must have exactly one entry per aligned row. A
//! mismatch means the replay and the dataset diverged, which is a logic
//! defect: nothing is truncated or padded.

use crate::accumulator::History;
use crate::core_types::Amount;
use crate::error::{PtaError, Result};
use crate::models::AlignedRow;

/// An aligned row with its replay results.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedRow {
    pub row: AlignedRow,
    pub holdings: Amount,
    pub fee: Amount,
    pub gross_pnl: Amount,
    pub net_pnl: Amount,
}

fn check_len(column: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(PtaError::HistoryLengthMismatch {
            column,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Zip `rows` with the four history columns by index.
pub fn augment(rows: Vec<AlignedRow>, history: History) -> Result<Vec<AugmentedRow>> {
    let n = rows.len();
    check_len("holdings", n, history.holdings.len())?;
    check_len("fee", n, history.fee.len())?;
    check_len("gross_pnl", n, history.gross_pnl.len())?;
    check_len("net_pnl", n, history.net_pnl.len())?;

    let History {
        holdings,
        fee,
        gross_pnl,
        net_pnl,
    } = history;

    Ok(rows
        .into_iter()
        .zip(holdings)
        .zip(fee)
        .zip(gross_pnl)
        .zip(net_pnl)
        .map(|((((row, holdings), fee), gross_pnl), net_pnl)| AugmentedRow {
            row,
            holdings,
            fee,
            gross_pnl,
            net_pnl,
        })
        .collect())
}
