//! P&L accumulator - sequential replay of aligned rows
//!
//! The accumulator is a fold over the aligned rows in time order. Each step
//! takes the previous `AccumulatorState` by value and returns the next one
//! together with that row's history values, so the transition is a pure
//! function and the state has exactly one owner.
//!
//! ```text
//! state_0 = zero
//! for row in rows:                      (ascending recv_time)
//!     (state_n+1, outcome_n) = step(state_n, row)
//!     history.push(outcome_n)
//! summary = assemble(state_last, history, policy)
//! ```
//!
//! Cash and holdings depend on every prior row, so the replay cannot be
//! split across threads without reformulating it as a prefix scan.

use crate::core_types::{Amount, RowIndex};
use crate::error::{PtaError, Result};
use crate::fee::{DEFAULT_TAKER_FEE, calculate_fee};
use crate::models::{AlignedRow, Side, Stream};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================
// POLICIES
// ============================================================

/// How to mark holdings when an order has no preceding trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmarkedPolicy {
    /// Mark at price zero, so gross P&L equals cash for that row.
    /// Matches historical reports; understates gross P&L while unmarked.
    #[default]
    ZeroPrice,
    /// Mark at the row's own order price.
    OrderPrice,
    /// Treat an unmarked row as an input error.
    Reject,
}

/// How the summary's gross/net P&L are derived from the replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPolicy {
    /// Gross and net are the last row's values. The net figure then only
    /// deducts the last row's fee, while `total_fees` covers every row.
    #[default]
    FinalRow,
    /// Gross is the last row's mark; net deducts `total_fees`.
    Cumulative,
}

/// Parameters that shape every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountingParams {
    /// Taker fee rate in 10^6 precision
    pub taker_fee_rate: u64,
    pub unmarked: UnmarkedPolicy,
}

impl Default for AccountingParams {
    fn default() -> Self {
        Self {
            taker_fee_rate: DEFAULT_TAKER_FEE,
            unmarked: UnmarkedPolicy::default(),
        }
    }
}

// ============================================================
// STATE AND OUTPUTS
// ============================================================

/// Running totals carried from one row to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulatorState {
    pub cash: Amount,
    pub btc_holdings: Amount,
    pub cumulative_contracts: Amount,
    pub cumulative_fees: Amount,
}

/// Per-row values appended to the history columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOutcome {
    pub holdings: Amount,
    pub fee: Amount,
    pub gross_pnl: Amount,
    pub net_pnl: Amount,
}

/// Four parallel history columns, one entry per replayed row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    pub holdings: Vec<Amount>,
    pub fee: Vec<Amount>,
    pub gross_pnl: Vec<Amount>,
    pub net_pnl: Vec<Amount>,
}

impl History {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            holdings: Vec::with_capacity(n),
            fee: Vec::with_capacity(n),
            gross_pnl: Vec::with_capacity(n),
            net_pnl: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, outcome: RowOutcome) {
        self.holdings.push(outcome.holdings);
        self.fee.push(outcome.fee);
        self.gross_pnl.push(outcome.gross_pnl);
        self.net_pnl.push(outcome.net_pnl);
    }
}

/// Report headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub gross_pnl: Amount,
    pub net_pnl: Amount,
    pub total_fees: Amount,
    pub contracts: Amount,
    pub btc_holdings: Amount,
}

/// Result of a full replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    pub final_state: AccumulatorState,
    pub history: History,
}

impl Replay {
    /// Assemble the summary under the given policy.
    pub fn summary(&self, policy: SummaryPolicy) -> Summary {
        let last_gross = self.history.gross_pnl.last().copied().unwrap_or_default();
        let last_net = self.history.net_pnl.last().copied().unwrap_or_default();
        let total_fees = self.final_state.cumulative_fees;

        let net_pnl = match policy {
            SummaryPolicy::FinalRow => last_net,
            SummaryPolicy::Cumulative => last_gross - total_fees,
        };

        Summary {
            gross_pnl: last_gross,
            net_pnl,
            total_fees,
            contracts: self.final_state.cumulative_contracts,
            btc_holdings: self.final_state.btc_holdings,
        }
    }
}

// ============================================================
// ACCUMULATOR
// ============================================================

/// Stateless driver; all running values live in `AccumulatorState`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnlAccumulator {
    params: AccountingParams,
}

impl PnlAccumulator {
    pub fn new(params: AccountingParams) -> Self {
        Self { params }
    }

    /// Apply one aligned row to `state`.
    pub fn step(
        &self,
        state: AccumulatorState,
        index: RowIndex,
        row: &AlignedRow,
    ) -> Result<(AccumulatorState, RowOutcome)> {
        let order = &row.order;
        let notional = order.notional();

        let (cash, btc_holdings) = match order.side {
            Side::Buy => (state.cash - notional, state.btc_holdings + order.qty),
            Side::Sell => (state.cash + notional, state.btc_holdings - order.qty),
        };

        let mark = match (row.trade_price(), self.params.unmarked) {
            (Some(price), _) => price,
            (None, UnmarkedPolicy::ZeroPrice) => Decimal::ZERO,
            (None, UnmarkedPolicy::OrderPrice) => order.price,
            (None, UnmarkedPolicy::Reject) => return Err(PtaError::UnmarkedRow { row: index }),
        };
        let gross_pnl = cash + btc_holdings * mark;

        let fee = if row.is_aggressor() {
            calculate_fee(notional, self.params.taker_fee_rate)
        } else {
            Decimal::ZERO
        };

        let next = AccumulatorState {
            cash,
            btc_holdings,
            cumulative_contracts: state.cumulative_contracts + order.qty,
            cumulative_fees: state.cumulative_fees + fee,
        };
        let outcome = RowOutcome {
            holdings: btc_holdings,
            fee,
            gross_pnl,
            net_pnl: gross_pnl - fee,
        };

        Ok((next, outcome))
    }

    /// Replay every row from the zero state.
    pub fn replay(&self, rows: &[AlignedRow]) -> Result<Replay> {
        if rows.is_empty() {
            return Err(PtaError::EmptyStream {
                stream: Stream::Orders,
            });
        }

        let mut history = History::with_capacity(rows.len());
        let final_state = rows.iter().enumerate().try_fold(
            AccumulatorState::default(),
            |state, (index, row)| {
                let (next, outcome) = self.step(state, index, row)?;
                history.push(outcome);
                Ok::<_, PtaError>(next)
            },
        )?;

        tracing::debug!(
            rows = rows.len(),
            cash = %final_state.cash,
            holdings = %final_state.btc_holdings,
            fees = %final_state.cumulative_fees,
            "replay complete"
        );

        Ok(Replay {
            final_state,
            history,
        })
    }
}
