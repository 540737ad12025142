// models.rs - Core order, trade and aligned row types

use crate::core_types::{Amount, Nanos, RowIndex};
use crate::error::{PtaError, Result};
use crate::money::{scale_price, scale_qty};
use serde::Deserialize;
use std::fmt;

/// Metadata object attached to every captured record.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Metadata field holding an order's capture time.
pub const ORDER_TIME_FIELD: &str = "timestamp";

/// Metadata field holding a trade's capture time.
pub const TRADE_TIME_FIELD: &str = "recv_time";

/// Metadata field holding a trade's taker flag.
pub const AGGRESSOR_FIELD: &str = "aggressor_indicator";

/// Raw `side` value that denotes a buy. Every other value is a sell.
pub const SIDE_BUY_RAW: i64 = 1;

/// Which captured stream a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Orders,
    Trades,
}

impl Stream {
    /// Directory / channel name used by the capture reader.
    pub fn name(self) -> &'static str {
        match self {
            Stream::Orders => "orders",
            Stream::Trades => "trades",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Order side: Buy or Sell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Decode the capture's integer side (`1` = buy, anything else = sell).
    #[inline]
    pub fn from_raw(raw: i64) -> Self {
        if raw == SIDE_BUY_RAW {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

// ============================================================
// RAW ROW (as decoded from a capture, before validation)
// ============================================================

/// One decoded capture record. Numeric fields are still fixed-point integers
/// and any of them may be missing; typed records are built from this.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub qty: Option<i64>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub side: Option<i64>,
    #[serde(default)]
    pub metadata: Metadata,
}

// ============================================================
// TYPED RECORDS
// ============================================================

/// An order placement, scaled and validated
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub side: Side,
    pub qty: Amount,
    pub price: Amount,
    pub recv_time: Nanos,
}

impl OrderRecord {
    /// Build from a raw row; `qty`, `price` and `side` are mandatory.
    pub fn from_raw(row: RowIndex, raw: &RawRow, recv_time: Nanos) -> Result<Self> {
        let side = raw.side.ok_or(PtaError::MissingField {
            stream: Stream::Orders,
            row,
            field: "side",
        })?;
        let qty = raw.qty.ok_or(PtaError::MissingField {
            stream: Stream::Orders,
            row,
            field: "qty",
        })?;
        let price = raw.price.ok_or(PtaError::MissingField {
            stream: Stream::Orders,
            row,
            field: "price",
        })?;

        Ok(Self {
            side: Side::from_raw(side),
            qty: scale_qty(qty),
            price: scale_price(price),
            recv_time,
        })
    }

    /// `qty * price` in quote currency
    #[inline]
    pub fn notional(&self) -> Amount {
        self.qty * self.price
    }
}

/// A trade execution, scaled and validated
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub qty: Amount,
    pub price: Amount,
    pub recv_time: Nanos,
    pub aggressor_indicator: bool,
}

impl TradeRecord {
    /// Build from a raw row; `qty`, `price` and the aggressor flag are mandatory.
    pub fn from_raw(row: RowIndex, raw: &RawRow, recv_time: Nanos) -> Result<Self> {
        let qty = raw.qty.ok_or(PtaError::MissingField {
            stream: Stream::Trades,
            row,
            field: "qty",
        })?;
        let price = raw.price.ok_or(PtaError::MissingField {
            stream: Stream::Trades,
            row,
            field: "price",
        })?;
        let flag = raw
            .metadata
            .get(AGGRESSOR_FIELD)
            .ok_or_else(|| PtaError::MissingMetadataField {
                stream: Stream::Trades,
                row,
                field: AGGRESSOR_FIELD.to_string(),
            })?;

        Ok(Self {
            qty: scale_qty(qty),
            price: scale_price(price),
            recv_time,
            aggressor_indicator: parse_aggressor(row, flag)?,
        })
    }
}

/// Decode the loosely typed taker flag.
///
/// Accepts JSON booleans and the strings `true`/`false` in any case
/// (captures write `"True"`/`"False"`). Anything else is rejected.
pub fn parse_aggressor(row: RowIndex, value: &serde_json::Value) -> Result<bool> {
    let parsed = match value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        serde_json::Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    };
    parsed.ok_or_else(|| PtaError::UnrecognizedAggressor {
        row,
        value: value.to_string(),
    })
}

// ============================================================
// ALIGNED ROW
// ============================================================

/// An order joined with the latest trade at or before it.
///
/// `trade` is `None` when no trade precedes the order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub order: OrderRecord,
    pub trade: Option<TradeRecord>,
}

impl AlignedRow {
    /// Joined trade price, if a trade was joined.
    #[inline]
    pub fn trade_price(&self) -> Option<Amount> {
        self.trade.as_ref().map(|t| t.price)
    }

    /// Whether the joined trade charged a taker fee. An unjoined row did not.
    #[inline]
    pub fn is_aggressor(&self) -> bool {
        self.trade.as_ref().is_some_and(|t| t.aggressor_indicator)
    }
}
