//! Lot value, margin and profit math.
//!
//! One lot is `lot_size` units of the base currency, valued in the quote
//! currency's view of the price. Margin is a fixed fraction (the leverage) of
//! the lot value times the volume. A single profit formula covers expected,
//! live and realized profit; only the close-side lot value differs.

use crate::types::{Leverage, Money, OrderType, Price, Volume};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub fn lot_value(price: Price, lot_size: Decimal) -> Money {
    Money::new(price.value() * lot_size)
}

pub fn margin_required(lot_value: Money, leverage: Leverage, volume: Volume) -> Money {
    Money::new(lot_value.value() * leverage.fraction() * volume.value())
}

// (close - open) * volume * sign. sell profits when the close value is lower.
pub fn profit(
    open_lot_value: Money,
    close_lot_value: Money,
    volume: Volume,
    order_type: OrderType,
) -> Money {
    Money::new(
        (close_lot_value.value() - open_lot_value.value()) * volume.value() * order_type.sign(),
    )
}

// lots affordable for a margin budget: budget / (price * lot_size * leverage)
pub fn volume_for_margin(
    margin_budget: Money,
    price: Price,
    lot_size: Decimal,
    leverage: Leverage,
) -> Volume {
    let per_lot = price.value() * lot_size * leverage.fraction();
    Volume::new(margin_budget.value() / per_lot)
}

pub fn free_margin(equity: Money, margin: Money) -> Money {
    equity.sub(margin)
}

/// Equity over margin. `Unbounded` when no margin is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarginLevel {
    Unbounded,
    Ratio(Decimal),
}

impl MarginLevel {
    // open/close path: treat margin that rounds to zero cents as none, and
    // divide the 4dp-rounded figures
    pub fn settled(equity: Money, margin: Money) -> Self {
        if margin.round_dp(2).value().is_zero() {
            return MarginLevel::Unbounded;
        }
        let margin = margin.round_dp(4).value();
        if margin.is_zero() {
            return MarginLevel::Unbounded;
        }
        equity
            .round_dp(4)
            .value()
            .checked_div(margin)
            .map_or(MarginLevel::Unbounded, MarginLevel::Ratio)
    }

    // mark-to-market path: no rounding guard. an empty margin, or one so small
    // the ratio leaves the decimal range, is unbounded
    pub fn live(live_equity: Money, margin: Money) -> Self {
        live_equity
            .value()
            .checked_div(margin.value())
            .map_or(MarginLevel::Unbounded, MarginLevel::Ratio)
    }

    pub fn ratio(&self) -> Option<Decimal> {
        match self {
            MarginLevel::Unbounded => None,
            MarginLevel::Ratio(r) => Some(*r),
        }
    }

    pub fn as_percent(&self) -> Option<Decimal> {
        self.ratio().map(|r| r * Decimal::ONE_HUNDRED)
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, MarginLevel::Unbounded)
    }
}

impl fmt::Display for MarginLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_percent() {
            None => f.write_str("inf"),
            Some(pct) => write!(f, "{:.2}%", pct),
        }
    }
}
