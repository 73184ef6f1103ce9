// 4.0: open position tracking. every price stored here is already in the
// quote-currency view, so profit is always lot_value(close) - lot_value(open).
// 4.1 expected profit/loss at TP/SL at the bottom.

use crate::margin::{lot_value, profit};
use crate::types::{CurrencyPair, Money, OrderType, Price, Ticket, TimeFrame, Timestamp, Volume};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// SL/TP offsets are scaled by this before multiplying the open price
pub const PIP_OFFSET_SCALE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub ticket: Ticket,
    pub order_type: OrderType,
    pub volume: Volume,
    pub pair: CurrencyPair,
    pub time_frame: TimeFrame,
    pub weight: Decimal,
    pub open_price: Price,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub margin: Money,
    pub live_profit: Money,
    pub period: u32,
    pub opened_at: Timestamp,
}

impl Position {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticket: Ticket,
        order_type: OrderType,
        volume: Volume,
        pair: CurrencyPair,
        time_frame: TimeFrame,
        weight: Decimal,
        open_price: Price,
        offsets: (Decimal, Decimal),
        margin: Money,
        opened_at: Timestamp,
    ) -> Self {
        let (sl_offset, tp_offset) = offsets;
        Self {
            ticket,
            order_type,
            volume,
            pair,
            time_frame,
            weight,
            open_price,
            stop_loss: stop_loss_level(open_price, sl_offset),
            take_profit: take_profit_level(open_price, tp_offset),
            margin,
            live_profit: Money::zero(),
            period: time_frame.periods(),
            opened_at,
        }
    }

    pub fn open_lot_value(&self, lot_size: Decimal) -> Money {
        lot_value(self.open_price, lot_size)
    }

    // profit if the position were closed at `close_price` (quote-currency view)
    pub fn profit_at(&self, close_price: Price, lot_size: Decimal) -> Money {
        profit(
            self.open_lot_value(lot_size),
            lot_value(close_price, lot_size),
            self.volume,
            self.order_type,
        )
    }

    // saturates at zero
    pub fn tick_period(&mut self) {
        self.period = self.period.saturating_sub(1);
    }

    pub fn is_expired(&self) -> bool {
        self.period == 0
    }

    // 4.1: profit at the TP level. a level at or below zero has no lot value.
    pub fn expected_profit(&self, lot_size: Decimal) -> Option<Money> {
        Price::new(self.take_profit).map(|tp| self.profit_at(tp, lot_size))
    }

    pub fn expected_loss(&self, lot_size: Decimal) -> Option<Money> {
        Price::new(self.stop_loss).map(|sl| self.profit_at(sl, lot_size))
    }

    pub fn risk_reward_ratio(&self, lot_size: Decimal) -> Option<Decimal> {
        let reward = self.expected_profit(lot_size)?;
        let risk = self.expected_loss(lot_size)?;
        if reward.value().is_zero() {
            return None;
        }
        Some((risk.value() / reward.value()).abs())
    }
}

// open - offset * 0.001 * open, whatever the direction
pub fn stop_loss_level(open_price: Price, offset: Decimal) -> Decimal {
    open_price.value() - offset * PIP_OFFSET_SCALE * open_price.value()
}

// open + offset * 0.001 * open, whatever the direction
pub fn take_profit_level(open_price: Price, offset: Decimal) -> Decimal {
    open_price.value() + offset * PIP_OFFSET_SCALE * open_price.value()
}
