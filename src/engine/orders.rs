//! Opening positions from strategy order intents.

use super::results::{OpenOutcome, OpenRejection};
use crate::account::Account;
use crate::events::{EventPayload, OpenRejectedEvent, PositionOpenedEvent};
use crate::margin::{lot_value, margin_required, volume_for_margin};
use crate::position::Position;
use crate::quote::BidAsk;
use crate::types::{CurrencyPair, Money, OrderType, Ticket, TimeFrame};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What a strategy wants opened. Sizing comes from `weight` and `risk_factor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIntent {
    pub ticket: Ticket,
    pub pair: CurrencyPair,
    pub order_type: OrderType,
    pub time_frame: TimeFrame,
    // share of balance this asset may commit as margin, in [0, 1]
    pub weight: Decimal,
    pub sl_offset: Decimal,
    pub tp_offset: Decimal,
    // share of the weighted budget actually used, in (0, 1]
    pub risk_factor: Decimal,
    // countdown until the driver should close, in time frame units
    pub period: u32,
}

impl OrderIntent {
    pub fn new(
        ticket: Ticket,
        pair: CurrencyPair,
        order_type: OrderType,
        time_frame: TimeFrame,
        weight: Decimal,
    ) -> Self {
        Self {
            ticket,
            pair,
            order_type,
            time_frame,
            weight,
            sl_offset: Decimal::ZERO,
            tp_offset: Decimal::ZERO,
            risk_factor: Decimal::new(8, 1),
            period: time_frame.periods(),
        }
    }

    pub fn with_offsets(mut self, sl_offset: Decimal, tp_offset: Decimal) -> Self {
        self.sl_offset = sl_offset;
        self.tp_offset = tp_offset;
        self
    }

    pub fn with_risk_factor(mut self, risk_factor: Decimal) -> Self {
        self.risk_factor = risk_factor;
        self
    }

    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }
}

impl Account {
    /// Open a position sized from the balance. Rejection leaves the account untouched.
    pub fn open(&mut self, intent: &OrderIntent, quote: BidAsk) -> OpenOutcome {
        match self.try_open(intent, quote) {
            Ok(outcome) => outcome,
            Err(reason) => {
                warn!(ticket = %intent.ticket, pair = %intent.pair, %reason, "position rejected");
                self.emit_event(EventPayload::OpenRejected(OpenRejectedEvent {
                    ticket: intent.ticket.clone(),
                    pair: intent.pair.clone(),
                    reason: reason.clone(),
                }));
                OpenOutcome::Rejected(reason)
            }
        }
    }

    fn try_open(&mut self, intent: &OrderIntent, quote: BidAsk) -> Result<OpenOutcome, OpenRejection> {
        if self.positions.contains_key(&intent.ticket) {
            return Err(OpenRejection::DuplicateTicket(intent.ticket.clone()));
        }

        let pair = &intent.pair;
        if !pair.contains(&self.account_currency) {
            return Err(OpenRejection::PairExcludesAccountCurrency { pair: pair.clone() });
        }
        if pair.base == pair.quote {
            // accepted as-is: both sides invert identically
            warn!(pair = %pair, "pair has the account currency on both sides");
        }

        let raw_price = quote.side(intent.order_type.open_side());
        let open_price = if self.needs_inversion(pair) {
            raw_price.inverted()
        } else {
            raw_price
        };

        // weight caps the margin this asset may take; risk factor scales it down
        let max_margin = Money::new(intent.weight * self.balance.value());
        let budget = max_margin.mul(intent.risk_factor);
        let mut volume = volume_for_margin(budget, open_price, self.lot_size, self.leverage);

        let bounds = self.volume_bounds;
        if volume < bounds.min {
            return Err(OpenRejection::VolumeBelowMinimum {
                volume,
                min: bounds.min,
            });
        }
        if volume > bounds.max {
            volume = bounds.max;
        }

        let margin = margin_required(lot_value(open_price, self.lot_size), self.leverage, volume);
        if self.balance < margin {
            return Err(OpenRejection::InsufficientBalance {
                margin,
                balance: self.balance,
            });
        }

        let mut position = Position::new(
            intent.ticket.clone(),
            intent.order_type,
            volume,
            pair.clone(),
            intent.time_frame,
            intent.weight,
            open_price,
            (intent.sl_offset, intent.tp_offset),
            margin,
            self.current_time,
        );
        position.period = intent.period;
        self.insert_position(position);

        debug!(
            ticket = %intent.ticket,
            pair = %pair,
            order_type = %intent.order_type,
            %volume,
            %open_price,
            %margin,
            "position opened"
        );

        self.emit_event(EventPayload::PositionOpened(PositionOpenedEvent {
            ticket: intent.ticket.clone(),
            pair: pair.clone(),
            order_type: intent.order_type,
            volume,
            open_price,
            margin,
        }));

        Ok(OpenOutcome::Opened {
            volume,
            open_price,
            margin,
        })
    }
}
