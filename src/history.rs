// 12.0: closed order history and win/loss tally for driver reports.

use crate::engine::CloseResult;
use crate::types::{CurrencyPair, Money, OrderType, Price, Ticket, TimeFrame, Timestamp, Volume};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub ticket: Ticket,
    pub order_type: OrderType,
    pub pair: CurrencyPair,
    pub time_frame: TimeFrame,
    pub weight: Decimal,
    pub volume: Volume,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub open_price: Price,
    pub close_price: Price,
    pub margin: Money,
    pub profit: Money,
    pub opened_at: Timestamp,
    pub closed_at: Timestamp,
}

impl From<&CloseResult> for OrderRecord {
    fn from(result: &CloseResult) -> Self {
        let p = &result.position;
        Self {
            ticket: p.ticket.clone(),
            order_type: p.order_type,
            pair: p.pair.clone(),
            time_frame: p.time_frame,
            weight: p.weight,
            volume: p.volume,
            stop_loss: p.stop_loss,
            take_profit: p.take_profit,
            open_price: p.open_price,
            close_price: result.close_price,
            margin: result.margin_released,
            profit: result.realized_profit,
            opened_at: p.opened_at,
            closed_at: result.closed_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeHistory {
    records: Vec<OrderRecord>,
    wins: u64,
    losses: u64,
}

impl TradeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    // break-even counts as a win
    pub fn record(&mut self, result: &CloseResult) -> &OrderRecord {
        if result.realized_profit.is_negative() {
            self.losses += 1;
        } else {
            self.wins += 1;
        }
        self.records.push(OrderRecord::from(result));
        &self.records[self.records.len() - 1]
    }

    pub fn extend<'a>(&mut self, results: impl IntoIterator<Item = &'a CloseResult>) {
        for result in results {
            self.record(result);
        }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn losses(&self) -> u64 {
        self.losses
    }

    pub fn win_rate(&self) -> Option<Decimal> {
        let total = self.wins + self.losses;
        if total == 0 {
            return None;
        }
        Some(Decimal::from(self.wins) / Decimal::from(total))
    }

    pub fn total_profit(&self) -> Money {
        self.records.iter().map(|r| r.profit).sum()
    }
}
