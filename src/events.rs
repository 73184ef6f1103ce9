// 11.0: every account state change produces an event. used for audit trails and
// for drivers that rebuild order history after the fact.

use crate::engine::OpenRejection;
use crate::types::{CurrencyPair, Money, OrderType, Price, Ticket, Timestamp, Volume};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    PositionOpened(PositionOpenedEvent),
    OpenRejected(OpenRejectedEvent),
    PositionClosed(PositionClosedEvent),
    Marked(MarkedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionOpenedEvent {
    pub ticket: Ticket,
    pub pair: CurrencyPair,
    pub order_type: OrderType,
    pub volume: Volume,
    pub open_price: Price,
    pub margin: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRejectedEvent {
    pub ticket: Ticket,
    pub pair: CurrencyPair,
    pub reason: OpenRejection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionClosedEvent {
    pub ticket: Ticket,
    pub close_price: Price,
    pub realized_profit: Money,
    pub margin_released: Money,
    pub new_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedEvent {
    pub open_positions: usize,
    pub live_profit: Money,
    pub live_equity: Money,
}
