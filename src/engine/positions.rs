//! Closing positions and settling their profit into the balance.

use super::results::{CloseResult, EngineError};
use crate::account::Account;
use crate::events::{EventPayload, PositionClosedEvent};
use crate::quote::{BidAsk, QuoteSnapshot};
use crate::types::Ticket;
use tracing::debug;

impl Account {
    /// Close a position at the opposite side of the quote and realize its profit.
    pub fn close(&mut self, ticket: &Ticket, quote: BidAsk) -> Result<CloseResult, EngineError> {
        let position = self
            .positions
            .get(ticket)
            .ok_or_else(|| EngineError::PositionNotFound(ticket.clone()))?;

        let raw_price = quote.side(position.order_type.close_side());
        let close_price = if self.needs_inversion(&position.pair) {
            raw_price.inverted()
        } else {
            raw_price
        };

        let realized_profit = position.profit_at(close_price, self.lot_size);
        let margin_released = position.margin;

        // profit, balance, equity, then margin and the figures derived from it
        self.realize_profit(realized_profit);
        let position = self
            .remove_position(ticket)
            .ok_or_else(|| EngineError::PositionNotFound(ticket.clone()))?;

        debug!(
            ticket = %ticket,
            pair = %position.pair,
            %close_price,
            profit = %realized_profit,
            balance = %self.balance,
            "position closed"
        );

        self.emit_event(EventPayload::PositionClosed(PositionClosedEvent {
            ticket: ticket.clone(),
            close_price,
            realized_profit,
            margin_released,
            new_balance: self.balance,
        }));

        Ok(CloseResult {
            position,
            realized_profit,
            margin_released,
            close_price,
            closed_at: self.current_time,
        })
    }

    /// Close one position using its pair's quote from a snapshot.
    pub fn close_with_snapshot(
        &mut self,
        ticket: &Ticket,
        snapshot: &QuoteSnapshot,
    ) -> Result<CloseResult, EngineError> {
        let position = self
            .positions
            .get(ticket)
            .ok_or_else(|| EngineError::PositionNotFound(ticket.clone()))?;
        let quote = *snapshot
            .get(&position.pair)
            .ok_or_else(|| EngineError::MissingQuote(position.pair.clone()))?;
        self.close(ticket, quote)
    }

    /// Close every position whose period ran out.
    pub fn close_expired(&mut self, snapshot: &QuoteSnapshot) -> Result<Vec<CloseResult>, EngineError> {
        let tickets = self.expired_tickets();
        self.close_tickets(&tickets, snapshot)
    }

    /// Close every open position, e.g. at the end of a session.
    pub fn close_all(&mut self, snapshot: &QuoteSnapshot) -> Result<Vec<CloseResult>, EngineError> {
        let tickets: Vec<Ticket> = self.positions.keys().cloned().collect();
        self.close_tickets(&tickets, snapshot)
    }

    // quotes are checked up front so a missing pair closes nothing
    fn close_tickets(
        &mut self,
        tickets: &[Ticket],
        snapshot: &QuoteSnapshot,
    ) -> Result<Vec<CloseResult>, EngineError> {
        for ticket in tickets {
            if let Some(position) = self.positions.get(ticket) {
                if !snapshot.contains(&position.pair) {
                    return Err(EngineError::MissingQuote(position.pair.clone()));
                }
            }
        }

        tickets
            .iter()
            .map(|ticket| self.close_with_snapshot(ticket, snapshot))
            .collect()
    }
}
