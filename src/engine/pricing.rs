//! Mark-to-market of open positions.

use super::results::EngineError;
use crate::account::Account;
use crate::events::{EventPayload, MarkedEvent};
use crate::margin::{free_margin, MarginLevel};
use crate::quote::QuoteSnapshot;
use crate::types::Money;
use tracing::debug;

impl Account {
    /// Recompute live profit for every position and tick its period down.
    ///
    /// The snapshot must quote every open pair; a gap is reported before
    /// anything is touched. The live margin level has no rounding guard,
    /// unlike the settled one.
    pub fn update(&mut self, snapshot: &QuoteSnapshot) -> Result<(), EngineError> {
        if let Some(missing) = self.positions.values().find(|p| !snapshot.contains(&p.pair)) {
            return Err(EngineError::MissingQuote(missing.pair.clone()));
        }

        let lot_size = self.lot_size;
        let account_currency = &self.account_currency;
        let mut live_profit = Money::zero();

        for position in self.positions.values_mut() {
            position.tick_period();

            let Some(quote) = snapshot.get(&position.pair) else {
                continue;
            };
            // what closing now would fetch
            let raw_price = quote.side(position.order_type.close_side());
            let mark_price = if &position.pair.base == account_currency {
                raw_price.inverted()
            } else {
                raw_price
            };

            position.live_profit = position.profit_at(mark_price, lot_size);
            live_profit = live_profit.add(position.live_profit);
        }

        self.live_profit = live_profit;
        self.live_equity = self.balance.add(live_profit);
        self.live_free_margin = free_margin(self.live_equity, self.margin);
        self.live_margin_level = MarginLevel::live(self.live_equity, self.margin);

        debug!(
            positions = self.positions.len(),
            live_profit = %self.live_profit,
            live_equity = %self.live_equity,
            "account marked"
        );

        self.emit_event(EventPayload::Marked(MarkedEvent {
            open_positions: self.positions.len(),
            live_profit: self.live_profit,
            live_equity: self.live_equity,
        }));

        Ok(())
    }
}
