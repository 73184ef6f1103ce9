//! Account state and its realized/live metrics.
//!
//! Realized figures (balance, equity, margin, free margin, margin level,
//! profit) change on open and close. Live figures are a full recomputation on
//! every mark-to-market. The open/close/update operations live in `engine/`.

use crate::config::{AccountConfig, ConfigError, VolumeBounds};
use crate::events::Event;
use crate::margin::{free_margin, MarginLevel};
use crate::position::Position;
use crate::types::{CurrencyCode, CurrencyPair, Leverage, Money, Ticket, TimeFrame, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Account {
    // fixed at construction
    pub(crate) lot_size: Decimal,
    pub(crate) leverage: Leverage,
    pub(crate) account_currency: CurrencyCode,
    pub(crate) volume_bounds: VolumeBounds,
    pub(crate) max_events: usize,

    // realized view
    pub(crate) balance: Money,
    pub(crate) equity: Money,
    pub(crate) margin: Money,
    pub(crate) free_margin: Money,
    pub(crate) margin_level: MarginLevel,
    pub(crate) profit: Money,

    // live view
    pub(crate) live_equity: Money,
    pub(crate) live_free_margin: Money,
    pub(crate) live_margin_level: MarginLevel,
    pub(crate) live_profit: Money,

    pub(crate) positions: BTreeMap<Ticket, Position>,
    pub(crate) events: VecDeque<Event>,
    pub(crate) next_event_id: u64,
    pub(crate) current_time: Timestamp,
}

impl Account {
    pub fn new(config: AccountConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let balance = config.initial_balance;
        Ok(Self {
            lot_size: config.lot_size(),
            leverage: config.leverage,
            account_currency: config.account_currency,
            volume_bounds: config.volume_bounds,
            max_events: config.max_events,
            balance,
            equity: balance,
            margin: Money::zero(),
            free_margin: balance,
            margin_level: MarginLevel::Unbounded,
            profit: Money::zero(),
            live_equity: balance,
            live_free_margin: balance,
            live_margin_level: MarginLevel::Unbounded,
            live_profit: Money::zero(),
            positions: BTreeMap::new(),
            events: VecDeque::new(),
            next_event_id: 1,
            current_time: Timestamp::from_millis(0),
        })
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn equity(&self) -> Money {
        self.equity
    }

    pub fn margin(&self) -> Money {
        self.margin
    }

    pub fn free_margin(&self) -> Money {
        self.free_margin
    }

    pub fn margin_level(&self) -> MarginLevel {
        self.margin_level
    }

    pub fn profit(&self) -> Money {
        self.profit
    }

    pub fn live_equity(&self) -> Money {
        self.live_equity
    }

    pub fn live_free_margin(&self) -> Money {
        self.live_free_margin
    }

    pub fn live_margin_level(&self) -> MarginLevel {
        self.live_margin_level
    }

    pub fn live_profit(&self) -> Money {
        self.live_profit
    }

    pub fn lot_size(&self) -> Decimal {
        self.lot_size
    }

    pub fn leverage(&self) -> Leverage {
        self.leverage
    }

    pub fn account_currency(&self) -> &CurrencyCode {
        &self.account_currency
    }

    pub fn volume_bounds(&self) -> VolumeBounds {
        self.volume_bounds
    }

    pub fn get_position(&self, ticket: &Ticket) -> Option<&Position> {
        self.positions.get(ticket)
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    pub fn open_positions(&self) -> usize {
        self.positions.len()
    }

    // one asset = pair on a time frame. drivers use this to avoid stacking entries.
    pub fn has_position_for(&self, pair: &CurrencyPair, time_frame: TimeFrame) -> bool {
        self.positions
            .values()
            .any(|p| &p.pair == pair && p.time_frame == time_frame)
    }

    // tickets whose period countdown ran out, in ticket order
    pub fn expired_tickets(&self) -> Vec<Ticket> {
        self.positions
            .values()
            .filter(|p| p.is_expired())
            .map(|p| p.ticket.clone())
            .collect()
    }

    // base == account currency means quotes must be flipped to the quote-currency view
    pub(crate) fn needs_inversion(&self, pair: &CurrencyPair) -> bool {
        pair.base == self.account_currency
    }

    // margin is re-summed from the book so it never drifts from the positions
    pub(crate) fn insert_position(&mut self, position: Position) {
        self.positions.insert(position.ticket.clone(), position);
        self.sync_margin();
    }

    pub(crate) fn remove_position(&mut self, ticket: &Ticket) -> Option<Position> {
        let position = self.positions.remove(ticket)?;
        self.sync_margin();
        Some(position)
    }

    fn sync_margin(&mut self) {
        self.margin = self.positions.values().map(|p| p.margin).sum();
        self.refresh_settled_metrics();
    }

    pub(crate) fn realize_profit(&mut self, amount: Money) {
        self.profit = self.profit.add(amount);
        self.balance = self.balance.add(amount);
        self.equity = self.balance;
    }

    fn refresh_settled_metrics(&mut self) {
        self.free_margin = free_margin(self.equity, self.margin);
        self.margin_level = MarginLevel::settled(self.equity, self.margin);
    }

    // sum of profit at TP across open positions
    pub fn expected_profit(&self) -> Money {
        self.positions
            .values()
            .filter_map(|p| p.expected_profit(self.lot_size))
            .sum()
    }

    // sum of profit at SL across open positions (negative when SLs sit below entry for buys)
    pub fn expected_loss(&self) -> Money {
        self.positions
            .values()
            .filter_map(|p| p.expected_loss(self.lot_size))
            .sum()
    }

    pub fn risk_reward_ratio(&self) -> Option<Decimal> {
        let reward = self.expected_profit();
        if reward.value().is_zero() {
            return None;
        }
        Some((self.expected_loss().value() / reward.value()).abs())
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            balance: self.balance,
            equity: self.equity,
            margin: self.margin,
            free_margin: self.free_margin,
            margin_level: self.margin_level,
            open_positions: self.positions.len(),
            profit: self.profit,
            live_equity: self.live_equity,
            live_free_margin: self.live_free_margin,
            live_margin_level: self.live_margin_level,
            live_profit: self.live_profit,
        }
    }
}

/// Point-in-time copy of the account figures for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub balance: Money,
    pub equity: Money,
    pub margin: Money,
    pub free_margin: Money,
    pub margin_level: MarginLevel,
    pub open_positions: usize,
    pub profit: Money,
    pub live_equity: Money,
    pub live_free_margin: Money,
    pub live_margin_level: MarginLevel,
    pub live_profit: Money,
}

impl fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Balance          : {:.2}", self.balance.value())?;
        writeln!(f, "Equity           : {:.2}", self.equity.value())?;
        writeln!(f, "Margin           : {:.2}", self.margin.value())?;
        writeln!(f, "Free Margin      : {:.2}", self.free_margin.value())?;
        writeln!(f, "Margin Level     : {}", self.margin_level)?;
        writeln!(f, "Open Positions   : {}", self.open_positions)?;
        writeln!(f, "Live Equity      : {:.2}", self.live_equity.value())?;
        writeln!(f, "Live Profit      : {:.2}", self.live_profit.value())?;
        write!(f, "Total Profit     : {:.2}", self.profit.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_account() -> Account {
        Account::new(AccountConfig::default()).unwrap()
    }

    #[test]
    fn fresh_account_figures() {
        let account = test_account();
        assert_eq!(account.balance().value(), dec!(100000));
        assert_eq!(account.equity().value(), dec!(100000));
        assert_eq!(account.free_margin().value(), dec!(100000));
        assert_eq!(account.live_equity().value(), dec!(100000));
        assert_eq!(account.margin(), Money::zero());
        assert!(account.margin_level().is_unbounded());
        assert!(account.live_margin_level().is_unbounded());
        assert_eq!(account.open_positions(), 0);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = AccountConfig::default().with_balance(Money::new(dec!(-5)));
        assert!(Account::new(config).is_err());
    }

    fn position(ticket: &str, margin: Decimal) -> Position {
        Position::new(
            Ticket::new(ticket),
            crate::types::OrderType::Buy,
            crate::types::Volume::new(dec!(1)),
            "EURUSD".parse().unwrap(),
            "5min".parse().unwrap(),
            dec!(0.1),
            crate::types::Price::new(dec!(1.25)).unwrap(),
            (Decimal::ZERO, Decimal::ZERO),
            Money::new(margin),
            Timestamp::from_millis(0),
        )
    }

    #[test]
    fn insert_and_remove_track_margin() {
        let mut account = test_account();

        account.insert_position(position("a", dec!(8000)));
        assert_eq!(account.margin().value(), dec!(8000));
        assert_eq!(account.free_margin().value(), dec!(92000));
        assert_eq!(account.margin_level().ratio(), Some(dec!(12.5)));

        assert!(account.remove_position(&Ticket::new("a")).is_some());
        assert!(account.remove_position(&Ticket::new("a")).is_none());
        assert_eq!(account.margin(), Money::zero());
        assert!(account.margin_level().is_unbounded());
    }

    #[test]
    fn margin_returns_to_exact_zero() {
        let mut account = test_account();
        // full-precision margins whose running total would not cancel
        let margins = [
            dec!(8000) / dec!(3),
            dec!(8000) / dec!(7),
            dec!(8000) / dec!(11),
        ];
        for (i, m) in margins.iter().enumerate() {
            account.insert_position(position(&format!("t{i}"), *m));
        }
        for i in 0..margins.len() {
            account.remove_position(&Ticket::new(format!("t{i}")));
        }

        assert_eq!(account.margin().value(), Decimal::ZERO);
        assert!(account.margin_level().is_unbounded());
    }

    #[test]
    fn realize_profit_moves_balance_and_equity() {
        let mut account = test_account();

        account.realize_profit(Money::new(dec!(1000)));
        assert_eq!(account.balance().value(), dec!(101000));
        assert_eq!(account.equity().value(), dec!(101000));
        assert_eq!(account.profit().value(), dec!(1000));

        account.realize_profit(Money::new(dec!(-500)));
        assert_eq!(account.balance().value(), dec!(100500));
        assert_eq!(account.profit().value(), dec!(500));
    }

    #[test]
    fn inversion_only_for_base_account_currency() {
        let account = test_account();
        assert!(account.needs_inversion(&"USDJPY".parse().unwrap()));
        assert!(!account.needs_inversion(&"EURUSD".parse().unwrap()));
    }

    #[test]
    fn summary_display() {
        let account = test_account();
        let text = account.summary().to_string();
        assert!(text.contains("Balance          : 100000.00"));
        assert!(text.contains("Margin Level     : inf"));
    }
}
