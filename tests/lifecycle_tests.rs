//! Lifecycle tests
//!
//! Multi-step sessions the way a strategy driver runs them: open, mark every
//! step, close on expiry, keep the order history and reconcile at the end.

use fxsim_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn quote(bid: Decimal, ask: Decimal) -> BidAsk {
    BidAsk::from_decimals(bid, ask).unwrap()
}

fn intent(ticket: &str, pair: &str, order_type: OrderType, time_frame: &str, weight: Decimal) -> OrderIntent {
    OrderIntent::new(
        Ticket::new(ticket),
        pair.parse().unwrap(),
        order_type,
        time_frame.parse().unwrap(),
        weight,
    )
}

fn pair(symbol: &str) -> CurrencyPair {
    symbol.parse().unwrap()
}

// balance accumulates one close at a time, so it can differ from a fresh sum in the last digits
fn assert_reconciles(balance: Money, realized: Money) {
    let diff = (balance.value() - dec!(100000) - realized.value()).abs();
    assert!(diff < dec!(0.000001), "balance {balance} does not match realized {realized}");
}

/// A driver loop with expiry and history.
mod session_tests {
    use super::*;

    #[test]
    fn expiring_positions_reconcile_to_history() {
        let mut acc = Account::new(AccountConfig::default()).unwrap();
        let mut history = TradeHistory::new();

        let long = intent("EURUSD_1min_0", "EURUSD", OrderType::Buy, "1min", dec!(0.1)).with_period(2);
        let short = intent("GBPUSD_5min_0", "GBPUSD", OrderType::Sell, "5min", dec!(0.1)).with_period(4);
        let yen = intent("USDJPY_5min_0", "USDJPY", OrderType::Buy, "5min", dec!(0.05));

        assert!(acc.open(&long, quote(dec!(1.0998), dec!(1.1000))).is_opened());
        assert!(acc.open(&short, quote(dec!(1.2700), dec!(1.2702))).is_opened());
        assert!(acc.open(&yen, quote(dec!(149.98), dec!(150.00))).is_opened());
        assert_eq!(acc.open_positions(), 3);
        assert!(acc.has_position_for(&pair("EURUSD"), "1min".parse().unwrap()));
        assert!(!acc.has_position_for(&pair("EURUSD"), "5min".parse().unwrap()));

        let reserved: Decimal = acc.positions().map(|p| p.margin.value()).sum();
        assert_eq!(acc.margin().value(), reserved);

        for step in 1..=6i64 {
            let drift = Decimal::new(step * 10, 4);
            let snapshot = QuoteSnapshot::new()
                .with(pair("EURUSD"), quote(dec!(1.0998) + drift, dec!(1.1000) + drift))
                .with(pair("GBPUSD"), quote(dec!(1.2700) - drift, dec!(1.2702) - drift))
                .with(pair("USDJPY"), quote(dec!(150.48), dec!(150.50)));

            acc.advance_time(60_000);
            acc.update(&snapshot).unwrap();
            assert_reconciles(acc.balance(), history.total_profit());

            let closed = acc.close_expired(&snapshot).unwrap();
            match step {
                2 => {
                    assert_eq!(closed.len(), 1);
                    assert_eq!(closed[0].position.ticket.as_str(), "EURUSD_1min_0");
                    assert!(closed[0].realized_profit.value() > Decimal::ZERO);
                }
                4 => {
                    assert_eq!(closed.len(), 1);
                    assert_eq!(closed[0].position.ticket.as_str(), "GBPUSD_5min_0");
                    assert!(closed[0].realized_profit.value() > Decimal::ZERO);
                }
                5 => {
                    // default period is the time frame length; USD strengthened against the buy
                    assert_eq!(closed.len(), 1);
                    assert_eq!(closed[0].position.ticket.as_str(), "USDJPY_5min_0");
                    assert!(closed[0].realized_profit.is_negative());
                }
                _ => assert!(closed.is_empty()),
            }
            history.extend(closed.iter());
        }

        assert_eq!(acc.open_positions(), 0);
        assert_eq!(acc.margin(), Money::zero());
        assert!(acc.margin_level().is_unbounded());
        assert_reconciles(acc.balance(), history.total_profit());
        assert_eq!(acc.profit(), history.total_profit());

        assert_eq!(history.records().len(), 3);
        let first = &history.records()[0];
        assert_eq!(first.opened_at, Timestamp::from_millis(0));
        assert_eq!(first.closed_at, Timestamp::from_millis(120_000));
        assert_eq!(history.wins(), 2);
        assert_eq!(history.losses(), 1);
        assert_eq!(history.win_rate(), Some(dec!(2) / dec!(3)));
    }

    #[test]
    fn close_all_ends_the_session() {
        let mut acc = Account::new(AccountConfig::default()).unwrap();
        let _ = acc.open(&intent("a", "EURUSD", OrderType::Buy, "5min", dec!(0.1)), quote(dec!(1.24), dec!(1.25)));
        let _ = acc.open(&intent("b", "AUDUSD", OrderType::Sell, "5min", dec!(0.1)), quote(dec!(0.66), dec!(0.6602)));

        let snapshot = QuoteSnapshot::new()
            .with(pair("EURUSD"), quote(dec!(1.26), dec!(1.2602)))
            .with(pair("AUDUSD"), quote(dec!(0.6598), dec!(0.66)));

        let closed = acc.close_all(&snapshot).unwrap();
        assert_eq!(closed.len(), 2);
        let total: Money = closed.iter().map(|c| c.realized_profit).sum();

        assert_eq!(acc.open_positions(), 0);
        assert_reconciles(acc.balance(), total);
        assert_eq!(acc.margin(), Money::zero());
    }

    #[test]
    fn missing_quote_changes_nothing() {
        let mut acc = Account::new(AccountConfig::default()).unwrap();
        let _ = acc.open(&intent("a", "EURUSD", OrderType::Buy, "5min", dec!(0.1)), quote(dec!(1.24), dec!(1.25)));
        let _ = acc.open(&intent("b", "GBPUSD", OrderType::Buy, "5min", dec!(0.1)), quote(dec!(1.27), dec!(1.2702)));
        let events_before = acc.events().len();

        let partial = QuoteSnapshot::new().with(pair("EURUSD"), quote(dec!(1.3), dec!(1.3002)));

        assert_eq!(acc.update(&partial), Err(EngineError::MissingQuote(pair("GBPUSD"))));
        assert_eq!(acc.live_profit(), Money::zero());
        assert!(acc.positions().all(|p| p.period == 5));

        assert_eq!(acc.close_all(&partial).unwrap_err(), EngineError::MissingQuote(pair("GBPUSD")));
        assert_eq!(acc.open_positions(), 2);
        assert_eq!(acc.balance().value(), dec!(100000));
        assert_eq!(acc.events().len(), events_before);
    }
}

/// Audit trail ordering and capacity.
mod event_tests {
    use super::*;

    #[test]
    fn events_follow_operations_in_order() {
        let mut acc = Account::new(AccountConfig::default()).unwrap();
        acc.set_time(Timestamp::from_millis(1_000));

        let order = intent("a", "EURUSD", OrderType::Buy, "5min", dec!(0.1));
        let _ = acc.open(&order, quote(dec!(1.24), dec!(1.25)));
        acc.advance_time(500);
        acc.update(&QuoteSnapshot::new().with(pair("EURUSD"), quote(dec!(1.25), dec!(1.2502))))
            .unwrap();
        acc.close(&order.ticket, quote(dec!(1.25), dec!(1.2502))).unwrap();

        let events = acc.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0].payload, EventPayload::PositionOpened(_)));
        assert!(matches!(events[1].payload, EventPayload::Marked(_)));
        assert!(matches!(events[2].payload, EventPayload::PositionClosed(_)));
        assert_eq!(events[0].timestamp, Timestamp::from_millis(1_000));
        assert_eq!(events[2].timestamp, Timestamp::from_millis(1_500));
        assert!(events.iter().zip(events.iter().skip(1)).all(|(a, b)| a.id < b.id));

        match &events[2].payload {
            EventPayload::PositionClosed(e) => {
                assert_eq!(e.new_balance, acc.balance());
                assert_eq!(e.realized_profit.value(), Decimal::ZERO);
            }
            other => panic!("expected close event, got {other:?}"),
        }
        assert_eq!(acc.time(), Timestamp::from_millis(1_500));
    }

    #[test]
    fn event_log_is_capped() {
        let mut config = AccountConfig::default();
        config.max_events = 3;
        let mut acc = Account::new(config).unwrap();

        for i in 0..5 {
            // cross pairs are rejected but still audited
            let _ = acc.open(&intent(&format!("x{i}"), "EURGBP", OrderType::Buy, "5min", dec!(0.1)), quote(dec!(0.85), dec!(0.86)));
        }

        let events = acc.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].id, EventId(3));
        assert_eq!(events[2].id, EventId(5));
        assert_eq!(acc.recent_events(2).len(), 2);
        assert_eq!(acc.recent_events(10).len(), 3);
    }
}

/// Account presets scale the lot size with the balance.
mod preset_tests {
    use super::*;

    #[test]
    fn presets_size_the_same_volume() {
        for preset in [Preset::Standard, Preset::Mini, Preset::Micro, Preset::Nano] {
            let config = preset.config();
            let balance = config.initial_balance;
            let mut acc = Account::new(config).unwrap();

            let outcome = acc.open(&intent("a", "EURUSD", OrderType::Buy, "5min", dec!(0.1)), quote(dec!(1.24), dec!(1.25)));
            match outcome {
                OpenOutcome::Opened { volume, margin, .. } => {
                    assert_eq!(volume.value(), dec!(6.4), "{preset:?}");
                    // 8% of the balance
                    assert_eq!(margin.value(), balance.value() * dec!(0.08), "{preset:?}");
                }
                other => panic!("{preset:?}: expected open, got {other:?}"),
            }
        }
    }

    #[test]
    fn summary_reflects_open_position() {
        let mut acc = Account::new(AccountConfig::mini()).unwrap();
        let _ = acc.open(&intent("a", "EURUSD", OrderType::Buy, "5min", dec!(0.1)), quote(dec!(1.24), dec!(1.25)));

        let summary = acc.summary();
        assert_eq!(summary.open_positions, 1);
        assert_eq!(summary.margin.value(), dec!(800));
        assert_eq!(summary.margin_level, MarginLevel::Ratio(dec!(12.5)));

        let text = summary.to_string();
        assert!(text.contains("Margin           : 800.00"));
        assert!(text.contains("Margin Level     : 1250.00%"));
    }
}
