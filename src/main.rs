//! Forex account simulation walkthrough.
//!
//! Runs a few short scenarios against the account engine: a single round trip,
//! an inverted pair, a mark-to-market session with period expiry, and the
//! sizing rejections a driver has to branch on.

use fxsim_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::error::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type DemoResult = Result<(), Box<dyn Error>>;

fn main() -> DemoResult {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("Forex Account Simulation");
    println!("Standard account, 1:100 leverage, USD balance\n");

    scenario_1_round_trip()?;
    scenario_2_inverted_pair()?;
    scenario_3_marked_session()?;
    scenario_4_rejections()?;

    println!("\nAll simulations completed successfully.");
    Ok(())
}

fn quote(bid: Decimal, ask: Decimal) -> Result<BidAsk, Box<dyn Error>> {
    BidAsk::from_decimals(bid, ask).ok_or_else(|| "quote prices must be positive".into())
}

fn intent(ticket: &str, pair: &str, order_type: OrderType, weight: Decimal) -> Result<OrderIntent, Box<dyn Error>> {
    Ok(OrderIntent::new(
        Ticket::new(ticket),
        pair.parse()?,
        order_type,
        "5min".parse()?,
        weight,
    ))
}

/// Buy EURUSD and close it 50 pips higher.
fn scenario_1_round_trip() -> DemoResult {
    println!("Scenario 1: EURUSD Round Trip\n");

    let mut account = Account::new(AccountConfig::default())?;
    let order = intent("EURUSD_5min_0", "EURUSD", OrderType::Buy, dec!(0.1))?.with_offsets(dec!(2), dec!(4));

    match account.open(&order, quote(dec!(1.0998), dec!(1.1000))?) {
        OpenOutcome::Opened { volume, open_price, margin } => {
            println!("  Opened {volume} lots @ {open_price}, margin {margin:.2}");
        }
        OpenOutcome::Rejected(reason) => println!("  Rejected: {reason}"),
    }
    println!("  Margin level: {}", account.margin_level());

    let closed = account.close(&order.ticket, quote(dec!(1.1050), dec!(1.1052))?)?;
    println!(
        "  Closed @ {}, profit {:.2}, released margin {:.2}",
        closed.close_price,
        closed.realized_profit.value(),
        closed.margin_released.value()
    );
    println!("\n{}\n", account.summary());
    Ok(())
}

/// USD is the base of USDJPY, so prices are flipped before sizing.
fn scenario_2_inverted_pair() -> DemoResult {
    println!("Scenario 2: Inverted Pair (USDJPY)\n");

    let mut account = Account::new(AccountConfig::default())?;
    let order = intent("USDJPY_5min_0", "USDJPY", OrderType::Sell, dec!(0.05))?;

    let outcome = account.open(&order, quote(dec!(149.50), dec!(149.52))?);
    if let Some(position) = account.get_position(&order.ticket) {
        println!("  Raw bid 149.50 stored as open price {:.8}", position.open_price.value());
        println!("  Volume {} lots, margin {:.2}", position.volume, position.margin.value());
    } else {
        println!("  Not opened: {:?}", outcome.rejection());
    }

    let closed = account.close(&order.ticket, quote(dec!(148.90), dec!(148.92))?)?;
    println!("  Closed @ {:.8}, profit {:.2}\n", closed.close_price.value(), closed.realized_profit.value());
    Ok(())
}

/// Two positions marked every minute until their periods run out.
fn scenario_3_marked_session() -> DemoResult {
    println!("Scenario 3: Marked Session With Expiry\n");

    let mut account = Account::new(AccountConfig::default())?;
    account.set_time(Timestamp::now());
    let mut history = TradeHistory::new();
    let eurusd: CurrencyPair = "EURUSD".parse()?;
    let gbpusd: CurrencyPair = "GBPUSD".parse()?;

    let long = intent("EURUSD_5min_1", "EURUSD", OrderType::Buy, dec!(0.3))?.with_period(3);
    let short = intent("GBPUSD_5min_1", "GBPUSD", OrderType::Sell, dec!(0.3))?.with_period(5);
    let _ = account.open(&long, quote(dec!(1.1000), dec!(1.1002))?);
    let _ = account.open(&short, quote(dec!(1.2700), dec!(1.2702))?);
    println!("  Opened {} positions, margin {:.2}", account.open_positions(), account.margin().value());

    for minute in 1..=6i64 {
        let drift = Decimal::new(minute * 5, 4);
        let snapshot = QuoteSnapshot::new()
            .with(eurusd.clone(), quote(dec!(1.1000) + drift, dec!(1.1002) + drift)?)
            .with(gbpusd.clone(), quote(dec!(1.2700) - drift, dec!(1.2702) - drift)?);

        account.advance_time(60_000);
        account.update(&snapshot)?;
        println!(
            "  t+{minute}m live profit {:.2}, live equity {:.2}, live margin level {}",
            account.live_profit().value(),
            account.live_equity().value(),
            account.live_margin_level()
        );

        let closed = account.close_expired(&snapshot)?;
        for result in &closed {
            println!("    expired {} closed with profit {:.2}", result.position.ticket, result.realized_profit.value());
        }
        history.extend(closed.iter());
    }

    for record in history.records() {
        println!("  {} held {} -> {}", record.ticket, record.opened_at, record.closed_at);
    }

    let win_rate = history
        .win_rate()
        .map(|r| format!("{:.2}%", r * Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| "n/a".to_string());
    println!("  Win rate {win_rate}, total profit {:.2}\n", history.total_profit().value());
    Ok(())
}

/// The outcomes a driver must branch on instead of treating as failures.
fn scenario_4_rejections() -> DemoResult {
    println!("Scenario 4: Rejections\n");

    let mut account = Account::new(AccountConfig::nano())?;
    let q = quote(dec!(0.8500), dec!(0.8502))?;

    let cross = account.open(&intent("EURGBP", "EURGBP", OrderType::Buy, dec!(0.5))?, q);
    println!("  EURGBP on a USD account: {:?}", cross.rejection());

    let small = account.open(&intent("tiny", "AUDUSD", OrderType::Buy, dec!(0.001))?, q);
    println!("  0.1% weight on a 100 balance: {:?}", small.rejection());

    println!("  Balance still {:.2}, margin {:.2}", account.balance().value(), account.margin().value());
    Ok(())
}
