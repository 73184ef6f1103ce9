// 1.0: all the primitives live here. nothing in the engine works without these types.
// tickets, currencies, prices, money, volumes, leverage, timestamps. newtypes so the
// compiler catches a price passed where money was expected.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown order type {0:?}, expected buy or sell")]
    UnknownOrderType(String),

    #[error("Unknown account type {0:?}, expected standard, mini, micro or nano")]
    UnknownAccountType(String),

    #[error("Invalid currency code {0:?}, expected 3 letters")]
    InvalidCurrency(String),

    #[error("Invalid currency pair {0:?}, expected 6 letters like EURUSD")]
    InvalidPair(String),

    #[error("Invalid time frame {0:?}, expected minutes like 5min")]
    InvalidTimeFrame(String),
}

// opaque position identifier chosen by the driver
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticket(String);

impl Ticket {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ticket {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// 1.1: buy = profit when price goes up. sell = profit when price goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    pub fn sign(&self) -> Decimal {
        match self {
            OrderType::Buy => dec!(1),
            OrderType::Sell => dec!(-1),
        }
    }

    // buying lifts the offer, selling hits the bid
    pub fn open_side(&self) -> PriceSide {
        match self {
            OrderType::Buy => PriceSide::Ask,
            OrderType::Sell => PriceSide::Bid,
        }
    }

    // closing reverses the trade: a buy is sold back at the bid
    pub fn close_side(&self) -> PriceSide {
        match self {
            OrderType::Buy => PriceSide::Bid,
            OrderType::Sell => PriceSide::Ask,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Buy => "buy",
            OrderType::Sell => "sell",
        }
    }
}

impl FromStr for OrderType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(OrderType::Buy),
            "sell" => Ok(OrderType::Sell),
            _ => Err(ParseError::UnknownOrderType(s.to_string())),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSide {
    Bid,
    Ask,
}

// 1.2: account type fixes the notional of one lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Standard,
    Mini,
    Micro,
    Nano,
}

impl AccountType {
    pub fn lot_size(&self) -> Decimal {
        match self {
            AccountType::Standard => dec!(100000),
            AccountType::Mini => dec!(10000),
            AccountType::Micro => dec!(1000),
            AccountType::Nano => dec!(100),
        }
    }
}

impl FromStr for AccountType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(AccountType::Standard),
            "mini" => Ok(AccountType::Mini),
            "micro" => Ok(AccountType::Micro),
            "nano" => Ok(AccountType::Nano),
            _ => Err(ParseError::UnknownAccountType(s.to_string())),
        }
    }
}

// 1.3: three letter ISO-ish code, stored lowercase so comparisons ignore case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Result<Self, ParseError> {
        let normalized = code.trim().to_ascii_lowercase();
        if normalized.len() == 3 && normalized.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(normalized))
        } else {
            Err(ParseError::InvalidCurrency(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_ascii_uppercase())
    }
}

// 1.4: base/quote. price is quote currency per one unit of base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    pub fn contains(&self, currency: &CurrencyCode) -> bool {
        &self.base == currency || &self.quote == currency
    }
}

impl FromStr for CurrencyPair {
    type Err = ParseError;

    // accepts "EURUSD", "eur/usd", "EUR_USD"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '/' | '_' | '-'))
            .collect();
        if letters.len() != 6 || !letters.is_ascii() {
            return Err(ParseError::InvalidPair(s.to_string()));
        }
        let base = CurrencyCode::new(&letters[..3]).map_err(|_| ParseError::InvalidPair(s.to_string()))?;
        let quote = CurrencyCode::new(&letters[3..]).map_err(|_| ParseError::InvalidPair(s.to_string()))?;
        Ok(Self { base, quote })
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

// 1.5: candle time frame in minutes. "5min" → 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeFrame(u32);

impl TimeFrame {
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes > 0).then_some(Self(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    // countdown a position opened on this frame starts with
    pub fn periods(&self) -> u32 {
        self.0
    }
}

impl FromStr for TimeFrame {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let digits = trimmed.strip_suffix("min").unwrap_or(&trimmed);
        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::from_minutes)
            .ok_or_else(|| ParseError::InvalidTimeFrame(s.to_string()))
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.0)
    }
}

// 1.6: price. must be positive so inversion never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(value: Decimal) -> Self {
        debug_assert!(value > Decimal::ZERO);
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    // quote-currency view of a pair whose base is the account currency
    pub fn inverted(&self) -> Self {
        Self(Decimal::ONE / self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// 1.7: cash amount in account terms. balance, margin, profit all use this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn add(&self, other: Money) -> Self {
        Self(self.0 + other.0)
    }

    pub fn sub(&self, other: Money) -> Self {
        Self(self.0 - other.0)
    }

    pub fn mul(&self, factor: Decimal) -> Self {
        Self(self.0 * factor)
    }

    pub fn round_dp(&self, dp: u32) -> Self {
        Self(self.0.round_dp(dp))
    }
}

// forwards precision, so {:.2} prints cents
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc.add(m))
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc.add(*m))
    }
}

// 1.8: trade size in lots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Volume(Decimal);

impl Volume {
    pub fn new(lots: Decimal) -> Self {
        Self(lots)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.9: leverage as the fraction of notional held as margin. 1:100 → 0.01
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leverage(Decimal);

impl Leverage {
    #[must_use]
    pub fn new(fraction: Decimal) -> Option<Self> {
        if fraction > Decimal::ZERO {
            Some(Self(fraction))
        } else {
            None
        }
    }

    // 100 → 0.01
    #[must_use]
    pub fn from_ratio(ratio: Decimal) -> Option<Self> {
        if ratio > Decimal::ZERO {
            Self::new(Decimal::ONE / ratio)
        } else {
            None
        }
    }

    pub fn fraction(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", (Decimal::ONE / self.0).normalize())
    }
}

// 1.10: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

// UTC wall clock, or raw millis when out of chrono's range
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.3f")),
            None => write!(f, "{}ms", self.0),
        }
    }
}
