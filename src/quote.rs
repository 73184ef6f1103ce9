// 9.0: quote records handed in by the price source.
//
// The engine only ever sees the latest bid/ask per pair. Open and close take a
// single BidAsk; mark-to-market takes a snapshot covering every open pair.

use crate::types::{CurrencyPair, Price, PriceSide};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidAsk {
    pub bid: Price,
    pub ask: Price,
}

impl BidAsk {
    pub fn new(bid: Price, ask: Price) -> Self {
        Self { bid, ask }
    }

    // crossed quotes show up in historic candles, so only positivity is checked
    #[must_use]
    pub fn from_decimals(bid: Decimal, ask: Decimal) -> Option<Self> {
        Some(Self {
            bid: Price::new(bid)?,
            ask: Price::new(ask)?,
        })
    }

    pub fn side(&self, side: PriceSide) -> Price {
        match side {
            PriceSide::Bid => self.bid,
            PriceSide::Ask => self.ask,
        }
    }

    pub fn spread(&self) -> Decimal {
        self.ask.value() - self.bid.value()
    }
}

/// Most recent quote per pair at one time step.
#[derive(Debug, Clone, Default)]
pub struct QuoteSnapshot {
    quotes: HashMap<CurrencyPair, BidAsk>,
}

impl QuoteSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pair: CurrencyPair, quote: BidAsk) -> Self {
        self.insert(pair, quote);
        self
    }

    pub fn insert(&mut self, pair: CurrencyPair, quote: BidAsk) -> Option<BidAsk> {
        self.quotes.insert(pair, quote)
    }

    pub fn get(&self, pair: &CurrencyPair) -> Option<&BidAsk> {
        self.quotes.get(pair)
    }

    pub fn contains(&self, pair: &CurrencyPair) -> bool {
        self.quotes.contains_key(pair)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
