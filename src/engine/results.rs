// 8.0.2: result types and errors for account operations.
// rejections are routine business outcomes; errors are caller contract violations.

use crate::position::Position;
use crate::types::{CurrencyPair, Money, Price, Ticket, Timestamp, Volume};
use serde::{Deserialize, Serialize};

/// Why `open` declined to create a position. Nothing is mutated on rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum OpenRejection {
    #[error("Pair {pair} does not contain the account currency")]
    PairExcludesAccountCurrency { pair: CurrencyPair },

    #[error("Volume {volume} is below the minimum of {min}")]
    VolumeBelowMinimum { volume: Volume, min: Volume },

    #[error("Insufficient balance: margin {margin}, balance {balance}")]
    InsufficientBalance { margin: Money, balance: Money },

    #[error("Ticket {0} already has an open position")]
    DuplicateTicket(Ticket),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum OpenOutcome {
    Opened { volume: Volume, open_price: Price, margin: Money },
    Rejected(OpenRejection),
}

impl OpenOutcome {
    pub fn is_opened(&self) -> bool {
        matches!(self, OpenOutcome::Opened { .. })
    }

    pub fn rejection(&self) -> Option<&OpenRejection> {
        match self {
            OpenOutcome::Opened { .. } => None,
            OpenOutcome::Rejected(reason) => Some(reason),
        }
    }
}

/// Everything a driver needs to log a closed order.
#[derive(Debug, Clone)]
pub struct CloseResult {
    pub position: Position,
    pub realized_profit: Money,
    pub margin_released: Money,
    pub close_price: Price,
    pub closed_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("No open position for ticket {0}")]
    PositionNotFound(Ticket),

    #[error("Quote snapshot has no price for {0}")]
    MissingQuote(CurrencyPair),
}
