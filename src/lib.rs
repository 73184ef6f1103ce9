// fxsim-core: forex account simulation engine.
// margin-first accounting: every open, mark and close must reconcile to the cent.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Ticket, currencies, OrderType, Price, Money, Volume, Leverage
//   3.x  margin.rs: lot value, margin, profit formula, margin level
//   4.x  position.rs: position struct, SL/TP levels, expected profit/loss
//   7.x  config.rs: account settings, account type presets
//   8.x  engine/: open, close, mark-to-market on the account
//   9.x  quote.rs: bid/ask records and per-step snapshots
//   10.x account.rs: account state + realized/live metrics
//   11.x events.rs: state transition events for audit
//   12.x history.rs: closed order records, win rate

pub mod account;
pub mod config;
pub mod engine;
pub mod events;
pub mod history;
pub mod margin;
pub mod position;
pub mod quote;
pub mod types;

// re exports for convenience
pub use account::*;
pub use config::*;
pub use engine::*;
pub use events::*;
pub use history::*;
pub use margin::*;
pub use position::*;
pub use quote::*;
pub use types::*;
