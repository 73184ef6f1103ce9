// 8.0: account engine. position open, mark-to-market and close on top of the
// account state in account.rs. single caller, synchronous, no I/O.

mod core;
mod orders;
mod positions;
mod pricing;
mod results;

pub use orders::OrderIntent;
pub use results::{CloseResult, EngineError, OpenOutcome, OpenRejection};
