//! Deterministic trailing stop-loss management.
//!
//! Runs as a single blocking poll loop over one options position:
//! - Opens the position with a market BUY via SmartAPI
//! - Polls the last traded price at a fixed interval
//! - Ratchets the stop-loss upward as the price improves (never downward)
//! - Flattens the position with a market SELL when the stop triggers
//!
//! All rules are deterministic; no persistence, the position lives and
//! dies with the process.

pub mod config;
pub mod entry;
pub mod service;
pub mod stops;
pub mod types;

pub use service::SessionOutcome;
pub use types::{ManagerConfig, OptionRight, StopEvent, TrailingPosition};
