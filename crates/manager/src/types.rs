//! Types for trailing-stop position management.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use option_trail_smartapi::Exchange;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    Call,
    Put,
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

impl std::str::FromStr for OptionRight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "call" | "ce" => Ok(Self::Call),
            "put" | "pe" => Ok(Self::Put),
            other => Err(format!("unknown option right: {other}")),
        }
    }
}

/// The single position this bot manages.
///
/// Created when the entry order fills, mutated by each price tick,
/// discarded at process exit. `stop_loss` only ever moves up.
#[derive(Debug, Clone)]
pub struct TrailingPosition {
    pub tradingsymbol: String,
    pub symboltoken: String,
    pub exchange: Exchange,
    pub right: OptionRight,
    pub quantity: u32,
    pub entry_price: Decimal,
    pub trailing_interval: Decimal,
    pub stop_loss: Decimal,
    pub opened_at: DateTime<Utc>,
}

impl TrailingPosition {
    /// The price at which the stop begins trailing.
    #[must_use]
    pub fn trail_threshold(&self) -> Decimal {
        self.entry_price + self.trailing_interval
    }
}

/// What a price tick did to the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopEvent {
    /// The trailing stop ratcheted upward.
    StopRaised { from: Decimal, to: Decimal },
    /// The last traded price crossed the stop; the position must be closed.
    StopHit { ltp: Decimal, stop_loss: Decimal },
}

/// Manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// How often to poll the LTP (seconds).
    pub poll_interval_secs: u64,
    /// Delay before retrying after a transient data-fetch failure (seconds).
    pub retry_delay_secs: u64,
    /// Points the stop trails behind the price.
    pub trailing_interval: Decimal,
    /// Initial stop distance below the entry price.
    pub initial_stop_offset: Decimal,
    /// Exchange segment the option trades on.
    pub exchange: Exchange,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 1,
            retry_delay_secs: 5,
            trailing_interval: Decimal::from(20),
            initial_stop_offset: Decimal::from(20),
            exchange: Exchange::Nfo,
        }
    }
}

impl ManagerConfig {
    /// Rejects values the monitor loop cannot run safely with.
    ///
    /// A zero or negative trailing interval would put the stop at or above
    /// the price on the first raised tick and fire it immediately.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.trailing_interval > Decimal::ZERO,
            "trailing_interval must be positive, got {}",
            self.trailing_interval
        );
        anyhow::ensure!(
            self.initial_stop_offset > Decimal::ZERO,
            "initial_stop_offset must be positive, got {}",
            self.initial_stop_offset
        );
        anyhow::ensure!(
            self.poll_interval_secs > 0,
            "poll_interval_secs must be nonzero"
        );
        anyhow::ensure!(
            self.retry_delay_secs > 0,
            "retry_delay_secs must be nonzero"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_position() -> TrailingPosition {
        TrailingPosition {
            tradingsymbol: "NIFTY23SEP18000CE".to_string(),
            symboltoken: "43125".to_string(),
            exchange: Exchange::Nfo,
            right: OptionRight::Call,
            quantity: 50,
            entry_price: dec!(100),
            trailing_interval: dec!(20),
            stop_loss: dec!(80),
            opened_at: Utc::now(),
        }
    }

    #[test]
    fn trail_threshold_is_entry_plus_interval() {
        let pos = make_position();
        assert_eq!(pos.trail_threshold(), dec!(120));
    }

    #[test]
    fn option_right_parses_both_conventions() {
        assert_eq!("call".parse::<OptionRight>().unwrap(), OptionRight::Call);
        assert_eq!("CE".parse::<OptionRight>().unwrap(), OptionRight::Call);
        assert_eq!("Put".parse::<OptionRight>().unwrap(), OptionRight::Put);
        assert_eq!("pe".parse::<OptionRight>().unwrap(), OptionRight::Put);
        assert!("straddle".parse::<OptionRight>().is_err());
    }

    #[test]
    fn manager_config_defaults_match_strategy() {
        let config = ManagerConfig::default();
        assert_eq!(config.poll_interval_secs, 1);
        assert_eq!(config.retry_delay_secs, 5);
        assert_eq!(config.trailing_interval, dec!(20));
        assert_eq!(config.initial_stop_offset, dec!(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_nonpositive_intervals() {
        let config = ManagerConfig {
            trailing_interval: Decimal::ZERO,
            ..ManagerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ManagerConfig {
            trailing_interval: dec!(-5),
            ..ManagerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ManagerConfig {
            initial_stop_offset: Decimal::ZERO,
            ..ManagerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_poll_interval() {
        let config = ManagerConfig {
            poll_interval_secs: 0,
            ..ManagerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
