//! Trailing stop rules.

use rust_decimal::Decimal;

use crate::types::{StopEvent, TrailingPosition};

/// Ratchets the trailing stop upward if the price has moved far enough.
///
/// Once `ltp >= entry_price + trailing_interval`, the stop becomes
/// `max(stop_loss, ltp - trailing_interval)`. The stop never moves down.
/// Returns an event only when the stop actually moved.
pub fn update_trailing_stop(pos: &mut TrailingPosition, ltp: Decimal) -> Option<StopEvent> {
    if ltp < pos.trail_threshold() {
        return None;
    }

    let candidate = ltp - pos.trailing_interval;
    if candidate <= pos.stop_loss {
        return None;
    }

    let from = pos.stop_loss;
    pos.stop_loss = candidate;
    tracing::info!(
        tradingsymbol = pos.tradingsymbol,
        from = %from,
        to = %pos.stop_loss,
        ltp = %ltp,
        "Trailing stop raised"
    );
    Some(StopEvent::StopRaised {
        from,
        to: candidate,
    })
}

/// Checks whether the price has fallen to or through the stop.
pub fn check_stop_hit(pos: &TrailingPosition, ltp: Decimal) -> Option<StopEvent> {
    if ltp <= pos.stop_loss {
        tracing::warn!(
            tradingsymbol = pos.tradingsymbol,
            ltp = %ltp,
            stop_loss = %pos.stop_loss,
            "Stop loss hit"
        );
        return Some(StopEvent::StopHit {
            ltp,
            stop_loss: pos.stop_loss,
        });
    }
    None
}
