//! Monitor loop — poll the LTP, ratchet the stop, flatten on stop hit.

use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use option_trail_smartapi::{
    OrderReceipt, OrderRequest, SessionTokens, SmartApiClient, SmartApiError,
};

use crate::stops;
use crate::types::{ManagerConfig, StopEvent, TrailingPosition};

/// How the monitor loop ended.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// Final state of the position when the loop exited.
    pub position: TrailingPosition,
    /// Order id of the closing SELL.
    pub exit_order_id: String,
    /// The LTP that triggered the stop.
    pub exit_ltp: Decimal,
}

/// Runs the trailing-stop monitor until the stop triggers.
///
/// Each tick: fetch LTP, ratchet the stop, check the stop. Transient
/// broker/network failures are retried after `retry_delay_secs`; any other
/// error terminates the loop (a stale stop on a live position is worse
/// than exiting).
pub async fn run(
    client: &SmartApiClient,
    tokens: &SessionTokens,
    mut position: TrailingPosition,
    config: &ManagerConfig,
) -> Result<SessionOutcome> {
    info!(
        tradingsymbol = position.tradingsymbol,
        entry_price = %position.entry_price,
        stop_loss = %position.stop_loss,
        trailing_interval = %position.trailing_interval,
        poll_secs = config.poll_interval_secs,
        "Trailing stop monitor started"
    );

    let mut interval =
        tokio::time::interval(Duration::from_secs(config.poll_interval_secs.max(1)));

    loop {
        interval.tick().await;

        let quote = match client
            .ltp(
                tokens,
                position.exchange,
                &position.tradingsymbol,
                &position.symboltoken,
            )
            .await
        {
            Ok(q) => q,
            Err(e) if e.is_transient() => {
                let delay = match &e {
                    SmartApiError::RateLimit { retry_after_secs } => *retry_after_secs,
                    _ => config.retry_delay_secs,
                };
                warn!(error = %e, delay_secs = delay, "LTP fetch failed, retrying");
                tokio::time::sleep(Duration::from_secs(delay)).await;
                continue;
            }
            Err(e) => {
                error!(error = %e, "LTP fetch failed with terminal error");
                return Err(e).context("monitor loop terminated");
            }
        };

        tracing::debug!(ltp = %quote.ltp, stop_loss = %position.stop_loss, "Tick");

        stops::update_trailing_stop(&mut position, quote.ltp);

        if let Some(StopEvent::StopHit { ltp, stop_loss }) =
            stops::check_stop_hit(&position, quote.ltp)
        {
            let receipt = flatten(client, tokens, &position).await?;
            info!(
                order_id = receipt.order_id,
                ltp = %ltp,
                stop_loss = %stop_loss,
                "Position closed on stop"
            );
            return Ok(SessionOutcome {
                position,
                exit_order_id: receipt.order_id,
                exit_ltp: ltp,
            });
        }
    }
}

/// Submits the market SELL that closes the position.
async fn flatten(
    client: &SmartApiClient,
    tokens: &SessionTokens,
    position: &TrailingPosition,
) -> Result<OrderReceipt> {
    let order = OrderRequest::market_sell(
        &position.tradingsymbol,
        &position.symboltoken,
        position.exchange,
        position.quantity,
    );
    client
        .place_order(tokens, &order)
        .await
        .context("exit order failed")
}
