//! Entry flow — resolve the scrip, buy in, and seed the trailing position.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use option_trail_smartapi::{OrderRequest, SessionTokens, SmartApiClient};

use crate::types::{ManagerConfig, OptionRight, TrailingPosition};

/// Places the entry market BUY and builds the position it opened.
///
/// The entry price is the first LTP observed after the order is accepted;
/// the initial stop sits `initial_stop_offset` points below it.
pub async fn open_position(
    client: &SmartApiClient,
    tokens: &SessionTokens,
    config: &ManagerConfig,
    tradingsymbol: &str,
    right: OptionRight,
    quantity: u32,
) -> Result<TrailingPosition> {
    let scrip = client
        .search_scrip(tokens, config.exchange, tradingsymbol)
        .await
        .with_context(|| format!("failed to resolve symboltoken for {tradingsymbol}"))?;

    let order = OrderRequest::market_buy(
        &scrip.tradingsymbol,
        &scrip.symboltoken,
        config.exchange,
        quantity,
    );
    let receipt = client
        .place_order(tokens, &order)
        .await
        .context("entry order failed")?;

    let quote = client
        .ltp(tokens, config.exchange, &scrip.tradingsymbol, &scrip.symboltoken)
        .await
        .context("failed to fetch entry price")?;

    let position = TrailingPosition {
        tradingsymbol: scrip.tradingsymbol,
        symboltoken: scrip.symboltoken,
        exchange: config.exchange,
        right,
        quantity,
        entry_price: quote.ltp,
        trailing_interval: config.trailing_interval,
        stop_loss: quote.ltp - config.initial_stop_offset,
        opened_at: Utc::now(),
    };

    info!(
        order_id = receipt.order_id,
        tradingsymbol = position.tradingsymbol,
        right = %position.right,
        entry_price = %position.entry_price,
        stop_loss = %position.stop_loss,
        "Position opened"
    );

    Ok(position)
}
