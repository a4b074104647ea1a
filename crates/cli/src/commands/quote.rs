//! Fetch a single LTP quote — quick way to verify credentials and symbols.

use anyhow::Result;
use clap::Args;

use option_trail_smartapi::{Exchange, SmartApiClient};

/// Arguments for the quote command.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Option tradingsymbol (e.g. "NIFTY23SEP18000CE").
    #[arg(long)]
    pub symbol: String,

    /// Exchange segment.
    #[arg(long, default_value = "NFO")]
    pub exchange: Exchange,
}

/// Logs in and prints one quote.
pub async fn run(args: QuoteArgs) -> Result<()> {
    let client = SmartApiClient::production()?;
    let tokens = super::interactive_login(&client).await?;

    let scrip = client
        .search_scrip(&tokens, args.exchange, &args.symbol)
        .await?;
    let quote = client
        .ltp(&tokens, args.exchange, &scrip.tradingsymbol, &scrip.symboltoken)
        .await?;

    println!(
        "{} ({} token {}): LTP {}",
        quote.tradingsymbol, quote.exchange, quote.symboltoken, quote.ltp
    );

    Ok(())
}
