//! The main flow: login, buy the option, trail the stop until it hits.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use option_trail_manager::{config, entry, service, OptionRight};
use option_trail_smartapi::SmartApiClient;

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Option tradingsymbol (e.g. "NIFTY23SEP18000CE").
    #[arg(long)]
    pub symbol: String,

    /// Contract quantity to buy (multiples of the lot size).
    #[arg(long, default_value_t = 50)]
    pub quantity: u32,

    /// Option right: call or put.
    #[arg(long, default_value = "call")]
    pub right: OptionRight,

    /// Optional config file path (TOML).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Runs the full session: login, entry order, trailing-stop monitor.
pub async fn run(args: RunArgs) -> Result<()> {
    let manager_config = config::load(args.config.as_deref())?;
    let client = SmartApiClient::production()?;

    let tokens = super::interactive_login(&client).await?;

    let profile = client.get_profile(&tokens).await?;
    info!(client_code = profile.client_code, name = profile.name, "Session active");

    let position = entry::open_position(
        &client,
        &tokens,
        &manager_config,
        &args.symbol,
        args.right,
        args.quantity,
    )
    .await?;

    let outcome = service::run(&client, &tokens, position, &manager_config).await?;

    println!(
        "Closed {} at LTP {} (stop {}), exit order {}",
        outcome.position.tradingsymbol,
        outcome.exit_ltp,
        outcome.position.stop_loss,
        outcome.exit_order_id
    );

    Ok(())
}
