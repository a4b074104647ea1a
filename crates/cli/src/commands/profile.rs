//! Fetch and print the user profile.

use anyhow::Result;
use clap::Args;

use option_trail_smartapi::SmartApiClient;

/// Arguments for the profile command.
#[derive(Args, Debug)]
pub struct ProfileArgs {}

/// Logs in and prints the profile.
pub async fn run(_args: ProfileArgs) -> Result<()> {
    let client = SmartApiClient::production()?;
    let tokens = super::interactive_login(&client).await?;

    let profile = client.get_profile(&tokens).await?;

    println!("Client code: {}", profile.client_code);
    println!("Name:        {}", profile.name);
    println!("Email:       {}", profile.email);
    println!("Exchanges:   {}", profile.exchanges.join(", "));
    println!("Products:    {}", profile.products.join(", "));

    Ok(())
}
