use clap::{Parser, Subcommand};

mod commands;

use commands::{ProfileArgs, QuoteArgs, RunArgs};

#[derive(Parser)]
#[command(name = "option-trail")]
#[command(about = "Trailing stop-loss bot for Angel One options", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Buy an option and manage it with a trailing stop until the stop hits
    Run(RunArgs),
    /// Fetch a single last-traded-price quote (diagnostic)
    Quote(QuoteArgs),
    /// Fetch and print the user profile (diagnostic)
    Profile(ProfileArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::run(args).await?,
        Commands::Quote(args) => commands::quote::run(args).await?,
        Commands::Profile(args) => commands::profile::run(args).await?,
    }

    Ok(())
}
