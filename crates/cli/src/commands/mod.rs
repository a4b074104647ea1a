//! CLI command implementations.

pub mod profile;
pub mod quote;
pub mod run;

pub use profile::ProfileArgs;
pub use quote::QuoteArgs;
pub use run::RunArgs;

use anyhow::{Context, Result};
use secrecy::SecretString;

use option_trail_smartapi::{SessionTokens, SmartApiClient};

/// Reads one line from stdin after printing a prompt.
fn prompt(label: &str) -> Result<String> {
    use std::io::Write;

    print!("{label}: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Prompts for PIN and TOTP and performs the interactive login.
///
/// After login the JWT is exchanged through `generateTokens`, which both
/// verifies the refresh token works and starts the session on a fresh JWT.
pub(crate) async fn interactive_login(client: &SmartApiClient) -> Result<SessionTokens> {
    let pin = SecretString::from(prompt("Enter your 4-digit PIN")?);
    let totp = prompt("Enter TOTP from your authenticator app")?;

    let tokens = client
        .login(&pin, &totp)
        .await
        .context("login failed")?;

    let tokens = client
        .generate_tokens(&tokens)
        .await
        .context("token refresh failed")?;

    Ok(tokens)
}
