//! Angel One SmartAPI integration for options trading.
//!
//! This crate provides:
//! - REST client with rate limiting for the SmartAPI trading endpoints
//! - Session login (PIN + TOTP) and JWT refresh
//! - Scrip lookup, market order placement, and last-traded-price quotes
//! - Typed errors with transient/terminal classification
//!
//! # Authentication
//!
//! Set the following environment variables:
//!
//! - `SMARTAPI_API_KEY`: Your SmartAPI application key
//! - `SMARTAPI_CLIENT_ID`: Your Angel One client code
//!
//! The trading PIN and TOTP are supplied at runtime by the caller.
//!
//! # API Endpoints
//!
//! - `POST /rest/auth/angelbroking/user/v1/loginByPassword` - Login
//! - `POST /rest/auth/angelbroking/jwt/v1/generateTokens` - Refresh JWT
//! - `GET  /rest/secure/angelbroking/user/v1/getProfile` - User profile
//! - `POST /rest/secure/angelbroking/order/v1/searchScrip` - Symbol lookup
//! - `POST /rest/secure/angelbroking/order/v1/placeOrder` - Place order
//! - `POST /rest/secure/angelbroking/order/v1/getLtpData` - Last traded price

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use auth::{SmartApiAuth, SmartApiAuthConfig};
pub use client::{SmartApiClient, SmartApiClientConfig, SMARTAPI_PROD_URL};
pub use error::{Result, SmartApiError};
pub use types::{
    ApiEnvelope, Exchange, LtpQuote, OrderReceipt, OrderRequest, Profile, ScripMatch,
    SessionTokens, TransactionType,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = SmartApiAuthConfig::default();
        let _ = SmartApiClientConfig::default();
        assert!(SMARTAPI_PROD_URL.starts_with("https://"));
    }

    #[test]
    fn error_types_accessible() {
        let err = SmartApiError::api(500, "oops");
        assert!(err.is_transient());
    }
}
