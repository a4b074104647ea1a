//! SmartAPI REST client with rate limiting.
//!
//! Provides typed access to the Angel One SmartAPI endpoints used by the
//! trailing-stop bot: session login/refresh, profile, scrip lookup, order
//! placement, and last-traded-price quotes.
//!
//! # Example
//!
//! ```ignore
//! use option_trail_smartapi::{SmartApiClient, SmartApiClientConfig};
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SmartApiClient::production()?;
//!     let pin = SecretString::from("1234");
//!     let tokens = client.login(&pin, "987654").await?;
//!     let profile = client.get_profile(&tokens).await?;
//!     println!("Logged in as {}", profile.client_code);
//!     Ok(())
//! }
//! ```

use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::auth::{SmartApiAuth, SmartApiAuthConfig};
use crate::error::{Result, SmartApiError};
use crate::types::{
    ApiEnvelope, Exchange, LtpQuote, OrderReceipt, OrderRequest, Profile, ScripMatch,
    SessionTokens,
};

// =============================================================================
// Constants
// =============================================================================

/// SmartAPI production base URL.
pub const SMARTAPI_PROD_URL: &str = "https://apiconnect.angelone.in";

const LOGIN_PATH: &str = "/rest/auth/angelbroking/user/v1/loginByPassword";
const GENERATE_TOKENS_PATH: &str = "/rest/auth/angelbroking/jwt/v1/generateTokens";
const PROFILE_PATH: &str = "/rest/secure/angelbroking/user/v1/getProfile";
const SEARCH_SCRIP_PATH: &str = "/rest/secure/angelbroking/order/v1/searchScrip";
const PLACE_ORDER_PATH: &str = "/rest/secure/angelbroking/order/v1/placeOrder";
const LTP_PATH: &str = "/rest/secure/angelbroking/order/v1/getLtpData";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the SmartAPI client.
#[derive(Debug, Clone)]
pub struct SmartApiClientConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Authentication configuration.
    pub auth_config: SmartApiAuthConfig,

    /// Requests per minute limit.
    pub requests_per_minute: NonZeroU32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SmartApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: SMARTAPI_PROD_URL.to_string(),
            auth_config: SmartApiAuthConfig::default(),
            requests_per_minute: nonzero!(60u32),
            timeout_secs: 10,
        }
    }
}

impl SmartApiClientConfig {
    /// Creates a configuration for production.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the authentication configuration.
    #[must_use]
    pub fn with_auth_config(mut self, config: SmartApiAuthConfig) -> Self {
        self.auth_config = config;
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// =============================================================================
// Request/Response bodies
// =============================================================================

#[derive(Serialize)]
struct LoginBody<'a> {
    clientcode: &'a str,
    password: &'a str,
    totp: &'a str,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct SearchScripBody<'a> {
    exchange: &'a str,
    searchscrip: &'a str,
}

#[derive(Serialize)]
struct LtpBody<'a> {
    exchange: &'a str,
    tradingsymbol: &'a str,
    symboltoken: &'a str,
}

#[derive(Deserialize)]
struct RawSessionData {
    #[serde(rename = "jwtToken")]
    jwt_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
    #[serde(rename = "feedToken", default)]
    feed_token: Option<String>,
}

impl From<RawSessionData> for SessionTokens {
    fn from(raw: RawSessionData) -> Self {
        SessionTokens::new(raw.jwt_token, raw.refresh_token, raw.feed_token)
    }
}

// =============================================================================
// SmartApiClient
// =============================================================================

/// SmartAPI REST client.
///
/// All requests are rate-limited and carry the SmartAPI header set.
pub struct SmartApiClient {
    /// Configuration.
    config: SmartApiClientConfig,

    /// HTTP client.
    http: Client,

    /// Rate limiter.
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,

    /// Credential holder.
    auth: SmartApiAuth,
}

impl std::fmt::Debug for SmartApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartApiClient")
            .field("base_url", &self.config.base_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .finish_non_exhaustive()
    }
}

impl SmartApiClient {
    /// Creates a new client, loading credentials from the environment.
    ///
    /// # Errors
    /// Returns error if credential environment variables are missing or the
    /// HTTP client cannot be built.
    pub fn new(config: SmartApiClientConfig) -> Result<Self> {
        let auth = SmartApiAuth::from_env(config.auth_config.clone())?;
        Self::with_auth(config, auth)
    }

    /// Creates a new client with explicit credentials (useful for testing).
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_auth(config: SmartApiClientConfig, auth: SmartApiAuth) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SmartApiError::Network(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(config.requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            config,
            http,
            rate_limiter,
            auth,
        })
    }

    /// Creates a client for production.
    ///
    /// # Errors
    /// Returns error if credential environment variables are missing.
    pub fn production() -> Result<Self> {
        Self::new(SmartApiClientConfig::production())
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the client code credentials were loaded for.
    #[must_use]
    pub fn client_code(&self) -> &str {
        self.auth.client_code()
    }

    /// Validates a tradingsymbol before it is sent to the API.
    ///
    /// Valid symbols contain only alphanumeric characters, hyphens, and
    /// underscores. Example: "NIFTY23SEP18000CE"
    pub fn validate_tradingsymbol(symbol: &str) -> Result<&str> {
        if symbol.is_empty() {
            return Err(SmartApiError::InvalidOrder(
                "tradingsymbol cannot be empty".to_string(),
            ));
        }

        if !symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SmartApiError::InvalidOrder(format!(
                "invalid tradingsymbol: must contain only alphanumeric, hyphen, or underscore: {symbol}"
            )));
        }

        if symbol.len() > 64 {
            return Err(SmartApiError::InvalidOrder(format!(
                "invalid tradingsymbol: exceeds maximum length of 64: {}",
                symbol.len()
            )));
        }

        Ok(symbol)
    }

    /// Waits for the rate limiter and POSTs a JSON body.
    async fn post<T: serde::de::DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        jwt: Option<&SecretString>,
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("POST {}", url);

        let mut request = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");

        for (name, value) in self.auth.base_headers() {
            request = request.header(name, value);
        }
        if let Some(jwt) = jwt {
            request = request.header(
                "Authorization",
                format!("Bearer {}", jwt.expose_secret()),
            );
        }

        let response = request.json(body).send().await?;
        self.handle_response(response).await
    }

    /// Waits for the rate limiter and makes an authenticated GET request.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        jwt: &SecretString,
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("GET {}", url);

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header(
                "Authorization",
                format!("Bearer {}", jwt.expose_secret()),
            );

        for (name, value) in self.auth.base_headers() {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Unwraps HTTP status and the SmartAPI envelope.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(SmartApiError::rate_limit(retry_after));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SmartApiError::api(status.as_u16(), text));
        }

        let envelope = response.json::<ApiEnvelope<T>>().await?;

        if !envelope.status {
            return Err(SmartApiError::broker(envelope.errorcode, envelope.message));
        }

        envelope
            .data
            .ok_or_else(|| SmartApiError::Serialization("missing data in response".to_string()))
    }

    // =========================================================================
    // Session Endpoints
    // =========================================================================

    /// Logs in with the client's PIN and a TOTP, returning session tokens.
    ///
    /// # Errors
    /// Returns `Authentication` if the broker rejects the credentials.
    pub async fn login(&self, pin: &SecretString, totp: &str) -> Result<SessionTokens> {
        let body = LoginBody {
            clientcode: self.auth.client_code(),
            password: pin.expose_secret(),
            totp,
        };

        let raw: RawSessionData =
            self.post(LOGIN_PATH, &body, None).await.map_err(|e| match e {
                SmartApiError::Broker { errorcode, message } => SmartApiError::Authentication(
                    format!("login rejected ({errorcode}): {message}"),
                ),
                other => other,
            })?;

        tracing::info!(client_code = self.auth.client_code(), "Logged in");
        Ok(raw.into())
    }

    /// Mints a fresh JWT from the refresh token.
    ///
    /// # Errors
    /// Returns `Authentication` if the refresh token is no longer valid.
    pub async fn generate_tokens(&self, tokens: &SessionTokens) -> Result<SessionTokens> {
        let body = RefreshBody {
            refresh_token: tokens.refresh().expose_secret(),
        };

        let raw: RawSessionData = self
            .post(GENERATE_TOKENS_PATH, &body, Some(tokens.jwt()))
            .await
            .map_err(|e| match e {
                SmartApiError::Broker { errorcode, message } => SmartApiError::Authentication(
                    format!("token refresh rejected ({errorcode}): {message}"),
                ),
                other => other,
            })?;

        tracing::info!("Session tokens refreshed");
        Ok(raw.into())
    }

    /// Fetches the user profile.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn get_profile(&self, tokens: &SessionTokens) -> Result<Profile> {
        self.get(PROFILE_PATH, tokens.jwt()).await
    }

    // =========================================================================
    // Market Endpoints
    // =========================================================================

    /// Resolves a tradingsymbol to its symboltoken via scrip search.
    ///
    /// # Errors
    /// Returns `ScripNotFound` if no scrip matches exactly.
    pub async fn search_scrip(
        &self,
        tokens: &SessionTokens,
        exchange: Exchange,
        tradingsymbol: &str,
    ) -> Result<ScripMatch> {
        let tradingsymbol = Self::validate_tradingsymbol(tradingsymbol)?;

        let exchange_str = exchange.to_string();
        let body = SearchScripBody {
            exchange: &exchange_str,
            searchscrip: tradingsymbol,
        };

        let matches: Vec<ScripMatch> = self
            .post(SEARCH_SCRIP_PATH, &body, Some(tokens.jwt()))
            .await?;

        matches
            .into_iter()
            .find(|m| m.tradingsymbol.eq_ignore_ascii_case(tradingsymbol))
            .ok_or_else(|| SmartApiError::scrip_not_found(tradingsymbol))
    }

    /// Fetches the last traded price for an instrument.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn ltp(
        &self,
        tokens: &SessionTokens,
        exchange: Exchange,
        tradingsymbol: &str,
        symboltoken: &str,
    ) -> Result<LtpQuote> {
        let tradingsymbol = Self::validate_tradingsymbol(tradingsymbol)?;

        let exchange_str = exchange.to_string();
        let body = LtpBody {
            exchange: &exchange_str,
            tradingsymbol,
            symboltoken,
        };

        self.post(LTP_PATH, &body, Some(tokens.jwt())).await
    }

    // =========================================================================
    // Order Endpoints
    // =========================================================================

    /// Places an order.
    ///
    /// # Errors
    /// Returns `OrderRejected` if the broker refuses the order.
    pub async fn place_order(
        &self,
        tokens: &SessionTokens,
        order: &OrderRequest,
    ) -> Result<OrderReceipt> {
        Self::validate_tradingsymbol(&order.tradingsymbol)?;

        if order.quantity == 0 {
            return Err(SmartApiError::InvalidOrder(
                "quantity must be positive".to_string(),
            ));
        }

        let receipt: OrderReceipt = self
            .post(PLACE_ORDER_PATH, order, Some(tokens.jwt()))
            .await
            .map_err(|e| match e {
                SmartApiError::Broker { errorcode, message } => {
                    SmartApiError::OrderRejected(format!("{errorcode}: {message}"))
                }
                other => other,
            })?;

        tracing::info!(
            order_id = receipt.order_id,
            tradingsymbol = order.tradingsymbol,
            transactiontype = ?order.transactiontype,
            quantity = order.quantity,
            "Order placed"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> SmartApiClient {
        let config = SmartApiClientConfig::default()
            .with_base_url(base_url)
            .with_rate_limit(nonzero!(600u32));
        let auth = SmartApiAuth::new("test-api-key", "C12345");
        SmartApiClient::with_auth(config, auth).unwrap()
    }

    fn test_tokens() -> SessionTokens {
        SessionTokens::new("jwt-abc".to_string(), "refresh-abc".to_string(), None)
    }

    // ==================== Config Tests ====================

    #[test]
    fn client_config_default() {
        let config = SmartApiClientConfig::default();
        assert_eq!(config.base_url, SMARTAPI_PROD_URL);
        assert_eq!(config.requests_per_minute.get(), 60);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn client_config_builder() {
        let config = SmartApiClientConfig::default()
            .with_base_url("https://custom.url")
            .with_rate_limit(nonzero!(120u32))
            .with_timeout_secs(30);

        assert_eq!(config.base_url, "https://custom.url");
        assert_eq!(config.requests_per_minute.get(), 120);
        assert_eq!(config.timeout_secs, 30);
    }

    // ==================== Validation Tests ====================

    #[test]
    fn validate_tradingsymbol_accepts_option_symbols() {
        assert!(SmartApiClient::validate_tradingsymbol("NIFTY23SEP18000CE").is_ok());
        assert!(SmartApiClient::validate_tradingsymbol("BANKNIFTY_TEST-1").is_ok());
    }

    #[test]
    fn validate_tradingsymbol_rejects_bad_input() {
        assert!(SmartApiClient::validate_tradingsymbol("").is_err());
        assert!(SmartApiClient::validate_tradingsymbol("foo/bar").is_err());
        assert!(SmartApiClient::validate_tradingsymbol("foo bar").is_err());
        assert!(SmartApiClient::validate_tradingsymbol(&"A".repeat(65)).is_err());
    }

    // ==================== Endpoint Tests ====================

    #[tokio::test]
    async fn login_returns_session_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/auth/angelbroking/user/v1/loginByPassword"))
            .and(header("X-PrivateKey", "test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "clientcode": "C12345",
                "password": "1234"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": true,
                "message": "SUCCESS",
                "errorcode": "",
                "data": {
                    "jwtToken": "jwt-xyz",
                    "refreshToken": "refresh-xyz",
                    "feedToken": "feed-xyz"
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let pin = SecretString::from("1234");
        let tokens = client.login(&pin, "987654").await.unwrap();

        assert_eq!(tokens.jwt().expose_secret(), "jwt-xyz");
        assert_eq!(tokens.refresh().expose_secret(), "refresh-xyz");
        assert!(tokens.feed().is_some());
    }

    #[tokio::test]
    async fn login_rejection_maps_to_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/auth/angelbroking/user/v1/loginByPassword"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": false,
                "message": "Invalid totp",
                "errorcode": "AB1050",
                "data": null
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let pin = SecretString::from("1234");
        let err = client.login(&pin, "000000").await.unwrap_err();

        assert!(matches!(err, SmartApiError::Authentication(_)));
        assert!(err.to_string().contains("AB1050"));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn generate_tokens_mints_fresh_session() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/auth/angelbroking/jwt/v1/generateTokens"))
            .and(header("Authorization", "Bearer jwt-abc"))
            .and(body_partial_json(serde_json::json!({
                "refreshToken": "refresh-abc"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": true,
                "message": "SUCCESS",
                "errorcode": "",
                "data": {
                    "jwtToken": "jwt-new",
                    "refreshToken": "refresh-new",
                    "feedToken": "feed-new"
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let fresh = client.generate_tokens(&test_tokens()).await.unwrap();

        assert_eq!(fresh.jwt().expose_secret(), "jwt-new");
        assert_eq!(fresh.refresh().expose_secret(), "refresh-new");
    }

    #[tokio::test]
    async fn generate_tokens_rejection_maps_to_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/auth/angelbroking/jwt/v1/generateTokens"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": false,
                "message": "Token expired",
                "errorcode": "AG8002",
                "data": null
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate_tokens(&test_tokens()).await.unwrap_err();

        assert!(matches!(err, SmartApiError::Authentication(_)));
        assert!(err.to_string().contains("AG8002"));
    }

    #[tokio::test]
    async fn ltp_parses_decimal_price() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/secure/angelbroking/order/v1/getLtpData"))
            .and(header("Authorization", "Bearer jwt-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": true,
                "message": "SUCCESS",
                "errorcode": "",
                "data": {
                    "exchange": "NFO",
                    "tradingsymbol": "NIFTY23SEP18000CE",
                    "symboltoken": "43125",
                    "ltp": 120.55
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let quote = client
            .ltp(&test_tokens(), Exchange::Nfo, "NIFTY23SEP18000CE", "43125")
            .await
            .unwrap();

        assert_eq!(quote.ltp, dec!(120.55));
        assert_eq!(quote.symboltoken, "43125");
    }

    #[tokio::test]
    async fn search_scrip_picks_exact_match() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/secure/angelbroking/order/v1/searchScrip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": true,
                "message": "SUCCESS",
                "errorcode": "",
                "data": [
                    {
                        "exchange": "NFO",
                        "tradingsymbol": "NIFTY23SEP18000CE",
                        "symboltoken": "43125"
                    },
                    {
                        "exchange": "NFO",
                        "tradingsymbol": "NIFTY23SEP18000PE",
                        "symboltoken": "43126"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let scrip = client
            .search_scrip(&test_tokens(), Exchange::Nfo, "NIFTY23SEP18000CE")
            .await
            .unwrap();

        assert_eq!(scrip.symboltoken, "43125");
    }

    #[tokio::test]
    async fn search_scrip_without_match_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/secure/angelbroking/order/v1/searchScrip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": true,
                "message": "SUCCESS",
                "errorcode": "",
                "data": []
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .search_scrip(&test_tokens(), Exchange::Nfo, "NIFTY23SEP18000CE")
            .await
            .unwrap_err();

        assert!(matches!(err, SmartApiError::ScripNotFound { .. }));
    }

    #[tokio::test]
    async fn place_order_returns_receipt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/secure/angelbroking/order/v1/placeOrder"))
            .and(body_partial_json(serde_json::json!({
                "variety": "NORMAL",
                "transactiontype": "BUY",
                "ordertype": "MARKET"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": true,
                "message": "SUCCESS",
                "errorcode": "",
                "data": {
                    "script": "NIFTY23SEP18000CE",
                    "orderid": "230905000123456",
                    "uniqueorderid": "abc-123"
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let order = OrderRequest::market_buy("NIFTY23SEP18000CE", "43125", Exchange::Nfo, 50);
        let receipt = client.place_order(&test_tokens(), &order).await.unwrap();

        assert_eq!(receipt.order_id, "230905000123456");
        assert_eq!(receipt.unique_order_id.as_deref(), Some("abc-123"));
    }

    #[tokio::test]
    async fn place_order_broker_failure_maps_to_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/secure/angelbroking/order/v1/placeOrder"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": false,
                "message": "Insufficient funds",
                "errorcode": "AB1011",
                "data": null
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let order = OrderRequest::market_buy("NIFTY23SEP18000CE", "43125", Exchange::Nfo, 50);
        let err = client.place_order(&test_tokens(), &order).await.unwrap_err();

        assert!(matches!(err, SmartApiError::OrderRejected(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn place_order_zero_quantity_rejected_locally() {
        let client = test_client("http://127.0.0.1:1");
        let order = OrderRequest::market_buy("NIFTY23SEP18000CE", "43125", Exchange::Nfo, 0);
        let err = client.place_order(&test_tokens(), &order).await.unwrap_err();
        assert!(matches!(err, SmartApiError::InvalidOrder(_)));
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/secure/angelbroking/order/v1/getLtpData"))
            .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .ltp(&test_tokens(), Exchange::Nfo, "NIFTY23SEP18000CE", "43125")
            .await
            .unwrap_err();

        assert!(matches!(err, SmartApiError::Api { status_code: 503, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn rate_limited_response_carries_retry_after() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/secure/angelbroking/user/v1/getProfile"))
            .respond_with(
                ResponseTemplate::new(429).insert_header("Retry-After", "15"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.get_profile(&test_tokens()).await.unwrap_err();

        assert!(matches!(
            err,
            SmartApiError::RateLimit {
                retry_after_secs: 15
            }
        ));
    }

    #[tokio::test]
    async fn profile_decodes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/secure/angelbroking/user/v1/getProfile"))
            .and(header("Authorization", "Bearer jwt-abc"))
            .and(header("Content-Type", "application/json"))
            .and(header("X-PrivateKey", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": true,
                "message": "SUCCESS",
                "errorcode": "",
                "data": {
                    "clientcode": "C12345",
                    "name": "Test User",
                    "email": "test@example.com",
                    "exchanges": ["NSE", "NFO"],
                    "products": ["INTRADAY"]
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let profile = client.get_profile(&test_tokens()).await.unwrap();

        assert_eq!(profile.client_code, "C12345");
        assert_eq!(profile.exchanges, vec!["NSE", "NFO"]);
    }
}
