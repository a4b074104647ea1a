//! Data models for SmartAPI requests and responses.

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// SmartAPI wraps every response body in this envelope.
///
/// HTTP 200 does not mean success: the broker reports failures through
/// `status: false` plus an `errorcode`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errorcode: String,
    pub data: Option<T>,
}

/// Tokens issued by the login endpoint.
///
/// The JWT authorizes secure endpoints; the refresh token mints a new JWT
/// when the session expires. Both are secrets and never logged.
pub struct SessionTokens {
    jwt_token: SecretString,
    refresh_token: SecretString,
    feed_token: Option<SecretString>,
}

impl SessionTokens {
    /// Builds tokens from the raw strings in a login/refresh response.
    #[must_use]
    pub fn new(jwt_token: String, refresh_token: String, feed_token: Option<String>) -> Self {
        Self {
            jwt_token: jwt_token.into(),
            refresh_token: refresh_token.into(),
            feed_token: feed_token.map(Into::into),
        }
    }

    /// The current JWT for the Authorization header.
    #[must_use]
    pub fn jwt(&self) -> &SecretString {
        &self.jwt_token
    }

    /// The refresh token for `generateTokens`.
    #[must_use]
    pub fn refresh(&self) -> &SecretString {
        &self.refresh_token
    }

    /// The market-data feed token, if the broker issued one.
    #[must_use]
    pub fn feed(&self) -> Option<&SecretString> {
        self.feed_token.as_ref()
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("jwt_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("feed_token", &self.feed_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// User profile returned by `getProfile`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(rename = "clientcode")]
    pub client_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub exchanges: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
}

/// A scrip returned by `searchScrip` — maps a tradingsymbol to the
/// numeric symboltoken that order and quote endpoints require.
#[derive(Debug, Clone, Deserialize)]
pub struct ScripMatch {
    pub exchange: String,
    pub tradingsymbol: String,
    pub symboltoken: String,
}

/// Last traded price for one instrument.
#[derive(Debug, Clone, Deserialize)]
pub struct LtpQuote {
    pub exchange: String,
    pub tradingsymbol: String,
    pub symboltoken: String,
    pub ltp: Decimal,
}

/// Exchange segment for orders and quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    /// NSE cash segment.
    Nse,
    /// NSE futures and options.
    Nfo,
    /// BSE cash segment.
    Bse,
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nse => write!(f, "NSE"),
            Self::Nfo => write!(f, "NFO"),
            Self::Bse => write!(f, "BSE"),
        }
    }
}

impl std::str::FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NSE" => Ok(Self::Nse),
            "NFO" => Ok(Self::Nfo),
            "BSE" => Ok(Self::Bse),
            other => Err(format!("unknown exchange: {other}")),
        }
    }
}

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Buy,
    Sell,
}

/// Order placement request for `placeOrder`.
///
/// Field names match the SmartAPI wire format.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub variety: String,
    pub tradingsymbol: String,
    pub symboltoken: String,
    pub transactiontype: TransactionType,
    pub exchange: Exchange,
    pub ordertype: String,
    pub producttype: String,
    pub duration: String,
    pub quantity: u32,
}

impl OrderRequest {
    /// An intraday market BUY, the entry order for this bot.
    #[must_use]
    pub fn market_buy(
        tradingsymbol: impl Into<String>,
        symboltoken: impl Into<String>,
        exchange: Exchange,
        quantity: u32,
    ) -> Self {
        Self::market(
            tradingsymbol,
            symboltoken,
            exchange,
            TransactionType::Buy,
            quantity,
        )
    }

    /// An intraday market SELL, used to flatten the position when the
    /// trailing stop triggers.
    #[must_use]
    pub fn market_sell(
        tradingsymbol: impl Into<String>,
        symboltoken: impl Into<String>,
        exchange: Exchange,
        quantity: u32,
    ) -> Self {
        Self::market(
            tradingsymbol,
            symboltoken,
            exchange,
            TransactionType::Sell,
            quantity,
        )
    }

    fn market(
        tradingsymbol: impl Into<String>,
        symboltoken: impl Into<String>,
        exchange: Exchange,
        transactiontype: TransactionType,
        quantity: u32,
    ) -> Self {
        Self {
            variety: "NORMAL".to_string(),
            tradingsymbol: tradingsymbol.into(),
            symboltoken: symboltoken.into(),
            transactiontype,
            exchange,
            ordertype: "MARKET".to_string(),
            producttype: "INTRADAY".to_string(),
            duration: "DAY".to_string(),
            quantity,
        }
    }
}

/// Acknowledgement returned by `placeOrder`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderReceipt {
    #[serde(rename = "orderid")]
    pub order_id: String,
    #[serde(rename = "uniqueorderid", default)]
    pub unique_order_id: Option<String>,
    #[serde(rename = "script", default)]
    pub script: Option<String>,
}
