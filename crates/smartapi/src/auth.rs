//! Credential handling and SmartAPI request headers.
//!
//! SmartAPI authenticates with a JWT obtained from the login endpoint.
//! Every call also carries a fixed set of identity headers: the API key
//! (`X-PrivateKey`), user type, source, and client network identifiers.
//!
//! # Security
//!
//! - API key and client code come from environment variables
//! - The PIN and TOTP are caller-supplied at runtime and never stored
//! - Credentials are zeroized on drop and redacted in Debug output

use zeroize::Zeroize;

use crate::error::{Result, SmartApiError};

/// Configuration for SmartAPI credentials.
#[derive(Debug, Clone)]
pub struct SmartApiAuthConfig {
    /// Environment variable name for the API key.
    pub api_key_env: String,

    /// Environment variable name for the client code.
    pub client_id_env: String,
}

impl Default for SmartApiAuthConfig {
    fn default() -> Self {
        Self {
            api_key_env: "SMARTAPI_API_KEY".to_string(),
            client_id_env: "SMARTAPI_CLIENT_ID".to_string(),
        }
    }
}

impl SmartApiAuthConfig {
    /// Sets custom environment variable names.
    #[must_use]
    pub fn with_env_vars(
        mut self,
        api_key_env: impl Into<String>,
        client_id_env: impl Into<String>,
    ) -> Self {
        self.api_key_env = api_key_env.into();
        self.client_id_env = client_id_env.into();
        self
    }
}

/// Holds the API key and client code, and builds the SmartAPI header set.
pub struct SmartApiAuth {
    api_key: String,
    client_code: String,
    local_ip: String,
    public_ip: String,
    mac_address: String,
}

impl std::fmt::Debug for SmartApiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartApiAuth")
            .field("api_key", &"[REDACTED]")
            .field("client_code", &self.client_code)
            .finish_non_exhaustive()
    }
}

impl Drop for SmartApiAuth {
    fn drop(&mut self) {
        self.api_key.zeroize();
    }
}

impl SmartApiAuth {
    /// Creates an authenticator from explicit credentials.
    #[must_use]
    pub fn new(api_key: impl Into<String>, client_code: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client_code: client_code.into(),
            local_ip: "127.0.0.1".to_string(),
            public_ip: "106.193.147.98".to_string(),
            mac_address: "00:00:00:00:00:00".to_string(),
        }
    }

    /// Creates an authenticator from environment variables.
    ///
    /// # Errors
    /// Returns error if either environment variable is missing.
    pub fn from_env(config: SmartApiAuthConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            SmartApiError::Configuration(format!(
                "missing environment variable: {}",
                config.api_key_env
            ))
        })?;

        let client_code = std::env::var(&config.client_id_env).map_err(|_| {
            SmartApiError::Configuration(format!(
                "missing environment variable: {}",
                config.client_id_env
            ))
        })?;

        Ok(Self::new(api_key, client_code))
    }

    /// Overrides the client network identifiers sent in headers.
    #[must_use]
    pub fn with_network_identity(
        mut self,
        local_ip: impl Into<String>,
        public_ip: impl Into<String>,
        mac_address: impl Into<String>,
    ) -> Self {
        self.local_ip = local_ip.into();
        self.public_ip = public_ip.into();
        self.mac_address = mac_address.into();
        self
    }

    /// Returns the client code used for login.
    #[must_use]
    pub fn client_code(&self) -> &str {
        &self.client_code
    }

    /// Header set required on every SmartAPI request, excluding
    /// Authorization (added per-request when a JWT is available).
    #[must_use]
    pub fn base_headers(&self) -> [(&'static str, &str); 6] {
        [
            ("X-PrivateKey", self.api_key.as_str()),
            ("X-UserType", "USER"),
            ("X-SourceID", "WEB"),
            ("X-ClientLocalIP", self.local_ip.as_str()),
            ("X-ClientPublicIP", self.public_ip.as_str()),
            ("X-MACAddress", self.mac_address.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_default_env_names() {
        let config = SmartApiAuthConfig::default();
        assert_eq!(config.api_key_env, "SMARTAPI_API_KEY");
        assert_eq!(config.client_id_env, "SMARTAPI_CLIENT_ID");
    }

    #[test]
    fn auth_config_custom_env_names() {
        let config = SmartApiAuthConfig::default().with_env_vars("MY_KEY", "MY_CLIENT");
        assert_eq!(config.api_key_env, "MY_KEY");
        assert_eq!(config.client_id_env, "MY_CLIENT");
    }

    #[test]
    fn from_env_missing_var_errors() {
        let config = SmartApiAuthConfig::default()
            .with_env_vars("TEST_ABSENT_API_KEY", "TEST_ABSENT_CLIENT_ID");
        let result = SmartApiAuth::from_env(config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("missing environment variable"));
    }

    #[test]
    fn base_headers_carry_api_key() {
        let auth = SmartApiAuth::new("key-123", "C12345");
        let headers = auth.base_headers();
        assert_eq!(headers[0], ("X-PrivateKey", "key-123"));
        assert_eq!(headers[1], ("X-UserType", "USER"));
        assert_eq!(headers[2], ("X-SourceID", "WEB"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let auth = SmartApiAuth::new("super-secret-key", "C12345");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("C12345"));
    }

    #[test]
    fn network_identity_override() {
        let auth = SmartApiAuth::new("k", "C1")
            .with_network_identity("10.0.0.2", "203.0.113.9", "aa:bb:cc:dd:ee:ff");
        let headers = auth.base_headers();
        assert_eq!(headers[3], ("X-ClientLocalIP", "10.0.0.2"));
        assert_eq!(headers[4], ("X-ClientPublicIP", "203.0.113.9"));
        assert_eq!(headers[5], ("X-MACAddress", "aa:bb:cc:dd:ee:ff"));
    }
}
