use crate::core::kernel::signer::{HmacSha256Signer, Signer};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::fmt;
use std::sync::Arc;

/// API credentials for signed endpoints.
///
/// The attached signer is used for every authenticated request. Without one,
/// [`Credentials::sign`] yields an empty signature and the exchange rejects
/// the request.
#[derive(Clone)]
pub struct Credentials {
    api_key: Secret<String>,
    secret_key: Secret<String>,
    passphrase: Option<Secret<String>>,
    signer: Option<Arc<dyn Signer>>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .field("signer", &self.signer.is_some())
            .finish()
    }
}

impl Credentials {
    /// Credentials signed with HMAC-SHA256
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::unsigned(api_key, secret_key).with_signer(Arc::new(HmacSha256Signer))
    }

    /// Credentials without a signer
    pub fn unsigned(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            secret_key: Secret::new(secret_key.into()),
            passphrase: None,
            signer: None,
        }
    }

    #[must_use]
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Secret::new(passphrase.into()));
        self
    }

    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_ref().map(|p| p.expose_secret().as_str())
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    /// Signs `payload` with the secret key, or returns an empty string when no signer is attached.
    pub fn sign(&self, payload: &str) -> String {
        self.signer
            .as_ref()
            .map_or_else(String::new, |s| s.sign(payload, self.secret_key()))
    }
}

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub passphrase: Option<Secret<String>>,
    pub testnet: bool,
    pub base_url: Option<String>,
}

// Never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 5)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field(
            "passphrase",
            &self.passphrase.as_ref().map(|_| "[REDACTED]"),
        )?;
        state.serialize_field("testnet", &self.testnet)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            #[serde(default)]
            passphrase: Option<String>,
            #[serde(default)]
            testnet: bool,
            #[serde(default)]
            base_url: Option<String>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            passphrase: helper.passphrase.map(Secret::new),
            testnet: helper.testnet,
            base_url: helper.base_url,
        })
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: None,
            testnet: false,
            base_url: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{EXCHANGE}_API_KEY` (e.g., `BINANCE_API_KEY`)
    /// - `{EXCHANGE}_SECRET_KEY` (e.g., `BINANCE_SECRET_KEY`)
    /// - `{EXCHANGE}_PASSPHRASE` (optional)
    /// - `{EXCHANGE}_TESTNET` (optional, defaults to false)
    /// - `{EXCHANGE}_BASE_URL` (optional)
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let api_key_var = format!("{prefix}_API_KEY");
        let secret_key_var = format!("{prefix}_SECRET_KEY");

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let passphrase = env::var(format!("{prefix}_PASSPHRASE")).ok();

        let testnet = env::var(format!("{prefix}_TESTNET"))
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let base_url = env::var(format!("{prefix}_BASE_URL")).ok();

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: passphrase.map(Secret::new),
            testnet,
            base_url,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    ///
    /// A missing file is not an error; system environment variables are used instead.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Configuration for public endpoints only
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Check if this configuration has valid credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set testnet mode
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[must_use]
    pub fn passphrase(mut self, passphrase: String) -> Self {
        self.passphrase = Some(Secret::new(passphrase));
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// HMAC-signed credentials carrying this configuration's keys
    pub fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(self.api_key(), self.secret_key());
        match &self.passphrase {
            Some(p) => credentials.with_passphrase(p.expose_secret().as_str()),
            None => credentials,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
