//! Explicit configuration resolution from `BRIQ_*` environment variables.

use std::time::Duration;

use crate::client::BriqClientBuilder;
use crate::client::error::BriqError;

pub const API_KEY_VAR: &str = "BRIQ_API_KEY";
pub const BASE_URL_VAR: &str = "BRIQ_BASE_URL";
pub const API_VERSION_VAR: &str = "BRIQ_API_VERSION";
/// Per-attempt timeout in milliseconds.
pub const TIMEOUT_VAR: &str = "BRIQ_TIMEOUT";
pub const MAX_RETRIES_VAR: &str = "BRIQ_MAX_RETRIES";
pub const SENDER_ID_VAR: &str = "BRIQ_SENDER_ID";

#[derive(Clone, PartialEq, Eq, Default)]
/// Settings read from the environment. Unset (or empty) variables stay `None`, so the
/// builder defaults apply.
pub struct EnvConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub version: Option<String>,
    pub timeout: Option<Duration>,
    pub max_attempts: Option<u32>,
    pub default_sender_id: Option<String>,
}

impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .field("default_sender_id", &self.default_sender_id)
            .finish()
    }
}

impl EnvConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, BriqError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through `lookup` instead of the process environment.
    ///
    /// Errors with [`BriqError::Configuration`] when `BRIQ_API_KEY` is missing or a numeric
    /// variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BriqError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_key = var(API_KEY_VAR).ok_or_else(|| {
            BriqError::configuration(format!(
                "API key is required. Set {API_KEY_VAR} or pass it to the client builder"
            ))
        })?;

        let timeout = var(TIMEOUT_VAR)
            .map(|value| parse_number::<u64>(TIMEOUT_VAR, &value))
            .transpose()?
            .map(Duration::from_millis);
        let max_attempts = var(MAX_RETRIES_VAR)
            .map(|value| parse_number::<u32>(MAX_RETRIES_VAR, &value))
            .transpose()?;

        Ok(Self {
            api_key,
            base_url: var(BASE_URL_VAR),
            version: var(API_VERSION_VAR),
            timeout,
            max_attempts,
            default_sender_id: var(SENDER_ID_VAR),
        })
    }

    /// Builder seeded with these settings; anything unset keeps the builder default.
    pub fn into_builder(self) -> BriqClientBuilder {
        let mut builder = BriqClientBuilder::new(self.api_key);
        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(version) = self.version {
            builder = builder.version(version);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(max_attempts) = self.max_attempts {
            builder = builder.max_attempts(max_attempts);
        }
        if let Some(sender_id) = self.default_sender_id {
            builder = builder.default_sender_id(sender_id);
        }
        builder
    }
}

fn parse_number<N: std::str::FromStr>(name: &str, value: &str) -> Result<N, BriqError>
where
    N::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err| BriqError::configuration(format!("Invalid {name} value '{value}': {err}")))
}
