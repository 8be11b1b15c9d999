//! Configuration for the default HTTP requester.

use std::time::Duration;

use crate::{transport::TokenType, Error};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings used to build the `reqwest::Client` behind [`crate::Requester`].
#[derive(Clone, Debug, PartialEq)]
pub struct RequesterConfig {
    /// Whole-request timeout. Defaults to 30 seconds.
    pub timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Scheme for the `Authorization` header on protected requests.
    pub token_type: TokenType,
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("apibuilder/{}", env!("CARGO_PKG_VERSION")),
            token_type: TokenType::default(),
        }
    }
}

impl RequesterConfig {
    /// Reads `APIBUILDER_TIMEOUT_SECS` and `APIBUILDER_TOKEN_TYPE`, falling
    /// back to defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let timeout = lookup("APIBUILDER_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let token_type = lookup("APIBUILDER_TOKEN_TYPE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.token_type);
        Self {
            timeout,
            token_type,
            ..defaults
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }

    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Network(e)
            })
    }
}
