use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{prepare_request_data, Driver, HttpDriver, RawResponse, RequestInit, TokenSource, TokenType};
use crate::{config::RequesterConfig, types::RequestDescriptor, Error};

/// Outcome of executing a descriptor.
#[derive(Debug)]
pub enum Reply {
    /// Parsed JSON, or `null` for a successful non-JSON response.
    Parsed(Value),
    /// The untouched response of a raw request.
    Raw(RawResponse),
}

impl Reply {
    pub fn decode<R: DeserializeOwned>(self) -> Result<R, Error> {
        match self {
            Reply::Parsed(value) => {
                serde_json::from_value(value).map_err(|e| Error::ParseFailed(e.to_string()))
            }
            Reply::Raw(response) => response.json(),
        }
    }

    pub fn into_raw(self) -> Result<RawResponse, Error> {
        match self {
            Reply::Raw(response) => Ok(response),
            Reply::Parsed(_) => Err(Error::UnexpectedReply),
        }
    }
}

/// Executes descriptors. `driver` replaces the handler's own transport for
/// one call, e.g. with a progress-reporting one.
pub trait RequestHandler: Send + Sync {
    fn handle<'a>(
        &'a self,
        descriptor: RequestDescriptor,
        driver: Option<&'a dyn Driver>,
    ) -> BoxFuture<'a, Result<Reply, Error>>;
}

/// Computes transport init data for a descriptor without executing it.
pub trait RequestDataGetter: Send + Sync {
    fn request_data<'a>(
        &'a self,
        descriptor: &'a RequestDescriptor,
    ) -> BoxFuture<'a, Result<RequestInit, Error>>;
}

/// Default [`RequestHandler`] and [`RequestDataGetter`] backed by a driver
/// and a token source.
pub struct Requester {
    driver: Arc<dyn Driver>,
    client: Option<reqwest::Client>,
    tokens: Arc<dyn TokenSource>,
    token_type: TokenType,
}

impl Requester {
    pub fn new(config: &RequesterConfig, tokens: Arc<dyn TokenSource>) -> Result<Self, Error> {
        let client = config.build_client()?;
        let driver = HttpDriver::new(client.clone());
        Ok(Self {
            client: Some(client),
            ..Self::with_driver(Arc::new(driver), tokens, config.token_type)
        })
    }

    pub fn with_driver(
        driver: Arc<dyn Driver>,
        tokens: Arc<dyn TokenSource>,
        token_type: TokenType,
    ) -> Self {
        Self {
            driver,
            client: None,
            tokens,
            token_type,
        }
    }

    /// The configured client behind the default driver. `None` when a
    /// custom driver was supplied.
    pub fn client(&self) -> Option<&reqwest::Client> {
        self.client.as_ref()
    }

    /// Fails with [`Error::NoTokenProvided`] when the descriptor needs a
    /// token and none is available.
    pub fn prepare(&self, descriptor: &RequestDescriptor) -> Result<RequestInit, Error> {
        let token = self.tokens.token();
        if descriptor.with_token && token.is_none() {
            return Err(Error::NoTokenProvided);
        }
        Ok(prepare_request_data(
            descriptor,
            token.as_deref(),
            self.token_type,
        ))
    }
}

impl RequestHandler for Requester {
    fn handle<'a>(
        &'a self,
        descriptor: RequestDescriptor,
        driver: Option<&'a dyn Driver>,
    ) -> BoxFuture<'a, Result<Reply, Error>> {
        Box::pin(async move {
            let init = self.prepare(&descriptor)?;
            let url = descriptor.resolve_url();
            tracing::debug!(
                method = %descriptor.method,
                url = %url,
                with_token = descriptor.with_token,
                "sending request"
            );

            let driver = driver.unwrap_or(self.driver.as_ref());
            let response = driver.fetch(url, init).await?;

            if descriptor.raw_response {
                return Ok(Reply::Raw(response));
            }

            if !response.is_success() {
                tracing::error!(
                    "Request failed with status {}: {}",
                    response.status(),
                    truncate_body(&response.text())
                );
                return Err(Error::from_response(response.status(), response.bytes()));
            }

            if !response.is_json() || response.bytes().is_empty() {
                return Ok(Reply::Parsed(Value::Null));
            }

            let parsed = serde_json::from_slice::<Value>(response.bytes()).map_err(|e| {
                tracing::error!(
                    "Failed to parse response: {} | body: {}",
                    e,
                    truncate_body(&response.text())
                );
                Error::ParseFailed(e.to_string())
            })?;
            Ok(Reply::Parsed(parsed))
        })
    }
}

impl RequestDataGetter for Requester {
    fn request_data<'a>(
        &'a self,
        descriptor: &'a RequestDescriptor,
    ) -> BoxFuture<'a, Result<RequestInit, Error>> {
        Box::pin(async move { self.prepare(descriptor) })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let end = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...[truncated]", &body[..end])
    }
}
