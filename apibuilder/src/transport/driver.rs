use bytes::Bytes;
use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use super::{InitBody, RequestInit};
use crate::{config::RequesterConfig, types::FormData, Error};

/// A fully buffered HTTP response.
#[derive(Clone, Debug)]
pub struct RawResponse {
    status: u16,
    headers: HeaderMap,
    url: String,
    body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, headers: HeaderMap, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            url: url.into(),
            body: body.into(),
        }
    }

    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, Error> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let url = response.url().to_string();
        let body = response.bytes().await?;
        Ok(Self::new(status, headers, url, body))
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// True for `application/json`, with or without parameters.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::ParseFailed(e.to_string()))
    }
}

/// The fetch-like primitive requests are executed through.
pub trait Driver: Send + Sync {
    fn fetch(&self, url: String, init: RequestInit) -> BoxFuture<'_, Result<RawResponse, Error>>;
}

/// Method and headers of `init` on a new request builder. Multipart bodies
/// get their `Content-Type` (with boundary) from reqwest instead.
pub(crate) fn request_builder(
    client: &reqwest::Client,
    url: &str,
    init: &RequestInit,
) -> reqwest::RequestBuilder {
    let multipart = matches!(init.body, Some(InitBody::Multipart(_)));
    init.headers
        .iter()
        .filter(|(name, _)| !(multipart && name.eq_ignore_ascii_case("content-type")))
        .fold(client.request(init.method.into(), url), |builder, (name, value)| {
            builder.header(name.as_str(), value.as_str())
        })
}

pub(crate) fn multipart_form(form: &FormData) -> reqwest::multipart::Form {
    form.iter()
        .fold(reqwest::multipart::Form::new(), |acc, (key, value)| {
            acc.text(key.to_string(), value.to_string())
        })
}

/// Plain `reqwest` driver.
#[derive(Clone, Debug, Default)]
pub struct HttpDriver {
    client: reqwest::Client,
}

impl HttpDriver {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &RequesterConfig) -> Result<Self, Error> {
        Ok(Self::new(config.build_client()?))
    }
}

impl Driver for HttpDriver {
    fn fetch(&self, url: String, init: RequestInit) -> BoxFuture<'_, Result<RawResponse, Error>> {
        Box::pin(async move {
            let builder = request_builder(&self.client, &url, &init);
            let builder = match init.body {
                Some(InitBody::Text(text)) => builder.body(text),
                Some(InitBody::Multipart(form)) => builder.multipart(multipart_form(&form)),
                None => builder,
            };
            let response = builder.send().await?;
            RawResponse::read(response).await
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

    use super::RawResponse;

    fn with_content_type(ct: &str) -> RawResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
        RawResponse::new(200, headers, "http://x", "{}")
    }

    #[test]
    fn json_detection_ignores_parameters() {
        assert!(with_content_type("application/json").is_json());
        assert!(with_content_type("application/json; charset=utf-8").is_json());
        assert!(!with_content_type("text/plain").is_json());
        assert!(!RawResponse::new(204, HeaderMap::new(), "http://x", "").is_json());
    }
}
