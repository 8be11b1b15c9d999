//! Error types for request construction and execution.

use serde_json::Value;

/// Errors that can occur while building or executing a request.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request requires a token and the token source had none.
    #[error("No token provided")]
    NoTokenProvided,
    /// The server answered with a non-success status.
    #[error("Request failed with status {status}")]
    HttpStatus {
        status: u16,
        /// Parsed JSON body, or the raw text as a JSON string.
        body: Value,
    },
    /// The request never produced a response (connection, timeout, TLS).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Call-time parameters could not be turned into a JSON value.
    #[error("Failed to serialize request parameters: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The response body could not be decoded into the requested type.
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
    /// A request handler returned a reply of the wrong shape for the handle.
    #[error("Request handler returned an unexpected reply")]
    UnexpectedReply,
}

impl Error {
    /// Classifies a completed, unsuccessful response.
    ///
    /// The body is kept as JSON when it parses, otherwise as a JSON string.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let body = serde_json::from_slice::<Value>(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
        Error::HttpStatus { status, body }
    }

    /// HTTP status of a failed response, or of a [`Error::Network`] error
    /// that carries one. `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Parsed body of a failed response.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Error::HttpStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_missing_token(&self) -> bool {
        matches!(self, Error::NoTokenProvided)
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::HttpStatus { status, .. } if (400..500).contains(status))
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::HttpStatus { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Error;

    #[test]
    fn from_response_keeps_json_body() {
        let err = Error::from_response(422, br#"{"field":"name"}"#);
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.body(), Some(&json!({ "field": "name" })));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn from_response_falls_back_to_text() {
        let err = Error::from_response(502, b"Bad Gateway");
        assert_eq!(err.body(), Some(&json!("Bad Gateway")));
        assert!(err.is_server_error());
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn status_is_none_without_a_response() {
        assert_eq!(Error::NoTokenProvided.status(), None);
        assert_eq!(Error::ParseFailed("eof".into()).status(), None);
    }
}
