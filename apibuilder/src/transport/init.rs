use std::collections::BTreeMap;

use serde::Serialize;

use super::TokenType;
use crate::{
    codec::scalar_text,
    types::{Body, ContentType, FormData, Method, RequestDescriptor},
};

/// Encoded request body as handed to a driver.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InitBody {
    /// JSON or url-encoded text.
    Text(String),
    /// `multipart/form-data` entries.
    Multipart(FormData),
}

/// Method, headers and body computed from a descriptor, before any network
/// call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestInit {
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<InitBody>,
}

impl RequestInit {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Builds the transport init data for a descriptor.
///
/// `Content-Type` defaults to JSON. `Authorization` is only set when the
/// descriptor requires a token and one is available.
pub fn prepare_request_data(
    descriptor: &RequestDescriptor,
    token: Option<&str>,
    token_type: TokenType,
) -> RequestInit {
    let content_type = descriptor.content_type.unwrap_or_default();

    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), content_type.as_str().to_string());
    if let (true, Some(token)) = (descriptor.with_token, token) {
        headers.insert(
            "Authorization".to_string(),
            format!("{} {}", token_type, token),
        );
    }

    let body = descriptor
        .body
        .as_ref()
        .filter(|body| !body.is_empty())
        .map(|body| encode_body(body, content_type));

    RequestInit {
        method: descriptor.method,
        headers,
        body,
    }
}

fn encode_body(body: &Body, content_type: ContentType) -> InitBody {
    match content_type {
        ContentType::Json => InitBody::Text(body.to_json_text()),
        ContentType::FormEncoded => match body.clone().into_form() {
            Body::Form(form) => InitBody::Text(form.to_urlencoded()),
            Body::Json(value) => InitBody::Text(scalar_text(&value)),
        },
        ContentType::FormData => match body.clone().into_form() {
            Body::Form(form) => InitBody::Multipart(form),
            Body::Json(value) => InitBody::Text(scalar_text(&value)),
        },
    }
}
