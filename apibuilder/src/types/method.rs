use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// HTTP verbs an endpoint can be called with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            _ => Err(()),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Request body encodings understood by the builder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// `application/json`. This is the default.
    #[default]
    #[serde(rename = "application/json")]
    Json,
    /// `application/x-www-form-urlencoded`.
    #[serde(rename = "application/x-www-form-urlencoded")]
    FormEncoded,
    /// `multipart/form-data`.
    #[serde(rename = "multipart/form-data")]
    FormData,
}

impl ContentType {
    pub const JSON: &'static str = "application/json";
    pub const FORM_ENCODED: &'static str = "application/x-www-form-urlencoded";
    pub const FORM_DATA: &'static str = "multipart/form-data";

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => Self::JSON,
            ContentType::FormEncoded => Self::FORM_ENCODED,
            ContentType::FormData => Self::FORM_DATA,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::JSON | "json" => Ok(ContentType::Json),
            Self::FORM_ENCODED | "form" => Ok(ContentType::FormEncoded),
            Self::FORM_DATA | "multipart" => Ok(ContentType::FormData),
            _ => Err(()),
        }
    }
}
