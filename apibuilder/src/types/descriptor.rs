use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{ContentType, Method};
use crate::codec::{body_to_params, convert_to_form_data, pair};

/// A URL that is only computed when resolved.
///
/// Each composing layer appends its suffix to the producer it received, so
/// nothing reads the server base until the request is actually made.
#[derive(Clone)]
pub struct LazyUrl(Arc<dyn Fn() -> String + Send + Sync>);

impl LazyUrl {
    pub fn new(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        LazyUrl(Arc::new(f))
    }

    pub fn fixed(url: impl Into<String>) -> Self {
        let url = url.into();
        LazyUrl::new(move || url.clone())
    }

    pub fn resolve(&self) -> String {
        (self.0)()
    }

    /// Returns a new producer yielding this URL followed by `suffix`.
    pub fn append(&self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        if suffix.is_empty() {
            return self.clone();
        }
        let inner = self.clone();
        LazyUrl::new(move || format!("{}{}", inner.resolve(), suffix))
    }
}

impl std::fmt::Debug for LazyUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LazyUrl").field(&self.resolve()).finish()
    }
}

/// Ordered multipart / form-urlencoded entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes the entries as `application/x-www-form-urlencoded` text.
    pub fn to_urlencoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    pub(crate) fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (k, v) in self.iter() {
            map.insert(k.to_string(), Value::String(v.to_string()));
        }
        Value::Object(map)
    }
}

/// A request body before transport encoding.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Json(Value),
    Form(FormData),
}

impl Body {
    /// Converts a plain JSON object into form entries. Anything else,
    /// including an existing [`FormData`], passes through unchanged.
    pub fn into_form(self) -> Body {
        match self {
            Body::Json(Value::Object(map)) => Body::Form(convert_to_form_data(&map)),
            other => other,
        }
    }

    /// Query-string rendering used when a body is sent as GET parameters.
    pub fn to_params(&self) -> String {
        match self {
            Body::Json(value) => body_to_params(value),
            Body::Form(form) => form
                .iter()
                .map(|(k, v)| pair(k, v))
                .collect::<Vec<_>>()
                .join("&"),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Form(_) => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormData> {
        match self {
            Body::Form(form) => Some(form),
            Body::Json(_) => None,
        }
    }

    /// `null`, `false`, `0` and `""` bodies are not sent.
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Body::Json(Value::Null) | Body::Json(Value::Bool(false)) => true,
            Body::Json(Value::String(s)) => s.is_empty(),
            Body::Json(Value::Number(n)) => n.as_f64() == Some(0.0),
            _ => false,
        }
    }

    pub(crate) fn to_json_text(&self) -> String {
        match self {
            Body::Json(value) => value.to_string(),
            Body::Form(form) => form.to_json().to_string(),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<FormData> for Body {
    fn from(form: FormData) -> Self {
        Body::Form(form)
    }
}

/// The fully resolved description of one HTTP call.
///
/// A descriptor owns everything needed to execute it; it keeps no reference
/// to the endpoint that produced it.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: LazyUrl,
    pub body: Option<Body>,
    pub content_type: Option<ContentType>,
    pub with_token: bool,
    pub raw_response: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: LazyUrl) -> Self {
        Self {
            method,
            url,
            body: None,
            content_type: None,
            with_token: false,
            raw_response: false,
        }
    }

    /// Shorthand for `self.url.resolve()`.
    pub fn resolve_url(&self) -> String {
        self.url.resolve()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Body, FormData, LazyUrl};

    #[test]
    fn lazy_url_is_evaluated_on_resolve() {
        let base = std::sync::Arc::new(std::sync::Mutex::new("http://a".to_string()));
        let reader = base.clone();
        let url = LazyUrl::new(move || reader.lock().unwrap().clone()).append("/users");
        *base.lock().unwrap() = "http://b".to_string();
        assert_eq!(url.resolve(), "http://b/users");
    }

    #[test]
    fn body_into_form_keeps_key_order() {
        let body = Body::Json(json!({ "name": "x", "age": 3, "tags": ["a"] })).into_form();
        let form = body.as_form().unwrap();
        let keys: Vec<_> = form.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "age", "tags"]);
        assert_eq!(form.get("age"), Some("3"));
        assert_eq!(form.get("name"), Some("x"));
    }

    #[test]
    fn existing_form_data_passes_through() {
        let form = FormData::new().with("a", "1");
        assert_eq!(Body::Form(form.clone()).into_form(), Body::Form(form));
        assert_eq!(Body::Json(json!(5)).into_form(), Body::Json(json!(5)));
    }

    #[test]
    fn form_data_urlencodes() {
        let form = FormData::new().with("q", "a b").with("x", "&");
        assert_eq!(form.to_urlencoded(), "q=a+b&x=%26");
    }
}
