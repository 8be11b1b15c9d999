//! CLI subcommand implementations.

pub mod call;
pub mod preview;

use anyhow::{anyhow, bail, Result};
use apibuilder::{ApiEndpoint, ContentType, Handle, Method, MethodSettings};
use clap::Args;
use serde_json::{Map, Value};

/// Request shape shared by every subcommand.
#[derive(Args)]
pub struct RequestArgs {
    /// HTTP verb: get, post, put, delete or patch
    #[arg(value_parser = parse_method)]
    pub method: Method,

    /// Path below the base URL (e.g. users/42)
    pub path: String,

    /// Parameter as key=value. Repeating a key builds an array.
    #[arg(long = "param", short = 'p', value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Raw JSON parameters, instead of --param
    #[arg(long, conflicts_with = "params")]
    pub body: Option<String>,

    /// Body encoding: json, form or multipart
    #[arg(long, value_parser = parse_content_type)]
    pub content_type: Option<ContentType>,

    /// Always send the token
    #[arg(long, conflicts_with = "public")]
    pub protected: bool,

    /// Never send the token
    #[arg(long)]
    pub public: bool,
}

impl RequestArgs {
    pub fn settings(&self) -> MethodSettings {
        let with_token = match (self.protected, self.public) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        MethodSettings {
            with_token,
            content_type: self.content_type,
            ..MethodSettings::new(self.method)
        }
    }

    /// Call parameters. GET sends them as the query string, other verbs as
    /// the body.
    pub fn call_params(&self) -> Result<Value> {
        if let Some(body) = &self.body {
            let value: Value = serde_json::from_str(body)
                .map_err(|e| anyhow!("--body is not valid JSON: {}", e))?;
            if self.method == Method::Get && !(value.is_object() || value.is_null()) {
                bail!("--body for GET must be a JSON object");
            }
            return Ok(value);
        }
        if self.params.is_empty() {
            return Ok(Value::Null);
        }
        Ok(Value::Object(collect_params(&self.params)))
    }

    pub fn handle(&self, api: &ApiEndpoint) -> Handle<Value, Value> {
        api.endpoint(&self.path).request(self.settings(), None)
    }
}

fn parse_method(s: &str) -> Result<Method, String> {
    s.parse()
        .map_err(|_| format!("unknown method '{}', expected get, post, put, delete or patch", s))
}

fn parse_content_type(s: &str) -> Result<ContentType, String> {
    s.parse()
        .map_err(|_| format!("unknown content type '{}', expected json, form or multipart", s))
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

/// Keeps first-seen key order; a repeated key turns into an array.
fn collect_params(params: &[(String, String)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in params {
        let value = Value::String(value.clone());
        match map.get_mut(key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.clone(), value);
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_keys_become_arrays() {
        let map = collect_params(&pairs(&[("tag", "a"), ("page", "2"), ("tag", "b"), ("tag", "c")]));
        assert_eq!(
            Value::Object(map),
            json!({ "tag": ["a", "b", "c"], "page": "2" })
        );
    }

    #[test]
    fn param_needs_a_key() {
        assert_eq!(parse_param("a=b=c").unwrap(), ("a".into(), "b=c".into()));
        assert_eq!(parse_param("empty=").unwrap(), ("empty".into(), String::new()));
        assert!(parse_param("=x").is_err());
        assert!(parse_param("novalue").is_err());
    }

    #[test]
    fn method_and_content_type_parsers() {
        assert_eq!(parse_method("patch").unwrap(), Method::Patch);
        assert!(parse_method("trace").is_err());
        assert_eq!(parse_content_type("form").unwrap(), ContentType::FormEncoded);
        assert_eq!(parse_content_type("multipart").unwrap(), ContentType::FormData);
    }
}
