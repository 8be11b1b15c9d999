//! Pure helpers turning parameter values into query strings, form entries and
//! URL suffixes.

use serde_json::{Map, Value};

use crate::types::{ContentType, FormData, PathSuffix};

/// Strips every leading and trailing `/`.
pub fn remove_slashes(segment: &str) -> &str {
    segment.trim_matches('/')
}

/// Text form of a JSON value as it appears in a query string or form entry.
/// Strings are used verbatim, nested structures as compact JSON.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn encode(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

pub(crate) fn pair(key: &str, value: &str) -> String {
    format!("{}={}", encode(key), encode(value))
}

fn is_available_value(value: &Value) -> bool {
    match value {
        Value::Null | Value::Array(_) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Builds a query string from an object's entries.
///
/// Scalars come first, in key order, skipping `null` and empty strings.
/// Non-empty arrays follow as repeated `key=element` pairs. Values that are
/// not objects produce an empty string.
pub fn body_to_params(body: &Value) -> String {
    let Value::Object(map) = body else {
        return String::new();
    };

    let scalars = map
        .iter()
        .filter(|(_, v)| is_available_value(v))
        .map(|(k, v)| pair(k, &scalar_text(v)));

    let arrays = map
        .iter()
        .filter_map(|(k, v)| match v {
            Value::Array(items) if !items.is_empty() => Some((k, items)),
            _ => None,
        })
        .flat_map(|(k, items)| {
            items
                .iter()
                .filter(|item| !item.is_null())
                .map(move |item| pair(k, &scalar_text(item)))
        });

    scalars.chain(arrays).collect::<Vec<_>>().join("&")
}

/// Produces a URL suffix from a path value and an optional entity id.
///
/// A non-empty text value yields `/` plus the slash-trimmed value, a numeric
/// value yields `/` plus the number, and a non-empty entity id is appended
/// after either. With neither the result is empty.
pub fn get_url_end(value: Option<&PathSuffix>, entity_id: Option<&PathSuffix>) -> String {
    let mut result = match value {
        Some(PathSuffix::Text(s)) if !remove_slashes(s).is_empty() => {
            format!("/{}", remove_slashes(s))
        }
        Some(PathSuffix::Id(id)) => format!("/{}", id),
        _ => String::new(),
    };
    match entity_id {
        Some(PathSuffix::Text(s)) if !s.is_empty() => {
            result.push('/');
            result.push_str(s);
        }
        Some(PathSuffix::Id(id)) => {
            result.push('/');
            result.push_str(&id.to_string());
        }
        _ => {}
    }
    result
}

pub fn is_content_type_form_data(content_type: Option<ContentType>) -> bool {
    matches!(
        content_type,
        Some(ContentType::FormData) | Some(ContentType::FormEncoded)
    )
}

/// One form entry per object key, in key order.
pub fn convert_to_form_data(object: &Map<String, Value>) -> FormData {
    let mut form = FormData::new();
    for (key, value) in object {
        form.append(key.as_str(), scalar_text(value));
    }
    form
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_body_to_params() {
        let body = json!({ "a": 1, "b": "", "c": null, "d": [], "e": [1, 2] });
        insta::assert_snapshot!(body_to_params(&body), @"a=1&e=1&e=2");
    }

    #[test]
    fn body_to_params_puts_arrays_after_scalars() {
        let body = json!({ "ids": [3, 4], "page": 2, "q": "rust" });
        assert_eq!(body_to_params(&body), "page=2&q=rust&ids=3&ids=4");
    }

    #[test]
    fn body_to_params_only_arrays_has_no_leading_separator() {
        assert_eq!(body_to_params(&json!({ "tag": ["a", "b"] })), "tag=a&tag=b");
        assert_eq!(body_to_params(&json!({})), "");
        assert_eq!(body_to_params(&json!("scalar")), "");
    }

    #[test]
    fn body_to_params_escapes_reserved_characters() {
        assert_eq!(
            body_to_params(&json!({ "q": "a&b c", "flag": false })),
            "q=a%26b+c&flag=false"
        );
    }

    #[test]
    fn test_get_url_end() {
        assert_eq!(get_url_end(Some(&"x/y/".into()), None), "/x/y");
        assert_eq!(get_url_end(Some(&5.into()), Some(&9.into())), "/5/9");
        assert_eq!(get_url_end(None, None), "");
        assert_eq!(get_url_end(Some(&"".into()), None), "");
        assert_eq!(get_url_end(None, Some(&"abc".into())), "/abc");
        assert_eq!(get_url_end(Some(&"/items/".into()), Some(&"".into())), "/items");
    }

    #[test]
    fn test_is_content_type_form_data() {
        assert!(is_content_type_form_data(Some(ContentType::FormData)));
        assert!(is_content_type_form_data(Some(ContentType::FormEncoded)));
        assert!(!is_content_type_form_data(Some(ContentType::Json)));
        assert!(!is_content_type_form_data(None));
    }

    #[test]
    fn test_remove_slashes() {
        assert_eq!(remove_slashes("//a/b//"), "a/b");
        assert_eq!(remove_slashes("/"), "");
        assert_eq!(remove_slashes("plain"), "plain");
    }

    #[test]
    fn test_convert_to_form_data() {
        let object = json!({ "b": 2, "a": "x", "nested": { "k": true } });
        let form = convert_to_form_data(object.as_object().unwrap());
        let entries: Vec<_> = form.iter().collect();
        assert_eq!(
            entries,
            vec![("b", "2"), ("a", "x"), ("nested", r#"{"k":true}"#)]
        );
    }
}
