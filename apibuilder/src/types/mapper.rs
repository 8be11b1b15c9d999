use std::sync::Arc;

use serde_json::Value;

use super::{Body, ContentType};

/// A path segment appended to an endpoint URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSuffix {
    Text(String),
    Id(i64),
}

impl PathSuffix {
    /// Interprets a primitive JSON value as a suffix. Objects, arrays and
    /// `null` yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(PathSuffix::Text(s.clone())),
            Value::Number(n) => Some(match n.as_i64() {
                Some(id) => PathSuffix::Id(id),
                None => PathSuffix::Text(n.to_string()),
            }),
            Value::Bool(b) => Some(PathSuffix::Text(b.to_string())),
            _ => None,
        }
    }
}

impl From<&str> for PathSuffix {
    fn from(s: &str) -> Self {
        PathSuffix::Text(s.to_string())
    }
}

impl From<String> for PathSuffix {
    fn from(s: String) -> Self {
        PathSuffix::Text(s)
    }
}

impl From<&String> for PathSuffix {
    fn from(s: &String) -> Self {
        PathSuffix::Text(s.clone())
    }
}

macro_rules! suffix_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PathSuffix {
                fn from(id: $t) -> Self {
                    PathSuffix::Id(i64::from(id))
                }
            }
        )*
    };
}

suffix_from_int!(i32, i64, u32);

// Ids beyond `i64::MAX` keep their decimal text.
macro_rules! suffix_from_wide_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PathSuffix {
                fn from(id: $t) -> Self {
                    match i64::try_from(id) {
                        Ok(id) => PathSuffix::Id(id),
                        Err(_) => PathSuffix::Text(id.to_string()),
                    }
                }
            }
        )*
    };
}

suffix_from_wide_int!(u64, usize);

/// Fields a mapper may override on top of an endpoint's common descriptor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub body: Option<Body>,
    pub url: Option<PathSuffix>,
    pub entity_id: Option<PathSuffix>,
    pub content_type: Option<ContentType>,
    pub raw_response: Option<bool>,
    pub with_token: Option<bool>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn url(mut self, url: impl Into<PathSuffix>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn entity_id(mut self, id: impl Into<PathSuffix>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn raw_response(mut self, raw: bool) -> Self {
        self.raw_response = Some(raw);
        self
    }

    pub fn with_token(mut self, with_token: bool) -> Self {
        self.with_token = Some(with_token);
        self
    }
}

/// What a mapper produced for one set of call-time parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Mapped {
    /// Use the endpoint's common descriptor as is.
    #[default]
    None,
    /// Append a path segment to the URL.
    Suffix(PathSuffix),
    /// Merge these fields onto the common descriptor.
    Override(Overrides),
}

impl From<Overrides> for Mapped {
    fn from(o: Overrides) -> Self {
        Mapped::Override(o)
    }
}

impl<T: Into<PathSuffix>> From<Option<T>> for Mapped {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Mapped::Suffix(v.into()),
            None => Mapped::None,
        }
    }
}

/// Caller-supplied transform from call-time parameters to a [`Mapped`].
pub type Mapper<P> = Arc<dyn Fn(&P) -> Mapped + Send + Sync>;

/// Wraps a closure as a [`Mapper`].
pub fn mapper<P, M, F>(f: F) -> Mapper<P>
where
    F: Fn(&P) -> M + Send + Sync + 'static,
    M: Into<Mapped>,
{
    Arc::new(move |params: &P| f(params).into())
}

impl From<PathSuffix> for Mapped {
    fn from(s: PathSuffix) -> Self {
        Mapped::Suffix(s)
    }
}
