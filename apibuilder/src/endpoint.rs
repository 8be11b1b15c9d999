//! The endpoint tree: URL composition, protection flags and the
//! request-descriptor getters built from them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{
    codec::{body_to_params, get_url_end, is_content_type_form_data, remove_slashes},
    server::ServerProvider,
    types::{
        Body, ContentType, LazyUrl, Mapped, Mapper, Method, Overrides, PathSuffix,
        RequestDescriptor,
    },
    Error,
};

/// Pure function from call-time parameters to a complete descriptor.
pub type DescriptorGetter<P> =
    Arc<dyn Fn(&P) -> Result<RequestDescriptor, Error> + Send + Sync>;

/// Per-route settings fixed when a descriptor getter is built.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodSettings {
    pub method: Method,
    /// Static suffix appended to the endpoint path.
    pub endpoint: Option<PathSuffix>,
    /// Overrides the endpoint's protection flag.
    pub with_token: Option<bool>,
    pub content_type: Option<ContentType>,
    pub raw_response: Option<bool>,
}

impl MethodSettings {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            endpoint: None,
            with_token: None,
            content_type: None,
            raw_response: None,
        }
    }
}

impl From<Method> for MethodSettings {
    fn from(method: Method) -> Self {
        MethodSettings::new(method)
    }
}

/// Caller input for a verb: a mapper, a static suffix, settings, or nothing.
pub struct RequestProps<P> {
    pub endpoint: Option<PathSuffix>,
    pub with_token: Option<bool>,
    pub content_type: Option<ContentType>,
    pub raw_response: Option<bool>,
    pub mapper: Option<Mapper<P>>,
}

impl<P> Default for RequestProps<P> {
    fn default() -> Self {
        Self {
            endpoint: None,
            with_token: None,
            content_type: None,
            raw_response: None,
            mapper: None,
        }
    }
}

impl<P> Clone for RequestProps<P> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            with_token: self.with_token,
            content_type: self.content_type,
            raw_response: self.raw_response,
            mapper: self.mapper.clone(),
        }
    }
}

impl<P> RequestProps<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Props consisting only of a mapper.
    pub fn mapped<M, F>(f: F) -> Self
    where
        F: Fn(&P) -> M + Send + Sync + 'static,
        M: Into<Mapped>,
        P: 'static,
    {
        Self::new().mapper(f)
    }

    pub fn mapper<M, F>(mut self, f: F) -> Self
    where
        F: Fn(&P) -> M + Send + Sync + 'static,
        M: Into<Mapped>,
        P: 'static,
    {
        self.mapper = Some(crate::types::mapper(f));
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<PathSuffix>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_token(mut self, with_token: bool) -> Self {
        self.with_token = Some(with_token);
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

    /// Splits into route settings for `method` and the mapper.
    pub fn into_settings(self, method: Method) -> (MethodSettings, Option<Mapper<P>>) {
        let settings = MethodSettings {
            method,
            endpoint: self.endpoint,
            with_token: self.with_token,
            content_type: self.content_type,
            raw_response: self.raw_response,
        };
        (settings, self.mapper)
    }
}

impl<P> From<PathSuffix> for RequestProps<P> {
    fn from(endpoint: PathSuffix) -> Self {
        Self::new().endpoint(endpoint)
    }
}

impl<P> From<&str> for RequestProps<P> {
    fn from(endpoint: &str) -> Self {
        Self::new().endpoint(endpoint)
    }
}

impl<P> From<String> for RequestProps<P> {
    fn from(endpoint: String) -> Self {
        Self::new().endpoint(endpoint)
    }
}

impl<P> From<Mapper<P>> for RequestProps<P> {
    fn from(mapper: Mapper<P>) -> Self {
        Self {
            mapper: Some(mapper),
            ..Self::default()
        }
    }
}

impl<P> From<()> for RequestProps<P> {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

macro_rules! props_from_int {
    ($($t:ty),*) => {
        $(
            impl<P> From<$t> for RequestProps<P> {
                fn from(endpoint: $t) -> Self {
                    Self::new().endpoint(endpoint)
                }
            }
        )*
    };
}

props_from_int!(i32, i64, u32, u64, usize);

/// How call-time data reaches the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    /// Parameters go into the request body.
    Body,
    /// Parameters go into the query string (GET).
    Query,
}

impl Strategy {
    fn for_method(method: Method) -> Self {
        match method {
            Method::Get => Strategy::Query,
            _ => Strategy::Body,
        }
    }

    fn describe<P: Serialize>(
        self,
        common: &RequestDescriptor,
        mapper: Option<&Mapper<P>>,
        params: &P,
    ) -> Result<RequestDescriptor, Error> {
        let Some(mapper) = mapper else {
            let value = serde_json::to_value(params).map_err(Error::Serialize)?;
            return Ok(self.without_mapper(common, value));
        };
        Ok(match mapper(params) {
            Mapped::None => common.clone(),
            Mapped::Suffix(suffix) => with_url_end(common, get_url_end(Some(&suffix), None)),
            Mapped::Override(overrides) => self.merge(common, overrides),
        })
    }

    fn without_mapper(self, common: &RequestDescriptor, value: Value) -> RequestDescriptor {
        if value.is_null() {
            return common.clone();
        }
        match self {
            Strategy::Body => {
                let mut body = Body::Json(value);
                if is_content_type_form_data(common.content_type) {
                    body = body.into_form();
                }
                RequestDescriptor {
                    body: Some(body),
                    ..common.clone()
                }
            }
            Strategy::Query => match PathSuffix::from_value(&value) {
                Some(suffix) => with_url_end(common, get_url_end(Some(&suffix), None)),
                None => {
                    let params = body_to_params(&value);
                    if params.is_empty() {
                        common.clone()
                    } else {
                        with_url_end(common, format!("?{}", params))
                    }
                }
            },
        }
    }

    fn merge(self, common: &RequestDescriptor, overrides: Overrides) -> RequestDescriptor {
        let Overrides {
            body,
            url,
            entity_id,
            content_type,
            raw_response,
            with_token,
        } = overrides;
        let url_end = get_url_end(url.as_ref(), entity_id.as_ref());

        let mut descriptor = common.clone();
        if let Some(content_type) = content_type {
            descriptor.content_type = Some(content_type);
        }
        if let Some(raw_response) = raw_response {
            descriptor.raw_response = raw_response;
        }
        if let Some(with_token) = with_token {
            descriptor.with_token = with_token;
        }

        match self {
            Strategy::Body => {
                let form = is_content_type_form_data(descriptor.content_type);
                descriptor.body = body.map(|b| if form { b.into_form() } else { b });
                descriptor.url = common.url.append(url_end);
            }
            Strategy::Query => {
                let params = body.map(|b| b.to_params()).unwrap_or_default();
                let query = if params.is_empty() {
                    String::new()
                } else {
                    format!("?{}", params)
                };
                descriptor.body = None;
                descriptor.url = common.url.append(format!("{}{}", url_end, query));
            }
        }
        descriptor
    }
}

fn with_url_end(common: &RequestDescriptor, url_end: String) -> RequestDescriptor {
    RequestDescriptor {
        url: common.url.append(url_end),
        ..common.clone()
    }
}

fn join_base(api: &str, path: &str) -> String {
    let api = api.trim_end_matches('/');
    if path.is_empty() {
        api.to_string()
    } else {
        format!("{}/{}", api, path)
    }
}

/// A node in the API's resource tree.
///
/// Children copy the parent's protection flag when they are created;
/// changing the parent afterwards does not reach them.
pub struct Endpoint {
    server: Option<Arc<dyn ServerProvider>>,
    path: String,
    protected: AtomicBool,
}

impl Endpoint {
    /// A root endpoint from a literal path or absolute URL.
    pub fn new(path: &str) -> Self {
        Self::from_parts(None, path)
    }

    /// An endpoint under a shared server base, with an optional relative segment.
    pub fn with_server(server: Arc<dyn ServerProvider>, segment: Option<&str>) -> Self {
        Self::from_parts(Some(server), segment.unwrap_or_default())
    }

    pub fn from_parts(server: Option<Arc<dyn ServerProvider>>, segment: &str) -> Self {
        Self {
            server,
            path: remove_slashes(segment).to_string(),
            protected: AtomicBool::new(false),
        }
    }

    /// Path relative to the server base, without leading or trailing slashes.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The endpoint URL as it would resolve right now.
    pub fn url(&self) -> String {
        self.url_producer().resolve()
    }

    fn url_producer(&self) -> LazyUrl {
        let path = self.path.clone();
        match &self.server {
            Some(server) => {
                let server = server.clone();
                LazyUrl::new(move || join_base(&server.api(), &path))
            }
            None => LazyUrl::fixed(path),
        }
    }

    pub fn is_protected(&self) -> bool {
        self.protected.load(Ordering::Relaxed)
    }

    pub fn set_protection(&self, state: bool) -> &Self {
        self.protected.store(state, Ordering::Relaxed);
        self
    }

    pub fn protect(&self) -> &Self {
        self.set_protection(true)
    }

    pub fn unprotect(&self) -> &Self {
        self.set_protection(false)
    }

    /// Derives a child node sharing the server and a snapshot of the
    /// current protection flag.
    pub fn create_endpoint(&self, segment: &str) -> Endpoint {
        let segment = remove_slashes(segment);
        let path = if self.path.is_empty() {
            segment.to_string()
        } else if segment.is_empty() {
            self.path.clone()
        } else {
            format!("{}/{}", self.path, segment)
        };
        Endpoint {
            server: self.server.clone(),
            path,
            protected: AtomicBool::new(self.is_protected()),
        }
    }

    fn common(&self, settings: &MethodSettings) -> RequestDescriptor {
        RequestDescriptor {
            method: settings.method,
            url: self
                .url_producer()
                .append(get_url_end(settings.endpoint.as_ref(), None)),
            body: None,
            content_type: settings.content_type,
            with_token: settings.with_token.unwrap_or_else(|| self.is_protected()),
            raw_response: settings.raw_response.unwrap_or(false),
        }
    }

    /// Builds the descriptor getter for a route.
    ///
    /// The common fields (URL, verb, token requirement, content type) are
    /// fixed here; GET routes put parameters in the query string, every
    /// other verb in the body.
    pub fn method<P>(
        &self,
        settings: impl Into<MethodSettings>,
        mapper: Option<Mapper<P>>,
    ) -> DescriptorGetter<P>
    where
        P: Serialize + 'static,
    {
        let settings = settings.into();
        let common = self.common(&settings);
        let strategy = Strategy::for_method(settings.method);
        Arc::new(move |params: &P| strategy.describe(&common, mapper.as_ref(), params))
    }

    fn verb<P>(&self, method: Method, props: RequestProps<P>) -> DescriptorGetter<P>
    where
        P: Serialize + 'static,
    {
        let (settings, mapper) = props.into_settings(method);
        self.method(settings, mapper)
    }

    pub fn get<P>(&self, props: impl Into<RequestProps<P>>) -> DescriptorGetter<P>
    where
        P: Serialize + 'static,
    {
        self.verb(Method::Get, props.into())
    }

    pub fn post<P>(&self, props: impl Into<RequestProps<P>>) -> DescriptorGetter<P>
    where
        P: Serialize + 'static,
    {
        self.verb(Method::Post, props.into())
    }

    pub fn put<P>(&self, props: impl Into<RequestProps<P>>) -> DescriptorGetter<P>
    where
        P: Serialize + 'static,
    {
        self.verb(Method::Put, props.into())
    }

    pub fn delete<P>(&self, props: impl Into<RequestProps<P>>) -> DescriptorGetter<P>
    where
        P: Serialize + 'static,
    {
        self.verb(Method::Delete, props.into())
    }

    pub fn patch<P>(&self, props: impl Into<RequestProps<P>>) -> DescriptorGetter<P>
    where
        P: Serialize + 'static,
    {
        self.verb(Method::Patch, props.into())
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("url", &self.url())
            .field("protected", &self.is_protected())
            .finish()
    }
}
