//! Executable wrapper around an [`Endpoint`] node.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    endpoint::{Endpoint, MethodSettings, RequestProps},
    handle::Handle,
    transport::{ProgressDriver, RequestDataGetter, RequestHandler, Requester},
    types::{Mapper, Method},
};

/// Options for a child created through [`ApiEndpoint::endpoint_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndpointSettings {
    /// Forces the child's protection flag instead of inheriting it.
    pub with_token: Option<bool>,
}

/// An endpoint bound to a request handler, producing callable [`Handle`]s.
#[derive(Clone)]
pub struct ApiEndpoint {
    pub(crate) endpoint: Arc<Endpoint>,
    pub(crate) request_handler: Arc<dyn RequestHandler>,
    pub(crate) request_data_getter: Arc<dyn RequestDataGetter>,
    http: Option<reqwest::Client>,
}

impl ApiEndpoint {
    pub fn new(
        endpoint: Endpoint,
        request_handler: Arc<dyn RequestHandler>,
        request_data_getter: Arc<dyn RequestDataGetter>,
    ) -> Self {
        Self {
            endpoint: Arc::new(endpoint),
            request_handler,
            request_data_getter,
            http: None,
        }
    }

    /// Uses one [`Requester`] as both handler and data getter. Progress
    /// handles share the requester's configured client.
    pub fn with_requester(endpoint: Endpoint, requester: Arc<Requester>) -> Self {
        let http = requester.client().cloned();
        Self {
            http,
            ..Self::new(endpoint, requester.clone(), requester)
        }
    }

    /// Client used by progress-reporting handles.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// The underlying tree node.
    pub fn node(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn protect(&self) -> &Self {
        self.endpoint.protect();
        self
    }

    pub fn unprotect(&self) -> &Self {
        self.endpoint.unprotect();
        self
    }

    pub fn endpoint(&self, path: &str) -> ApiEndpoint {
        self.endpoint_with(path, EndpointSettings::default())
    }

    /// Descends to a child path sharing this wrapper's handlers.
    pub fn endpoint_with(&self, path: &str, settings: EndpointSettings) -> ApiEndpoint {
        let child = self.endpoint.create_endpoint(path);
        if let Some(with_token) = settings.with_token {
            child.set_protection(with_token);
        }
        ApiEndpoint {
            endpoint: Arc::new(child),
            request_handler: self.request_handler.clone(),
            request_data_getter: self.request_data_getter.clone(),
            http: self.http.clone(),
        }
    }

    pub(crate) fn progress_driver(&self) -> ProgressDriver {
        ProgressDriver::new(self.http.clone())
    }

    /// Builds a handle from fully specified route settings.
    pub fn request<R, P>(&self, settings: MethodSettings, mapper: Option<Mapper<P>>) -> Handle<P, R>
    where
        P: Serialize + 'static,
        R: DeserializeOwned,
    {
        Handle::new(self.clone(), settings, mapper)
    }

    /// Normalizes a mapper, static suffix, settings or nothing into a handle.
    pub fn method<R, P>(&self, method: Method, props: impl Into<RequestProps<P>>) -> Handle<P, R>
    where
        P: Serialize + 'static,
        R: DeserializeOwned,
    {
        let (settings, mapper) = props.into().into_settings(method);
        self.request(settings, mapper)
    }

    pub fn get<R, P>(&self, props: impl Into<RequestProps<P>>) -> Handle<P, R>
    where
        P: Serialize + 'static,
        R: DeserializeOwned,
    {
        self.method(Method::Get, props)
    }

    pub fn post<R, P>(&self, props: impl Into<RequestProps<P>>) -> Handle<P, R>
    where
        P: Serialize + 'static,
        R: DeserializeOwned,
    {
        self.method(Method::Post, props)
    }

    pub fn put<R, P>(&self, props: impl Into<RequestProps<P>>) -> Handle<P, R>
    where
        P: Serialize + 'static,
        R: DeserializeOwned,
    {
        self.method(Method::Put, props)
    }

    pub fn delete<R, P>(&self, props: impl Into<RequestProps<P>>) -> Handle<P, R>
    where
        P: Serialize + 'static,
        R: DeserializeOwned,
    {
        self.method(Method::Delete, props)
    }

    pub fn patch<R, P>(&self, props: impl Into<RequestProps<P>>) -> Handle<P, R>
    where
        P: Serialize + 'static,
        R: DeserializeOwned,
    {
        self.method(Method::Patch, props)
    }
}

impl std::fmt::Debug for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEndpoint")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
