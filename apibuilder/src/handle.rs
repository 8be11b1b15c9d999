//! Callable request handles and their variants.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::broadcast;

use crate::{
    api_endpoint::ApiEndpoint,
    endpoint::{DescriptorGetter, MethodSettings},
    transport::{Driver, ProgressDriver, ProgressEvent, RawResponse, RequestInit},
    types::{Mapper, RequestDescriptor},
    Error,
};

/// Init data and resolved URL of a request that was not sent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestData {
    pub data: RequestInit,
    pub url: String,
}

/// One configured request. Every call evaluates the descriptor afresh, so a
/// handle can be shared and called concurrently.
pub struct Handle<P, R> {
    api: ApiEndpoint,
    settings: MethodSettings,
    mapper: Option<Mapper<P>>,
    getter: DescriptorGetter<P>,
    _response: PhantomData<fn() -> R>,
}

impl<P, R> Clone for Handle<P, R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            settings: self.settings.clone(),
            mapper: self.mapper.clone(),
            getter: self.getter.clone(),
            _response: PhantomData,
        }
    }
}

impl<P, R> Handle<P, R>
where
    P: Serialize + 'static,
    R: DeserializeOwned,
{
    pub(crate) fn new(api: ApiEndpoint, settings: MethodSettings, mapper: Option<Mapper<P>>) -> Self {
        let getter = api.node().method(settings.clone(), mapper.clone());
        Self {
            api,
            settings,
            mapper,
            getter,
            _response: PhantomData,
        }
    }

    pub fn settings(&self) -> &MethodSettings {
        &self.settings
    }

    /// Executes the request and decodes the parsed reply.
    pub async fn call(&self, params: P) -> Result<R, Error> {
        let descriptor = (self.getter)(&params)?;
        self.api
            .request_handler
            .handle(descriptor, None)
            .await?
            .decode()
    }

    /// Same request returning the unparsed response.
    pub fn raw(&self) -> RawHandle<P, RawResponse> {
        self.raw_map(|response| response)
    }

    /// Same request with the unparsed response piped through `map`.
    pub fn raw_map<T>(
        &self,
        map: impl Fn(RawResponse) -> T + Send + Sync + 'static,
    ) -> RawHandle<P, T> {
        let settings = MethodSettings {
            raw_response: Some(true),
            ..self.settings.clone()
        };
        RawHandle {
            api: self.api.clone(),
            getter: self.api.node().method(settings, self.mapper.clone()),
            map: Arc::new(map),
        }
    }

    /// Copy of this handle routed through a progress-reporting driver.
    pub fn with_progress(&self) -> ProgressHandle<P, R> {
        ProgressHandle::new(self.clone())
    }

    /// New handle that always sends the token, whatever the node says.
    pub fn protect(&self) -> Handle<P, R> {
        self.with_token(true)
    }

    /// New handle that never sends the token.
    pub fn unprotect(&self) -> Handle<P, R> {
        self.with_token(false)
    }

    fn with_token(&self, with_token: bool) -> Handle<P, R> {
        let settings = MethodSettings {
            with_token: Some(with_token),
            ..self.settings.clone()
        };
        self.api.request(settings, self.mapper.clone())
    }

    pub fn url(&self, params: P) -> Result<String, Error> {
        Ok(self.request_props(params)?.resolve_url())
    }

    /// The descriptor a call with `params` would execute.
    pub fn request_props(&self, params: P) -> Result<RequestDescriptor, Error> {
        (self.getter)(&params)
    }

    /// Transport init data for `params`, without sending anything.
    pub async fn request_data(&self, params: P) -> Result<RequestData, Error> {
        let descriptor = self.request_props(params)?;
        let data = self.api.request_data_getter.request_data(&descriptor).await?;
        Ok(RequestData {
            data,
            url: descriptor.resolve_url(),
        })
    }
}

impl<P, R> std::fmt::Debug for Handle<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("endpoint", &self.api.node())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// A handle whose descriptors always carry `raw_response`.
pub struct RawHandle<P, T> {
    api: ApiEndpoint,
    getter: DescriptorGetter<P>,
    map: Arc<dyn Fn(RawResponse) -> T + Send + Sync>,
}

impl<P, T> Clone for RawHandle<P, T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            getter: self.getter.clone(),
            map: self.map.clone(),
        }
    }
}

impl<P, T> RawHandle<P, T> {
    pub async fn call(&self, params: P) -> Result<T, Error> {
        let descriptor = (self.getter)(&params)?;
        let response = self
            .api
            .request_handler
            .handle(descriptor, None)
            .await?
            .into_raw()?;
        Ok((self.map)(response))
    }

    pub fn request_props(&self, params: P) -> Result<RequestDescriptor, Error> {
        (self.getter)(&params)
    }
}

/// A handle with its own progress channel.
///
/// Each handle, including every [`ProgressHandle::copy`], owns a separate
/// driver, so progress events never mix between them.
pub struct ProgressHandle<P, R> {
    handle: Handle<P, R>,
    driver: Arc<ProgressDriver>,
}

impl<P, R> ProgressHandle<P, R>
where
    P: Serialize + 'static,
    R: DeserializeOwned,
{
    fn new(handle: Handle<P, R>) -> Self {
        let driver = Arc::new(handle.api.progress_driver());
        Self { handle, driver }
    }

    pub async fn call(&self, params: P) -> Result<R, Error> {
        let descriptor = (self.handle.getter)(&params)?;
        let driver: &dyn Driver = self.driver.as_ref();
        self.handle
            .api
            .request_handler
            .handle(descriptor, Some(driver))
            .await?
            .decode()
    }

    /// Events for calls made through this handle after subscribing.
    pub fn progress(&self) -> broadcast::Receiver<ProgressEvent> {
        self.driver.subscribe()
    }

    /// Independent clone with a fresh progress channel.
    pub fn copy(&self) -> ProgressHandle<P, R> {
        ProgressHandle::new(self.handle.clone())
    }

    /// The plain handle this one was made from.
    pub fn handle(&self) -> &Handle<P, R> {
        &self.handle
    }
}
