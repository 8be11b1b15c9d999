//! Declarative REST client builder.
//!
//! Describe the API once as a tree of [`Endpoint`]s, wrap the root in an
//! [`ApiEndpoint`], and ask it for callable [`Handle`]s per verb. A handle
//! computes the URL, body and headers of each call from its parameters and
//! executes them through a [`RequestHandler`](transport::RequestHandler).

mod api_endpoint;
pub mod codec;
mod config;
mod endpoint;
mod errors;
mod handle;
pub mod server;
pub mod transport;
pub mod types;
pub use self::api_endpoint::{ApiEndpoint, EndpointSettings};
pub use self::config::RequesterConfig;
pub use self::endpoint::{DescriptorGetter, Endpoint, MethodSettings, RequestProps};
pub use self::errors::Error;
pub use self::handle::{Handle, ProgressHandle, RawHandle, RequestData};
pub use self::server::{Server, ServerProvider};
pub use self::transport::Requester;
pub use self::types::{
    mapper, Body, ContentType, FormData, Mapped, Method, Overrides, PathSuffix,
    RequestDescriptor,
};
