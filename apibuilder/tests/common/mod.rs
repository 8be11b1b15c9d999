#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use apibuilder::transport::{
    prepare_request_data, Driver, RawResponse, Reply, RequestDataGetter, RequestHandler,
    RequestInit, TokenType,
};
use apibuilder::{ApiEndpoint, Endpoint, Error, RequestDescriptor, Server};
use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use serde_json::Value;

/// Records every descriptor it is asked to execute and answers with a
/// canned JSON value.
pub struct RecordingHandler {
    seen: Mutex<Vec<RequestDescriptor>>,
    reply: Value,
}

impl RecordingHandler {
    pub fn new(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            reply,
        })
    }

    pub fn seen(&self) -> Vec<RequestDescriptor> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> RequestDescriptor {
        self.seen().pop().expect("no request recorded")
    }
}

impl RequestHandler for RecordingHandler {
    fn handle<'a>(
        &'a self,
        descriptor: RequestDescriptor,
        _driver: Option<&'a dyn Driver>,
    ) -> BoxFuture<'a, Result<Reply, Error>> {
        Box::pin(async move {
            let raw = descriptor.raw_response;
            self.seen.lock().unwrap().push(descriptor);
            if raw {
                Ok(Reply::Raw(RawResponse::new(
                    200,
                    HeaderMap::new(),
                    "http://recorded",
                    self.reply.to_string(),
                )))
            } else {
                Ok(Reply::Parsed(self.reply.clone()))
            }
        })
    }
}

impl RequestDataGetter for RecordingHandler {
    fn request_data<'a>(
        &'a self,
        descriptor: &'a RequestDescriptor,
    ) -> BoxFuture<'a, Result<RequestInit, Error>> {
        Box::pin(async move { Ok(prepare_request_data(descriptor, Some("t0k"), TokenType::Bearer)) })
    }
}

pub fn recorded_api(reply: Value) -> (ApiEndpoint, Arc<RecordingHandler>) {
    let handler = RecordingHandler::new(reply);
    let root = Endpoint::with_server(Arc::new(Server::new("https://api.test")), Some("v1"));
    let api = ApiEndpoint::new(root, handler.clone(), handler.clone());
    (api, handler)
}
