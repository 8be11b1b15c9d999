//! A driver that reports upload and download progress.

use bytes::Bytes;
use futures::{future::BoxFuture, stream, Stream, StreamExt};
use reqwest::header::CONTENT_LENGTH;
use tokio::sync::broadcast;

use super::{
    driver::{multipart_form, request_builder},
    Driver, InitBody, RawResponse, RequestInit,
};
use crate::{config::RequesterConfig, Error};

const CHANNEL_CAPACITY: usize = 256;
const UPLOAD_CHUNK_SIZE: usize = 16 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Upload,
    Download,
}

/// Bytes transferred so far in one direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    pub direction: Direction,
    pub loaded: u64,
    /// Total size, when the peer announced one.
    pub total: Option<u64>,
}

impl ProgressEvent {
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(0) | None => None,
            Some(total) => Some(self.loaded as f64 / total as f64),
        }
    }
}

/// Driver publishing [`ProgressEvent`]s on its own broadcast channel.
///
/// Text bodies are streamed in chunks so upload progress can be observed.
/// Multipart bodies are sent as one unit and report no upload events.
pub struct ProgressDriver {
    client: Option<reqwest::Client>,
    sender: broadcast::Sender<ProgressEvent>,
}

impl ProgressDriver {
    /// Sends through `client`, or through a client built from
    /// [`RequesterConfig::default`] when none is given.
    pub fn new(client: Option<reqwest::Client>) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { client, sender }
    }

    fn client(&self) -> Result<reqwest::Client, Error> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => RequesterConfig::default().build_client(),
        }
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }

    fn publish(&self, event: ProgressEvent) {
        // no receivers is fine
        let _ = self.sender.send(event);
    }
}

fn upload_stream(
    body: Bytes,
    sender: broadcast::Sender<ProgressEvent>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let total = body.len() as u64;
    let chunks: Vec<Bytes> = (0..body.len())
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| body.slice(start..(start + UPLOAD_CHUNK_SIZE).min(body.len())))
        .collect();
    let mut loaded = 0u64;
    stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        let _ = sender.send(ProgressEvent {
            direction: Direction::Upload,
            loaded,
            total: Some(total),
        });
        Ok(chunk)
    })
}

impl Driver for ProgressDriver {
    fn fetch(&self, url: String, init: RequestInit) -> BoxFuture<'_, Result<RawResponse, Error>> {
        Box::pin(async move {
            let client = self.client()?;
            let builder = request_builder(&client, &url, &init);
            let builder = match init.body {
                Some(InitBody::Text(text)) => {
                    let body = Bytes::from(text);
                    builder
                        .header(CONTENT_LENGTH, body.len())
                        .body(reqwest::Body::wrap_stream(upload_stream(
                            body,
                            self.sender.clone(),
                        )))
                }
                Some(InitBody::Multipart(form)) => builder.multipart(multipart_form(&form)),
                None => builder,
            };

            let mut response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let final_url = response.url().to_string();
            let total = response.content_length();

            let mut body = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                body.extend_from_slice(&chunk);
                self.publish(ProgressEvent {
                    direction: Direction::Download,
                    loaded: body.len() as u64,
                    total,
                });
            }
            Ok(RawResponse::new(status, headers, final_url, body))
        })
    }
}
