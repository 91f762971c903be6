//! Transport contract and blocking HTTP implementation
//!
//! The protocol engine only needs "send bytes and headers with a timeout,
//! receive bytes and a status code"; anything that satisfies
//! [`Transport`] will do, and tests substitute an in-memory one.

use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};

/// One outbound exchange
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Destination URL
    pub url: String,
    /// Header name/value pairs, sent in order
    pub headers: Vec<(String, String)>,
    /// UTF-8 request body
    pub body: String,
    /// Whole-exchange timeout
    pub timeout: Duration,
}

/// The raw reply to an exchange
#[derive(Debug, Clone)]
pub struct HttpReply {
    /// HTTP status code
    pub status: u16,
    /// Raw body text, possibly with transport artifacts
    pub body: String,
}

/// Performs the network exchange for a signed envelope.
///
/// One blocking call per transaction; no concurrent in-flight requests.
pub trait Transport {
    /// Send the request and wait for the reply
    fn exchange(&self, request: &HttpRequest) -> Result<HttpReply>;
}

/// Blocking HTTP POST transport
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build the underlying HTTP client
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn exchange(&self, request: &HttpRequest) -> Result<HttpReply> {
        debug!(url = %request.url, "sending request");
        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout)
            .body(request.body.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let response = builder
            .send()
            .map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| Error::Transport(e.to_string()))?;
        debug!(status, len = body.len(), "reply received");
        Ok(HttpReply { status, body })
    }
}
