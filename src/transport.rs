use crate::error::Result;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
/// A single HTTP call against the bridge
pub struct Request {
	pub method: Method,
	pub url: String,
	/// JSON text, sent as is
	pub body: Option<String>,
}

/// Performs one request and returns the complete response body.
///
/// Implementations must not retry, and must report non-success HTTP statuses
/// as [`Error::Status`](crate::Error::Status).
pub trait Transport {
	fn send(&self, request: &Request) -> Result<String>;
}

#[derive(Debug, Clone)]
/// Blocking HTTP transport.
///
/// No idle connections are kept, so every call opens its own connection and
/// releases it before returning.
pub struct HttpTransport {
	client: Client,
}

impl HttpTransport {
	pub fn new() -> Result<HttpTransport> {
		HttpTransport::with_timeout(None)
	}

	/// `None` keeps the HTTP stack's default timeout
	pub fn with_timeout(timeout: Option<Duration>) -> Result<HttpTransport> {
		let mut builder = Client::builder().pool_max_idle_per_host(0);
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}
		Ok(HttpTransport {
			client: builder.build()?,
		})
	}
}

impl Transport for HttpTransport {
	fn send(&self, request: &Request) -> Result<String> {
		let mut builder = self.client.request(request.method.clone(), &request.url);
		if let Some(body) = &request.body {
			builder = builder
				.header(CONTENT_TYPE, "application/json")
				.body(body.clone());
		}
		let response = builder.send()?.error_for_status()?;
		Ok(response.text()?)
	}
}
