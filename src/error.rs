use crate::response::BridgeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
	#[error("Invalid bridge address: {0:?}")]
	InvalidAddress(String),

	/// The username is empty or would produce a malformed request path
	#[error("Invalid username: {0:?}")]
	InvalidUsername(String),

	#[error("Invalid light id {0}, ids start at 1")]
	InvalidLight(u32),

	#[error("Could not communicate with bridge: {0}")]
	Transport(String),

	#[error("Bridge answered with HTTP status {0}")]
	Status(u16),

	#[error("Unable to parse bridge response: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("Bridge reported an error: {0}")]
	Bridge(BridgeError),

	#[error("Unexpected bridge response: {0}")]
	UnexpectedResponse(String),

	/// Registration failed. The cause is available through `source()`.
	#[error("Unable to register")]
	Registration(#[source] Box<Error>),

	#[error("Configuration error: {0}")]
	Config(String),
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		match err.status() {
			Some(status) => Error::Status(status.as_u16()),
			None => Error::Transport(err.to_string()),
		}
	}
}

impl From<::config::ConfigError> for Error {
	fn from(err: ::config::ConfigError) -> Self {
		Error::Config(err.to_string())
	}
}

impl Error {
	/// The bridge-side error behind this one, if any
	pub fn bridge_error(&self) -> Option<&BridgeError> {
		match self {
			Error::Bridge(err) => Some(err),
			Error::Registration(cause) => cause.bridge_error(),
			_ => None,
		}
	}
}
