use crate::bridge::{AuthorizedBridge, Bridge, DEFAULT_DEVICE_TYPE};
use crate::error::{Error, Result};
use crate::transport::HttpTransport;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File};
use std::time::Duration;

/// Environment variables are read as `HUE_ADDRESS`, `HUE_USERNAME`,
/// `HUE_DEVICETYPE` and `HUE_TIMEOUT_SECS`
pub const ENV_PREFIX: &str = "HUE";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
/// Everything needed to build a bridge client
pub struct BridgeConfig {
	pub address: String,
	/// Username from an earlier registration
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default = "default_device_type")]
	pub devicetype: String,
	/// Request timeout; the HTTP stack's default applies when unset
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

fn default_device_type() -> String {
	DEFAULT_DEVICE_TYPE.to_string()
}

fn environment() -> Environment {
	Environment::with_prefix(ENV_PREFIX).ignore_empty(true)
}

impl BridgeConfig {
	pub fn new(address: &str) -> BridgeConfig {
		BridgeConfig {
			address: address.to_string(),
			username: None,
			devicetype: default_device_type(),
			timeout_secs: None,
		}
	}

	pub fn from_env() -> Result<BridgeConfig> {
		BridgeConfig::from_sources(Config::builder().add_source(environment()))
	}

	/// Reads a settings file (any format `config` knows by its extension),
	/// with `HUE_*` environment variables taking precedence.
	pub fn from_file(path: &str) -> Result<BridgeConfig> {
		BridgeConfig::from_sources(
			Config::builder()
				.add_source(File::with_name(path))
				.add_source(environment()),
		)
	}

	fn from_sources(builder: ConfigBuilder<DefaultState>) -> Result<BridgeConfig> {
		Ok(builder.build()?.try_deserialize()?)
	}

	fn transport(&self) -> Result<HttpTransport> {
		HttpTransport::with_timeout(self.timeout_secs.map(Duration::from_secs))
	}

	/// Builds a client without a username, e.g. to register
	pub fn bridge(&self) -> Result<Bridge> {
		Ok(Bridge::with_transport(&self.address, self.transport()?)?.with_device_type(&self.devicetype))
	}

	/// Builds a client using the configured username.
	///
	/// Fails if none is configured.
	pub fn connect(&self) -> Result<AuthorizedBridge> {
		let username = self
			.username
			.as_deref()
			.ok_or_else(|| Error::Config("no username configured, register first".to_string()))?;
		self.bridge()?.authorize(username)
	}
}
