use crate::error::{Error, Result};
use crate::lights::{Light, LightState};
use crate::response::{self, ResponseItem};
use crate::transport::{HttpTransport, Request, Transport};
use reqwest::{Method, Url};
use serde_json::{json, Value};
use std::convert::TryFrom;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Device type announced when registering
pub const DEFAULT_DEVICE_TYPE: &str = "HueHubAndroid";

#[derive(Debug, Clone)]
/// A Hue bridge we hold no username for yet
pub struct Bridge<T = HttpTransport> {
	base: Url,
	devicetype: String,
	transport: T,
}

#[derive(Debug, Clone)]
/// A Hue bridge together with a username accepted by it
pub struct AuthorizedBridge<T = HttpTransport> {
	bridge: Bridge<T>,
	username: String,
}

impl Bridge {
	/// Creates a client talking plain HTTP to `address`, e.g. `http://192.168.1.2`.
	///
	/// A missing scheme defaults to `http://`.
	pub fn new(address: &str) -> Result<Bridge> {
		Bridge::with_transport(address, HttpTransport::new()?)
	}
}

impl<T: Transport> Bridge<T> {
	pub fn with_transport(address: &str, transport: T) -> Result<Bridge<T>> {
		Ok(Bridge {
			base: normalize_address(address)?,
			devicetype: DEFAULT_DEVICE_TYPE.to_string(),
			transport,
		})
	}

	pub fn with_device_type(mut self, devicetype: &str) -> Bridge<T> {
		self.devicetype = devicetype.to_string();
		self
	}

	pub fn address(&self) -> &str {
		self.base.as_str().trim_end_matches('/')
	}

	pub fn device_type(&self) -> &str {
		&self.devicetype
	}

	/// Uses a username obtained by an earlier registration.
	pub fn authorize(self, username: &str) -> Result<AuthorizedBridge<T>> {
		validate_username(username)?;
		Ok(AuthorizedBridge {
			bridge: self,
			username: username.to_string(),
		})
	}

	/// Registers this application with the bridge.
	///
	/// The bridge only accepts this shortly after its link button was pressed.
	/// Every failure is reported as [`Error::Registration`]; the actual cause
	/// is its `source()`.
	pub fn register(&self) -> Result<AuthorizedBridge<T>>
	where
		T: Clone,
	{
		let candidate = Uuid::new_v4().simple().to_string();
		let body = json!({
			"username": candidate,
			"devicetype": self.devicetype,
		});
		let username = self
			.call(Method::POST, &[""], Some(&body))
			.and_then(|response| registered_username(&response))
			.and_then(|username| validate_username(&username).map(|_| username))
			.map_err(|err| Error::Registration(Box::new(self.failed("register", err))))?;
		info!(address = self.address(), "Registered with bridge");
		self.clone().authorize(&username)
	}

	/// `<address>/api/<segments>`; every segment is percent-encoded on its own
	fn url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url> {
		let mut url = self.base.clone();
		url.path_segments_mut()
			.map_err(|_| Error::InvalidAddress(self.base.to_string()))?
			.pop_if_empty()
			.push("api")
			.extend(segments);
		Ok(url)
	}

	fn call<S: AsRef<str>>(&self, method: Method, segments: &[S], body: Option<&Value>) -> Result<Value> {
		let request = Request {
			method,
			url: self.url(segments)?.to_string(),
			body: body.map(Value::to_string),
		};
		debug!(method = %request.method, address = self.address(), "Sending request to bridge");
		let text = self.transport.send(&request)?;
		debug!(bytes = text.len(), "Received bridge response");
		Ok(serde_json::from_str(&text)?)
	}

	fn failed(&self, operation: &str, err: Error) -> Error {
		warn!(operation, address = self.address(), error = %err, "Bridge request failed");
		err
	}
}

impl<T: Transport> AuthorizedBridge<T> {
	pub fn username(&self) -> &str {
		&self.username
	}

	pub fn address(&self) -> &str {
		self.bridge.address()
	}

	/// Forgets the username
	pub fn into_bridge(self) -> Bridge<T> {
		self.bridge
	}

	/// Returns the current state document of a light.
	///
	/// The document is whatever the bridge reports for the light, passed
	/// through unchanged. On real bridges that is the full light description
	/// with the state under its `state` key; the typed accessors of
	/// [`LightState`] look there when a key is missing at the top level.
	/// Use [`light`](Self::light) for a typed split of the two.
	pub fn get_light_state(&self, light: u32) -> Result<LightState> {
		self.fetch_light(light)
			.and_then(LightState::try_from)
			.map_err(|err| self.bridge.failed("get light state", err))
	}

	/// Like [`get_light_state`](Self::get_light_state), typed as a [`Light`]
	pub fn light(&self, light: u32) -> Result<Light> {
		self.fetch_light(light)
			.and_then(|doc| Ok(serde_json::from_value(doc)?))
			.map_err(|err| self.bridge.failed("get light", err))
	}

	/// Sends `state` to a light and returns the bridge's result per attribute.
	///
	/// Fails only when the call itself fails or when no attribute could be
	/// changed; partial failures are left to the caller to inspect.
	pub fn set_light_state(&self, light: u32, state: &LightState) -> Result<Vec<ResponseItem>> {
		self.put_light_state(light, state)
			.map_err(|err| self.bridge.failed("set light state", err))
	}

	fn fetch_light(&self, light: u32) -> Result<Value> {
		let path = self.light_path(light, false)?;
		let doc = self.bridge.call(Method::GET, &path[..], None)?;
		match response::find_error(&doc) {
			Some(err) => Err(Error::Bridge(err)),
			None => Ok(doc),
		}
	}

	fn put_light_state(&self, light: u32, state: &LightState) -> Result<Vec<ResponseItem>> {
		let body = serde_json::to_value(state)?;
		let path = self.light_path(light, true)?;
		let reply = self.bridge.call(Method::PUT, &path[..], Some(&body))?;
		let items: Vec<ResponseItem> = match reply {
			Value::Array(_) => serde_json::from_value(reply)?,
			other => match response::find_error(&other) {
				Some(err) => return Err(Error::Bridge(err)),
				None => vec![ResponseItem::Success(other)],
			},
		};
		if !items.is_empty() && !items.iter().any(ResponseItem::is_success) {
			if let Some(err) = items.iter().find_map(ResponseItem::error) {
				return Err(Error::Bridge(err.clone()));
			}
		}
		Ok(items)
	}

	/// `<username>/lights/<light>`, with `/state` appended for control requests
	fn light_path(&self, light: u32, state: bool) -> Result<Vec<String>> {
		if light == 0 {
			return Err(Error::InvalidLight(light));
		}
		let mut path = vec![self.username.clone(), "lights".to_string(), light.to_string()];
		if state {
			path.push("state".to_string());
		}
		Ok(path)
	}
}

fn registered_username(response: &Value) -> Result<String> {
	if let Some(err) = response::find_error(response) {
		return Err(Error::Bridge(err));
	}
	response::first_entry(response)
		.get("success")
		.and_then(|success| success.get("username"))
		.and_then(Value::as_str)
		.map(str::to_string)
		.ok_or_else(|| Error::UnexpectedResponse("no success.username in registration reply".to_string()))
}

fn normalize_address(address: &str) -> Result<Url> {
	let invalid = || Error::InvalidAddress(address.to_string());
	let trimmed = address.trim();
	let parsed = if trimmed.contains("://") {
		Url::parse(trimmed)
	} else {
		Url::parse(&format!("http://{}", trimmed))
	};
	let mut url = parsed.map_err(|_| invalid())?;
	let usable = matches!(url.scheme(), "http" | "https")
		&& url.host_str().map_or(false, |host| !host.is_empty())
		&& url.query().is_none()
		&& url.fragment().is_none();
	if !usable {
		return Err(invalid());
	}
	let path = url.path().trim_end_matches('/').to_string();
	url.set_path(&path);
	Ok(url)
}

/// A username ends up as a single path segment, so only unreserved
/// characters without dots are accepted.
fn validate_username(username: &str) -> Result<()> {
	let malformed = username.is_empty()
		|| !username
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
	if malformed {
		Err(Error::InvalidUsername(username.to_string()))
	} else {
		Ok(())
	}
}
