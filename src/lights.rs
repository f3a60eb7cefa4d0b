use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::convert::TryFrom;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
/// Attributes of a light
///
/// Every attribute is optional on the wire; missing ones stay empty.
pub struct Light {
	pub uniqueid: String,
	#[serde(rename = "type")]
	pub light_type: String,
	pub name: String,
	pub modelid: String,
	pub manufacturername: String,
	pub productid: String,
	pub state: LightState,
	pub swversion: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
/// State document of a light
///
/// The schema belongs to the bridge firmware, so this is a plain JSON object
/// that is passed through unchanged. The typed accessors only read keys, they
/// never validate the document.
///
/// It holds either a bare state (`{"on": true, ...}`, as sent to the bridge)
/// or a full light description with the state under `state`, as returned by
/// [`AuthorizedBridge::get_light_state`](crate::AuthorizedBridge::get_light_state).
/// Accessors read the top-level key first and fall back to `state`.
pub struct LightState(Map<String, Value>);

impl LightState {
	pub fn new() -> LightState {
		LightState(Map::new())
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	pub fn insert<V: Into<Value>>(&mut self, key: &str, value: V) -> Option<Value> {
		self.0.insert(key.to_string(), value.into())
	}

	pub fn with<V: Into<Value>>(mut self, key: &str, value: V) -> LightState {
		self.insert(key, value);
		self
	}

	pub fn with_on(self, on: bool) -> LightState {
		self.with("on", on)
	}

	/// Brightness, 1 to 254
	pub fn with_brightness(self, bri: u8) -> LightState {
		self.with("bri", bri)
	}

	pub fn with_hue(self, hue: u16) -> LightState {
		self.with("hue", hue)
	}

	pub fn with_saturation(self, sat: u8) -> LightState {
		self.with("sat", sat)
	}

	/// Color tone in mired
	pub fn with_color_temperature(self, ct: u16) -> LightState {
		self.with("ct", ct)
	}

	/// Transition duration in multiples of 100ms
	pub fn with_transition_time(self, deciseconds: u16) -> LightState {
		self.with("transitiontime", deciseconds)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.0
	}

	/// Reads `key` from the document itself or, for a full light description,
	/// from its nested `state` object.
	fn field(&self, key: &str) -> Option<&Value> {
		self.0.get(key).or_else(|| {
			self.0
				.get("state")
				.and_then(Value::as_object)
				.and_then(|state| state.get(key))
		})
	}

	pub fn on(&self) -> Option<bool> {
		self.field("on").and_then(Value::as_bool)
	}

	pub fn brightness(&self) -> Option<u8> {
		self.field("bri").and_then(Value::as_u64).and_then(|v| u8::try_from(v).ok())
	}

	pub fn hue(&self) -> Option<u16> {
		self.field("hue").and_then(Value::as_u64).and_then(|v| u16::try_from(v).ok())
	}

	pub fn saturation(&self) -> Option<u8> {
		self.field("sat").and_then(Value::as_u64).and_then(|v| u8::try_from(v).ok())
	}

	pub fn color_temperature(&self) -> Option<u16> {
		self.field("ct").and_then(Value::as_u64).and_then(|v| u16::try_from(v).ok())
	}

	pub fn reachable(&self) -> Option<bool> {
		self.field("reachable").and_then(Value::as_bool)
	}
}

impl From<Map<String, Value>> for LightState {
	fn from(map: Map<String, Value>) -> Self {
		LightState(map)
	}
}

impl TryFrom<Value> for LightState {
	type Error = Error;

	fn try_from(value: Value) -> Result<Self> {
		match value {
			Value::Object(map) => Ok(LightState(map)),
			other => Err(Error::UnexpectedResponse(format!(
				"expected a JSON object, got {}",
				other
			))),
		}
	}
}
