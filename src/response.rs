use serde_json::Value;
use std::fmt;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
/// Error object as reported by the bridge
pub struct BridgeError {
	#[serde(rename = "type", default)]
	pub kind: u16,
	/// Resource the error refers to
	#[serde(default)]
	pub address: String,
	#[serde(default)]
	pub description: String,
}

impl BridgeError {
	/// Registration was attempted without pressing the link button first
	pub fn is_link_button_not_pressed(&self) -> bool {
		self.kind == 101
	}

	pub(crate) fn from_value(value: &Value) -> BridgeError {
		serde_json::from_value(value.clone()).unwrap_or_else(|_| BridgeError {
			description: value.to_string(),
			..BridgeError::default()
		})
	}
}

impl fmt::Display for BridgeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.address.is_empty() {
			write!(f, "{} (type {})", self.description, self.kind)
		} else {
			write!(f, "{} at {} (type {})", self.description, self.address, self.kind)
		}
	}
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
/// One entry of a command result list
pub enum ResponseItem {
	/// Maps the changed resource address to its new value
	Success(Value),
	Error(BridgeError),
}

impl ResponseItem {
	pub fn is_success(&self) -> bool {
		matches!(self, ResponseItem::Success(_))
	}

	pub fn error(&self) -> Option<&BridgeError> {
		match self {
			ResponseItem::Error(err) => Some(err),
			ResponseItem::Success(_) => None,
		}
	}
}

/// Finds an `error` entry in a bridge response.
///
/// The bridge wraps results either in a bare object or in a list of objects;
/// both forms are searched.
pub(crate) fn find_error(value: &Value) -> Option<BridgeError> {
	match value {
		Value::Object(map) => map.get("error").map(BridgeError::from_value),
		Value::Array(items) => items.iter().find_map(find_error),
		_ => None,
	}
}

/// Unwraps a single-element result list into its only entry
pub(crate) fn first_entry(value: &Value) -> &Value {
	match value {
		Value::Array(items) if items.len() == 1 => &items[0],
		other => other,
	}
}
