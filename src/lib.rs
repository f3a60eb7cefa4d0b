//! Minimal client for the local HTTP/JSON API of a Hue bridge.
//!
//! A [`Bridge`] knows only the bridge address. Registering with it (or
//! supplying a known username) yields an [`AuthorizedBridge`], which is the
//! only type able to query and control lights.
//!
//! ```no_run
//! use huehub::{Bridge, LightState};
//!
//! let bridge = Bridge::new("http://192.168.1.2")?;
//! let bridge = bridge.register()?;
//! println!("store this username: {}", bridge.username());
//!
//! let state = bridge.get_light_state(1)?;
//! println!("light 1 is on: {:?}", state.on());
//! bridge.set_light_state(1, &LightState::new().with_on(true).with_brightness(200))?;
//! # Ok::<(), huehub::Error>(())
//! ```
#[macro_use]
extern crate serde_derive;
extern crate reqwest;
extern crate serde;
extern crate serde_json;
pub mod error;
pub use error::{Error, Result};
pub mod lights;
pub use lights::{Light, LightState};
pub mod response;
pub use response::{BridgeError, ResponseItem};
pub mod transport;
pub use transport::{HttpTransport, Request, Transport};
pub mod bridge;
pub use bridge::{AuthorizedBridge, Bridge};
pub mod config;
pub use config::BridgeConfig;
