//! Core library for the `tempview` weather display.
//!
//! This crate defines:
//! - Device location lookups (fixed position, IP geolocation)
//! - The OpenWeather current-weather client
//! - Condition to icon/background mapping
//! - The view state machine tying them together
//! - Configuration handling
//!
//! It is used by `tempview-cli`, but can also drive other front ends.

pub mod condition;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod view;

pub use condition::{ConditionMain, Gradient, Icon, background_for, icon_for};
pub use config::{Config, LocationSetting};
pub use error::{FetchError, LocationError};
pub use location::{LocationResolver, resolver_from_config};
pub use model::{Coordinates, SearchQuery, WeatherSnapshot};
pub use provider::{WeatherClient, client_from_config};
pub use view::{OrderingPolicy, ViewModel, ViewState, WeatherView};
