//! Core library for the weather widget.
//!
//! This crate defines:
//! - Configuration of the fixed location and provider credentials
//! - The weather provider abstraction and its OpenWeather implementation
//! - The view-state controller that sequences fetches and user actions
//! - The presentation layer that turns state into a localized card
//!
//! It is used by `weather-widget`, but the controller can be driven by any
//! event loop that owns it.

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod i18n;
pub mod model;
pub mod provider;
pub mod units;
pub mod view;

pub use config::Config;
pub use controller::{FetchOutcome, WeatherController};
pub use error::FetchError;
pub use i18n::{Catalog, Locale, TextDirection};
pub use model::{Coordinates, FetchRequest, ViewState, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
pub use view::{CardView, render};
