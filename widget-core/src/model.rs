use serde::{Deserialize, Serialize};

use crate::i18n::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One fetch, bound to the locale that was active when it was triggered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchRequest {
    pub coordinates: Coordinates,
    pub locale: Locale,
}

/// Display-ready readings for the configured location. Replaced wholesale on
/// every successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: i32,
    pub feels_like: i32,
    pub temp_min: i32,
    pub temp_max: i32,
    pub description: String,
    pub icon_url: String,
    pub humidity: u8,
    pub pressure: u32,
    /// km/h, one decimal.
    pub wind_speed: String,
    /// km, one decimal.
    pub visibility: String,
    pub sunrise: String,
    pub sunset: String,
}

/// Everything the card is rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub snapshot: Option<WeatherSnapshot>,
    pub loading: bool,
    pub locale: Locale,
    pub datetime: String,
    pub location: String,
    /// Set when the last live fetch failed.
    pub error: Option<String>,
}

impl ViewState {
    pub fn new(location: impl Into<String>, locale: Locale, datetime: String) -> Self {
        Self {
            snapshot: None,
            loading: true,
            locale,
            datetime,
            location: location.into(),
            error: None,
        }
    }
}
