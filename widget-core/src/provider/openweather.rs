use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    FetchError,
    clock::format_clock,
    i18n::Locale,
    model::{FetchRequest, WeatherSnapshot},
    units::{kelvin_to_celsius, meters_to_km, mps_to_kmh},
};

use super::WeatherProvider;

pub const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

pub fn icon_url(icon_code: &str) -> String {
    format!("{ICON_URL_BASE}/{icon_code}@2x.png")
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            base_url,
            http,
        })
    }

    async fn fetch_current(&self, request: &FetchRequest) -> Result<WeatherSnapshot, FetchError> {
        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));
        let lat = request.coordinates.latitude.to_string();
        let lon = request.coordinates.longitude.to_string();

        debug!(%url, %lat, %lon, locale = %request.locale, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::http(status, &body));
        }

        snapshot_from_json(&body, request.locale)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(
        &self,
        request: &FetchRequest,
        cancel: &CancellationToken,
    ) -> Result<WeatherSnapshot, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("current weather request cancelled");
                Err(FetchError::Cancelled)
            }
            result = self.fetch_current(request) => result,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    visibility: f64,
    /// Seconds east of UTC for the requested location.
    timezone: Option<i32>,
}

/// Map a raw "current weather" body into a snapshot, formatting sunrise and
/// sunset for `locale`.
pub fn snapshot_from_json(body: &str, locale: Locale) -> Result<WeatherSnapshot, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let weather = parsed
        .weather
        .first()
        .ok_or_else(|| FetchError::Parse("response contained no weather entry".to_string()))?;

    let offset = parsed
        .timezone
        .and_then(FixedOffset::east_opt)
        .or_else(|| FixedOffset::east_opt(0))
        .ok_or_else(|| FetchError::Parse("invalid timezone offset".to_string()))?;

    let clock = |ts: i64| {
        format_clock(ts, offset, locale)
            .ok_or_else(|| FetchError::Parse(format!("timestamp {ts} is out of range")))
    };

    Ok(WeatherSnapshot {
        temperature: kelvin_to_celsius(parsed.main.temp),
        feels_like: kelvin_to_celsius(parsed.main.feels_like),
        temp_min: kelvin_to_celsius(parsed.main.temp_min),
        temp_max: kelvin_to_celsius(parsed.main.temp_max),
        description: weather.description.clone(),
        icon_url: icon_url(&weather.icon),
        humidity: parsed.main.humidity,
        pressure: parsed.main.pressure,
        wind_speed: mps_to_kmh(parsed.wind.speed),
        visibility: meters_to_km(parsed.visibility),
        sunrise: clock(parsed.sys.sunrise)?,
        sunset: clock(parsed.sys.sunset)?,
    })
}
