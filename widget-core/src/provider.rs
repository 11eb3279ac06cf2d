use crate::{
    Config, FetchError, FetchRequest, WeatherSnapshot, provider::openweather::OpenWeatherProvider,
};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tokio_util::sync::CancellationToken;

pub mod openweather;

/// Source of current-weather snapshots.
///
/// Implementations must return [`FetchError::Cancelled`] once `cancel` fires,
/// without waiting for the outstanding request.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(
        &self,
        request: &FetchRequest,
        cancel: &CancellationToken,
    ) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    config.validate()?;

    let provider = OpenWeatherProvider::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.request_timeout(),
    )
    .context("Failed to build HTTP client for OpenWeather")?;

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_api_key_missing() {
        let cfg = Config {
            api_key: String::new(),
            ..Config::default()
        };
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_with_defaults() {
        let provider = provider_from_config(&Config::default());
        assert!(provider.is_ok());
    }
}
