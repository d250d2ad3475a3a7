use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config,
    error::FetchError,
    model::{Coordinates, WeatherSnapshot},
    provider::openweather::OpenWeatherClient,
};

pub mod openweather;

/// Current-weather lookups against a single provider.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Fetch by position. The response body is trusted without a status check
    /// unless the client is configured otherwise.
    async fn fetch_by_coordinates(&self, coords: Coordinates) -> Result<WeatherSnapshot, FetchError>;

    /// Fetch by free-text location. Any non-success status is reported as
    /// [`FetchError::CityNotFound`].
    async fn fetch_by_query(&self, query: &str) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherClient>> {
    let api_key = config.require_api_key()?;

    let client = OpenWeatherClient::new(api_key.to_owned())
        .with_base_url(config.base_url())
        .with_strict_status(config.strict_status);

    Ok(Arc::new(client))
}
