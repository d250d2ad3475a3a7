use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::{
    condition::ConditionMain,
    config::DEFAULT_BASE_URL,
    error::FetchError,
    model::{Coordinates, WeatherSnapshot},
};

use super::WeatherClient;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    strict_status: bool,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            strict_status: false,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Also check the HTTP status on coordinate lookups.
    pub fn with_strict_status(mut self, strict: bool) -> Self {
        self.strict_status = strict;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CURRENT_WEATHER_PATH)
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<Response, FetchError> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("appid", self.api_key.as_str()));

        let res = self.http.get(self.endpoint()).query(&query).send().await?;
        Ok(res)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: f64,
}

/// Parse an OpenWeather current-weather body into a snapshot.
pub fn parse_snapshot(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Parse("weather list is empty".to_string()))?;

    if parsed.main.humidity > 100 {
        return Err(FetchError::Parse(format!(
            "humidity {} is outside 0..=100",
            parsed.main.humidity
        )));
    }

    Ok(WeatherSnapshot {
        location_name: parsed.name,
        temperature_kelvin: parsed.main.temp,
        condition_main: ConditionMain::from_label(&weather.main),
        condition_description: weather.description,
        wind_speed_mps: parsed.wind.speed,
        humidity_pct: parsed.main.humidity,
        visibility_m: parsed.visibility,
        pressure_hpa: parsed.main.pressure,
        observed_at: parsed.dt.and_then(unix_to_utc),
    })
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch_by_coordinates(&self, coords: Coordinates) -> Result<WeatherSnapshot, FetchError> {
        let lat = coords.latitude().to_string();
        let lon = coords.longitude().to_string();

        let res = self.get(&[("lat", lat.as_str()), ("lon", lon.as_str())]).await?;
        let status = res.status();
        let body = res.text().await?;

        if self.strict_status && !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "coordinate lookup rejected");
            return Err(FetchError::Status { status: status.as_u16() });
        }

        parse_snapshot(&body)
    }

    async fn fetch_by_query(&self, query: &str) -> Result<WeatherSnapshot, FetchError> {
        let res = self.get(&[("q", query)]).await?;
        let status = res.status();

        if !status.is_success() {
            tracing::debug!(%status, query, "query lookup rejected");
            return Err(FetchError::CityNotFound { status: status.as_u16() });
        }

        let body = res.text().await?;
        parse_snapshot(&body)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
