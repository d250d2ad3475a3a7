//! "Current position" lookups.
//!
//! A terminal has no browser geolocation, so the device location comes from
//! either a configured fixed position or an IP geolocation service. Every
//! resolver makes a single attempt with no retry.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};

use crate::{
    config::{Config, LocationSetting},
    error::LocationError,
    model::Coordinates,
};

pub const IP_API_URL: &str = "http://ip-api.com/json";

#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    async fn resolve(&self) -> Result<Coordinates, LocationError>;
}

/// Resolver for systems with no location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationResolver for NoLocation {
    async fn resolve(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// A position supplied by the user.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationResolver for FixedLocation {
    async fn resolve(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Approximate position from the public IP address (ip-api.com).
#[derive(Debug, Clone)]
pub struct IpLocation {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

impl IpLocation {
    pub fn new() -> Self {
        Self::with_url(IP_API_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

impl Default for IpLocation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationResolver for IpLocation {
    async fn resolve(&self) -> Result<Coordinates, LocationError> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::PermissionOrPosition(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(LocationError::PermissionOrPosition(format!(
                "geolocation service returned status {status}"
            )));
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| LocationError::PermissionOrPosition(e.to_string()))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| "lookup failed".to_string());
            return Err(LocationError::PermissionOrPosition(reason));
        }

        let (Some(lat), Some(lon)) = (body.lat, body.lon) else {
            return Err(LocationError::PermissionOrPosition(
                "geolocation response had no coordinates".to_string(),
            ));
        };

        let coords = Coordinates::new(lat, lon)
            .map_err(|e| LocationError::PermissionOrPosition(e.to_string()))?;

        tracing::debug!(lat, lon, city = ?body.city, "resolved position from IP");
        Ok(coords)
    }
}

/// Construct the resolver selected in config.
pub fn resolver_from_config(config: &Config) -> Result<Arc<dyn LocationResolver>, LocationError> {
    let resolver: Arc<dyn LocationResolver> = match &config.location {
        LocationSetting::Ip => Arc::new(IpLocation::new()),
        LocationSetting::Fixed { latitude, longitude } => {
            Arc::new(FixedLocation(Coordinates::new(*latitude, *longitude)?))
        }
        LocationSetting::Disabled => Arc::new(NoLocation),
    };

    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn ip_server(status: u16, body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn no_location_is_unsupported() {
        assert_eq!(NoLocation.resolve().await, Err(LocationError::Unsupported));
    }

    #[tokio::test]
    async fn fixed_location_returns_its_coordinates() {
        let coords = Coordinates::new(48.85, 2.35).unwrap();
        assert_eq!(FixedLocation(coords).resolve().await, Ok(coords));
    }

    #[tokio::test]
    async fn ip_location_success() {
        let server = ip_server(
            200,
            serde_json::json!({"status": "success", "lat": 52.52, "lon": 13.405, "city": "Berlin"}),
        )
        .await;

        let resolver = IpLocation::with_url(format!("{}/json", server.uri()));
        let coords = resolver.resolve().await.unwrap();

        assert_eq!(coords.latitude(), 52.52);
        assert_eq!(coords.longitude(), 13.405);
    }

    #[tokio::test]
    async fn ip_location_fail_status_is_position_error() {
        let server = ip_server(
            200,
            serde_json::json!({"status": "fail", "message": "reserved range"}),
        )
        .await;

        let resolver = IpLocation::with_url(format!("{}/json", server.uri()));
        let err = resolver.resolve().await.unwrap_err();

        assert_eq!(err, LocationError::PermissionOrPosition("reserved range".into()));
    }

    #[tokio::test]
    async fn ip_location_http_error_is_position_error() {
        let server = ip_server(429, serde_json::json!({})).await;

        let resolver = IpLocation::with_url(format!("{}/json", server.uri()));
        let err = resolver.resolve().await.unwrap_err();

        assert!(matches!(err, LocationError::PermissionOrPosition(msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn ip_location_without_coordinates_is_position_error() {
        let server = ip_server(200, serde_json::json!({"status": "success"})).await;

        let resolver = IpLocation::with_url(format!("{}/json", server.uri()));
        let err = resolver.resolve().await.unwrap_err();

        assert!(matches!(err, LocationError::PermissionOrPosition(msg) if msg.contains("no coordinates")));
    }

    #[tokio::test]
    async fn ip_location_out_of_range_is_position_error() {
        let server = ip_server(
            200,
            serde_json::json!({"status": "success", "lat": 123, "lon": 0}),
        )
        .await;

        let resolver = IpLocation::with_url(format!("{}/json", server.uri()));
        let err = resolver.resolve().await.unwrap_err();

        assert!(matches!(err, LocationError::PermissionOrPosition(msg) if msg.contains("out of range")));
    }

    #[test]
    fn resolver_from_config_rejects_bad_fixed_position() {
        let cfg = Config {
            location: LocationSetting::Fixed { latitude: 123.0, longitude: 0.0 },
            ..Config::default()
        };
        let err = resolver_from_config(&cfg).unwrap_err();
        assert!(matches!(err, LocationError::InvalidCoordinates { .. }));
    }

    #[tokio::test]
    async fn resolver_from_config_disabled_is_unsupported() {
        let cfg = Config {
            location: LocationSetting::Disabled,
            ..Config::default()
        };
        let resolver = resolver_from_config(&cfg).unwrap();
        assert_eq!(resolver.resolve().await, Err(LocationError::Unsupported));
    }
}
