use thiserror::Error;

/// Failures of a single location request.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    #[error("Geolocation is not supported on this system")]
    Unsupported,

    #[error("Could not determine current position: {0}")]
    PermissionOrPosition(String),

    #[error("Coordinates out of range: lat={latitude}, lon={longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// Failures of a single weather fetch, including the location step that may
/// precede it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("Failed to reach weather provider: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed weather payload: {0}")]
    Parse(String),

    #[error("City not found (status {status})")]
    CityNotFound { status: u16 },

    #[error("Weather provider returned status {status}")]
    Status { status: u16 },
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
