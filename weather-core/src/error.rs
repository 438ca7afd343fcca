use thiserror::Error;

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

/// Failures of a weather lookup.
///
/// The `Display` text of each variant is the message shown to callers.
/// `Internal` keeps its source for logging only.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City parameter is required")]
    MissingCity,

    #[error("City not found")]
    CityNotFound,

    #[error("Failed to fetch weather data")]
    Upstream { status: u16 },

    #[error("An error occurred while fetching weather data")]
    Internal(#[source] anyhow::Error),
}

impl WeatherError {
    /// HTTP status code this error maps to.
    pub fn status(&self) -> u16 {
        match self {
            WeatherError::MissingCity => 400,
            WeatherError::CityNotFound => 404,
            WeatherError::Upstream { status } => *status,
            WeatherError::Internal(_) => 500,
        }
    }
}

impl From<anyhow::Error> for WeatherError {
    fn from(err: anyhow::Error) -> Self {
        WeatherError::Internal(err)
    }
}
