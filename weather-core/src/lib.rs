//! Core library for the `weather` lookup service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The `WeatherProvider` abstraction and its static-table and WeatherAPI.com backends
//! - Shared domain models (query, normalized record) and the lookup error taxonomy
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, LogFormat, LoggingConfig, ProviderConfig, ServerConfig};
pub use error::WeatherError;
pub use model::{WeatherQuery, WeatherRecord};
pub use provider::{ProviderId, WeatherProvider, lookup};
