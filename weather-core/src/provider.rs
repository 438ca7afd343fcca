use crate::{
    Config, WeatherQuery, WeatherRecord,
    error::{Result, WeatherError},
    provider::{static_table::StaticTableProvider, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod static_table;
pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Static,
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Static => "static",
            ProviderId::WeatherApi => "weatherapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Static, ProviderId::WeatherApi]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::WeatherApi)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "static" => Ok(ProviderId::Static),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: static, weatherapi."
            )),
        }
    }
}

/// A source of current weather for a single city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    /// Resolve weather for a non-empty city string.
    async fn resolve(&self, city: &str) -> Result<WeatherRecord>;
}

/// Validate the query and resolve it through `provider`.
pub async fn lookup(provider: &dyn WeatherProvider, query: &WeatherQuery) -> Result<WeatherRecord> {
    let city = query.city().ok_or(WeatherError::MissingCity)?;
    provider.resolve(city).await
}

/// Round a Celsius reading half away from zero (15.5 -> 16, -2.5 -> -3).
pub fn round_temperature(temp_c: f64) -> i64 {
    temp_c.round() as i64
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::Static => Box::new(StaticTableProvider::with_delay(Duration::from_millis(
            config.static_delay_ms,
        ))),
        ProviderId::WeatherApi => {
            let provider_cfg = config.provider_config(id).ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured for provider '{id}'.\n\
                     Hint: run `weather configure {id}` or set {}.",
                    crate::config::API_KEY_ENV
                )
            })?;

            let mut provider = WeatherApiProvider::new(provider_cfg.api_key.clone());
            if let Some(base_url) = &provider_cfg.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Box::new(provider)
        }
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}
