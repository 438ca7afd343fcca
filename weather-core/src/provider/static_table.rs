use async_trait::async_trait;
use std::time::Duration;

use crate::{
    error::{Result, WeatherError},
    model::WeatherRecord,
    provider::{ProviderId, WeatherProvider},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticWeatherEntry {
    pub temperature: i64,
    pub condition: &'static str,
}

const fn entry(temperature: i64, condition: &'static str) -> StaticWeatherEntry {
    StaticWeatherEntry { temperature, condition }
}

/// Keys are lower-case and trimmed.
static TABLE: [(&str, StaticWeatherEntry); 10] = [
    ("berlin", entry(15, "Cloudy")),
    ("london", entry(12, "Rainy")),
    ("paris", entry(18, "Sunny")),
    ("new york", entry(22, "Clear")),
    ("tokyo", entry(25, "Partly Cloudy")),
    ("sydney", entry(28, "Sunny")),
    ("moscow", entry(8, "Snowy")),
    ("dubai", entry(35, "Hot")),
    ("amsterdam", entry(14, "Windy")),
    ("rome", entry(20, "Sunny")),
];

/// Serves weather from a fixed in-memory table, after an optional simulated delay.
#[derive(Debug, Clone, Default)]
pub struct StaticTableProvider {
    delay: Duration,
}

impl StaticTableProvider {
    /// A provider that answers immediately.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    /// Find the entry for `city` after lower-casing and trimming it.
    pub fn lookup_entry(city: &str) -> Option<StaticWeatherEntry> {
        let key = city.to_lowercase();
        let key = key.trim();
        TABLE.iter().find(|(name, _)| *name == key).map(|(_, entry)| *entry)
    }
}

#[async_trait]
impl WeatherProvider for StaticTableProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Static
    }

    async fn resolve(&self, city: &str) -> Result<WeatherRecord> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let entry = Self::lookup_entry(city).ok_or(WeatherError::CityNotFound)?;

        Ok(WeatherRecord {
            city: capitalize_first(city),
            temperature: entry.temperature,
            condition: entry.condition.to_string(),
        })
    }
}

/// Upper-case the first character only; the rest is left as given.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
