use serde::{Deserialize, Serialize};

/// Query string of `GET /api/weather`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: Some(city.into()) }
    }

    /// Parse a raw `application/x-www-form-urlencoded` query string.
    ///
    /// Never fails: the first `city` pair wins, other keys are ignored and
    /// invalid percent-encoded UTF-8 is decoded lossily.
    pub fn from_query_string(raw: Option<&str>) -> Self {
        let city = raw.and_then(|raw| {
            url::form_urlencoded::parse(raw.as_bytes())
                .find(|(key, _)| key == "city")
                .map(|(_, value)| value.into_owned())
        });
        Self { city }
    }

    /// The requested city, or `None` when the parameter is absent or empty.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.is_empty())
    }
}

/// Normalized current weather returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub temperature: i64,
    pub condition: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_city_is_treated_as_missing() {
        assert_eq!(WeatherQuery::default().city(), None);
        assert_eq!(WeatherQuery::new("").city(), None);
        assert_eq!(WeatherQuery::new(" ").city(), Some(" "));
        assert_eq!(WeatherQuery::new("Berlin").city(), Some("Berlin"));
    }

    #[test]
    fn parses_raw_query_strings() {
        let parse = WeatherQuery::from_query_string;

        assert_eq!(parse(None), WeatherQuery::default());
        assert_eq!(parse(Some("")), WeatherQuery::default());
        assert_eq!(parse(Some("other=x")), WeatherQuery::default());
        assert_eq!(parse(Some("city=new%20york")), WeatherQuery::new("new york"));
        assert_eq!(parse(Some("city=new+york&units=c")), WeatherQuery::new("new york"));
        assert_eq!(parse(Some("city=")).city(), None);
    }

    #[test]
    fn first_city_value_wins() {
        let query = WeatherQuery::from_query_string(Some("city=berlin&city=paris"));
        assert_eq!(query.city(), Some("berlin"));
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let query = WeatherQuery::from_query_string(Some("city=%FF%FE"));
        assert_eq!(query.city(), Some("\u{FFFD}\u{FFFD}"));
    }

    #[test]
    fn record_serializes_to_three_fields() {
        let record = WeatherRecord {
            city: "Berlin".into(),
            temperature: 16,
            condition: "Partly cloudy".into(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"city": "Berlin", "temperature": 16, "condition": "Partly cloudy"})
        );
    }
}
