use serde::{Deserialize, Serialize};

use crate::weather::WeatherReading;

/// An insured farm, keyed in the ledger by its lower-cased name.
///
/// `weather_history` is append-only: insertion order is chronological order
/// and entries are never removed or rewritten.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farm {
    pub name: String,
    pub address: String,
    pub owner: String,
    #[serde(rename = "weather_index")]
    pub weather_history: Vec<WeatherReading>,
}

impl Farm {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        owner: impl Into<String>,
        weather_history: Vec<WeatherReading>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            owner: owner.into(),
            weather_history,
        }
    }

    /// Append a reading to the end of the history.
    pub fn record(&mut self, reading: WeatherReading) {
        self.weather_history.push(reading);
    }

    /// The last `n` readings in chronological order (fewer if the history is
    /// shorter).
    pub fn trailing(&self, n: usize) -> &[WeatherReading] {
        let start = self.weather_history.len().saturating_sub(n);
        &self.weather_history[start..]
    }

    pub fn history_len(&self) -> usize {
        self.weather_history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Farm {
        Farm::new(
            "f1",
            "addr",
            "alice",
            vec![
                WeatherReading::new("sunny", 20),
                WeatherReading::new("rainy", 15),
            ],
        )
    }

    #[test]
    fn record_appends_at_end() {
        let mut farm = sample();
        farm.record(WeatherReading::new("cloudy", 18));
        assert_eq!(farm.history_len(), 3);
        assert_eq!(farm.weather_history[0], WeatherReading::new("sunny", 20));
        assert_eq!(farm.weather_history[2], WeatherReading::new("cloudy", 18));
    }

    #[test]
    fn trailing_returns_most_recent_in_order() {
        let mut farm = sample();
        farm.record(WeatherReading::new("cloudy", 18));
        let last_two: Vec<&str> = farm.trailing(2).iter().map(|r| r.label.as_str()).collect();
        assert_eq!(last_two, vec!["rainy", "cloudy"]);
    }

    #[test]
    fn trailing_longer_than_history() {
        let farm = sample();
        assert_eq!(farm.trailing(10).len(), 2);
    }

    #[test]
    fn json_field_tags() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("weather_index").is_some());
        assert_eq!(json["owner"], "alice");
    }

    #[test]
    fn user_record_does_not_decode_as_farm() {
        let err = serde_json::from_str::<Farm>(r#"{"name":"f1","coin":10}"#);
        assert!(err.is_err());
    }
}
