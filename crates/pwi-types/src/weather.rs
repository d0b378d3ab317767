use std::fmt;

use serde::{Deserialize, Serialize};

/// A single weather observation.
///
/// The label is free text; `"rainy"`, `"sunny"` and `"cloudy"` are the
/// conventional values. Readings are immutable once appended to a farm.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Condition label, stored verbatim.
    #[serde(rename = "name")]
    pub label: String,
    /// Temperature in degrees Celsius.
    #[serde(rename = "temperature")]
    pub temperature_c: i64,
}

impl WeatherReading {
    pub fn new(label: impl Into<String>, temperature_c: i64) -> Self {
        Self {
            label: label.into(),
            temperature_c,
        }
    }

    /// Returns `true` if the label is exactly `label`.
    pub fn is(&self, label: &str) -> bool {
        self.label == label
    }
}

impl fmt::Display for WeatherReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}C", self.label, self.temperature_c)
    }
}
