use pwi_types::{Farm, WeatherReading};

use crate::config::TriggerConfig;

/// Decides whether a farm's recent weather meets the payout condition.
///
/// The last `window` readings are scanned oldest first with a counter that
/// starts at zero: a `bad_label` reading increments it, a `reset_label`
/// reading sets it back to zero, and any other label leaves it alone. The
/// condition holds when the counter ends at `threshold` or more.
///
/// With the default terms (window 3, threshold 3, `rainy`/`sunny`) only three
/// consecutive `rainy` readings trigger. A `cloudy` reading neither breaks
/// nor extends a rainy streak.
#[derive(Clone, Debug, Default)]
pub struct WeatherHistoryAnalyzer {
    rule: TriggerConfig,
}

impl WeatherHistoryAnalyzer {
    pub fn new(rule: TriggerConfig) -> Self {
        Self { rule }
    }

    /// Counter value after scanning `readings` in order.
    pub fn bad_count(&self, readings: &[WeatherReading]) -> u32 {
        readings.iter().fold(0, |count, reading| {
            if reading.is(&self.rule.bad_label) {
                count + 1
            } else if reading.is(&self.rule.reset_label) {
                0
            } else {
                count
            }
        })
    }

    /// Evaluate the trailing window of the farm's history.
    ///
    /// Histories shorter than the window never meet the condition.
    pub fn condition_met(&self, farm: &Farm) -> bool {
        if farm.history_len() < self.rule.window {
            return false;
        }
        self.bad_count(farm.trailing(self.rule.window)) >= self.rule.threshold
    }
}
