// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use recurcal_ical::RecurrenceFrequency;

/// The name of the application.
pub const APP_NAME: &str = "recurcal";

/// Configuration for the recurrence engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of occurrences shown for rules without COUNT or UNTIL when the
    /// view window has no end.
    pub default_counts: DefaultCounts,

    /// Multiplier turning the default count into the occurrence cap of rules
    /// without COUNT.
    pub safety_factor: u32,

    /// Hard cap on the number of periods a single calculation walks.
    pub max_periods: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_counts: DefaultCounts::default(),
            safety_factor: 1000,
            max_periods: 500_000,
        }
    }
}

impl Config {
    /// Occurrence cap for a rule of the given frequency without COUNT.
    #[must_use]
    pub fn max_occurrences(&self, freq: RecurrenceFrequency) -> usize {
        let cap = u64::from(self.default_counts.get(freq)) * u64::from(self.safety_factor);
        usize::try_from(cap).unwrap_or(usize::MAX)
    }
}

/// Default occurrence count per frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
#[expect(missing_docs)]
pub struct DefaultCounts {
    pub yearly: u32,
    pub monthly: u32,
    pub weekly: u32,
    pub daily: u32,
    pub hourly: u32,
    pub minutely: u32,
    pub secondly: u32,
}

impl Default for DefaultCounts {
    fn default() -> Self {
        Self {
            yearly: 10,
            monthly: 24,
            weekly: 52,
            daily: 365,
            hourly: 168,
            minutely: 1440,
            secondly: 3600,
        }
    }
}

impl DefaultCounts {
    /// The default count for the given frequency.
    #[must_use]
    pub fn get(&self, freq: RecurrenceFrequency) -> u32 {
        match freq {
            RecurrenceFrequency::Yearly => self.yearly,
            RecurrenceFrequency::Monthly => self.monthly,
            RecurrenceFrequency::Weekly => self.weekly,
            RecurrenceFrequency::Daily => self.daily,
            RecurrenceFrequency::Hourly => self.hourly,
            RecurrenceFrequency::Minutely => self.minutely,
            RecurrenceFrequency::Secondly => self.secondly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_empty_config_as_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_counts.get(RecurrenceFrequency::Weekly), 52);
    }

    #[test]
    fn parses_partial_config() {
        let toml_str = r#"
safety_factor = 10

[default_counts]
weekly = 104
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.safety_factor, 10);
        assert_eq!(config.max_periods, 500_000);
        assert_eq!(config.default_counts.weekly, 104);
        assert_eq!(config.default_counts.daily, 365);
        assert_eq!(config.max_occurrences(RecurrenceFrequency::Weekly), 1040);
    }

    #[test]
    fn rejects_invalid_types() {
        let toml_str = r#"max_periods = "many""#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }
}
