//! Run configuration: roster, extension map, display policy, thresholds.
//!
//! A [`SummaryConfig`] is built once per process (usually from a TOML file)
//! and passed by reference into every pipeline stage. Nothing in the engine
//! reads configuration from ambient state.
//!
//! ```toml
//! roster = ["Chloe", "Nicola", "Jess"]
//! hide_if_zero = ["Jess"]
//! busy_threshold = 19
//! performance_multiplier = 2.0
//!
//! [business_hours]
//! start = 9
//! end = 17
//!
//! [extensions]
//! "*200" = "Chloe"
//! "*201" = "Nicola"
//! "*202" = "Jess"
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ConfigError;

/// Hourly windows with more calls than this (summed across staff) are busy.
pub const DEFAULT_BUSY_THRESHOLD: u64 = 19;

/// Calls above `multiplier × window average` earn the exceptional tag.
pub const DEFAULT_PERFORMANCE_MULTIPLIER: f64 = 2.0;

/// Identity produced by malformed upstream data; never shown in any summary.
pub const SENTINEL_STAFF: &str = "0";

/// Inclusive range of hours shown in the hourly summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub fn contains(&self, hour: u32) -> bool {
        (self.start..=self.end).contains(&hour)
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self { start: 9, end: 17 }
    }
}

/// Everything a summary run needs besides the CDR snapshot itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Canonical staff names, in display order for ties.
    #[serde(default)]
    pub roster: Vec<String>,
    /// Staff hidden from a window when they took no calls in it.
    #[serde(default)]
    pub hide_if_zero: Vec<String>,
    #[serde(default = "default_busy_threshold")]
    pub busy_threshold: u64,
    #[serde(default = "default_performance_multiplier")]
    pub performance_multiplier: f64,
    #[serde(default)]
    pub business_hours: HourRange,
    /// Extension (`"*202"` or `"202"`) → staff name.
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

fn default_busy_threshold() -> u64 {
    DEFAULT_BUSY_THRESHOLD
}

fn default_performance_multiplier() -> f64 {
    DEFAULT_PERFORMANCE_MULTIPLIER
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            roster: Vec::new(),
            hide_if_zero: Vec::new(),
            busy_threshold: DEFAULT_BUSY_THRESHOLD,
            performance_multiplier: DEFAULT_PERFORMANCE_MULTIPLIER,
            business_hours: HourRange::default(),
            extensions: BTreeMap::new(),
        }
    }
}

impl SummaryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SummaryConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the invariants the pipeline relies on.
    ///
    /// Hide-if-zero names outside the roster are harmless (they can never
    /// match a row) and only produce a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::EmptyExtensionMap);
        }

        let mut seen = HashSet::with_capacity(self.roster.len());
        for name in &self.roster {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateStaff(name.clone()));
            }
        }

        for (key, staff) in &self.extensions {
            if normalize_extension(key).is_none() {
                return Err(ConfigError::InvalidExtension(key.clone()));
            }
            if !seen.contains(staff.as_str()) {
                return Err(ConfigError::UnknownStaff {
                    extension: key.clone(),
                    staff: staff.clone(),
                });
            }
        }

        let HourRange { start, end } = self.business_hours;
        if start > end || end > 23 {
            return Err(ConfigError::InvalidHourRange { start, end });
        }

        if !self.performance_multiplier.is_finite() || self.performance_multiplier <= 0.0 {
            return Err(ConfigError::InvalidMultiplier(self.performance_multiplier));
        }

        for name in &self.hide_if_zero {
            if !seen.contains(name.as_str()) {
                warn!(staff = %name, "hide_if_zero entry is not in the roster");
            }
        }

        Ok(())
    }

    /// Whether `staff` is dropped from a window in which they took no calls.
    pub fn hides_when_idle(&self, staff: &str) -> bool {
        self.hide_if_zero.iter().any(|s| s == staff)
    }

    /// Configuration of the front-office deployment the tool was first built for.
    pub fn sample() -> Self {
        let staff_by_extension: &[(&str, &str)] = &[
            ("*200", "Chloe"),
            ("*201", "Nicola"),
            ("*202", "Jess"),
            ("*203", "Debbie"),
            ("*204", "Emma"),
            ("*205", "Frankie"),
            ("*206", "Sharon"),
            ("*207", "Becky"),
            ("*208", "Reece"),
            ("*209", "Lewis"),
            ("*210", "Olivia"),
            ("*211", "Kim"),
            ("*212", "Mike"),
            ("*213", "Chris"),
            ("*214", "Leah"),
            ("*215", "Steve"),
            ("*228", "Charlee"),
            ("*229", "Ellie"),
            ("*230", "Michelle"),
            ("*231", "Abbie"),
            ("*232", "Bethany"),
        ];
        let roster = [
            "Chloe", "Nicola", "Jess", "Emma", "Frankie", "Sharon", "Becky", "Reece", "Lewis",
            "Olivia", "Kim", "Mike", "Chris", "Leah", "Steve", "Charlee", "Michelle", "Abbie",
            "Ellie", "Bethany", "Debbie",
        ];
        let hide_if_zero = ["Lewis", "Mike", "Reece", "Olivia", "Steve"];

        Self {
            roster: roster.iter().map(|s| s.to_string()).collect(),
            hide_if_zero: hide_if_zero.iter().map(|s| s.to_string()).collect(),
            extensions: staff_by_extension
                .iter()
                .map(|(ext, name)| (ext.to_string(), name.to_string()))
                .collect(),
            ..Self::default()
        }
    }
}

/// Canonical form of an extension key: the bare digits.
///
/// `"*202"`, `"202"` and `" *202 "` all normalise to `"202"`. Anything that
/// is not a non-empty digit run returns `None`.
pub fn normalize_extension(key: &str) -> Option<String> {
    let key = key.trim();
    let digits = key.strip_prefix('*').unwrap_or(key);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> SummaryConfig {
        SummaryConfig {
            roster: vec!["A".into(), "B".into()],
            extensions: [("*1".to_string(), "A".to_string())].into_iter().collect(),
            ..SummaryConfig::default()
        }
    }

    #[test]
    fn sample_is_valid() {
        let config = SummaryConfig::sample();
        config.validate().unwrap();
        assert_eq!(config.roster.len(), 21);
        assert_eq!(config.extensions.len(), 21);
        assert_eq!(config.busy_threshold, 19);
        assert_eq!(config.business_hours, HourRange { start: 9, end: 17 });
    }

    #[test]
    fn toml_defaults_fill_thresholds() {
        let config = SummaryConfig::from_toml_str(
            r#"
            roster = ["A", "B"]

            [extensions]
            "*1" = "A"
            "2" = "B"
            "#,
        )
        .unwrap();
        assert_eq!(config.busy_threshold, DEFAULT_BUSY_THRESHOLD);
        assert_eq!(config.performance_multiplier, DEFAULT_PERFORMANCE_MULTIPLIER);
        assert_eq!(config.business_hours, HourRange::default());
        assert!(config.hide_if_zero.is_empty());
    }

    #[test]
    fn toml_round_trip_preserves_sample() {
        let sample = SummaryConfig::sample();
        let text = sample.to_toml_string().unwrap();
        assert_eq!(SummaryConfig::from_toml_str(&text).unwrap(), sample);
    }

    #[test]
    fn empty_roster_rejected() {
        let config = SummaryConfig {
            roster: vec![],
            ..minimal()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyRoster)));
    }

    #[test]
    fn missing_roster_in_toml_rejected() {
        let err = SummaryConfig::from_toml_str("[extensions]\n\"*1\" = \"A\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRoster));
    }

    #[test]
    fn empty_extension_map_rejected() {
        let config = SummaryConfig {
            extensions: BTreeMap::new(),
            ..minimal()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyExtensionMap)
        ));
    }

    #[test]
    fn duplicate_staff_rejected() {
        let config = SummaryConfig {
            roster: vec!["A".into(), "B".into(), "A".into()],
            ..minimal()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateStaff(name)) if name == "A"
        ));
    }

    #[test]
    fn mapping_to_unknown_staff_rejected() {
        let mut config = minimal();
        config.extensions.insert("*9".into(), "Zed".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownStaff { staff, .. }) if staff == "Zed"
        ));
    }

    #[test]
    fn non_digit_extension_rejected() {
        let mut config = minimal();
        config.extensions.insert("*12a".into(), "B".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidExtension(key)) if key == "*12a"
        ));
    }

    #[test]
    fn inverted_hours_rejected() {
        let config = SummaryConfig {
            business_hours: HourRange { start: 18, end: 9 },
            ..minimal()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHourRange { start: 18, end: 9 })
        ));
    }

    #[test]
    fn hour_past_midnight_rejected() {
        let config = SummaryConfig {
            business_hours: HourRange { start: 9, end: 24 },
            ..minimal()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_multiplier_rejected() {
        for m in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SummaryConfig {
                performance_multiplier: m,
                ..minimal()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidMultiplier(_))
            ));
        }
    }

    #[test]
    fn unknown_hide_if_zero_only_warns() {
        let config = SummaryConfig {
            hide_if_zero: vec!["Nobody".into()],
            ..minimal()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn normalize_extension_variants() {
        assert_eq!(normalize_extension("*202").as_deref(), Some("202"));
        assert_eq!(normalize_extension("202").as_deref(), Some("202"));
        assert_eq!(normalize_extension("  *202 ").as_deref(), Some("202"));
        assert_eq!(normalize_extension("*"), None);
        assert_eq!(normalize_extension(""), None);
        assert_eq!(normalize_extension("**202"), None);
        assert_eq!(normalize_extension("2O2"), None);
    }

    #[test]
    fn hour_range_is_inclusive() {
        let range = HourRange::default();
        assert!(!range.contains(8));
        assert!(range.contains(9));
        assert!(range.contains(17));
        assert!(!range.contains(18));
    }
}
