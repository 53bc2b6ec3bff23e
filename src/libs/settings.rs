//! User preferences record.
//!
//! A single [`Settings`] document is stored under the fixed `"app"` key and
//! always persisted whole. Updates are pure: each transition returns a new
//! value and leaves the original untouched, so callers decide when to save.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notifications {
    pub enabled: bool,
    pub fasting_complete: bool,
    pub eating_window_start: bool,
    pub eating_window_end: bool,
    pub hydration_reminder: bool,
    /// Hours between hydration reminders.
    pub hydration_interval: u32,
}

impl Default for Notifications {
    fn default() -> Self {
        Notifications {
            enabled: true,
            fasting_complete: true,
            eating_window_start: true,
            eating_window_end: true,
            hydration_reminder: true,
            hydration_interval: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Accessibility {
    pub high_contrast: bool,
    pub text_to_speech: bool,
    pub reduced_motion: bool,
    pub font_size: FontSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Units {
    pub weight: WeightUnit,
    pub temperature: TemperatureUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Privacy {
    pub data_sharing: bool,
    pub analytics: bool,
}

impl Default for Privacy {
    fn default() -> Self {
        Privacy {
            data_sharing: false,
            analytics: true,
        }
    }
}

/// The persisted preferences document.
///
/// Every field carries a default, so a stored document missing some fields
/// (written by an older build, or partially edited by hand) still decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub offline_mode: bool,
    pub notifications: Notifications,
    pub accessibility: Accessibility,
    pub units: Units,
    pub privacy: Privacy,
}

impl Settings {
    pub fn with_theme(&self, theme: Theme) -> Self {
        Settings { theme, ..self.clone() }
    }

    pub fn toggle_offline_mode(&self) -> Self {
        Settings {
            offline_mode: !self.offline_mode,
            ..self.clone()
        }
    }

    pub fn update_notifications(&self, notifications: Notifications) -> Self {
        Settings {
            notifications,
            ..self.clone()
        }
    }

    pub fn update_accessibility(&self, accessibility: Accessibility) -> Self {
        Settings {
            accessibility,
            ..self.clone()
        }
    }

    pub fn update_units(&self, units: Units) -> Self {
        Settings { units, ..self.clone() }
    }

    pub fn update_privacy(&self, privacy: Privacy) -> Self {
        Settings { privacy, ..self.clone() }
    }

    /// Decodes a stored document, filling absent fields from the defaults.
    ///
    /// Top-level sections that fail to decode are dropped individually and
    /// keep their default value; the rest of the document is still applied.
    pub fn merged_over_defaults(value: &Value) -> Self {
        if let Ok(settings) = serde_json::from_value::<Settings>(value.clone()) {
            return settings;
        }

        let Some(stored) = value.as_object() else {
            return Settings::default();
        };
        let mut merged = match serde_json::to_value(Settings::default()) {
            Ok(Value::Object(map)) => map,
            _ => return Settings::default(),
        };
        for (key, section) in stored {
            if !merged.contains_key(key) {
                continue;
            }
            let previous = merged.insert(key.clone(), section.clone());
            if serde_json::from_value::<Settings>(Value::Object(merged.clone())).is_err() {
                if let Some(previous) = previous {
                    merged.insert(key.clone(), previous);
                }
            }
        }
        serde_json::from_value(Value::Object(merged)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert!(!settings.offline_mode);
        assert!(settings.notifications.enabled);
        assert_eq!(settings.notifications.hydration_interval, 2);
        assert_eq!(settings.accessibility.font_size, FontSize::Medium);
        assert_eq!(settings.units.weight, WeightUnit::Kg);
        assert_eq!(settings.units.temperature, TemperatureUnit::Celsius);
        assert!(!settings.privacy.data_sharing);
        assert!(settings.privacy.analytics);
    }

    #[test]
    fn test_transitions_do_not_mutate_original() {
        let settings = Settings::default();
        let dark = settings.with_theme(Theme::Dark).toggle_offline_mode();

        assert_eq!(settings.theme, Theme::Light);
        assert!(!settings.offline_mode);
        assert_eq!(dark.theme, Theme::Dark);
        assert!(dark.offline_mode);
        assert_eq!(dark.notifications, settings.notifications);
    }

    #[test]
    fn test_section_updates_replace_whole_section() {
        let settings = Settings::default()
            .update_notifications(Notifications {
                hydration_interval: 3,
                hydration_reminder: false,
                ..Notifications::default()
            })
            .update_accessibility(Accessibility {
                font_size: FontSize::Large,
                high_contrast: true,
                ..Accessibility::default()
            })
            .update_privacy(Privacy {
                data_sharing: true,
                analytics: false,
            });

        assert_eq!(settings.notifications.hydration_interval, 3);
        assert!(!settings.notifications.hydration_reminder);
        assert!(settings.notifications.enabled);
        assert_eq!(settings.accessibility.font_size, FontSize::Large);
        assert!(settings.accessibility.high_contrast);
        assert!(settings.privacy.data_sharing);
        assert!(!settings.privacy.analytics);
        assert_eq!(settings.units, Units::default());
    }

    #[test]
    fn test_merged_over_defaults_fills_missing_fields() {
        let stored = json!({"theme": "dark", "units": {"weight": "lbs"}});
        let settings = Settings::merged_over_defaults(&stored);

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.units.weight, WeightUnit::Lbs);
        assert_eq!(settings.units.temperature, TemperatureUnit::Celsius);
        assert_eq!(settings.notifications, Notifications::default());
    }

    #[test]
    fn test_merged_over_defaults_skips_undecodable_sections() {
        let stored = json!({"theme": "purple", "offlineMode": true});
        let settings = Settings::merged_over_defaults(&stored);

        assert_eq!(settings.theme, Theme::Light);
        assert!(settings.offline_mode);
    }
}
