//! TOML-based application configuration.
//!
//! Stores user preferences for the focus trend:
//! - Daily focus goal in minutes (0 disables the goal line)
//! - IANA timezone used to decide which calendar day a session belongs to
//!
//! Configuration is stored at `~/.config/focus-velocity/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};
use crate::trend::{FocusVelocity, TrendCalendar, DEFAULT_GOAL};

/// Focus trend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Daily goal in minutes
    #[serde(default = "default_goal")]
    pub goal: f64,
    /// IANA timezone name, e.g. "Europe/Berlin"
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focus-velocity/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub trend: TrendConfig,
}

// Default functions
fn default_goal() -> f64 {
    DEFAULT_GOAL
}
fn default_timezone() -> String {
    "UTC".into()
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            goal: default_goal(),
            timezone: default_timezone(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Number(_) => value
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)
                    .map_err(|e| ConfigError::ParseFailed(format!("{}: {e}", path.display())))?;
                cfg.validate()?;
                debug!(path = %path.display(), "loaded configuration");
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value in memory by dot-separated key and validate the result.
    ///
    /// The value is parsed according to the type of the current value.
    /// On error `self` is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Config::apply`] fails or the config cannot be
    /// saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check that the goal is non-negative and the timezone resolves.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let goal = self.trend.goal;
        if !goal.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "trend.goal".to_string(),
                message: format!("{goal} is not a finite number"),
            });
        }
        if goal < 0.0 {
            return Err(ValidationError::NegativeGoal(goal));
        }
        self.calendar()?;
        Ok(())
    }

    /// Calendar for the configured timezone.
    pub fn calendar(&self) -> std::result::Result<TrendCalendar, ValidationError> {
        TrendCalendar::from_name(&self.trend.timezone)
    }

    /// Trend pipeline bound to the configured timezone.
    pub fn velocity(&self) -> std::result::Result<FocusVelocity, ValidationError> {
        self.calendar().map(FocusVelocity::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.trend.goal, 0.0);
        assert_eq!(parsed.trend.timezone, "UTC");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed, Config::default());

        let parsed: Config = toml::from_str("[trend]\ngoal = 45.0\n").unwrap();
        assert_eq!(parsed.trend.goal, 45.0);
        assert_eq!(parsed.trend.timezone, "UTC");
    }

    #[test]
    fn test_get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("trend.timezone").as_deref(), Some("UTC"));
        assert_eq!(cfg.get("trend.goal").as_deref(), Some("0.0"));
        assert!(cfg.get("trend.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn test_set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "trend.goal", "25").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "trend.goal").unwrap().as_f64(),
            Some(25.0)
        );
    }

    #[test]
    fn test_set_json_value_by_path_updates_nested_string() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "trend.timezone", "Europe/Berlin").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "trend.timezone").unwrap(),
            &serde_json::Value::String("Europe/Berlin".to_string())
        );
    }

    #[test]
    fn test_set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "trend.nonexistent_key", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "trend.goal", "lots");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_apply_validates_and_leaves_config_untouched_on_error() {
        let mut cfg = Config::default();
        cfg.apply("trend.goal", "30").unwrap();
        assert_eq!(cfg.trend.goal, 30.0);

        let err = cfg.apply("trend.goal", "-1").unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::NegativeGoal(_))));
        assert_eq!(cfg.trend.goal, 30.0);

        let err = cfg.apply("trend.timezone", "Nowhere/Special").unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::UnknownTimezone(_))));
        assert_eq!(cfg.trend.timezone, "UTC");
    }

    #[test]
    fn test_calendar_uses_configured_timezone() {
        let mut cfg = Config::default();
        cfg.apply("trend.timezone", "Asia/Tokyo").unwrap();
        assert_eq!(cfg.calendar().unwrap().timezone(), chrono_tz::Tz::Asia__Tokyo);
        assert_eq!(cfg.velocity().unwrap().calendar().timezone(), chrono_tz::Tz::Asia__Tokyo);
    }

    #[test]
    fn test_load_from_writes_defaults_when_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.apply("trend.goal", "90").unwrap();
        cfg.apply("trend.timezone", "America/Chicago").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_load_from_rejects_broken_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[trend\ngoal = ").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::ParseFailed(_))));

        std::fs::write(&path, "[trend]\ngoal = -10.0\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::NegativeGoal(_))));
    }
}
