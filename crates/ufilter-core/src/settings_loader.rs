//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `UFILTER_DEBUG` | `debug` |
//! | `UFILTER_LOG_LEVEL` | `log_level` |
//! | `UFILTER_STRICT_MODE` | `filters.default_strict_mode` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use ufilter_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/ufilter.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::UfilterError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any keys not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, UfilterError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| UfilterError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, UfilterError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        UfilterError::ConfigurationError(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, UfilterError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, UfilterError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| UfilterError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("UFILTER_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("UFILTER_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("UFILTER_STRICT_MODE") {
        match val.parse() {
            Ok(mode) => settings.filters.default_strict_mode = mode,
            Err(e) => tracing::warn!("Ignoring UFILTER_STRICT_MODE: {e}"),
        }
    }
}

// ============================================================
// Helpers
// ============================================================

fn merge_over_defaults(
    overrides: serde_json::Value,
    format: &str,
) -> Result<Settings, UfilterError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        UfilterError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, overrides);
    let settings: Settings = serde_json::from_value(merged).map_err(|e| {
        UfilterError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })?;
    validate(&settings)?;
    Ok(settings)
}

/// Rejects settings the filter engine cannot work with.
fn validate(settings: &Settings) -> Result<(), UfilterError> {
    let filters = &settings.filters;
    for (name, value) in [
        ("lookup_separator", &filters.lookup_separator),
        ("list_separator", &filters.list_separator),
    ] {
        if value.is_empty() {
            return Err(UfilterError::ConfigurationError(format!(
                "filters.{name} must not be empty"
            )));
        }
    }
    Ok(())
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::StrictMode;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
debug = false
log_level = "debug"
"#;
        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "debug");
        // untouched sections keep their defaults
        assert_eq!(settings.filters.lookup_separator, "__");
    }

    #[test]
    fn test_from_toml_str_nested_sections() {
        let toml = r#"
[filters]
default_strict_mode = "fail"
lookup_separator = "."
"#;
        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.filters.default_strict_mode, StrictMode::Fail);
        assert_eq!(settings.filters.list_separator, ",");
        assert_eq!(settings.filters.lookup_separator, ".");
    }

    #[test]
    fn test_from_toml_str_extra() {
        let toml = r#"
[extra]
page_size = 25
"#;
        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.extra["page_size"], serde_json::json!(25));
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let err = from_toml_str("debug = ").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_from_toml_str_bad_strict_mode() {
        let toml = r#"
[filters]
default_strict_mode = "lenient"
"#;
        let err = from_toml_str(toml).unwrap_err();
        assert!(matches!(err, UfilterError::ConfigurationError(_)));
    }

    #[test]
    fn test_from_toml_file_missing() {
        let err = from_toml_file("/nonexistent/ufilter.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read TOML file"));
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str() {
        let settings =
            from_json_str(r#"{"filters": {"default_strict_mode": "empty"}}"#).unwrap();
        assert_eq!(settings.filters.default_strict_mode, StrictMode::Empty);
        assert!(settings.debug);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    #[test]
    fn test_empty_separators_rejected() {
        let toml = r#"
[filters]
list_separator = ""
"#;
        let err = from_toml_str(toml).unwrap_err();
        assert!(matches!(err, UfilterError::ConfigurationError(_)));
        assert!(err.to_string().contains("filters.list_separator must not be empty"));

        let err = from_json_str(r#"{"filters": {"lookup_separator": ""}}"#).unwrap_err();
        assert!(err.to_string().contains("filters.lookup_separator must not be empty"));
    }

    // ── Environment variable overrides ──────────────────────────────
    //
    // Each test owns one variable so they can run in parallel.

    #[test]
    fn test_apply_env_overrides_debug() {
        let mut settings = Settings::default();
        std::env::set_var("UFILTER_DEBUG", "false");
        apply_env_overrides(&mut settings);
        assert!(!settings.debug);

        std::env::set_var("UFILTER_DEBUG", "YES");
        apply_env_overrides(&mut settings);
        assert!(settings.debug);
        std::env::remove_var("UFILTER_DEBUG");
    }

    #[test]
    fn test_apply_env_overrides_log_level() {
        let mut settings = Settings::default();
        std::env::set_var("UFILTER_LOG_LEVEL", "trace");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.log_level, "trace");
        std::env::remove_var("UFILTER_LOG_LEVEL");
    }

    #[test]
    fn test_apply_env_overrides_strict_mode() {
        let mut settings = Settings::default();
        std::env::set_var("UFILTER_STRICT_MODE", "Fail");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.filters.default_strict_mode, StrictMode::Fail);

        // an unknown mode leaves the previous value in place
        std::env::set_var("UFILTER_STRICT_MODE", "lenient");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.filters.default_strict_mode, StrictMode::Fail);
        std::env::remove_var("UFILTER_STRICT_MODE");
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_json_deep() {
        let base = serde_json::json!({"a": {"b": 1, "c": 2}, "d": 3});
        let over = serde_json::json!({"a": {"b": 10}});
        let merged = merge_json(base, over);
        assert_eq!(merged, serde_json::json!({"a": {"b": 10, "c": 2}, "d": 3}));
    }

    #[test]
    fn test_toml_to_json_array() {
        let value: toml::Value = toml::from_str("x = [1, 2]").unwrap();
        assert_eq!(toml_to_json(value), serde_json::json!({"x": [1, 2]}));
    }
}
