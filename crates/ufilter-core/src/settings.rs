//! Settings for ufilter-rs.
//!
//! This module provides the [`Settings`] struct, which holds logging and filtering
//! configuration, and [`LazySettings`], a globally-accessible, lazily-initialized
//! settings instance.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{LazyLock, OnceLock};

use serde::{Deserialize, Serialize};

/// How a filter set reacts to query parameters it cannot apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrictMode {
    /// Ignore invalid parameters and apply the valid ones.
    #[default]
    Drop,
    /// Return an empty queryset if any parameter is invalid.
    Empty,
    /// Fail with a validation error describing every invalid parameter.
    Fail,
}

impl StrictMode {
    /// Returns the lowercase name of this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Empty => "empty",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for StrictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrictMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "empty" => Ok(Self::Empty),
            "fail" => Ok(Self::Fail),
            other => Err(format!("unknown strict mode '{other}'")),
        }
    }
}

/// Filter engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Strict mode used by filter sets that do not set their own.
    pub default_strict_mode: StrictMode,
    /// Separator between a filter name and its lookup (`name__icontains`).
    pub lookup_separator: String,
    /// Separator between values of `in` and `range` lookups.
    pub list_separator: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            default_strict_mode: StrictMode::Drop,
            lookup_separator: "__".to_string(),
            list_separator: ",".to_string(),
        }
    }
}

/// The complete set of settings.
///
/// Use [`SETTINGS`] to access the global instance.
///
/// # Examples
///
/// ```
/// use ufilter_core::settings::{Settings, StrictMode};
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.filters.default_strict_mode, StrictMode::Drop);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled.
    pub debug: bool,
    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
    /// Filter engine settings.
    pub filters: FilterSettings,
    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            filters: FilterSettings::default(),
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup to set the
/// settings, then use [`get`](LazySettings::get) to access them.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, or the defaults when unconfigured.
    pub fn get_or_default(&self) -> &Settings {
        static DEFAULTS: LazyLock<Settings> = LazyLock::new(Settings::default);
        self.inner.get().unwrap_or_else(|| &*DEFAULTS)
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert_eq!(s.filters.default_strict_mode, StrictMode::Drop);
        assert_eq!(s.filters.lookup_separator, "__");
        assert_eq!(s.filters.list_separator, ",");
        assert!(s.extra.is_empty());
    }

    #[test]
    fn test_strict_mode_from_str() {
        assert_eq!("drop".parse::<StrictMode>(), Ok(StrictMode::Drop));
        assert_eq!(" Fail ".parse::<StrictMode>(), Ok(StrictMode::Fail));
        assert_eq!("EMPTY".parse::<StrictMode>(), Ok(StrictMode::Empty));
        assert!("lenient".parse::<StrictMode>().is_err());
    }

    #[test]
    fn test_strict_mode_serde() {
        let json = serde_json::to_string(&StrictMode::Fail).unwrap();
        assert_eq!(json, "\"fail\"");
        let mode: StrictMode = serde_json::from_str("\"empty\"").unwrap();
        assert_eq!(mode, StrictMode::Empty);
    }

    #[test]
    fn test_lazy_settings_configure_and_get() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());

        let mut settings = Settings::default();
        settings.debug = false;
        settings.filters.default_strict_mode = StrictMode::Fail;

        lazy.configure(settings);
        assert!(lazy.is_configured());
        assert!(!lazy.get().debug);
        assert_eq!(lazy.get().filters.default_strict_mode, StrictMode::Fail);
    }

    #[test]
    fn test_lazy_settings_get_or_default() {
        let lazy = LazySettings::new();
        assert_eq!(lazy.get_or_default().log_level, "info");
        // unconfigured calls share one default instance
        assert!(std::ptr::eq(lazy.get_or_default(), lazy.get_or_default()));

        let mut settings = Settings::default();
        settings.log_level = "warn".to_string();
        lazy.configure(settings);
        assert!(std::ptr::eq(lazy.get_or_default(), lazy.get()));
        assert_eq!(lazy.get_or_default().log_level, "warn");
    }

    #[test]
    #[should_panic(expected = "already been configured")]
    fn test_lazy_settings_double_configure_panics() {
        let lazy = LazySettings::new();
        lazy.configure(Settings::default());
        lazy.configure(Settings::default());
    }

    #[test]
    #[should_panic(expected = "not been configured")]
    fn test_lazy_settings_get_before_configure_panics() {
        let lazy = LazySettings::new();
        let _ = lazy.get();
    }
}
