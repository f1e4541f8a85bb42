use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{CategoryColorMap, Color};
use crate::error::{SyncError, SyncResult};

/// Controller bootstrap configuration.
///
/// Serializable so hosts can ship chart tuning alongside their own settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_coalesce_window_ms")]
    pub coalesce_window_ms: u64,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
    #[serde(default = "default_color_hex")]
    pub default_color: String,
    /// Overrides the chart variant's identical-payload suppression.
    #[serde(default)]
    pub suppress_identical_payloads: Option<bool>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            coalesce_window_ms: default_coalesce_window_ms(),
            max_ticks: default_max_ticks(),
            default_color: default_color_hex(),
            suppress_identical_payloads: None,
        }
    }
}

impl ControllerConfig {
    #[must_use]
    pub fn with_coalesce_window_ms(mut self, window_ms: u64) -> Self {
        self.coalesce_window_ms = window_ms;
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    #[must_use]
    pub fn with_default_color(mut self, hex: impl Into<String>) -> Self {
        self.default_color = hex.into();
        self
    }

    #[must_use]
    pub fn with_identical_payload_suppression(mut self, enabled: bool) -> Self {
        self.suppress_identical_payloads = Some(enabled);
        self
    }

    #[must_use]
    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_window_ms)
    }

    pub fn default_color(&self) -> SyncResult<Color> {
        Color::from_hex(&self.default_color)
    }

    /// Empty color map using the configured default color.
    pub fn empty_color_map(&self) -> SyncResult<CategoryColorMap> {
        Ok(CategoryColorMap::new(self.default_color()?))
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.max_ticks < 2 {
            return Err(SyncError::InvalidConfig(format!(
                "max_ticks must be >= 2, got {}",
                self.max_ticks
            )));
        }
        self.default_color()
            .map_err(|err| SyncError::InvalidConfig(format!("default_color: {err}")))?;
        Ok(())
    }

    pub fn from_json_str(input: &str) -> SyncResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| SyncError::InvalidConfig(format!("failed to parse config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> SyncResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SyncError::InvalidConfig(format!("failed to serialize config: {e}")))
    }
}

fn default_coalesce_window_ms() -> u64 {
    20
}

fn default_max_ticks() -> usize {
    7
}

fn default_color_hex() -> String {
    Color::DEFAULT_CATEGORY_HEX.to_owned()
}

#[cfg(test)]
mod tests {
    use super::ControllerConfig;
    use crate::core::{CategoryColorMap, Color};
    use crate::error::SyncError;

    #[test]
    fn default_color_agrees_with_category_fallback() {
        let config = ControllerConfig::default();
        assert_eq!(config.default_color().expect("default color"), Color::DEFAULT_CATEGORY);
        assert_eq!(config.empty_color_map().expect("color map"), CategoryColorMap::default());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = ControllerConfig::from_json_str(r#"{"max_ticks": 5}"#).expect("config");
        assert_eq!(config.max_ticks, 5);
        assert_eq!(config.coalesce_window_ms, 20);
        assert_eq!(config.suppress_identical_payloads, None);
    }

    #[test]
    fn json_round_trip_preserves_overrides() {
        let config = ControllerConfig::default()
            .with_coalesce_window_ms(35)
            .with_identical_payload_suppression(false);
        let json = config.to_json_pretty().expect("serialize");
        assert_eq!(ControllerConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ControllerConfig::default().with_max_ticks(1).validate(),
            Err(SyncError::InvalidConfig(_))
        ));
        assert!(matches!(
            ControllerConfig::default().with_default_color("grey").validate(),
            Err(SyncError::InvalidConfig(_))
        ));
        assert!(ControllerConfig::from_json_str(r#"{"max_ticks": "seven"}"#).is_err());
    }
}
