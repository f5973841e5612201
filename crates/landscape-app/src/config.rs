//! Host configuration.

use landscape_core::{Error, Extent3, Result};
use serde::Deserialize;

/// Default tick length when no tick rate is configured.
const DEFAULT_TICK_SECONDS: f32 = 1.0 / 60.0;

/// Configuration for a hosted run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Application title used in logs.
    pub title: String,
    /// Size of the volume the application requests at startup.
    pub prism_size: Extent3,
    /// Tick rate in Hz. `None` runs ticks back to back at 60 Hz steps.
    pub tick_rate_hz: Option<u32>,
    /// Stop after this many ticks (None for unlimited).
    pub max_ticks: Option<u64>,
    /// `tracing` filter directive, overriding `RUST_LOG`.
    pub log_filter: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            title: "Landscape".to_string(),
            prism_size: Extent3::DEFAULT_PRISM,
            tick_rate_hz: None,
            max_ticks: None,
            log_filter: None,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    host: HostConfig,
}

impl HostConfig {
    /// Create a new config with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Parse the `[host]` table of a TOML document.
    ///
    /// Missing keys fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        file.host.validated()
    }

    fn validated(self) -> Result<Self> {
        if !self.prism_size.is_valid() {
            return Err(Error::Config(format!(
                "prism_size must be finite and positive, got {}",
                self.prism_size
            )));
        }
        if self.tick_rate_hz == Some(0) {
            return Err(Error::Config("tick_rate_hz must be nonzero".to_string()));
        }
        Ok(self)
    }

    /// Set the startup volume size.
    pub fn with_prism_size(mut self, size: Extent3) -> Self {
        self.prism_size = size;
        self
    }

    /// Set the tick rate.
    pub fn with_tick_rate(mut self, hz: u32) -> Self {
        self.tick_rate_hz = Some(hz);
        self
    }

    /// Set the tick cap.
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    /// Set the log filter.
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Length of one tick in seconds.
    pub fn tick_seconds(&self) -> f32 {
        match self.tick_rate_hz {
            Some(hz) if hz > 0 => 1.0 / hz as f32,
            _ => DEFAULT_TICK_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parse_host_table() {
        let config = HostConfig::from_toml_str(
            r#"
            [host]
            title = "Browser"
            prism_size = { x = 3.0, y = 2.0, z = 1.0 }
            tick_rate_hz = 30
            max_ticks = 90
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Browser");
        assert_eq!(config.prism_size, Extent3::new(3.0, 2.0, 1.0));
        assert_eq!(config.max_ticks, Some(90));
        assert_relative_eq!(config.tick_seconds(), 1.0 / 30.0);
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn missing_table_uses_defaults() {
        let config = HostConfig::from_toml_str("").unwrap();
        assert_eq!(config, HostConfig::default());
        assert_relative_eq!(config.tick_seconds(), DEFAULT_TICK_SECONDS);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(HostConfig::from_toml_str("[host]\ntick_rate_hz = 0").is_err());
        assert!(
            HostConfig::from_toml_str("[host]\nprism_size = { x = 0.0, y = 1.0, z = 1.0 }")
                .is_err()
        );
        assert!(matches!(
            HostConfig::from_toml_str("[host]\nmax_ticks = \"many\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn builder() {
        let config = HostConfig::new("demo")
            .with_prism_size(Extent3::splat(0.5))
            .with_tick_rate(120)
            .with_max_ticks(10)
            .with_log_filter("debug");
        assert_eq!(config.title, "demo");
        assert_eq!(config.tick_rate_hz, Some(120));
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }
}
