// File: src/config.rs
// Application configuration: defaults, environment overrides, CLI overrides

use std::env;
use std::time::Duration;

use anyhow::Result;

/// Application configuration shared by all interface modes
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Period of the KPI refresh (default: 3000 ms)
    pub refresh_interval: Duration,
    /// Web server bind address (default: 127.0.0.1)
    pub bind: String,
    /// Web server port (default: 8080)
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(3000),
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// - `RRM_REFRESH_MS`: KPI refresh period in milliseconds
    /// - `RRM_BIND`: web bind address
    /// - `RRM_PORT`: web port
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(ms) = lookup("RRM_REFRESH_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid RRM_REFRESH_MS '{}': {}", ms, e))?;
            cfg.refresh_interval = Duration::from_millis(ms);
        }

        if let Some(bind) = lookup("RRM_BIND") {
            cfg.bind = bind;
        }

        if let Some(port) = lookup("RRM_PORT") {
            cfg.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid RRM_PORT '{}': {}", port, e))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply explicit command-line values on top of the loaded configuration
    pub fn with_overrides(
        mut self,
        refresh_ms: Option<u64>,
        bind: Option<String>,
        port: Option<u16>,
    ) -> Result<Self> {
        if let Some(ms) = refresh_ms {
            self.refresh_interval = Duration::from_millis(ms);
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        if let Some(port) = port {
            self.port = port;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.refresh_interval.is_zero() {
            anyhow::bail!("Refresh interval must be greater than zero");
        }
        Ok(())
    }
}
