use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::resolver::ROUNDING_PRECISION;
use crate::watcher::WATCH_INTERVAL;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub rounding: RoundingConfig,
    #[serde(default)]
    pub host: HostConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WatchConfig {
    /// Delay between background checks, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    WATCH_INTERVAL.as_millis() as u64
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoundingConfig {
    /// Rounding base. Values >= 1 snap to multiples, fractions to decimal places.
    #[serde(default = "default_precision")]
    pub precision: f64,
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

fn default_precision() -> f64 {
    ROUNDING_PRECISION
}

/// Where the `screenframe` binary reads screen state from
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HostConfig {
    /// JSON snapshot file (see `host::snapshot`)
    pub snapshot: Option<PathBuf>,
}

/// Runtime knobs for watching and rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOptions {
    pub watch_interval: Duration,
    pub rounding_precision: f64,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            watch_interval: WATCH_INTERVAL,
            rounding_precision: ROUNDING_PRECISION,
        }
    }
}

/// A problem found while validating the config.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub is_error: bool,
    pub message: String,
}

impl ConfigIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            is_error: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{}: {}", level, self.message)
    }
}

impl Config {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.watch.interval_ms == 0 {
            issues.push(ConfigIssue::error("watch.interval_ms must be greater than 0"));
        } else if self.watch.interval_ms < 100 {
            issues.push(ConfigIssue::warning(format!(
                "watch.interval_ms = {} polls the screen very often",
                self.watch.interval_ms
            )));
        }

        let precision = self.rounding.precision;
        // Zero and subnormal bases have no finite reciprocal to round with.
        if !precision.is_finite() || !(1.0 / precision.abs()).is_finite() {
            issues.push(ConfigIssue::error(format!(
                "rounding.precision must be a finite number with a finite reciprocal (got {})",
                precision
            )));
        } else if precision < 0.0 {
            issues.push(ConfigIssue::warning(format!(
                "rounding.precision = {} is negative; its magnitude is used",
                precision
            )));
        }

        if let Some(ref path) = self.host.snapshot {
            if path.as_os_str().is_empty() {
                issues.push(ConfigIssue::error("host.snapshot must not be empty"));
            }
        }

        issues
    }

    pub fn frame_options(&self) -> FrameOptions {
        FrameOptions {
            watch_interval: Duration::from_millis(self.watch.interval_ms),
            rounding_precision: self.rounding.precision.abs(),
        }
    }
}
