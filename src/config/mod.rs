mod types;

pub use types::{Config, ConfigIssue, FrameOptions, HostConfig, RoundingConfig, WatchConfig};

use std::path::{Path, PathBuf};

/// Loads the config from the default location.
pub fn load_config() -> Config {
    load_config_from(&get_config_path())
}

/// Loads and validates the config at `config_path`.
///
/// A missing file, unreadable file, parse error or validation error all fall
/// back to defaults after logging what went wrong.
pub fn load_config_from(config_path: &Path) -> Config {
    let config = if config_path.exists() {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", config_path);
                    config
                }
                Err(e) => {
                    log::error!("Failed to parse config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                log::error!("Failed to read config file: {}", e);
                Config::default()
            }
        }
    } else {
        log::info!("No config file found at {:?}, using defaults", config_path);
        Config::default()
    };

    let issues = config.validate();
    let error_count = issues.iter().filter(|i| i.is_error).count();

    for issue in &issues {
        if issue.is_error {
            log::error!("Config: {}", issue);
        } else {
            log::warn!("Config: {}", issue);
        }
    }

    if !issues.is_empty() {
        log::info!(
            "Config validation: {} error(s), {} warning(s)",
            error_count,
            issues.len() - error_count
        );
    }

    if error_count > 0 {
        log::error!("Config has errors; watching and rounding use defaults.");
        return Config::default();
    }

    let options = config.frame_options();
    log::debug!(
        "Frame options: watch every {:?}, round to {}",
        options.watch_interval,
        options.rounding_precision
    );
    config
}

pub fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("screenframe")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "screenframe-config-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = load_config_from(Path::new("/nonexistent/screenframe/config.toml"));
        assert_eq!(config.frame_options(), FrameOptions::default());
    }

    #[test]
    fn warnings_keep_the_loaded_config() {
        let path = write_config("warnings", "[watch]\ninterval_ms = 50\n[rounding]\nprecision = -5.0\n");
        let config = load_config_from(&path);
        assert_eq!(config.watch.interval_ms, 50);
        assert_eq!(config.frame_options().rounding_precision, 5.0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn valid_file_is_loaded() {
        let path = write_config("valid", "[watch]\ninterval_ms = 500\n");
        let config = load_config_from(&path);
        assert_eq!(config.watch.interval_ms, 500);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let path = write_config("invalid", "[rounding]\nprecision = 0.0\n");
        let config = load_config_from(&path);
        assert_eq!(config.rounding.precision, 10.0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let path = write_config("broken", "[watch\ninterval_ms = ");
        let config = load_config_from(&path);
        assert_eq!(config.watch.interval_ms, 2500);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn config_path_ends_with_app_dir() {
        assert!(get_config_path().ends_with(".config/screenframe/config.toml"));
    }
}
