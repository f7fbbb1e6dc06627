use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::fingering::MIN_MAX_FRET;

/// Application configuration loaded from TOML config file.
/// Every field has a default, so the config file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Tuning used when no `--tuning`/`--preset` is given, e.g. "D2, A2, D3, G3, B3, E4".
    pub default_tuning: Option<String>,
    /// Instrument whose presets `--preset` looks in by default.
    pub instrument: Option<String>,
    /// Warm the fingering cache with common triads at startup.
    pub prewarm: bool,
    /// Fingering engine settings.
    pub engine: EngineConfig,
}

/// Fingering engine configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of (chord, tuning) results kept in the LRU cache.
    pub cache_capacity: usize,
    /// Fingerings returned per chord.
    pub max_results: usize,
    /// Highest fret the window sweep reaches.
    pub max_fret: u8,
    /// Worker threads for window searches. 0 = rayon's global pool.
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 200,
            max_results: 10,
            max_fret: 15,
            workers: 0,
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/fretwise/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::from_toml(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Parse config TOML. An `[engine] max_fret` too small for a single
    /// fret window is rejected.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(contents)?;
        if config.engine.max_fret < MIN_MAX_FRET {
            return Err(serde::de::Error::custom(format!(
                "engine.max_fret must be at least {MIN_MAX_FRET}, got {}",
                config.engine.max_fret
            )));
        }
        Ok(config)
    }

    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.default_tuning, None);
        assert!(!config.prewarm);
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.engine.cache_capacity, 200);
        assert_eq!(config.engine.max_results, 10);
        assert_eq!(config.engine.max_fret, 15);
    }

    #[test]
    fn test_partial_engine_section() {
        let config = AppConfig::from_toml(
            r#"
            default_tuning = "D2, A2, D3, G3, B3, E4"
            prewarm = true

            [engine]
            max_fret = 12
            workers = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.default_tuning.as_deref(), Some("D2, A2, D3, G3, B3, E4"));
        assert!(config.prewarm);
        assert_eq!(config.engine.max_fret, 12);
        assert_eq!(config.engine.workers, 4);
        // unspecified fields keep defaults
        assert_eq!(config.engine.cache_capacity, 200);
        assert_eq!(config.engine.max_results, 10);
    }

    #[test]
    fn test_bad_types_rejected() {
        assert!(AppConfig::from_toml("[engine]\nmax_fret = \"twelve\"").is_err());
        assert!(AppConfig::from_toml("[engine]\nmax_fret = 300").is_err());
    }

    #[test]
    fn test_max_fret_below_one_window_rejected() {
        for bad in [0, 1, 2] {
            let toml = format!("[engine]\nmax_fret = {bad}");
            let err = AppConfig::from_toml(&toml).unwrap_err();
            assert!(err.to_string().contains("max_fret"), "{err}");
        }
        let config = AppConfig::from_toml("[engine]\nmax_fret = 3").unwrap();
        assert_eq!(config.engine.max_fret, 3);
    }
}
