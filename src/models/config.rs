use crate::assets::AssetLoader;
use pigment_mix::{SearchOptions, Srgb, OFF_WHITE_HEX};
use serde::Deserialize;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Background color for sessions that have not set one
    #[serde(default = "default_background")]
    pub default_background: String,

    /// Defaults for color matching requests
    #[serde(default)]
    pub search: SearchDefaults,

    /// Color mixer worker settings
    #[serde(default)]
    pub worker: WorkerConfig,
}

fn default_background() -> String {
    OFF_WHITE_HEX.to_string()
}

/// Search defaults, used where a request leaves an option out
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchDefaults {
    pub limit_results: usize,
    pub delta_e_limit: f64,
    pub tight_search: bool,
    pub max_delta_e: f64,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        let options = SearchOptions::default();
        Self {
            limit_results: options.limit_results,
            delta_e_limit: options.delta_e_limit,
            tight_search: options.tight_search,
            max_delta_e: options.max_delta_e,
        }
    }
}

impl SearchDefaults {
    pub fn to_options(&self) -> SearchOptions {
        SearchOptions::new()
            .limit_results(self.limit_results)
            .delta_e_limit(self.delta_e_limit)
            .tight_search(self.tight_search)
            .max_delta_e(self.max_delta_e)
    }
}

/// Color mixer worker settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WorkerConfig {
    /// Requests that may wait in the worker queue
    pub queue_capacity: usize,

    /// Search results memoized per session
    pub memo_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 32,
            memo_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        background = %config.default_background,
                        limit_results = config.search.limit_results,
                        queue_capacity = config.worker.queue_capacity,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// The configured default background, or off-white if it does not parse
    pub fn background(&self) -> Srgb {
        match self.default_background.parse() {
            Ok(color) => color,
            Err(e) => {
                tracing::warn!(
                    value = %self.default_background,
                    %e,
                    "Invalid default background, using off-white"
                );
                Srgb::from_u8(0xF7, 0xF5, 0xEF)
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_background: default_background(),
            search: SearchDefaults::default(),
            worker: WorkerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.default_background, "#F7F5EF");
        assert_eq!(config.search.to_options(), SearchOptions::default());
        assert_eq!(config.worker.queue_capacity, 32);
        assert_eq!(config.worker.memo_capacity, 64);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let yaml = r##"
default_background: "#FFFFFF"
search:
  limit_results: 10
"##;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.background(), Srgb::from_u8(255, 255, 255));
        assert_eq!(config.search.limit_results, 10);
        assert_eq!(config.search.max_delta_e, 10.0);
        assert!(config.search.tight_search);
        assert_eq!(config.worker, WorkerConfig::default());
    }

    #[test]
    fn test_invalid_background_falls_back() {
        let config = AppConfig {
            default_background: "not a color".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.background().to_hex(), OFF_WHITE_HEX);
    }

    #[test]
    fn test_embedded_config_matches_defaults() {
        let loader = AssetLoader::new(None, None);
        let config = AppConfig::load_from_assets(&loader);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_broken_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "search: [not, a, map]").unwrap();
        let loader = AssetLoader::new(None, Some(path));
        assert_eq!(AppConfig::load_from_assets(&loader), AppConfig::default());
    }
}
