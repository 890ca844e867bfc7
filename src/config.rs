use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use crate::core::{extractor::DEFAULT_CUISINES, LocationRule, SearchPipeline, TextExtractor, UtilityRanker};
use crate::models::ScoringWeights;
use crate::services::{BuiltinCatalog, CatalogProvider, JsonCatalog};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub trace: TraceSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// JSON venue file; the built-in catalog is used when unset
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_cuisines")]
    pub cuisines: Vec<String>,
    #[serde(default = "default_location_keywords")]
    pub location_keywords: Vec<String>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            cuisines: default_cuisines(),
            location_keywords: default_location_keywords(),
        }
    }
}

fn default_cuisines() -> Vec<String> {
    DEFAULT_CUISINES.iter().map(|c| c.to_string()).collect()
}

fn default_location_keywords() -> Vec<String> {
    LocationRule::default().keywords().to_vec()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
    #[serde(default = "default_distance_base")]
    pub distance_base: f64,
    #[serde(default = "default_distance_decay")]
    pub distance_decay: f64,
    #[serde(default = "default_window_bonus")]
    pub window: f64,
    #[serde(default = "default_garden_bonus")]
    pub garden_view: f64,
    #[serde(default = "default_street_bonus")]
    pub street_view: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            rating: default_rating_weight(),
            price: default_price_weight(),
            distance_base: default_distance_base(),
            distance_decay: default_distance_decay(),
            window: default_window_bonus(),
            garden_view: default_garden_bonus(),
            street_view: default_street_bonus(),
        }
    }
}

fn default_rating_weight() -> f64 { 6.0 }
fn default_price_weight() -> f64 { 20.0 }
fn default_distance_base() -> f64 { 20.0 }
fn default_distance_decay() -> f64 { 10.0 }
fn default_window_bonus() -> f64 { 15.0 }
fn default_garden_bonus() -> f64 { 10.0 }
fn default_street_bonus() -> f64 { 5.0 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            rating: config.rating,
            price: config.price,
            distance_base: config.distance_base,
            distance_decay: config.distance_decay,
            window: config.window,
            garden_view: config.garden_view,
            street_view: config.street_view,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraceSettings {
    /// File each search's trace is written to; not persisted when unset
    pub output_path: Option<String>,
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with DINING__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., DINING__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Parse settings from TOML text, without environment overrides
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn catalog_provider(&self) -> Arc<dyn CatalogProvider> {
        match &self.catalog.path {
            Some(path) => Arc::new(JsonCatalog::new(path)),
            None => Arc::new(BuiltinCatalog),
        }
    }

    /// Build the search pipeline described by these settings
    pub fn build_pipeline(&self) -> SearchPipeline {
        SearchPipeline::new(
            TextExtractor::with_cuisines(&self.matching.cuisines),
            LocationRule::new(&self.matching.location_keywords),
            UtilityRanker::new(ScoringWeights::from(&self.scoring.weights)),
            self.catalog_provider(),
        )
    }
}

fn environment() -> Environment {
    Environment::with_prefix("DINING")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("matching.cuisines")
        .with_list_parse_key("matching.location_keywords")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_match_scoring_defaults() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.cuisines.first().map(String::as_str), Some("turkish"));
        assert_eq!(matching.location_keywords, vec!["downtown", "baltimore"]);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [server]
            port = 8080

            [scoring.weights]
            window = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.scoring.weights.window, 0.0);
        assert_eq!(settings.scoring.weights.rating, 6.0);
        assert!(settings.catalog.path.is_none());
        assert!(settings.trace.output_path.is_none());
    }

    #[test]
    fn test_build_pipeline_uses_location_keywords() {
        let settings = Settings::from_toml_str(
            r#"
            [matching]
            location_keywords = ["harbor east"]
            "#,
        )
        .unwrap();
        let pipeline = settings.build_pipeline();
        let outcome = pipeline.search("Turkish restaurant in downtown baltimore").unwrap();
        let names: Vec<&str> = outcome.results.iter().map(|r| r.venue.name.as_str()).collect();

        assert_eq!(names, vec!["Turkish Delight"]);

        // the venue-level check keeps the default downtown rule
        let delight = &outcome.results[0].venue;
        assert!(pipeline.check(delight, &outcome.constraints).matched);
        assert!(!delight.matches_constraints(&outcome.constraints).0);
    }
}
