use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use upkeep_core::models::GenerationConfig;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database_path: String,
    /// Default filter for `tracing`; `RUST_LOG` takes precedence.
    pub log_level: String,
    pub generation: GenerationSettings,
}

/// The `[generation]` table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    /// How many days ahead `sweep` and `generate upcoming` fill by default
    pub lookahead_days: u32,
    /// Deepest parent chain a cascade delete will walk
    pub max_hierarchy_depth: usize,
    /// Cap on instances created for one series in a single run
    pub max_instances_per_series: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "upkeep.db".to_string(),
            log_level: "warn".to_string(),
            generation: GenerationSettings::default(),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let core = GenerationConfig::default();
        Self {
            lookahead_days: core.lookahead_days,
            max_hierarchy_depth: core.max_hierarchy_depth,
            max_instances_per_series: core.max_instances_per_series,
        }
    }
}

impl From<&GenerationSettings> for GenerationConfig {
    fn from(settings: &GenerationSettings) -> Self {
        GenerationConfig {
            lookahead_days: settings.lookahead_days,
            max_hierarchy_depth: settings.max_hierarchy_depth,
            max_instances_per_series: settings.max_instances_per_series,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment(Figment::from(Serialized::defaults(Config::default()))).extract()
    }

    fn figment(base: Figment) -> Figment {
        base.merge(Toml::file("upkeep.toml"))
            .merge(Env::prefixed("UPKEEP_").split("__"))
    }
}
