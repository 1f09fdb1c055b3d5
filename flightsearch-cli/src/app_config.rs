use flightsearch_core::catalogue::DEFAULT_AIRPORTS;
use flightsearch_core::{parse_travel_date, AirportCatalogue, Clock, FixedClock, RuleEngine, SystemClock};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::sync::Arc;

use crate::error::CliError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalogue: CatalogueConfig,
    #[serde(default)]
    pub clock: ClockConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogueConfig {
    #[serde(default = "default_airports")]
    pub airports: Vec<String>,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self { airports: default_airports() }
    }
}

fn default_airports() -> Vec<String> {
    DEFAULT_AIRPORTS.iter().map(|c| c.to_string()).collect()
}

/// Where "today" comes from.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClockConfig {
    #[default]
    System,
    Fixed {
        today: String, // DD/MM/YYYY
    },
}

impl Config {
    /// Load settings from `$FLIGHTSEARCH_CONFIG_DIR`, or `config/` under the
    /// working directory, so the binary is run from the `flightsearch-cli` crate
    /// directory unless that variable points elsewhere.
    pub fn load() -> Result<Self, CliError> {
        let dir = env::var("FLIGHTSEARCH_CONFIG_DIR").unwrap_or_else(|_| "config".into());
        Self::load_from(Path::new(&dir))
    }

    /// Layered load: `default` (required), `{RUN_MODE}`, `local`, then the environment.
    pub fn load_from(dir: &Path) -> Result<Self, CliError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&file("default")))
            .add_source(config::File::with_name(&file(&run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name(&file("local")).required(false))
            // e.g. FLIGHTSEARCH_CLOCK__MODE=fixed, FLIGHTSEARCH_CATALOGUE__AIRPORTS=syd,mel
            .add_source(
                config::Environment::with_prefix("FLIGHTSEARCH")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("catalogue.airports")
                    .try_parsing(true),
            )
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// Parse configuration from TOML text alone.
    pub fn from_toml(text: &str) -> Result<Self, CliError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    pub fn rule_engine(&self) -> Result<RuleEngine, CliError> {
        let airports = AirportCatalogue::new(self.catalogue.airports.iter().cloned())?;
        Ok(RuleEngine::new(airports, self.clock.build()?))
    }
}

impl ClockConfig {
    pub fn build(&self) -> Result<Arc<dyn Clock>, CliError> {
        match self {
            ClockConfig::System => Ok(Arc::new(SystemClock)),
            ClockConfig::Fixed { today } => Ok(Arc::new(FixedClock(parse_travel_date(today)?))),
        }
    }
}
