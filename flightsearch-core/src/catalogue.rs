use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Airports served out of the box.
pub const DEFAULT_AIRPORTS: [&str; 7] = ["syd", "mel", "lax", "cdg", "del", "pvg", "doh"];

/// Cabin classes a passenger can search in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CabinClass {
    #[serde(rename = "economy")]
    Economy,
    #[serde(rename = "premium economy")]
    PremiumEconomy,
    #[serde(rename = "business")]
    Business,
    #[serde(rename = "first")]
    First,
}

impl CabinClass {
    pub const ALL: [CabinClass; 4] = [
        CabinClass::Economy,
        CabinClass::PremiumEconomy,
        CabinClass::Business,
        CabinClass::First,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::PremiumEconomy => "premium economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown cabin class: {0:?}")]
pub struct UnknownCabinClass(pub String);

impl FromStr for CabinClass {
    type Err = UnknownCabinClass;

    // Spellings are matched literally; callers normalise case beforehand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CabinClass::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| UnknownCabinClass(s.to_string()))
    }
}

/// The closed set of airport codes a search may depart from or arrive at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportCatalogue {
    codes: BTreeSet<String>,
}

impl AirportCatalogue {
    /// Build a catalogue from configured codes.
    ///
    /// Every code must be exactly three lowercase ASCII letters.
    pub fn new<I, S>(codes: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for code in codes {
            let code = code.into();
            if !is_airport_code_shape(&code) {
                return Err(CoreError::ValidationError(format!(
                    "airport code must be three lowercase letters, got {:?}",
                    code
                )));
            }
            set.insert(code);
        }

        if set.is_empty() {
            return Err(CoreError::ConfigError(
                "airport catalogue must contain at least one code".to_string(),
            ));
        }

        Ok(Self { codes: set })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for AirportCatalogue {
    fn default() -> Self {
        Self {
            codes: DEFAULT_AIRPORTS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

fn is_airport_code_shape(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_lowercase())
}
