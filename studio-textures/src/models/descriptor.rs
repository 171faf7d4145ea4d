//! Material descriptors parsed from free-text guidance

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Price tier of the style being seeded
///
/// Influences both the AI match context and the tags/prompt of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceTier {
    #[default]
    Regular,
    Luxury,
}

impl PriceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::Regular => "REGULAR",
            PriceTier::Luxury => "LUXURY",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REGULAR" => Ok(PriceTier::Regular),
            "LUXURY" => Ok(PriceTier::Luxury),
            other => Err(format!("Unknown price tier: {}", other)),
        }
    }
}

/// One material mentioned in guidance text
///
/// Transient: produced by the descriptor parser and consumed by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    /// Capitalized material keyword (e.g. "Oak")
    pub candidate_name: String,
    /// Category slug (e.g. "wood-finishes")
    pub category_hint: String,
    /// Finish slug (e.g. "brushed"), "natural" when none was found
    pub finish_hint: String,
    /// Price tier string followed by leftover descriptive words
    pub keywords: Vec<String>,
    pub price_tier: PriceTier,
    /// Guidance fragment the descriptor was parsed from
    pub source_fragment: String,
}
