//! Sustainability Ratings
//!
//! Static per-asset energy/consensus ratings. The table is built once at
//! startup (built-in or from a JSON file) and shared read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Score given to assets missing from the table
pub const NEUTRAL_SCORE: u8 = 5;

/// Highest allowed rating
pub const MAX_SCORE: u8 = 10;

/// Rating for a single asset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SustainabilityEntry {
    /// 0 (worst) to 10 (best)
    pub score: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_per_tx: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<String>,
}

impl SustainabilityEntry {
    pub fn new(score: u8, energy_per_tx: impl Into<String>, consensus: impl Into<String>) -> Self {
        Self {
            score,
            energy_per_tx: Some(energy_per_tx.into()),
            consensus: Some(consensus.into()),
        }
    }

    /// Entry used for unknown assets
    pub fn neutral() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            energy_per_tx: None,
            consensus: None,
        }
    }
}

impl Default for SustainabilityEntry {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Immutable asset id → rating map with a neutral default
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SustainabilityTable {
    entries: HashMap<String, SustainabilityEntry>,
    fallback: SustainabilityEntry,
}

impl Default for SustainabilityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SustainabilityTable {
    /// Build from entries. Keys are matched case-insensitively.
    pub fn new(entries: impl IntoIterator<Item = (String, SustainabilityEntry)>) -> Result<Self> {
        let mut map = HashMap::new();
        for (asset_id, entry) in entries {
            if entry.score > MAX_SCORE {
                return Err(AnalysisError::Config(format!(
                    "sustainability score for {asset_id} is {}, max is {MAX_SCORE}",
                    entry.score
                )));
            }
            map.insert(asset_id.trim().to_lowercase(), entry);
        }

        Ok(Self {
            entries: map,
            fallback: SustainabilityEntry::neutral(),
        })
    }

    /// Ratings shipped with the engine
    pub fn builtin() -> Self {
        let entries = [
            ("bitcoin", SustainabilityEntry::new(3, "741 kWh", "Proof of Work")),
            ("ethereum", SustainabilityEntry::new(8, "0.0026 kWh", "Proof of Stake")),
            ("cardano", SustainabilityEntry::new(9, "0.0015 kWh", "Proof of Stake")),
            ("solana", SustainabilityEntry::new(7, "0.00051 kWh", "Proof of History + PoS")),
            ("polkadot", SustainabilityEntry::new(8, "0.0017 kWh", "Nominated Proof of Stake")),
            ("polygon", SustainabilityEntry::new(8, "0.00079 kWh", "Proof of Stake")),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(id, entry)| (id.to_string(), entry))
                .collect(),
            fallback: SustainabilityEntry::neutral(),
        }
    }

    /// Parse a JSON object of `{ "<asset>": { "score": n, ... } }`
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, SustainabilityEntry> = serde_json::from_str(json)
            .map_err(|e| AnalysisError::Config(format!("invalid sustainability table: {e}")))?;
        Self::new(raw)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let table = Self::from_json(&json)?;
        tracing::info!(
            "Loaded {} sustainability ratings from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Rating for an asset, or the neutral entry if unknown
    pub fn lookup(&self, asset_id: &str) -> &SustainabilityEntry {
        self.entries
            .get(&asset_id.trim().to_lowercase())
            .unwrap_or(&self.fallback)
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.entries.contains_key(&asset_id.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
