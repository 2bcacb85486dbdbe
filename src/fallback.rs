use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::types::Coordinate;

/// Table shipped with the binary; `paths.fallback_table` in config.toml replaces it.
const EMBEDDED_TABLE: &str = include_str!("../data/fallback_coordinates.json");

/// Curated coordinates for addresses the geocoding service cannot resolve, or
/// resolves to the wrong place. Keys are full query strings and match exactly.
#[derive(Debug, Clone, Default)]
pub struct FallbackTable {
    entries: HashMap<String, Coordinate>,
}

impl FallbackTable {
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_TABLE)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read fallback table {}: {}",
                path.display(),
                e
            ))
        })?;
        let table = Self::from_json_str(&content)?;
        info!("Loaded {} fallback coordinates from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parses a JSON object of `"address": [lat, lon]` pairs.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: HashMap<String, Coordinate> = serde_json::from_str(content)?;
        if let Some((address, coord)) = entries.iter().find(|(_, c)| !c.is_valid()) {
            return Err(PipelineError::Config(format!(
                "Fallback coordinate out of range for '{}': [{}, {}]",
                address, coord.latitude, coord.longitude
            )));
        }
        Ok(Self { entries })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn lookup(&self, full_address: &str) -> Option<Coordinate> {
        self.entries.get(full_address).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
