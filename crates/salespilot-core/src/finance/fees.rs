//! Client- and type-specific fee fractions.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::models::config::read_json;

/// Type key that applies to every transaction type of a client.
pub const ANY_TYPE: &str = "ANY";

/// Fee fractions by upper-cased client, then upper-cased type or [`ANY_TYPE`].
///
/// Loaded once per run and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeTable {
    clients: HashMap<String, HashMap<String, Decimal>>,
}

impl FeeTable {
    /// An empty table: every fee is zero.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a `client -> type -> fraction` mapping.
    ///
    /// Every fraction must lie in `[0, 1)`.
    pub fn from_map(map: BTreeMap<String, BTreeMap<String, Decimal>>) -> Result<Self, ConfigError> {
        let mut clients: HashMap<String, HashMap<String, Decimal>> = HashMap::new();

        for (client, kinds) in map {
            let entry = clients.entry(client.to_uppercase()).or_default();
            for (kind, fraction) in kinds {
                if fraction < Decimal::ZERO || fraction >= Decimal::ONE {
                    return Err(ConfigError::FeeOutOfRange {
                        client,
                        kind,
                        value: fraction.to_string(),
                    });
                }
                entry.insert(kind.to_uppercase(), fraction);
            }
        }

        Ok(Self { clients })
    }

    /// Load the fee file. A missing file yields an empty table.
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            warn!("Fee file {} not found, fees default to zero", path.display());
            return Ok(Self::empty());
        }

        let map: BTreeMap<String, BTreeMap<String, Decimal>> = read_json(path)?;
        let table = Self::from_map(map)?;
        info!("Loaded fees for {} clients from {}", table.len(), path.display());
        Ok(table)
    }

    /// Add or replace one fee.
    pub fn with_fee(mut self, client: &str, kind: &str, fraction: Decimal) -> Result<Self, ConfigError> {
        if fraction < Decimal::ZERO || fraction >= Decimal::ONE {
            return Err(ConfigError::FeeOutOfRange {
                client: client.to_string(),
                kind: kind.to_string(),
                value: fraction.to_string(),
            });
        }
        self.clients
            .entry(client.to_uppercase())
            .or_default()
            .insert(kind.to_uppercase(), fraction);
        Ok(self)
    }

    /// Fee fraction for a client and transaction type.
    ///
    /// Type-specific entry first, then the client's `ANY` entry, else zero.
    /// Unknown clients pay no fee.
    pub fn fee_pct(&self, client: &str, kind: &str) -> Decimal {
        let Some(kinds) = self.clients.get(&client.to_uppercase()) else {
            return Decimal::ZERO;
        };
        kinds
            .get(&kind.to_uppercase())
            .or_else(|| kinds.get(ANY_TYPE))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Number of clients with at least one entry.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
