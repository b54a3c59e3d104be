//! Registries of raw and product sources, keyed by path hash.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Lifecycle of a registry entry. Removal leaves a tombstone behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    Active,
    Deleted,
}

/// One registered source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub source_path: String,
    pub state: EntryState,
}

impl RegistryEntry {
    pub fn is_deleted(&self) -> bool {
        self.state == EntryState::Deleted
    }
}

/// What [`Registry::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new entry was created.
    Added,
    /// An existing entry had its source path refreshed.
    Refreshed,
    /// A deleted entry was brought back.
    Reactivated,
}

/// Which registry an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Raw,
    Product,
}

impl RegistryKind {
    /// Name of the group holding the registry.
    pub fn group_name(&self) -> &'static str {
        match self {
            RegistryKind::Raw => "raws",
            RegistryKind::Product => "products",
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Raw => f.write_str("Raw"),
            RegistryKind::Product => f.write_str("Product"),
        }
    }
}

/// Entries by path hash, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    variables: IndexMap<String, RegistryEntry>,
}

impl Registry {
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn get(&self, path_hash: &str) -> Option<&RegistryEntry> {
        self.variables.get(path_hash)
    }

    pub fn contains(&self, path_hash: &str) -> bool {
        self.variables.contains_key(path_hash)
    }

    /// All entries, deleted ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Register `source_path` under `path_hash`, reviving a tombstone.
    pub fn add(&mut self, path_hash: String, source_path: String) -> AddOutcome {
        match self.variables.get_mut(&path_hash) {
            Some(entry) => {
                entry.source_path = source_path;
                if entry.is_deleted() {
                    entry.state = EntryState::Active;
                    AddOutcome::Reactivated
                } else {
                    AddOutcome::Refreshed
                }
            }
            None => {
                self.variables.insert(
                    path_hash,
                    RegistryEntry {
                        source_path,
                        state: EntryState::Active,
                    },
                );
                AddOutcome::Added
            }
        }
    }

    /// Mark the entry as deleted. Returns false if the hash is unknown.
    pub fn remove(&mut self, path_hash: &str) -> bool {
        match self.variables.get_mut(path_hash) {
            Some(entry) => {
                entry.state = EntryState::Deleted;
                true
            }
            None => false,
        }
    }

    /// Hashes of the entries that are not deleted.
    pub fn valid_keys(&self) -> Vec<String> {
        self.variables
            .iter()
            .filter(|(_, entry)| !entry.is_deleted())
            .map(|(key, _)| key.clone())
            .collect()
    }
}
