//! Chain identifiers, deployment modes and the per-run address registry.

use std::{collections::BTreeMap, fmt, str::FromStr};

use alloy_core::primitives::Address;
use derive_more::{Deref, Display, From};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::DeployError;

/// Identifier of the chain a deployment targets.
///
/// Deserializes from either an integer or a decimal string so it can be used
/// as a map key in JSON and TOML files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize)]
#[serde(transparent)]
pub struct ChainSlug(pub u32);

impl FromStr for ChainSlug {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl<'de> Deserialize<'de> for ChainSlug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SlugVisitor;

        impl de::Visitor<'_> for SlugVisitor {
            type Value = ChainSlug;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a chain slug as an integer or a decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(ChainSlug)
                    .map_err(|_| E::custom(format!("chain slug {v} does not fit in u32")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(ChainSlug)
                    .map_err(|_| E::custom(format!("chain slug {v} does not fit in u32")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(SlugVisitor)
    }
}

/// Environment a deployment run belongs to.
///
/// Each mode has its own address file, so the same chain can carry a dev and a
/// prod deployment side by side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeploymentMode {
    #[default]
    Dev,
    Surge,
    Prod,
}

/// Contract name to deployed address mapping for one (chain, mode) scope.
///
/// A name being present means the contract is deployed. Entries are never
/// overwritten once set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressRegistry {
    #[deref]
    entries: BTreeMap<String, Address>,
}

impl AddressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address recorded for `name`, if any.
    pub fn address_of(&self, name: &str) -> Option<Address> {
        self.entries.get(name).copied()
    }

    /// Record a freshly deployed contract.
    ///
    /// Fails if `name` is already present.
    pub fn insert(&mut self, name: impl Into<String>, address: Address) -> Result<(), DeployError> {
        let name = name.into();
        if let Some(existing) = self.entries.get(&name) {
            return Err(DeployError::Registry {
                name,
                existing: *existing,
                attempted: address,
            });
        }
        self.entries.insert(name, address);
        Ok(())
    }

    /// Fold `other` into this registry without touching existing entries.
    ///
    /// Returns the names whose address in `other` disagreed with the one
    /// already recorded here.
    pub fn merge(&mut self, other: AddressRegistry) -> Vec<String> {
        let mut conflicts = Vec::new();
        for (name, address) in other.entries {
            match self.entries.get(&name) {
                Some(existing) if *existing != address => conflicts.push(name),
                Some(_) => {}
                None => {
                    self.entries.insert(name, address);
                }
            }
        }
        conflicts
    }

    pub fn into_inner(self) -> BTreeMap<String, Address> {
        self.entries
    }
}

impl FromIterator<(String, Address)> for AddressRegistry {
    fn from_iter<T: IntoIterator<Item = (String, Address)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, Address>> for AddressRegistry {
    fn from(entries: BTreeMap<String, Address>) -> Self {
        Self { entries }
    }
}
