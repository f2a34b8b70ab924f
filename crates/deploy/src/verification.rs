//! Metadata collected for block-explorer source verification.

use alloy_core::primitives::Address;
use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::ConstructorArg;

/// Everything a verifier needs to match a deployed contract against its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationEntry {
    pub address: Address,
    pub name: String,
    pub source_path: String,
    pub constructor_args: Vec<ConstructorArg>,
}

/// Append-only list of [`VerificationEntry`], one per fresh deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationLedger {
    #[deref]
    entries: Vec<VerificationEntry>,
}

impl VerificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: VerificationEntry) {
        self.entries.push(entry);
    }

    pub fn into_entries(self) -> Vec<VerificationEntry> {
        self.entries
    }
}
