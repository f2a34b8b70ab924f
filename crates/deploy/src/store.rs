//! Durable storage of deployed addresses.

use std::{
    collections::BTreeMap,
    future::Future,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

use crate::{AddressRegistry, ChainSlug, DeploymentMode, VerificationEntry, VerificationLedger};

/// Saves the registry at the end of a run.
pub trait PersistenceStore: Send + Sync {
    fn save(
        &self,
        addresses: &AddressRegistry,
        chain_slug: ChainSlug,
        mode: DeploymentMode,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Addresses of every chain for one mode, as stored on disk.
type AddressFile = BTreeMap<ChainSlug, AddressRegistry>;

/// Verification entries of every chain for one mode, as stored on disk.
type VerificationFile = BTreeMap<ChainSlug, Vec<VerificationEntry>>;

/// Keeps one JSON file per mode, keyed by chain slug:
/// `<dir>/<mode>_addresses.json` and `<dir>/<mode>_verification.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn addresses_path(&self, mode: DeploymentMode) -> PathBuf {
        self.dir.join(format!("{mode}_addresses.json"))
    }

    pub fn verification_path(&self, mode: DeploymentMode) -> PathBuf {
        self.dir.join(format!("{mode}_verification.json"))
    }

    async fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> anyhow::Result<T> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(T::default());
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Like [`Self::read_or_default`], but a file that no longer parses is
    /// moved aside to `<file>.corrupt` so the caller can still write.
    /// Save path only; [`Self::load`] still reports a broken file.
    async fn read_or_quarantine<T: DeserializeOwned + Default>(path: &Path) -> anyhow::Result<T> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(T::default());
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        match serde_json::from_str(&content) {
            Ok(value) => Ok(value),
            Err(e) => {
                let aside = quarantine_path(path);
                tokio::fs::rename(path, &aside)
                    .await
                    .with_context(|| format!("Failed to move aside {}", path.display()))?;
                tracing::warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    error = %e,
                    "Existing file does not parse, starting a fresh one"
                );
                Ok(T::default())
            }
        }
    }

    /// Write through a sibling temp file and rename it into place.
    async fn write<T: Serialize>(&self, path: &Path, value: &T) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))
    }

    /// Addresses previously saved for `chain_slug`, empty if none.
    ///
    /// This is the seed for resuming a partial run.
    pub async fn load(
        &self,
        chain_slug: ChainSlug,
        mode: DeploymentMode,
    ) -> anyhow::Result<AddressRegistry> {
        let mut file: AddressFile = Self::read_or_default(&self.addresses_path(mode)).await?;
        Ok(file.remove(&chain_slug).unwrap_or_default())
    }

    /// Append a run's verification entries for `chain_slug`.
    pub async fn save_verification(
        &self,
        ledger: &VerificationLedger,
        chain_slug: ChainSlug,
        mode: DeploymentMode,
    ) -> anyhow::Result<()> {
        if ledger.is_empty() {
            return Ok(());
        }
        let path = self.verification_path(mode);
        let mut file: VerificationFile = Self::read_or_quarantine(&path).await?;
        file.entry(chain_slug)
            .or_default()
            .extend(ledger.iter().cloned());
        self.write(&path, &file).await?;
        tracing::info!(path = %path.display(), entries = ledger.len(), "Verification details saved");
        Ok(())
    }
}

fn quarantine_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

impl PersistenceStore for JsonFileStore {
    async fn save(
        &self,
        addresses: &AddressRegistry,
        chain_slug: ChainSlug,
        mode: DeploymentMode,
    ) -> anyhow::Result<()> {
        let path = self.addresses_path(mode);
        let mut file: AddressFile = Self::read_or_quarantine(&path).await?;
        file.insert(chain_slug, addresses.clone());
        self.write(&path, &file).await?;
        tracing::info!(path = %path.display(), chain_slug = %chain_slug, "Addresses saved");
        Ok(())
    }
}
