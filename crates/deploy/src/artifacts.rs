//! Lookup of compiled contract artifacts.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Creation bytecode as emitted by hardhat (plain hex string) or foundry
/// (`{"object": "0x.."}`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    Hex(String),
    Object { object: String },
}

#[derive(Debug, Deserialize)]
struct Artifact {
    bytecode: ArtifactBytecode,
}

/// Directory of compiled artifacts.
///
/// Both layouts are searched, in order:
/// - hardhat: `<root>/<source_path>/<Name>.json`
/// - foundry: `<root>/<Name>.sol/<Name>.json`
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(&self, name: &str, source_path: &str) -> [PathBuf; 2] {
        let file = format!("{name}.json");
        [
            self.root.join(source_path).join(&file),
            self.root.join(format!("{name}.sol")).join(&file),
        ]
    }

    /// Creation bytecode for `name`.
    pub async fn bytecode(&self, name: &str, source_path: &str) -> anyhow::Result<Vec<u8>> {
        for path in self.candidates(name, source_path) {
            let is_file = tokio::fs::metadata(&path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if is_file {
                return Self::read_bytecode(&path).await;
            }
        }

        anyhow::bail!(
            "No artifact for {} under {} (source {})",
            name,
            self.root.display(),
            source_path
        )
    }

    async fn read_bytecode(path: &Path) -> anyhow::Result<Vec<u8>> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read artifact {}", path.display()))?;
        let artifact: Artifact = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse artifact {}", path.display()))?;

        let hex_code = match artifact.bytecode {
            ArtifactBytecode::Hex(code) => code,
            ArtifactBytecode::Object { object } => object,
        };
        let bytes = hex::decode(hex_code.trim_start_matches("0x"))
            .with_context(|| format!("Artifact {} has malformed bytecode", path.display()))?;

        if bytes.is_empty() {
            anyhow::bail!(
                "Artifact {} has no creation bytecode (abstract contract or interface?)",
                path.display()
            );
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn write(path: PathBuf, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_reads_hardhat_layout() {
        let dir = TempDir::new("artifacts").unwrap();
        write(
            dir.path().join("contracts/utils/Hasher.sol/Hasher.json"),
            r#"{"contractName": "Hasher", "bytecode": "0x6080"}"#,
        );

        let store = ArtifactStore::new(dir.path());
        let code = store.bytecode("Hasher", "contracts/utils/Hasher.sol").await.unwrap();
        assert_eq!(code, vec![0x60, 0x80]);
    }

    #[tokio::test]
    async fn test_reads_foundry_layout() {
        let dir = TempDir::new("artifacts").unwrap();
        write(
            dir.path().join("Socket.sol/Socket.json"),
            r#"{"bytecode": {"object": "0x60806040"}}"#,
        );

        let store = ArtifactStore::new(dir.path());
        let code = store.bytecode("Socket", "contracts/socket/Socket.sol").await.unwrap();
        assert_eq!(code.len(), 4);
    }

    #[tokio::test]
    async fn test_rejects_empty_bytecode_and_missing_artifacts() {
        let dir = TempDir::new("artifacts").unwrap();
        write(dir.path().join("IPlug.sol/IPlug.json"), r#"{"bytecode": "0x"}"#);

        let store = ArtifactStore::new(dir.path());
        assert!(store.bytecode("IPlug", "contracts/interfaces/IPlug.sol").await.is_err());
        assert!(store.bytecode("Counter", "contracts/examples/Counter.sol").await.is_err());
    }
}
