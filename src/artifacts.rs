//! Hardhat compilation artifacts for the four bridge contracts

use crate::chain::ContractKind;
use crate::error::{BootstrapError, BootstrapResult};

use ethers::abi::Abi;
use ethers::types::Bytes;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// ABI and creation bytecode of one contract
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    #[serde(rename = "contractName")]
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

/// Reads artifacts from `<root>/contracts/<Name>.sol/<Name>.json`
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, kind: ContractKind) -> PathBuf {
        let name = kind.artifact_name();
        self.root
            .join("contracts")
            .join(format!("{}.sol", name))
            .join(format!("{}.json", name))
    }

    /// Load the artifact for a contract kind
    pub fn load(&self, kind: ContractKind) -> BootstrapResult<ContractArtifact> {
        let path = self.path_for(kind);
        let artifact = read_artifact(&path)?;

        if artifact.contract_name != kind.artifact_name() {
            return Err(BootstrapError::Artifact(format!(
                "{} contains {}, expected {}",
                path.display(),
                artifact.contract_name,
                kind.artifact_name()
            )));
        }
        if artifact.bytecode.is_empty() {
            return Err(BootstrapError::Artifact(format!(
                "{} has no creation bytecode (abstract contract or interface?)",
                path.display()
            )));
        }

        debug!(
            "Loaded artifact {} ({} bytes of bytecode)",
            artifact.contract_name,
            artifact.bytecode.len()
        );
        Ok(artifact)
    }
}

fn read_artifact(path: &Path) -> BootstrapResult<ContractArtifact> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        BootstrapError::Artifact(format!(
            "Failed to read {} ({}). Compile the contracts first",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&text)
        .map_err(|e| BootstrapError::Artifact(format!("Invalid artifact {}: {}", path.display(), e)))
}
