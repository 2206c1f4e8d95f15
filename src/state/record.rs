//! JSON record of one bootstrap run

use crate::chain::{ChainRole, DeployedContract};
use crate::coordination::Stage;
use crate::error::{BootstrapError, BootstrapResult};
use crate::events::ProgressEvent;

use chrono::{DateTime, Utc};
use ethers::types::H256;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// A confirmed transaction sent during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedTransaction {
    pub label: String,
    pub chain: ChainRole,
    pub tx_hash: H256,
}

/// Everything a run produced, kept so partial runs can be recovered by hand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub network: Option<String>,
    pub parent_chain_id: Option<u64>,
    pub child_chain_id: Option<u64>,
    pub stage: Stage,
    pub contracts: Vec<DeployedContract>,
    pub transactions: Vec<RecordedTransaction>,
    pub events: Vec<ProgressEvent>,
    pub error: Option<String>,
}

impl DeploymentRecord {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            network: None,
            parent_chain_id: None,
            child_chain_id: None,
            stage: Stage::Bootstrapped,
            contracts: Vec::new(),
            transactions: Vec::new(),
            events: Vec::new(),
            error: None,
        }
    }

    pub fn push_event(&mut self, event: ProgressEvent) {
        self.events.push(event);
    }

    pub fn add_contract(&mut self, contract: DeployedContract) {
        self.contracts.push(contract);
    }

    pub fn add_transaction(&mut self, label: impl Into<String>, chain: ChainRole, tx_hash: H256) {
        self.transactions.push(RecordedTransaction {
            label: label.into(),
            chain,
            tx_hash,
        });
    }

    pub fn finish(&mut self, stage: Stage, error: Option<&BootstrapError>) {
        self.stage = stage;
        self.error = error.map(|e| e.to_string());
        self.finished_at = Some(Utc::now());
    }

    /// Whether any progress event announced overall success
    pub fn reported_success(&self) -> bool {
        self.events.iter().any(ProgressEvent::is_success)
    }

    /// Log every contract that stays live on-chain after a failed run
    pub fn log_leftovers(&self) {
        if self.contracts.is_empty() {
            return;
        }
        warn!("{} contract(s) were deployed before the failure:", self.contracts.len());
        for contract in &self.contracts {
            warn!(
                "  {} on chain {}: {:?} (tx {:?})",
                contract.kind, contract.chain_id, contract.address, contract.tx_hash
            );
        }
    }

    /// Write the record as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> BootstrapResult<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| BootstrapError::Record(format!("{}: {}", dir.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BootstrapError::Record(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| BootstrapError::Record(format!("{}: {}", path.display(), e)))?;

        info!("Deployment record written to {}", path.display());
        Ok(())
    }
}

impl Default for DeploymentRecord {
    fn default() -> Self {
        Self::new()
    }
}
