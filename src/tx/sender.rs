//! Transaction submission and confirmation
//!
//! No retries: a failed submission or a reverted receipt surfaces immediately.

use crate::chain::finality;
use crate::chain::ChainRole;
use crate::error::{BootstrapError, BootstrapResult};

use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::providers::Middleware;
use ethers::types::TransactionReceipt;
use tracing::{debug, info};

/// Sends contract calls on one chain and waits for their receipts
#[derive(Debug, Clone)]
pub struct TransactionSender {
    role: ChainRole,
    chain_id: u64,
    confirmations: usize,
}

impl TransactionSender {
    pub fn new(role: ChainRole, chain_id: u64, confirmations: usize) -> Self {
        Self {
            role,
            chain_id,
            confirmations,
        }
    }

    pub fn confirmations(&self) -> usize {
        self.confirmations
    }

    /// Submit a call, wait for the configured confirmations and check the receipt status
    pub async fn send<M, D>(
        &self,
        call: ContractCall<M, D>,
        operation: &str,
    ) -> BootstrapResult<TransactionReceipt>
    where
        M: Middleware + 'static,
        D: Detokenize,
    {
        let pending = call
            .send()
            .await
            .map_err(|e| self.classify(operation, e.to_string()))?;

        let tx_hash = pending.tx_hash();
        debug!(
            "{} submitted on {} chain {}: {:?}",
            operation, self.role, self.chain_id, tx_hash
        );

        let receipt = pending
            .confirmations(self.confirmations)
            .await
            .map_err(|e| BootstrapError::ChainConnection {
                chain_id: self.chain_id,
                message: format!("waiting for {:?}: {}", tx_hash, e),
            })?
            .ok_or_else(|| {
                BootstrapError::Transaction(format!(
                    "{}: tx {:?} was dropped from the mempool",
                    operation, tx_hash
                ))
            })?;

        finality::ensure_success(&receipt, operation)?;

        info!(
            "{} confirmed on {} chain in block {:?}: {:?}",
            operation,
            self.role,
            receipt.block_number.map(|b| b.as_u64()),
            receipt.transaction_hash
        );
        Ok(receipt)
    }

    fn classify(&self, operation: &str, error_msg: String) -> BootstrapError {
        if error_msg.contains("insufficient funds") {
            BootstrapError::Transaction(format!(
                "{}: insufficient funds on {} chain {} to pay for gas and value",
                operation, self.role, self.chain_id
            ))
        } else if error_msg.contains("nonce too low") {
            BootstrapError::Transaction(format!(
                "{}: nonce too low on {} chain {} (another process is using this key?)",
                operation, self.role, self.chain_id
            ))
        } else {
            BootstrapError::Transaction(format!("{}: {}", operation, error_msg))
        }
    }
}
