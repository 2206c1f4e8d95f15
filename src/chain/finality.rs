//! Confirmation handling for submitted transactions
//!
//! Every write in the bootstrap waits for inclusion before the next step reads
//! its result, so a receipt is only accepted once it is both mined and successful.

use crate::error::{BootstrapError, BootstrapResult};

use ethers::types::{TransactionReceipt, U64};

/// Reject receipts of reverted transactions
pub fn ensure_success(receipt: &TransactionReceipt, operation: &str) -> BootstrapResult<()> {
    match receipt.status {
        Some(status) if status == U64::one() => Ok(()),
        Some(_) => Err(BootstrapError::Transaction(format!(
            "{} reverted in tx {:?} (block {:?})",
            operation,
            receipt.transaction_hash,
            receipt.block_number.map(|b| b.as_u64())
        ))),
        None => Err(BootstrapError::Transaction(format!(
            "{}: receipt for {:?} carries no status (pre-Byzantium chain?)",
            operation, receipt.transaction_hash
        ))),
    }
}

/// Suggested confirmation depth when the operator does not configure one
pub fn recommended_confirmations(chain_id: u64) -> usize {
    match chain_id {
        // Ethereum mainnet
        1 => 2,
        // Ethereum testnets
        11155111 | 17000 => 1,
        // Arbitrum chains produce blocks on the sequencer's soft confirmation
        42161 | 42170 | 421614 => 1,
        _ => 1,
    }
}
