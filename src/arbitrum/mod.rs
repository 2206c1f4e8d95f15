//! Arbitrum token bridge protocol
//!
//! This module provides:
//! - Child network descriptors (inbox, gateway routers)
//! - Retryable message model and status
//! - Contract bindings for the canonical bridge contracts
//! - `TokenBridger`, the cross-chain operations the bootstrap needs

pub mod bridger;
pub mod contracts;
pub mod message;
pub mod network;

pub use bridger::ArbitrumBridger;
pub use message::{MessageStatus, RetryableMessage};
pub use network::{NetworkRegistry, ResolvedNetwork};

use crate::error::BootstrapResult;

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};

/// A confirmed parent chain transaction and the messages it sent to the child chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentReceipt {
    pub tx_hash: H256,
    pub messages: Vec<RetryableMessage>,
}

/// Cross-chain operations against the canonical token bridge
#[async_trait]
pub trait TokenBridger: Send + Sync {
    /// Register a parent/child token pair in the gateway router via the parent token
    async fn register_custom_token(
        &self,
        parent_token: Address,
        child_token: Address,
    ) -> BootstrapResult<ParentReceipt>;

    /// ERC-20 approval on the parent chain; returns the confirmed tx hash
    async fn approve_token(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> BootstrapResult<H256>;

    /// Deposit `amount` base units of a parent token to the signer on the child chain
    async fn deposit(&self, token: Address, amount: U256) -> BootstrapResult<ParentReceipt>;

    /// Current status of a message on the child chain
    async fn message_status(&self, message: &RetryableMessage) -> BootstrapResult<MessageStatus>;
}
