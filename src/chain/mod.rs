//! Chain module - parent and child chain access
//!
//! This module provides:
//! - `ChainRead` / `ChainWrite` capability traits the orchestration is written against
//! - An ethers-backed `ChainProvider` implementing both
//! - Receipt confirmation checks
//! - `ChainConnector`, which turns validated parameters into live connections

pub mod finality;
pub mod provider;

pub use provider::ChainProvider;

use crate::arbitrum::{ArbitrumBridger, NetworkRegistry, ResolvedNetwork, TokenBridger};
use crate::artifacts::ArtifactStore;
use crate::config::{BootstrapParams, Settings};
use crate::error::{BootstrapError, BootstrapResult};
use crate::tx::RetryableGasEstimator;

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::signers::LocalWallet;
use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Which side of the bridge a chain sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainRole {
    Parent,
    Child,
}

impl fmt::Display for ChainRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainRole::Parent => f.write_str("parent"),
            ChainRole::Child => f.write_str("child"),
        }
    }
}

/// The four contracts deployed by the bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    ParentBridge,
    ChildBridge,
    ParentToken,
    ChildToken,
}

impl ContractKind {
    /// Hardhat contract name
    pub fn artifact_name(&self) -> &'static str {
        match self {
            ContractKind::ParentBridge => "L1TokenBridge",
            ContractKind::ChildBridge => "L2TokenBridge",
            ContractKind::ParentToken => "L1ERC20Token",
            ContractKind::ChildToken => "L2ERC20Token",
        }
    }

    pub fn role(&self) -> ChainRole {
        match self {
            ContractKind::ParentBridge | ContractKind::ParentToken => ChainRole::Parent,
            ContractKind::ChildBridge | ContractKind::ChildToken => ChainRole::Child,
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact_name())
    }
}

/// A contract address produced by exactly one confirmed deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    pub kind: ContractKind,
    pub chain_id: u64,
    pub address: Address,
    pub tx_hash: H256,
}

/// Counterpart addresses written into one bridge contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeLink {
    pub parent_token: Address,
    pub child_token: Address,
    pub counterpart_bridge: Address,
}

/// Read-only access to one chain
#[async_trait]
pub trait ChainRead: Send + Sync {
    fn role(&self) -> ChainRole;

    fn chain_id(&self) -> u64;

    /// `decimals()` of an ERC-20 deployed on this chain
    async fn token_decimals(&self, token: Address) -> BootstrapResult<u8>;
}

/// Signed writes against one chain. Calls return only once the transaction is confirmed.
#[async_trait]
pub trait ChainWrite: ChainRead {
    fn signer_address(&self) -> Address;

    async fn deploy(&self, kind: ContractKind, args: Vec<Token>) -> BootstrapResult<DeployedContract>;

    /// `setTokenBridgeInformation(parentToken, childToken, counterpartBridge)` on a bridge
    async fn configure_bridge(&self, bridge: Address, link: BridgeLink) -> BootstrapResult<H256>;
}

/// Everything the stages need once the bootstrap inputs are validated
pub struct Connections {
    pub parent: Arc<dyn ChainWrite>,
    pub child: Arc<dyn ChainWrite>,
    pub bridger: Arc<dyn TokenBridger>,
    pub network: ResolvedNetwork,
}

/// Opens chain connections and resolves the child network
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainConnector: Send + Sync {
    async fn connect(&self, params: &BootstrapParams) -> BootstrapResult<Connections>;
}

/// Production connector over JSON-RPC
pub struct EthersConnector {
    settings: Settings,
}

impl EthersConnector {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ChainConnector for EthersConnector {
    async fn connect(&self, params: &BootstrapParams) -> BootstrapResult<Connections> {
        let wallet: LocalWallet = params
            .private_key
            .expose()
            .trim()
            .parse()
            .map_err(|e| BootstrapError::Wallet(format!("Invalid private key: {}", e)))?;
        let registry = NetworkRegistry::with_custom(&self.settings.networks)?;

        let artifacts = ArtifactStore::new(&self.settings.bootstrap.artifacts_dir);

        let parent = Arc::new(
            ChainProvider::connect(
                ChainRole::Parent,
                &params.parent_rpc_url,
                &self.settings.parent,
                &wallet,
                artifacts.clone(),
            )
            .await?,
        );
        let child = Arc::new(
            ChainProvider::connect(
                ChainRole::Child,
                &params.child_rpc_url,
                &self.settings.child,
                &wallet,
                artifacts,
            )
            .await?,
        );

        let network = registry.resolve(child.chain_id())?;
        if network.parent_chain_id != parent.chain_id() {
            warn!(
                "{} expects parent chain {}, but the parent RPC reports chain {}",
                network.name,
                network.parent_chain_id,
                parent.chain_id()
            );
        }
        info!(
            "Resolved child network {} (ID: {}), inbox {:?}",
            network.name, network.chain_id, network.inbox
        );

        let bridger = ArbitrumBridger::new(
            parent.clone(),
            child.clone(),
            network.clone(),
            RetryableGasEstimator::new(&self.settings.gas),
        );

        Ok(Connections {
            parent,
            child,
            bridger: Arc::new(bridger),
            network,
        })
    }
}
