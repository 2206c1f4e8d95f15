//! Ethers-backed chain connection with a signing wallet

use super::{finality, BridgeLink, ChainRead, ChainRole, ChainWrite, ContractKind, DeployedContract};
use crate::arbitrum::contracts::{Erc20, TokenBridgeAdmin};
use crate::artifacts::ArtifactStore;
use crate::config::ChainConfig;
use crate::error::{BootstrapError, BootstrapResult};
use crate::tx::TransactionSender;

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Signing client used for every call on one chain
pub type SignedClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// One chain endpoint plus the wallet bound to it
pub struct ChainProvider {
    role: ChainRole,
    chain_id: u64,
    client: Arc<SignedClient>,
    sender: TransactionSender,
    artifacts: ArtifactStore,
}

impl ChainProvider {
    /// Connect to an RPC endpoint and bind the wallet to the reported chain id
    pub async fn connect(
        role: ChainRole,
        rpc_url: &str,
        config: &ChainConfig,
        wallet: &LocalWallet,
        artifacts: ArtifactStore,
    ) -> BootstrapResult<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| BootstrapError::Config(format!("Invalid {} chain RPC URL: {}", role, e)))?
            .interval(Duration::from_millis(config.poll_interval_ms));

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| BootstrapError::ChainConnection {
                chain_id: 0,
                message: format!("{} chain RPC unreachable: {}", role, e),
            })?
            .as_u64();

        let confirmations = config
            .confirmations
            .unwrap_or_else(|| finality::recommended_confirmations(chain_id));

        let wallet = wallet.clone().with_chain_id(chain_id);
        info!(
            "Connected to {} chain (ID: {}) as {:?}, {} confirmation(s) per tx",
            role,
            chain_id,
            wallet.address(),
            confirmations
        );

        Ok(Self {
            role,
            chain_id,
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
            sender: TransactionSender::new(role, chain_id, confirmations),
            artifacts,
        })
    }

    /// Shared signing client
    pub fn client(&self) -> Arc<SignedClient> {
        self.client.clone()
    }

    pub fn sender(&self) -> &TransactionSender {
        &self.sender
    }

    /// Base fee of the latest block
    pub async fn latest_base_fee(&self) -> BootstrapResult<U256> {
        let block = self
            .client
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| self.connection_error(e))?
            .ok_or_else(|| self.connection_error("no latest block"))?;

        block.base_fee_per_gas.ok_or_else(|| {
            BootstrapError::ChainConnection {
                chain_id: self.chain_id,
                message: "latest block has no base fee".to_string(),
            }
        })
    }

    pub async fn gas_price(&self) -> BootstrapResult<U256> {
        self.client
            .get_gas_price()
            .await
            .map_err(|e| self.connection_error(e))
    }

    fn connection_error(&self, e: impl ToString) -> BootstrapError {
        BootstrapError::ChainConnection {
            chain_id: self.chain_id,
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl ChainRead for ChainProvider {
    fn role(&self) -> ChainRole {
        self.role
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn token_decimals(&self, token: Address) -> BootstrapResult<u8> {
        Erc20::new(token, self.client.clone())
            .decimals()
            .call()
            .await
            .map_err(|e| BootstrapError::Contract(format!("decimals() on {:?}: {}", token, e)))
    }
}

#[async_trait]
impl ChainWrite for ChainProvider {
    fn signer_address(&self) -> Address {
        self.client.address()
    }

    async fn deploy(&self, kind: ContractKind, args: Vec<Token>) -> BootstrapResult<DeployedContract> {
        let artifact = self
            .artifacts
            .load(kind)
            .map_err(|e| e.into_deployment_failure(kind))?;

        debug!(
            "Deploying {} on {} chain with {} constructor argument(s)",
            kind,
            self.role,
            args.len()
        );

        let factory = ContractFactory::new(artifact.abi, artifact.bytecode, self.client.clone());
        let deployer = factory
            .deploy_tokens(args)
            .map_err(|e| BootstrapError::DeploymentFailed {
                contract: kind.to_string(),
                reason: format!("constructor encoding: {}", e),
            })?
            .confirmations(self.sender.confirmations());

        let (contract, receipt) =
            deployer
                .send_with_receipt()
                .await
                .map_err(|e| BootstrapError::DeploymentFailed {
                    contract: kind.to_string(),
                    reason: e.to_string(),
                })?;

        finality::ensure_success(&receipt, &format!("deploy {}", kind))
            .map_err(|e| e.into_deployment_failure(kind))?;

        Ok(DeployedContract {
            kind,
            chain_id: self.chain_id,
            address: contract.address(),
            tx_hash: receipt.transaction_hash,
        })
    }

    async fn configure_bridge(&self, bridge: Address, link: BridgeLink) -> BootstrapResult<H256> {
        let admin = TokenBridgeAdmin::new(bridge, self.client.clone());
        let call = admin.set_token_bridge_information(
            link.parent_token,
            link.child_token,
            link.counterpart_bridge,
        );
        let receipt = self
            .sender
            .send(call, &format!("setTokenBridgeInformation on {} bridge", self.role))
            .await?;
        Ok(receipt.transaction_hash)
    }
}
