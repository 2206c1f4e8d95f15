//! Ethers implementation of the token bridge operations

use super::contracts::{
    ArbRetryableTx, Erc20, ParentCustomToken, ParentGatewayRouter, ARBITRUM_ENABLED,
    ARB_RETRYABLE_TX_ADDRESS,
};
use super::{MessageStatus, ParentReceipt, ResolvedNetwork, RetryableMessage, TokenBridger};
use crate::chain::{ChainProvider, ChainRead, ChainWrite};
use crate::error::{BootstrapError, BootstrapResult};
use crate::events::EventParser;
use crate::tx::RetryableGasEstimator;

use async_trait::async_trait;
use ethers::abi::{encode, Token};
use ethers::contract::ContractError;
use ethers::providers::Middleware;
use ethers::types::{Address, BlockNumber, Bytes, TransactionReceipt, H256, U256};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Token bridge operations on a parent/child chain pair
pub struct ArbitrumBridger {
    parent: Arc<ChainProvider>,
    child: Arc<ChainProvider>,
    network: ResolvedNetwork,
    gas: RetryableGasEstimator,
    parser: EventParser,
}

impl ArbitrumBridger {
    pub fn new(
        parent: Arc<ChainProvider>,
        child: Arc<ChainProvider>,
        network: ResolvedNetwork,
        gas: RetryableGasEstimator,
    ) -> Self {
        let parser = EventParser::new(network.chain_id, network.inbox);
        Self {
            parent,
            child,
            network,
            gas,
            parser,
        }
    }

    fn parent_receipt(&self, receipt: &TransactionReceipt) -> BootstrapResult<ParentReceipt> {
        let messages = self.parser.retryable_messages(receipt)?;
        debug!(
            "Parent tx {:?} sent {} message(s) to chain {}",
            receipt.transaction_hash,
            messages.len(),
            self.network.chain_id
        );
        Ok(ParentReceipt {
            tx_hash: receipt.transaction_hash,
            messages,
        })
    }
}

#[async_trait]
impl TokenBridger for ArbitrumBridger {
    async fn register_custom_token(
        &self,
        parent_token: Address,
        child_token: Address,
    ) -> BootstrapResult<ParentReceipt> {
        let token = ParentCustomToken::new(parent_token, self.parent.client());

        let enabled = token
            .is_arbitrum_enabled()
            .call()
            .await
            .map_err(|e| BootstrapError::Contract(format!("isArbitrumEnabled(): {}", e)))?;
        if enabled != ARBITRUM_ENABLED {
            return Err(BootstrapError::Contract(format!(
                "token {:?} is not arbitrum enabled (isArbitrumEnabled() = {:#x})",
                parent_token, enabled
            )));
        }

        let gas = self
            .gas
            .estimate(
                &self.parent,
                &self.child,
                self.network.inbox,
                registration_calldata_len(parent_token, child_token),
            )
            .await?;
        let value = gas.deposit_value();

        let call = token
            .register_token_on_l2(
                child_token,
                gas.max_submission_cost,
                gas.max_submission_cost,
                gas.gas_limit,
                gas.gas_limit,
                gas.max_fee_per_gas,
                value,
                value,
                self.parent.signer_address(),
            )
            .value(value * 2u64);

        let receipt = self.parent.sender().send(call, "registerTokenOnL2").await?;
        self.parent_receipt(&receipt)
    }

    async fn approve_token(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> BootstrapResult<H256> {
        let router = ParentGatewayRouter::new(self.network.parent_gateway_router, self.parent.client());
        match router.get_gateway(token).call().await {
            Ok(gateway) if gateway != spender => warn!(
                "Gateway router maps {:?} to {:?}, approving {:?}",
                token, gateway, spender
            ),
            Ok(_) => {}
            Err(e) => debug!("getGateway({:?}) failed: {}", token, e),
        }

        let call = Erc20::new(token, self.parent.client()).approve(spender, amount);
        let receipt = self.parent.sender().send(call, "approve").await?;
        Ok(receipt.transaction_hash)
    }

    async fn deposit(&self, token: Address, amount: U256) -> BootstrapResult<ParentReceipt> {
        let destination = self.parent.signer_address();
        let gas = self
            .gas
            .estimate(
                &self.parent,
                &self.child,
                self.network.inbox,
                deposit_calldata_len(token, destination, amount),
            )
            .await?;

        let data = encode(&[Token::Uint(gas.max_submission_cost), Token::Bytes(Vec::new())]);
        let router = ParentGatewayRouter::new(self.network.parent_gateway_router, self.parent.client());
        let call = router
            .outbound_transfer(
                token,
                destination,
                amount,
                gas.gas_limit,
                gas.max_fee_per_gas,
                Bytes::from(data),
            )
            .value(gas.deposit_value());

        info!(
            "Depositing {} base units of {:?} to {:?} on chain {}",
            amount, token, destination, self.network.chain_id
        );
        let receipt = self.parent.sender().send(call, "outboundTransfer").await?;
        self.parent_receipt(&receipt)
    }

    async fn message_status(&self, message: &RetryableMessage) -> BootstrapResult<MessageStatus> {
        ticket_status(
            self.child.client(),
            self.child.chain_id(),
            &self.parser,
            message.retryable_creation_id,
        )
        .await
    }
}

/// Child-side status of a retryable ticket.
///
/// Creation receipt first, then the auto-redeem scheduled by it, then whether the
/// ticket still exists and has not timed out at the latest child block.
async fn ticket_status<M: Middleware + 'static>(
    client: Arc<M>,
    chain_id: u64,
    parser: &EventParser,
    ticket: H256,
) -> BootstrapResult<MessageStatus> {
    let creation = match client
        .get_transaction_receipt(ticket)
        .await
        .map_err(|e| rpc_error(chain_id, e))?
    {
        None => return Ok(MessageStatus::NotYetCreated),
        Some(receipt) => receipt,
    };
    if creation.status != Some(1u64.into()) {
        return Ok(MessageStatus::CreationFailed);
    }

    if let Some(redeem_tx) = parser.redeem_scheduled(&creation) {
        match client
            .get_transaction_receipt(redeem_tx)
            .await
            .map_err(|e| rpc_error(chain_id, e))?
        {
            Some(redeem) if redeem.status == Some(1u64.into()) => {
                return Ok(MessageStatus::Redeemed)
            }
            Some(_) => debug!("Auto-redeem {:?} of {:?} reverted", redeem_tx, ticket),
            None => {}
        }
    }

    let retryables = ArbRetryableTx::new(*ARB_RETRYABLE_TX_ADDRESS, client.clone());
    let timeout = match retryables.get_timeout(ticket.to_fixed_bytes()).call().await {
        Ok(timeout) => timeout,
        // NoTicketWithID
        Err(ContractError::Revert(_)) => return Ok(MessageStatus::Expired),
        Err(e) => return Err(rpc_error(chain_id, format!("getTimeout({:?}): {}", ticket, e))),
    };

    let now = client
        .get_block(BlockNumber::Latest)
        .await
        .map_err(|e| rpc_error(chain_id, e))?
        .ok_or_else(|| rpc_error(chain_id, "no latest block"))?
        .timestamp;

    if now <= timeout {
        Ok(MessageStatus::FundsDepositedOnChild)
    } else {
        Ok(MessageStatus::Expired)
    }
}

fn rpc_error(chain_id: u64, e: impl ToString) -> BootstrapError {
    BootstrapError::ChainConnection {
        chain_id,
        message: e.to_string(),
    }
}

/// Length of the child-side `setGateway(address[],address[])` calldata
fn registration_calldata_len(parent_token: Address, child_token: Address) -> usize {
    4 + encode(&[
        Token::Array(vec![Token::Address(parent_token)]),
        Token::Array(vec![Token::Address(child_token)]),
    ])
    .len()
}

/// Length of the child-side `finalizeInboundTransfer(token, from, to, amount, data)` calldata
fn deposit_calldata_len(token: Address, destination: Address, amount: U256) -> usize {
    let gateway_data = encode(&[Token::Bytes(Vec::new()), Token::Bytes(Vec::new())]);
    4 + encode(&[
        Token::Address(token),
        Token::Address(destination),
        Token::Address(destination),
        Token::Uint(amount),
        Token::Bytes(gateway_data),
    ])
    .len()
}
