//! Bootstrap events: user-facing progress and bridge log parsing
//!
//! `ProgressEvent` is what the run reports as it goes. `EventParser` turns the
//! bridge and inbox logs of a parent receipt into cross-chain messages.

use crate::arbitrum::message::{RetryableMessage, SubmitRetryableData, SUBMIT_RETRYABLE_KIND};
use crate::arbitrum::MessageStatus;
use crate::chain::{ChainRole, ContractKind};
use crate::error::{BootstrapError, BootstrapResult};

use ethers::abi::{decode, ParamType, Token};
use ethers::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Progress of a bootstrap run, in the order steps happen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    NetworkResolved {
        name: String,
        child_chain_id: u64,
        parent_chain_id: u64,
    },

    ContractDeployed {
        contract: ContractKind,
        chain_id: u64,
        address: Address,
        tx_hash: H256,
    },

    BridgeConfigured {
        chain: ChainRole,
        bridge: Address,
        tx_hash: H256,
    },

    RegistrationSubmitted {
        tx_hash: H256,
    },

    RegistrationExecuted {
        retryable_creation_id: H256,
    },

    TokenApproved {
        token: Address,
        spender: Address,
        amount: U256,
        tx_hash: H256,
    },

    DepositSubmitted {
        tx_hash: H256,
        amount: U256,
    },

    DepositCompleted {
        retryable_creation_id: H256,
        status: MessageStatus,
    },

    BootstrapCompleted,

    BootstrapFailed {
        stage: String,
        error: String,
    },
}

impl ProgressEvent {
    /// Get event name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ProgressEvent::NetworkResolved { .. } => "network_resolved",
            ProgressEvent::ContractDeployed { .. } => "contract_deployed",
            ProgressEvent::BridgeConfigured { .. } => "bridge_configured",
            ProgressEvent::RegistrationSubmitted { .. } => "registration_submitted",
            ProgressEvent::RegistrationExecuted { .. } => "registration_executed",
            ProgressEvent::TokenApproved { .. } => "token_approved",
            ProgressEvent::DepositSubmitted { .. } => "deposit_submitted",
            ProgressEvent::DepositCompleted { .. } => "deposit_completed",
            ProgressEvent::BootstrapCompleted => "bootstrap_completed",
            ProgressEvent::BootstrapFailed { .. } => "bootstrap_failed",
        }
    }

    /// Whether this event announces success of the whole run
    pub fn is_success(&self) -> bool {
        matches!(self, ProgressEvent::BootstrapCompleted)
    }
}

/// Event topic signatures (keccak256 of event signature)
pub mod topics {
    use ethers::types::H256;
    use ethers::utils::keccak256;
    use lazy_static::lazy_static;

    lazy_static! {
        // Bridge
        pub static ref MESSAGE_DELIVERED: H256 = H256::from(keccak256(
            "MessageDelivered(uint256,bytes32,address,uint8,address,bytes32,uint256,uint64)"
        ));
        // Inbox
        pub static ref INBOX_MESSAGE_DELIVERED: H256 =
            H256::from(keccak256("InboxMessageDelivered(uint256,bytes)"));
        // ArbRetryableTx precompile
        pub static ref REDEEM_SCHEDULED: H256 = H256::from(keccak256(
            "RedeemScheduled(bytes32,bytes32,uint64,uint64,address,uint256,uint256)"
        ));
    }
}

/// Bridge-side half of a delivered message
#[derive(Debug, Clone)]
struct BridgeMessage {
    message_index: U256,
    inbox: Address,
    kind: u8,
    sender: Address,
    base_fee: U256,
}

/// Parser for the inbox/bridge logs of one child network
pub struct EventParser {
    child_chain_id: u64,
    inbox: Address,
}

impl EventParser {
    pub fn new(child_chain_id: u64, inbox: Address) -> Self {
        Self {
            child_chain_id,
            inbox,
        }
    }

    /// All submit-retryable messages created by a parent chain transaction
    pub fn retryable_messages(
        &self,
        receipt: &TransactionReceipt,
    ) -> BootstrapResult<Vec<RetryableMessage>> {
        let mut inbox_payloads: HashMap<U256, Bytes> = HashMap::new();
        let mut bridge_messages = Vec::new();

        for log in &receipt.logs {
            match log.topics.first() {
                Some(topic) if *topic == *topics::MESSAGE_DELIVERED => {
                    bridge_messages.push(self.parse_message_delivered(log)?);
                }
                Some(topic) if *topic == *topics::INBOX_MESSAGE_DELIVERED && log.address == self.inbox => {
                    let (number, payload) = self.parse_inbox_message(log)?;
                    inbox_payloads.insert(number, payload);
                }
                _ => {}
            }
        }

        let mut messages = Vec::new();
        for bridge in bridge_messages {
            if bridge.kind != SUBMIT_RETRYABLE_KIND || bridge.inbox != self.inbox {
                continue;
            }
            let payload = inbox_payloads.get(&bridge.message_index).ok_or_else(|| {
                BootstrapError::EventParsing(format!(
                    "no InboxMessageDelivered for message {} in tx {:?}",
                    bridge.message_index, receipt.transaction_hash
                ))
            })?;
            let data = SubmitRetryableData::parse(payload)?;
            messages.push(RetryableMessage::from_components(
                self.child_chain_id,
                bridge.sender,
                bridge.message_index,
                bridge.base_fee,
                &data,
            ));
        }

        Ok(messages)
    }

    /// Hash of the auto-redeem attempt scheduled by a ticket creation receipt
    pub fn redeem_scheduled(&self, receipt: &TransactionReceipt) -> Option<H256> {
        receipt
            .logs
            .iter()
            .find(|log| log.topics.first() == Some(&*topics::REDEEM_SCHEDULED))
            .and_then(|log| log.topics.get(2).copied())
    }

    fn parse_message_delivered(&self, log: &Log) -> BootstrapResult<BridgeMessage> {
        let message_index = log
            .topics
            .get(1)
            .map(|t| U256::from_big_endian(t.as_bytes()))
            .ok_or_else(|| BootstrapError::EventParsing("MessageDelivered without index".into()))?;

        let tokens = decode(
            &[
                ParamType::Address,
                ParamType::Uint(8),
                ParamType::Address,
                ParamType::FixedBytes(32),
                ParamType::Uint(256),
                ParamType::Uint(64),
            ],
            &log.data,
        )
        .map_err(|e| BootstrapError::EventParsing(format!("MessageDelivered data: {}", e)))?;

        match tokens.as_slice() {
            [Token::Address(inbox), Token::Uint(kind), Token::Address(sender), _, Token::Uint(base_fee), _] => {
                Ok(BridgeMessage {
                    message_index,
                    inbox: *inbox,
                    kind: kind.low_u32() as u8,
                    sender: *sender,
                    base_fee: *base_fee,
                })
            }
            _ => Err(BootstrapError::EventParsing(
                "unexpected MessageDelivered layout".into(),
            )),
        }
    }

    fn parse_inbox_message(&self, log: &Log) -> BootstrapResult<(U256, Bytes)> {
        let number = log
            .topics
            .get(1)
            .map(|t| U256::from_big_endian(t.as_bytes()))
            .ok_or_else(|| {
                BootstrapError::EventParsing("InboxMessageDelivered without number".into())
            })?;

        let payload = decode(&[ParamType::Bytes], &log.data)
            .map_err(|e| BootstrapError::EventParsing(format!("InboxMessageDelivered data: {}", e)))?
            .into_iter()
            .next()
            .and_then(Token::into_bytes)
            .ok_or_else(|| BootstrapError::EventParsing("InboxMessageDelivered without payload".into()))?;

        Ok((number, Bytes::from(payload)))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::arbitrum::message::fixtures::encode_submit_retryable;
    use ethers::abi::encode;

    fn index_topic(n: u64) -> H256 {
        H256::from_low_u64_be(n)
    }

    pub fn message_delivered(bridge: Address, index: u64, inbox: Address, kind: u8, sender: Address) -> Log {
        Log {
            address: bridge,
            topics: vec![*topics::MESSAGE_DELIVERED, index_topic(index), H256::zero()],
            data: encode(&[
                Token::Address(inbox),
                Token::Uint(U256::from(kind)),
                Token::Address(sender),
                Token::FixedBytes(vec![0u8; 32]),
                Token::Uint(U256::from(25_000_000_000u64)),
                Token::Uint(U256::from(1_700_000_000u64)),
            ])
            .into(),
            ..Default::default()
        }
    }

    pub fn inbox_message(inbox: Address, index: u64, data: &SubmitRetryableData) -> Log {
        Log {
            address: inbox,
            topics: vec![*topics::INBOX_MESSAGE_DELIVERED, index_topic(index)],
            data: encode(&[Token::Bytes(encode_submit_retryable(data))]).into(),
            ..Default::default()
        }
    }
}
