//! Parent-to-child retryable messages and their lifecycle

use crate::error::{BootstrapError, BootstrapResult};

use ethers::types::{Address, Bytes, H256, U256};
use ethers::utils::keccak256;
use ethers::utils::rlp::RlpStream;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bridge message kind for `submitRetryableTx`
pub const SUBMIT_RETRYABLE_KIND: u8 = 9;

/// Typed-transaction prefix of the child-side ticket creation tx
const SUBMIT_RETRYABLE_TX_TYPE: u8 = 0x69;

const WORD: usize = 32;
const HEADER_WORDS: usize = 9;

/// Status of a retryable on the child chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    /// Ticket creation not yet seen on the child chain
    NotYetCreated,
    CreationFailed,
    /// Ticket exists but auto-redeem did not succeed; it can still be redeemed manually
    FundsDepositedOnChild,
    Redeemed,
    Expired,
}

impl MessageStatus {
    /// Numeric code, stable across versions of the bridge tooling
    pub fn code(&self) -> u8 {
        match self {
            MessageStatus::NotYetCreated => 1,
            MessageStatus::CreationFailed => 2,
            MessageStatus::FundsDepositedOnChild => 3,
            MessageStatus::Redeemed => 4,
            MessageStatus::Expired => 5,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, MessageStatus::NotYetCreated)
    }

    pub fn is_redeemed(&self) -> bool {
        matches!(self, MessageStatus::Redeemed)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageStatus::NotYetCreated => "NOT_YET_CREATED",
            MessageStatus::CreationFailed => "CREATION_FAILED",
            MessageStatus::FundsDepositedOnChild => "FUNDS_DEPOSITED_ON_CHILD",
            MessageStatus::Redeemed => "REDEEMED",
            MessageStatus::Expired => "EXPIRED",
        };
        f.write_str(name)
    }
}

/// Decoded payload of an `InboxMessageDelivered` submit-retryable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRetryableData {
    pub dest_address: Address,
    pub l2_call_value: U256,
    pub l1_value: U256,
    pub max_submission_fee: U256,
    pub excess_fee_refund_address: Address,
    pub call_value_refund_address: Address,
    pub gas_limit: U256,
    pub max_fee_per_gas: U256,
    pub data: Bytes,
}

impl SubmitRetryableData {
    /// Parse nine 32-byte header words followed by the child calldata
    pub fn parse(payload: &[u8]) -> BootstrapResult<Self> {
        if payload.len() < HEADER_WORDS * WORD {
            return Err(BootstrapError::EventParsing(format!(
                "submit-retryable payload is {} bytes, expected at least {}",
                payload.len(),
                HEADER_WORDS * WORD
            )));
        }

        let word = |i: usize| &payload[i * WORD..(i + 1) * WORD];
        let uint = |i: usize| U256::from_big_endian(word(i));
        let address = |i: usize| Address::from_slice(&word(i)[12..]);

        let data_len = uint(8);
        let body = &payload[HEADER_WORDS * WORD..];
        if data_len != U256::from(body.len()) {
            return Err(BootstrapError::EventParsing(format!(
                "submit-retryable calldata length {} does not match payload ({} bytes)",
                data_len,
                body.len()
            )));
        }

        Ok(Self {
            dest_address: address(0),
            l2_call_value: uint(1),
            l1_value: uint(2),
            max_submission_fee: uint(3),
            excess_fee_refund_address: address(4),
            call_value_refund_address: address(5),
            gas_limit: uint(6),
            max_fee_per_gas: uint(7),
            data: Bytes::from(body.to_vec()),
        })
    }
}

/// One cross-chain message created by a parent chain transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryableMessage {
    pub child_chain_id: u64,
    pub message_number: U256,
    /// Aliased sender as recorded by the bridge
    pub sender: Address,
    pub dest_address: Address,
    /// Hash of the ticket creation tx on the child chain
    pub retryable_creation_id: H256,
}

impl RetryableMessage {
    pub fn from_components(
        child_chain_id: u64,
        sender: Address,
        message_number: U256,
        parent_base_fee: U256,
        data: &SubmitRetryableData,
    ) -> Self {
        Self {
            child_chain_id,
            message_number,
            sender,
            dest_address: data.dest_address,
            retryable_creation_id: retryable_creation_id(
                child_chain_id,
                sender,
                message_number,
                parent_base_fee,
                data,
            ),
        }
    }
}

/// Hash of the child-side ticket creation transaction:
/// `keccak256(0x69 || rlp([chainId, msgNum, from, baseFee, l1Value, maxFee, gasLimit,
/// dest, l2CallValue, callValueRefund, maxSubmissionFee, excessFeeRefund, data]))`
pub fn retryable_creation_id(
    child_chain_id: u64,
    sender: Address,
    message_number: U256,
    parent_base_fee: U256,
    data: &SubmitRetryableData,
) -> H256 {
    let mut message_number_bytes = [0u8; 32];
    message_number.to_big_endian(&mut message_number_bytes);

    let mut stream = RlpStream::new_list(13);
    stream.append(&U256::from(child_chain_id));
    stream.append(&message_number_bytes.to_vec());
    stream.append(&sender);
    stream.append(&parent_base_fee);
    stream.append(&data.l1_value);
    stream.append(&data.max_fee_per_gas);
    stream.append(&data.gas_limit);
    // contract creation encodes an empty destination
    if data.dest_address == Address::zero() {
        stream.append_empty_data();
    } else {
        stream.append(&data.dest_address);
    }
    stream.append(&data.l2_call_value);
    stream.append(&data.call_value_refund_address);
    stream.append(&data.max_submission_fee);
    stream.append(&data.excess_fee_refund_address);
    stream.append(&data.data.to_vec());

    let mut encoded = vec![SUBMIT_RETRYABLE_TX_TYPE];
    encoded.extend_from_slice(&stream.out());
    H256::from(keccak256(encoded))
}
