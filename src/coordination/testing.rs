//! Recording fakes for the chain and bridge capabilities

use crate::arbitrum::{MessageStatus, ParentReceipt, ResolvedNetwork, RetryableMessage, TokenBridger};
use crate::chain::{
    BridgeLink, ChainRead, ChainRole, ChainWrite, Connections, ContractKind, DeployedContract,
};
use crate::config::{
    Settings, BRIDGE_AMOUNT_ENV, CHILD_RPC_ENV, PARENT_RPC_ENV, PRIVATE_KEY_ENV, TOKEN_SUPPLY_ENV,
};
use crate::error::{BootstrapError, BootstrapResult};

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, H256, U256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const PARENT_CHAIN_ID: u64 = 1337;
pub const CHILD_CHAIN_ID: u64 = 412346;

/// Every capability call, with its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Deploy {
        kind: ContractKind,
        args: Vec<Token>,
    },
    ConfigureBridge {
        chain: ChainRole,
        bridge: Address,
        link: BridgeLink,
    },
    Decimals {
        token: Address,
    },
    Register {
        parent_token: Address,
        child_token: Address,
    },
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Deposit {
        token: Address,
        amount: U256,
    },
    MessageStatus {
        id: H256,
    },
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::Decimals { .. } | Call::MessageStatus { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn all(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Transactions only, in submission order
    pub fn writes(&self) -> Vec<Call> {
        self.all().into_iter().filter(Call::is_write).collect()
    }
}

/// Deterministic address per contract: 0xa1.., 0xa2.., 0xa3.., 0xa4..
pub fn contract_address(kind: ContractKind) -> Address {
    match kind {
        ContractKind::ParentBridge => Address::repeat_byte(0xa1),
        ContractKind::ChildBridge => Address::repeat_byte(0xa2),
        ContractKind::ParentToken => Address::repeat_byte(0xa3),
        ContractKind::ChildToken => Address::repeat_byte(0xa4),
    }
}

pub fn network() -> ResolvedNetwork {
    ResolvedNetwork {
        name: "local-orbit".to_string(),
        chain_id: CHILD_CHAIN_ID,
        parent_chain_id: PARENT_CHAIN_ID,
        inbox: Address::repeat_byte(0x1b),
        parent_gateway_router: Address::repeat_byte(0x71),
        child_gateway_router: Address::repeat_byte(0x72),
    }
}

/// Settings with all five required inputs and a fast message poll
pub fn settings(supply: &str, bridge_amount: &str) -> Settings {
    let vars: HashMap<&str, String> = [
        (
            PRIVATE_KEY_ENV,
            "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d".to_string(),
        ),
        (PARENT_RPC_ENV, "http://localhost:8545".to_string()),
        (CHILD_RPC_ENV, "http://localhost:8547".to_string()),
        (TOKEN_SUPPLY_ENV, supply.to_string()),
        (BRIDGE_AMOUNT_ENV, bridge_amount.to_string()),
    ]
    .into_iter()
    .collect();

    let mut settings = Settings::default();
    settings.apply_env_overrides(|name| vars.get(name).cloned());
    settings.bootstrap.message_poll_interval_ms = 1;
    settings
}

/// How the fakes behave for one run
#[derive(Debug, Clone)]
pub struct Scenario {
    pub decimals: u8,
    pub fail_deploy: Option<ContractKind>,
    pub registration_messages: usize,
    pub deposit_messages: usize,
    /// Statuses returned on successive polls; the last one repeats
    pub registration_statuses: Vec<MessageStatus>,
    pub deposit_statuses: Vec<MessageStatus>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            decimals: 18,
            fail_deploy: None,
            registration_messages: 1,
            deposit_messages: 1,
            registration_statuses: vec![MessageStatus::NotYetCreated, MessageStatus::Redeemed],
            deposit_statuses: vec![
                MessageStatus::NotYetCreated,
                MessageStatus::NotYetCreated,
                MessageStatus::Redeemed,
            ],
        }
    }
}

impl Scenario {
    pub fn connections(&self, calls: &CallLog) -> Connections {
        let chain = |role, chain_id| {
            Arc::new(FakeChain {
                role,
                chain_id,
                calls: calls.clone(),
                decimals: self.decimals,
                fail_deploy: self.fail_deploy,
            })
        };

        Connections {
            parent: chain(ChainRole::Parent, PARENT_CHAIN_ID),
            child: chain(ChainRole::Child, CHILD_CHAIN_ID),
            bridger: Arc::new(FakeBridger {
                calls: calls.clone(),
                scenario: self.clone(),
                polls: Mutex::new(HashMap::new()),
            }),
            network: network(),
        }
    }
}

pub struct FakeChain {
    role: ChainRole,
    chain_id: u64,
    calls: CallLog,
    decimals: u8,
    fail_deploy: Option<ContractKind>,
}

#[async_trait]
impl ChainRead for FakeChain {
    fn role(&self) -> ChainRole {
        self.role
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn token_decimals(&self, token: Address) -> BootstrapResult<u8> {
        self.calls.push(Call::Decimals { token });
        Ok(self.decimals)
    }
}

#[async_trait]
impl ChainWrite for FakeChain {
    fn signer_address(&self) -> Address {
        Address::repeat_byte(0x5e)
    }

    async fn deploy(&self, kind: ContractKind, args: Vec<Token>) -> BootstrapResult<DeployedContract> {
        assert_eq!(kind.role(), self.role, "{kind} deployed on the wrong chain");
        self.calls.push(Call::Deploy { kind, args });

        if self.fail_deploy == Some(kind) {
            return Err(BootstrapError::Transaction(format!(
                "deploy {}: execution reverted",
                kind
            )));
        }
        Ok(DeployedContract {
            kind,
            chain_id: self.chain_id,
            address: contract_address(kind),
            tx_hash: H256::from(contract_address(kind)),
        })
    }

    async fn configure_bridge(&self, bridge: Address, link: BridgeLink) -> BootstrapResult<H256> {
        self.calls.push(Call::ConfigureBridge {
            chain: self.role,
            bridge,
            link,
        });
        Ok(H256::from_low_u64_be(self.chain_id))
    }
}

const REGISTRATION_ID_BYTE: u8 = 0xe0;
const DEPOSIT_ID_BYTE: u8 = 0xd0;

pub struct FakeBridger {
    calls: CallLog,
    scenario: Scenario,
    polls: Mutex<HashMap<H256, usize>>,
}

impl FakeBridger {
    fn receipt(tx: u8, id_byte: u8, count: usize) -> ParentReceipt {
        let messages = (0..count)
            .map(|i| RetryableMessage {
                child_chain_id: CHILD_CHAIN_ID,
                message_number: U256::from(i),
                sender: Address::repeat_byte(0x5e),
                dest_address: Address::repeat_byte(0x72),
                retryable_creation_id: H256::repeat_byte(id_byte + i as u8),
            })
            .collect();
        ParentReceipt {
            tx_hash: H256::repeat_byte(tx),
            messages,
        }
    }
}

#[async_trait]
impl TokenBridger for FakeBridger {
    async fn register_custom_token(
        &self,
        parent_token: Address,
        child_token: Address,
    ) -> BootstrapResult<ParentReceipt> {
        self.calls.push(Call::Register {
            parent_token,
            child_token,
        });
        Ok(Self::receipt(
            0x0e,
            REGISTRATION_ID_BYTE,
            self.scenario.registration_messages,
        ))
    }

    async fn approve_token(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> BootstrapResult<H256> {
        self.calls.push(Call::Approve {
            token,
            spender,
            amount,
        });
        Ok(H256::repeat_byte(0x0a))
    }

    async fn deposit(&self, token: Address, amount: U256) -> BootstrapResult<ParentReceipt> {
        self.calls.push(Call::Deposit { token, amount });
        Ok(Self::receipt(0x0d, DEPOSIT_ID_BYTE, self.scenario.deposit_messages))
    }

    async fn message_status(&self, message: &RetryableMessage) -> BootstrapResult<MessageStatus> {
        let id = message.retryable_creation_id;
        self.calls.push(Call::MessageStatus { id });

        let statuses = if id.as_bytes()[0] & 0xf0 == REGISTRATION_ID_BYTE {
            &self.scenario.registration_statuses
        } else {
            &self.scenario.deposit_statuses
        };

        let mut polls = self.polls.lock().unwrap();
        let seen = polls.entry(id).or_insert(0);
        let status = statuses
            .get(*seen)
            .or_else(|| statuses.last())
            .copied()
            .unwrap_or(MessageStatus::NotYetCreated);
        *seen += 1;
        Ok(status)
    }
}
