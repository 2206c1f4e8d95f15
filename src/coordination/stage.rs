//! Bootstrap stages and the artifacts each one produces

use crate::arbitrum::{MessageStatus, RetryableMessage};
use crate::chain::DeployedContract;
use crate::error::{BootstrapError, BootstrapResult};

use ethers::types::{H256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a run in `Bootstrapped -> Deployed -> Registered -> Bridged -> Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Inputs validated and chains connected
    Bootstrapped,
    Deployed,
    Registered,
    Bridged,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }

    pub fn can_transition_to(&self, next: Stage) -> bool {
        match (self, next) {
            (Stage::Bootstrapped, Stage::Deployed)
            | (Stage::Deployed, Stage::Registered)
            | (Stage::Registered, Stage::Bridged)
            | (Stage::Bridged, Stage::Done) => true,
            (current, Stage::Failed) => !current.is_terminal(),
            _ => false,
        }
    }

    pub fn transition(self, next: Stage) -> BootstrapResult<Stage> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(BootstrapError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Bootstrapped => "bootstrapped",
            Stage::Deployed => "deployed",
            Stage::Registered => "registered",
            Stage::Bridged => "bridged",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The four contracts, in deployment order
#[derive(Debug, Clone)]
pub struct Deployed {
    pub parent_bridge: DeployedContract,
    pub child_bridge: DeployedContract,
    pub parent_token: DeployedContract,
    pub child_token: DeployedContract,
}

/// Both bridges linked and the token pair registered on the child chain
#[derive(Debug, Clone)]
pub struct Registered {
    pub parent_config_tx: H256,
    pub child_config_tx: H256,
    pub registration_tx: H256,
    pub message: RetryableMessage,
}

/// Tokens deposited and credited on the child chain
#[derive(Debug, Clone)]
pub struct Bridged {
    pub decimals: u8,
    pub amount: U256,
    pub approve_tx: H256,
    pub deposit_tx: H256,
    pub message: RetryableMessage,
    pub status: MessageStatus,
}
