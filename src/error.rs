//! Error types for the token bridge bootstrap

use crate::arbitrum::MessageStatus;

use thiserror::Error;

/// Main error type for the bootstrap run
///
/// Every variant is fatal: nothing is retried and nothing is rolled back.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Unsupported network {chain_id}: {reason}")]
    UnsupportedNetwork { chain_id: u64, reason: String },

    #[error("Chain connection error for chain {chain_id}: {message}")]
    ChainConnection { chain_id: u64, message: String },

    #[error("Deployment of {contract} failed: {reason}")]
    DeploymentFailed { contract: String, reason: String },

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Event parsing error: {0}")]
    EventParsing(String),

    #[error("Expected {expected} cross-chain message(s) from {operation}, but got {actual}")]
    UnexpectedMessageCount {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Token registration was not redeemed on the child chain. Status: {status}")]
    RegistrationNotExecuted { status: MessageStatus },

    #[error("Token bridging to the child chain failed. Status: {status} (code {})", .status.code())]
    BridgingIncomplete { status: MessageStatus },

    #[error("Timeout waiting for {operation}")]
    Timeout { operation: String },

    #[error("Invalid stage transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Deployment record error: {0}")]
    Record(String),
}

impl BootstrapError {
    /// Coarse classification used in the terminal failure log line
    pub fn stage_hint(&self) -> &'static str {
        match self {
            BootstrapError::MissingParameter(_)
            | BootstrapError::InvalidParameter { .. }
            | BootstrapError::Config(_)
            | BootstrapError::Wallet(_) => "configuration",
            BootstrapError::UnsupportedNetwork { .. } | BootstrapError::ChainConnection { .. } => {
                "connection"
            }
            BootstrapError::DeploymentFailed { .. } | BootstrapError::Artifact(_) => "deployment",
            BootstrapError::UnexpectedMessageCount { .. }
            | BootstrapError::RegistrationNotExecuted { .. }
            | BootstrapError::BridgingIncomplete { .. }
            | BootstrapError::EventParsing(_)
            | BootstrapError::Timeout { .. } => "cross-chain",
            BootstrapError::Transaction(_)
            | BootstrapError::Contract(_)
            | BootstrapError::InvalidStateTransition { .. }
            | BootstrapError::Record(_) => "execution",
        }
    }

    /// Fold any failure during a contract deployment into `DeploymentFailed`
    pub fn into_deployment_failure(self, contract: impl ToString) -> Self {
        match self {
            e @ BootstrapError::DeploymentFailed { .. } => e,
            other => BootstrapError::DeploymentFailed {
                contract: contract.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Result type for bootstrap operations
pub type BootstrapResult<T> = Result<T, BootstrapError>;
