//! Run state persisted for operators
//!
//! Handles:
//! - Deployed contract addresses and transaction hashes
//! - Progress events and the terminal error
//! - JSON output for manual recovery after a partial run

mod record;

pub use record::DeploymentRecord;
