//! Bootstrap orchestration
//!
//! The engine:
//! 1. Validates the required inputs before touching the network
//! 2. Deploys the parent/child bridges and tokens in dependency order
//! 3. Links both bridges and registers the token pair through a retryable message
//! 4. Approves and deposits the bridge amount, waiting for the child chain credit

pub mod engine;
pub mod stage;
pub mod wait;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::execute;
pub use stage::Stage;
