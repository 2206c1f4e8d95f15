//! Transaction submission and retryable gas pricing

mod gas;
mod sender;

pub use gas::RetryableGasEstimator;
pub use sender::TransactionSender;
