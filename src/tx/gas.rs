//! Gas parameters for parent-to-child retryable tickets

use crate::arbitrum::contracts::Inbox;
use crate::chain::ChainProvider;
use crate::config::GasConfig;
use crate::error::{BootstrapError, BootstrapResult};

use ethers::types::{Address, U256};
use tracing::debug;

/// Funding for one retryable ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryableGas {
    pub max_submission_cost: U256,
    pub gas_limit: U256,
    pub max_fee_per_gas: U256,
}

impl RetryableGas {
    /// ETH that must accompany the parent transaction to fund the ticket
    pub fn deposit_value(&self) -> U256 {
        self.max_submission_cost + self.gas_limit * self.max_fee_per_gas
    }
}

/// Estimator for retryable submission fees and child execution gas
#[derive(Debug, Clone)]
pub struct RetryableGasEstimator {
    /// Child-side execution gas limit
    gas_limit: U256,
    /// Buffer percentage on the child gas price (500 = 6x)
    gas_price_buffer_percent: u64,
    /// Buffer percentage on the submission fee
    submission_fee_buffer_percent: u64,
}

impl RetryableGasEstimator {
    pub fn new(config: &GasConfig) -> Self {
        Self {
            gas_limit: U256::from(config.retryable_gas_limit),
            gas_price_buffer_percent: config.gas_price_buffer_percent,
            submission_fee_buffer_percent: config.submission_fee_buffer_percent,
        }
    }

    /// Quote a retryable whose child calldata is `calldata_len` bytes long
    pub async fn estimate(
        &self,
        parent: &ChainProvider,
        child: &ChainProvider,
        inbox: Address,
        calldata_len: usize,
    ) -> BootstrapResult<RetryableGas> {
        let base_fee = parent.latest_base_fee().await?;
        let submission_fee = Inbox::new(inbox, parent.client())
            .calculate_retryable_submission_fee(U256::from(calldata_len), base_fee)
            .call()
            .await
            .map_err(|e| {
                BootstrapError::Contract(format!("calculateRetryableSubmissionFee: {}", e))
            })?;
        let child_gas_price = child.gas_price().await?;

        let quote = self.quote(submission_fee, child_gas_price);
        debug!(
            "Retryable quote for {} bytes: submission {} wei, {} gas at {} wei",
            calldata_len, quote.max_submission_cost, quote.gas_limit, quote.max_fee_per_gas
        );
        Ok(quote)
    }

    /// Apply the configured buffers to raw network prices
    pub fn quote(&self, submission_fee: U256, child_gas_price: U256) -> RetryableGas {
        RetryableGas {
            max_submission_cost: with_buffer(submission_fee, self.submission_fee_buffer_percent),
            gas_limit: self.gas_limit,
            max_fee_per_gas: with_buffer(child_gas_price, self.gas_price_buffer_percent),
        }
    }
}

fn with_buffer(value: U256, percent: u64) -> U256 {
    value + value * percent / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_scale_raw_prices() {
        let estimator = RetryableGasEstimator::new(&GasConfig {
            retryable_gas_limit: 100_000,
            gas_price_buffer_percent: 500,
            submission_fee_buffer_percent: 300,
        });

        let quote = estimator.quote(U256::from(1_000u64), U256::from(100_000_000u64));
        assert_eq!(quote.max_submission_cost, U256::from(4_000u64));
        assert_eq!(quote.max_fee_per_gas, U256::from(600_000_000u64));
        assert_eq!(quote.gas_limit, U256::from(100_000u64));
    }

    #[test]
    fn deposit_value_covers_submission_and_execution() {
        let gas = RetryableGas {
            max_submission_cost: U256::from(4_000u64),
            gas_limit: U256::from(100_000u64),
            max_fee_per_gas: U256::from(600_000_000u64),
        };
        assert_eq!(
            gas.deposit_value(),
            U256::from(4_000u64) + U256::from(60_000_000_000_000u64)
        );
    }

    #[test]
    fn zero_buffer_is_identity() {
        assert_eq!(with_buffer(U256::from(77u64), 0), U256::from(77u64));
    }
}
