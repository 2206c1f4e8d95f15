//! Polling until a cross-chain message reaches a terminal status
//!
//! Used for both the registration message and the deposit.

use crate::arbitrum::{MessageStatus, RetryableMessage, TokenBridger};
use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, BootstrapResult};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::debug;

/// Something whose status can be polled on the child chain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn poll_status(&self) -> BootstrapResult<MessageStatus>;

    /// Label used in logs and timeout errors
    fn describe(&self) -> String;
}

/// A retryable message polled through the bridger
pub struct TrackedMessage {
    bridger: Arc<dyn TokenBridger>,
    message: RetryableMessage,
    label: &'static str,
}

impl TrackedMessage {
    pub fn new(bridger: Arc<dyn TokenBridger>, message: RetryableMessage, label: &'static str) -> Self {
        Self {
            bridger,
            message,
            label,
        }
    }
}

#[async_trait]
impl StatusSource for TrackedMessage {
    async fn poll_status(&self) -> BootstrapResult<MessageStatus> {
        self.bridger.message_status(&self.message).await
    }

    fn describe(&self) -> String {
        format!(
            "{} (retryable 0x{}..)",
            self.label,
            hex::encode(&self.message.retryable_creation_id.as_bytes()[..6])
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    /// `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl WaitPolicy {
    pub fn from_config(config: &BootstrapConfig) -> Self {
        Self {
            poll_interval: config.message_poll_interval(),
            timeout: config.message_timeout(),
        }
    }
}

/// Poll `source` until its status is terminal, bounded by the policy timeout
pub async fn wait_for_terminal(
    source: &dyn StatusSource,
    policy: &WaitPolicy,
) -> BootstrapResult<MessageStatus> {
    match policy.timeout {
        None => poll_until_terminal(source, policy.poll_interval).await,
        Some(limit) => timeout(limit, poll_until_terminal(source, policy.poll_interval))
            .await
            .map_err(|_| BootstrapError::Timeout {
                operation: source.describe(),
            })?,
    }
}

async fn poll_until_terminal(
    source: &dyn StatusSource,
    interval: Duration,
) -> BootstrapResult<MessageStatus> {
    let mut polls: u32 = 0;
    loop {
        let status = source.poll_status().await?;
        polls += 1;
        if status.is_terminal() {
            debug!("{} reached {} after {} poll(s)", source.describe(), status, polls);
            return Ok(status);
        }
        debug!("{} is {}, polling again in {:?}", source.describe(), status, interval);
        sleep(interval).await;
    }
}
