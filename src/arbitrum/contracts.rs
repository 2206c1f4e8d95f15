//! Contract bindings used by the bootstrap
//!
//! Only the functions the bootstrap calls are bound. The bridge and token
//! contracts themselves are deployed from Hardhat artifacts.

use ethers::contract::abigen;
use ethers::types::Address;
use lazy_static::lazy_static;

abigen!(
    TokenBridgeAdmin,
    r#"[
        function setTokenBridgeInformation(address parentToken, address childToken, address counterpartBridge) external
    ]"#
);

abigen!(
    Erc20,
    r#"[
        function decimals() external view returns (uint8)
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);

abigen!(
    ParentCustomToken,
    r#"[
        function isArbitrumEnabled() external view returns (uint8)
        function registerTokenOnL2(address l2CustomTokenAddress, uint256 maxSubmissionCostForCustomGateway, uint256 maxSubmissionCostForRouter, uint256 maxGasForCustomGateway, uint256 maxGasForRouter, uint256 gasPriceBid, uint256 valueForGateway, uint256 valueForRouter, address creditBackAddress) external payable
    ]"#
);

abigen!(
    ParentGatewayRouter,
    r#"[
        function getGateway(address token) external view returns (address)
        function outboundTransfer(address token, address to, uint256 amount, uint256 maxGas, uint256 gasPriceBid, bytes data) external payable returns (bytes)
    ]"#
);

abigen!(
    Inbox,
    r#"[
        function calculateRetryableSubmissionFee(uint256 dataLength, uint256 baseFee) external view returns (uint256)
    ]"#
);

abigen!(
    ArbRetryableTx,
    r#"[
        function getTimeout(bytes32 ticketId) external view returns (uint256)
    ]"#
);

/// `isArbitrumEnabled()` return value of tokens prepared for custom gateway registration
pub const ARBITRUM_ENABLED: u8 = 0xb1;

lazy_static! {
    /// ArbRetryableTx precompile on every Arbitrum chain
    pub static ref ARB_RETRYABLE_TX_ADDRESS: Address =
        "0x000000000000000000000000000000000000006E".parse().unwrap();
}
